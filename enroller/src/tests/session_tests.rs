use super::fake_portal::{FakePortal, TERM};
use crate::config::EnrollerConfig;
use crate::errors::{AutomationError, EnrollmentError};
use crate::model::Term;
use crate::session::SpireEnrollment;
use crate::Portal;
use std::time::Duration;

#[tokio::test]
async fn cart_cache_starts_empty_and_follows_the_page() {
    let portal = FakePortal::new()
        .with_cart_entry("COMPSCI 187 LEC 01 (12345)")
        .with_cart_entry("MATH 235 LEC 02 (67890)");
    let mut ctx = portal.session();

    assert!(ctx.cart_entries().is_empty());
    assert!(!ctx.in_cart("12345"));

    assert_eq!(ctx.refresh_cart().await.unwrap(), 2);
    assert!(ctx.in_cart("12345"));
    assert!(ctx.in_cart("67890"));
    assert_eq!(
        ctx.cart_entries()["67890"].description,
        "MATH 235 LEC 02 (67890)"
    );
}

#[tokio::test]
async fn scan_picks_up_rows_added_since_the_last_scan() {
    let portal = FakePortal::new().with_cart_entry("COMPSCI 187 LEC 01 (12345)");
    let mut ctx = portal.session();
    ctx.refresh_cart().await.unwrap();
    assert!(ctx.in_cart("12345"));
    assert!(!ctx.in_cart("55555"));

    let _ = portal.clone().with_cart_entry("HIST 100 LEC 01 (55555)");
    let rows = ctx.scan_cart().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].entry.class_id, "55555");
    assert!(rows[1].cell(0).is_ok());
    assert!(matches!(
        rows[1].cell(7),
        Err(AutomationError::ElementNotFound(_))
    ));
    assert_eq!(ctx.cart_entries().len(), 2);
}

#[tokio::test]
async fn failed_scan_keeps_previous_cache() {
    let portal = FakePortal::new().with_cart_entry("COMPSCI 187 LEC 01 (12345)");
    let mut ctx = portal.session();
    ctx.refresh_cart().await.unwrap();

    let _ = portal.clone().hiding("shopping_cart_table");
    let err = ctx.refresh_cart().await.unwrap_err();
    assert!(err.is_wait_expired());
    assert!(ctx.in_cart("12345"));
}

#[test]
fn class_id_falls_back_to_trimmed_description() {
    let ctx = FakePortal::new().session();
    assert_eq!(ctx.class_id_of("COMPSCI 187 LEC 01 (12345)"), "12345");
    assert_eq!(ctx.class_id_of("  Independent Study  "), "Independent Study");
}

#[tokio::test]
async fn term_probe_uses_the_short_bound() {
    let idle = FakePortal::new();
    assert!(!idle.session().needs_term_selection().await);

    let pending = FakePortal::new().needing_term(&[TERM]);
    let ctx = pending.session();
    assert!(ctx.needs_term_selection().await);

    let term_table = EnrollerConfig::default().selectors.term_table.to_string();
    assert!(pending
        .waits()
        .iter()
        .any(|(selector, timeout)| *selector == term_table && *timeout == Duration::from_secs(2)));
}

#[tokio::test]
async fn selects_matching_term_row() {
    let portal = FakePortal::new().needing_term(&["2026 Spring", "2026 Summer", TERM]);
    let ctx = portal.session();

    ctx.select_current_term().await.unwrap();

    assert_eq!(portal.selected_term().as_deref(), Some(TERM));
    assert_eq!(
        portal.events(),
        vec!["click:term_radio:3", "click:term_continue"]
    );
    assert!(!ctx.needs_term_selection().await);
}

#[tokio::test]
async fn other_terms_can_be_selected_explicitly() {
    let portal = FakePortal::new().needing_term(&["2026 Spring", TERM]);
    let ctx = portal.session();

    ctx.select_term(&Term::new("2026 Spring")).await.unwrap();
    assert_eq!(portal.selected_term().as_deref(), Some("2026 Spring"));
    assert_eq!(ctx.term().label(), TERM);
}

#[test]
fn invalid_configuration_is_refused() {
    let mut config = EnrollerConfig::default();
    config.timeouts.finish_wait_ms = config.timeouts.default_wait_ms;

    let result = SpireEnrollment::new(
        Portal::from_engine(FakePortal::new()),
        Term::new(TERM),
        config,
    );
    assert!(matches!(result, Err(EnrollmentError::InvalidConfig(_))));
}
