use super::fake_portal::{FakePortal, TERM};
use crate::action::Action;
use crate::add::Add;
use crate::condition::{
    describe_conditions, Condition, ElementPresent, InCart, Not, NotInCart, TermSelected,
};
use crate::model::Lecture;

#[tokio::test]
async fn cart_conditions_read_the_cache_not_the_page() {
    let portal = FakePortal::new().with_cart_entry("COMPSCI 187 LEC 01 (12345)");
    let mut ctx = portal.session();

    // Nothing scanned yet.
    assert!(!InCart::new("12345").evaluate(&ctx).await);
    assert!(NotInCart::new("12345").evaluate(&ctx).await);

    ctx.refresh_cart().await.unwrap();
    assert!(InCart::new("12345").evaluate(&ctx).await);
    assert!(!NotInCart::new("12345").evaluate(&ctx).await);
}

#[tokio::test]
async fn term_selected_tracks_the_live_page() {
    let portal = FakePortal::new().needing_term(&[TERM]);
    let ctx = portal.session();

    assert!(!TermSelected.evaluate(&ctx).await);
    ctx.select_current_term().await.unwrap();
    assert!(TermSelected.evaluate(&ctx).await);
}

#[tokio::test]
async fn element_present_and_negation() {
    let portal = FakePortal::new().hiding("add_tab");
    let ctx = portal.session();

    let back = ctx.config().selectors.back_to_cart.clone();
    let tab = ctx.config().selectors.add_tab.clone();
    assert!(ElementPresent::new(back).evaluate(&ctx).await);
    assert!(!ElementPresent::new(tab.clone()).evaluate(&ctx).await);
    assert!(Not::new(ElementPresent::new(tab)).evaluate(&ctx).await);
}

#[tokio::test]
async fn invalid_selector_reads_as_false() {
    let portal = FakePortal::new();
    let ctx = portal.session();
    assert!(!ElementPresent::new("no prefix here").evaluate(&ctx).await);
    // Rejected before any lookup reaches the engine.
    assert!(portal.waits().is_empty());
}

#[tokio::test]
async fn unmet_conditions_are_reported_by_description() {
    let portal = FakePortal::new().with_cart_entry("COMPSCI 187 LEC 01 (12345)");
    let mut ctx = portal.session();
    ctx.refresh_cart().await.unwrap();

    let add = Add::new(Lecture::new("67890", "MATH 235", "02"))
        .with_condition(InCart::new("12345"))
        .with_condition(InCart::new("67890"))
        .with_condition(TermSelected);

    assert_eq!(
        add.unmet_conditions(&ctx).await,
        vec!["67890 is in the shopping cart".to_string()]
    );
    assert!(!add.conditions_met(&ctx).await);
    // Evaluating conditions never runs the action.
    assert_eq!(add.satisfied(), None);
    assert!(portal.events().is_empty());
}

#[test]
fn descriptions_compose() {
    let conditions: Vec<Box<dyn Condition>> = vec![
        Box::new(NotInCart::new("12345")),
        Box::new(Not::new(TermSelected)),
        Box::new(ElementPresent::new("#DERIVED_REGFRM1_TITLE1")),
    ];
    assert_eq!(
        describe_conditions(&conditions),
        "[12345 is not in the shopping cart; not (a term is selected); #DERIVED_REGFRM1_TITLE1 is present]"
    );
    assert_eq!(describe_conditions(&[]), "[]");
}
