//! Selector tables, wait bounds and page layout for a portal deployment.
//!
//! Everything the workflows need to know about the portal's markup lives
//! here, so a portal redesign is a configuration change rather than a code
//! change. Configurations load from YAML or JSON and are validated before use.

use crate::errors::EnrollmentError;
use crate::selector::Selector;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnrollerConfig {
    pub selectors: PortalSelectors,
    pub timeouts: Timeouts,
    pub layout: TableLayout,
    pub markers: Markers,
    pub sequence: SequencePolicy,
}

/// Every element the enrollment workflows touch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalSelectors {
    pub section_title: Selector,
    pub add_tab: Selector,
    pub term_table: Selector,
    pub term_continue: Selector,
    pub add_by_id_field: Selector,
    pub add_by_id_enter: Selector,
    pub discussion_table: Selector,
    pub radio_button: Selector,
    pub discussion_confirm: Selector,
    pub confirm_add_to_cart: Selector,
    pub shopping_cart_table: Selector,
    pub cart_checkbox: Selector,
    pub enroll_button: Selector,
    pub finish_button: Selector,
    pub result_icon: Selector,
    pub back_to_cart: Selector,
}

impl Default for PortalSelectors {
    fn default() -> Self {
        Self {
            section_title: Selector::from("css:#DERIVED_REGFRM1_TITLE1"),
            add_tab: Selector::from("css:a[id^='DERIVED_SSS_SCT_SSR_PB_GO'][title*='Add']"),
            term_table: Selector::from("#SSR_DUMMY_RECV1$scroll$0"),
            term_continue: Selector::from("#DERIVED_SSS_SCT_SSR_PB_GO"),
            add_by_id_field: Selector::from("#DERIVED_REGFRM1_CLASS_NBR"),
            add_by_id_enter: Selector::from("#DERIVED_REGFRM1_SSR_PB_ADDTOLIST2$9$"),
            discussion_table: Selector::from("#SSR_CLS_TBL_R1$scroll$0"),
            radio_button: Selector::from("class:PSRADIOBUTTON"),
            discussion_confirm: Selector::from("class:SSSBUTTON_CONFIRMLINK"),
            confirm_add_to_cart: Selector::from("#DERIVED_CLS_DTL_NEXT_PB$280$"),
            shopping_cart_table: Selector::from("#SSR_REGFORM_VW$scroll$0"),
            cart_checkbox: Selector::from("class:PSCHECKBOX"),
            enroll_button: Selector::from("#DERIVED_REGFRM1_LINK_ADD_ENRL$82$"),
            finish_button: Selector::from("#DERIVED_REGFRM1_SSR_PB_SUBMIT"),
            result_icon: Selector::from("css:#win0divDERIVED_REGFRM1_SSR_STATUS_LONG$0"),
            back_to_cart: Selector::from("#DERIVED_REGFRM1_SSR_LINK_STARTOVER"),
        }
    }
}

impl PortalSelectors {
    pub(crate) fn named(&self) -> [(&'static str, &Selector); 16] {
        [
            ("section_title", &self.section_title),
            ("add_tab", &self.add_tab),
            ("term_table", &self.term_table),
            ("term_continue", &self.term_continue),
            ("add_by_id_field", &self.add_by_id_field),
            ("add_by_id_enter", &self.add_by_id_enter),
            ("discussion_table", &self.discussion_table),
            ("radio_button", &self.radio_button),
            ("discussion_confirm", &self.discussion_confirm),
            ("confirm_add_to_cart", &self.confirm_add_to_cart),
            ("shopping_cart_table", &self.shopping_cart_table),
            ("cart_checkbox", &self.cart_checkbox),
            ("enroll_button", &self.enroll_button),
            ("finish_button", &self.finish_button),
            ("result_icon", &self.result_icon),
            ("back_to_cart", &self.back_to_cart),
        ]
    }
}

/// Wait bounds, in milliseconds on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timeouts {
    /// Bound for ordinary element lookups
    pub default_wait_ms: u64,
    /// Bound for the finish control, which commits the registration server-side
    pub finish_wait_ms: u64,
    /// Bound for condition probes, which must answer quickly
    pub probe_wait_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_wait_ms: 10_000,
            finish_wait_ms: 30_000,
            probe_wait_ms: 2_000,
        }
    }
}

impl Timeouts {
    pub fn default_wait(&self) -> Duration {
        Duration::from_millis(self.default_wait_ms)
    }

    pub fn finish_wait(&self) -> Duration {
        Duration::from_millis(self.finish_wait_ms)
    }

    pub fn probe_wait(&self) -> Duration {
        Duration::from_millis(self.probe_wait_ms)
    }
}

/// Zero-based column positions inside the portal's tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableLayout {
    pub row_tag: String,
    pub cell_tag: String,
    pub term_control_column: usize,
    pub term_label_column: usize,
    pub discussion_control_column: usize,
    pub discussion_section_column: usize,
    pub cart_control_column: usize,
    pub cart_name_column: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            row_tag: "tr".to_string(),
            cell_tag: "td".to_string(),
            term_control_column: 0,
            term_label_column: 1,
            discussion_control_column: 0,
            discussion_section_column: 2,
            cart_control_column: 0,
            cart_name_column: 1,
        }
    }
}

/// Text the workflows read back from the page to decide what happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Markers {
    /// Substring of the title region while the add-classes view is active
    pub add_tab_title: String,
    /// Content of the result indicator after a successful enrollment
    pub success_marker: String,
    /// Attribute of the result indicator holding the marker
    pub result_attribute: String,
    /// Regex whose first capture group is the class id inside a cart row's name cell
    pub class_id_pattern: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            add_tab_title: "Add Classes to Shopping Cart".to_string(),
            success_marker: "<img src=\"/cs/heproda/cache/PS_CS_STATUS_SUCCESS_ICN_1.gif\" alt=\"Success\">".to_string(),
            result_attribute: "innerHTML".to_string(),
            class_id_pattern: r"\((\w+)\)".to_string(),
        }
    }
}

impl Markers {
    pub fn class_id_regex(&self) -> Result<Regex, EnrollmentError> {
        Regex::new(&self.class_id_pattern).map_err(|e| {
            EnrollmentError::InvalidConfig(format!(
                "class_id_pattern '{}' is not a valid regex: {e}",
                self.class_id_pattern
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SequencePolicy {
    /// Stop running actions after the first one fails or errors
    pub stop_on_failure: bool,
}

impl Default for SequencePolicy {
    fn default() -> Self {
        Self {
            stop_on_failure: true,
        }
    }
}

impl EnrollerConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, EnrollmentError> {
        let config: EnrollerConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EnrollmentError> {
        let config: EnrollerConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EnrollmentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        debug!("Loading enroller configuration from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            other => Err(EnrollmentError::InvalidConfig(format!(
                "unsupported configuration file extension {other:?} for {}",
                path.display()
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), EnrollmentError> {
        for (name, selector) in self.selectors.named() {
            selector.validate().map_err(|e| {
                EnrollmentError::InvalidConfig(format!("selector '{name}': {e}"))
            })?;
        }

        let t = &self.timeouts;
        if t.default_wait_ms == 0 || t.probe_wait_ms == 0 {
            return Err(EnrollmentError::InvalidConfig(
                "wait bounds must be greater than zero".to_string(),
            ));
        }
        if t.finish_wait_ms <= t.default_wait_ms || t.finish_wait_ms <= t.probe_wait_ms {
            return Err(EnrollmentError::InvalidConfig(format!(
                "finish_wait_ms ({}) must be larger than every other wait bound",
                t.finish_wait_ms
            )));
        }

        if self.layout.row_tag.trim().is_empty() || self.layout.cell_tag.trim().is_empty() {
            return Err(EnrollmentError::InvalidConfig(
                "row_tag and cell_tag must not be empty".to_string(),
            ));
        }

        if self.markers.success_marker.trim().is_empty() {
            return Err(EnrollmentError::InvalidConfig(
                "success_marker must not be empty".to_string(),
            ));
        }
        let regex = self.markers.class_id_regex()?;
        if regex.captures_len() < 2 {
            return Err(EnrollmentError::InvalidConfig(
                "class_id_pattern needs a capture group for the class id".to_string(),
            ));
        }
        Ok(())
    }
}
