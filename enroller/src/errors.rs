use thiserror::Error;

/// Failures raised by the automation layer while locating or driving page elements.
#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Backend failure while reading or driving an element that was found
    #[error("Platform-specific error: {0}")]
    PlatformError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AutomationError {
    /// True when a bounded wait expired before the element showed up.
    pub fn is_wait_expired(&self) -> bool {
        matches!(
            self,
            AutomationError::ElementNotFound(_) | AutomationError::Timeout(_)
        )
    }
}

/// Errors surfaced by sessions, actions and configuration loading.
///
/// A business rejection by the portal (schedule conflict, missing
/// prerequisite) is never an error: actions report it as `Ok(false)`.
#[derive(Error, Debug)]
pub enum EnrollmentError {
    #[error("automation failure: {0}")]
    Automation(#[from] AutomationError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EnrollmentError {
    /// Automation failures are recoverable by the operator (re-run, fix a
    /// selector); they do not say anything about the enrollment itself.
    pub fn is_automation_failure(&self) -> bool {
        matches!(self, EnrollmentError::Automation(_))
    }
}
