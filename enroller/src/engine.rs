use crate::element::UIElement;
use crate::errors::AutomationError;
use crate::selector::Selector;
use std::time::Duration;

/// The capability set every page-automation backend must provide.
///
/// Lookups are blocking and bounded: an engine polls until the element shows
/// up or `timeout` expires, in which case it fails with
/// [`AutomationError::ElementNotFound`]. Element reads, clicks and keystrokes
/// the backend cannot carry out fail with [`AutomationError::PlatformError`].
/// Engines know nothing about enrollment; selectors arrive from the caller's
/// configuration.
pub trait PortalEngine: Send + Sync {
    /// Find the first element matching `selector`, searching under `root` when given
    fn find_element(
        &self,
        selector: &Selector,
        root: Option<&UIElement>,
        timeout: Option<Duration>,
    ) -> Result<UIElement, AutomationError>;

    /// Find all elements matching `selector`. An empty result is not an error.
    fn find_elements(
        &self,
        selector: &Selector,
        root: Option<&UIElement>,
        timeout: Option<Duration>,
    ) -> Result<Vec<UIElement>, AutomationError>;
}
