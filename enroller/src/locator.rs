use tracing::{debug, instrument};

use crate::element::UIElement;
use crate::engine::PortalEngine;
use crate::errors::AutomationError;
use crate::selector::Selector;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

// Default timeout if none is specified on the locator itself
pub const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// A high-level API for finding and interacting with page elements
#[derive(Clone)]
pub struct Locator {
    engine: Arc<dyn PortalEngine>,
    selector: Selector,
    timeout: Duration, // Default timeout for this locator instance
    root: Option<UIElement>,
}

impl Locator {
    /// Create a new locator with the given selector
    pub fn new(engine: Arc<dyn PortalEngine>, selector: Selector) -> Self {
        Self {
            engine,
            selector,
            timeout: DEFAULT_LOCATOR_TIMEOUT,
            root: None,
        }
    }

    /// Set a default timeout for waiting operations on this locator instance.
    /// This timeout is used if no specific timeout is passed to wait methods.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the root element for this locator
    pub fn within(mut self, element: UIElement) -> Self {
        self.root = Some(element);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get all elements matching this locator, waiting up to the specified timeout.
    /// If no timeout is provided, uses the locator's default timeout.
    pub async fn all(&self, timeout: Option<Duration>) -> Result<Vec<UIElement>, AutomationError> {
        self.selector.validate()?;
        let effective_timeout = timeout.unwrap_or(self.timeout);

        let engine = self.engine.clone();
        let selector = self.selector.clone();
        let root = self.root.clone();
        task::spawn_blocking(move || {
            engine.find_elements(&selector, root.as_ref(), Some(effective_timeout))
        })
        .await
        .map_err(|e| AutomationError::Internal(format!("Task join error: {e}")))?
    }

    pub async fn first(&self, timeout: Option<Duration>) -> Result<UIElement, AutomationError> {
        let element = self.wait(timeout).await?;
        Ok(element)
    }

    /// Wait for an element matching the locator to appear, up to the specified timeout.
    /// If no timeout is provided, uses the locator's default timeout.
    #[instrument(level = "debug", skip(self, timeout), fields(selector = %self.selector))]
    pub async fn wait(&self, timeout: Option<Duration>) -> Result<UIElement, AutomationError> {
        self.selector.validate()?;
        let effective_timeout = timeout.unwrap_or(self.timeout);
        debug!(
            "Waiting up to {:?} for element matching selector: {}",
            effective_timeout, self.selector
        );

        // The engine lookup blocks while it polls, so keep it off the async workers.
        let engine = self.engine.clone();
        let selector = self.selector.clone();
        let selector_string = self.selector_string();
        let root = self.root.clone();

        task::spawn_blocking(move || {
            engine.find_element(&selector, root.as_ref(), Some(effective_timeout))
        })
        .await
        .map_err(|e| AutomationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| {
            // The engine returns ElementNotFound on timeout. Name the selector and the bound here.
            if let AutomationError::ElementNotFound(inner_msg) = e {
                AutomationError::Timeout(format!(
                    "Timed out after {effective_timeout:?} waiting for element {selector_string}. Original error: {inner_msg}"
                ))
            } else {
                e
            }
        })
    }

    fn append_selector(&self, selector_to_append: Selector) -> Locator {
        let mut new_chain = match self.selector.clone() {
            Selector::Chain(existing_chain) => existing_chain,
            s => vec![s],
        };

        // Append the new selector, flattening if it's also a chain
        match selector_to_append {
            Selector::Chain(mut next_chain_parts) => {
                new_chain.append(&mut next_chain_parts);
            }
            s => new_chain.push(s),
        }

        Locator {
            engine: self.engine.clone(),
            selector: Selector::Chain(new_chain),
            timeout: self.timeout,
            root: self.root.clone(),
        }
    }

    /// Get a nested locator
    pub fn locator(&self, selector: impl Into<Selector>) -> Locator {
        self.append_selector(selector.into())
    }

    pub fn selector_string(&self) -> String {
        self.selector.to_string()
    }
}
