use crate::errors::AutomationError;
use crate::locator::Locator;
use crate::selector::Selector;
use std::fmt::Debug;
use tracing::instrument;

/// Interface for engine-specific element implementations
pub trait UIElementImpl: Send + Sync + Debug {
    /// Stable identity of the underlying node, used for equality
    fn object_id(&self) -> usize;
    fn id(&self) -> Option<String>;
    fn tag(&self) -> String;
    /// Rendered text content of the element and its descendants
    fn text(&self) -> Result<String, AutomationError>;
    fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError>;
    fn click(&self) -> Result<(), AutomationError>;
    fn type_text(&self, text: &str) -> Result<(), AutomationError>;
    /// Direct children carrying the given tag, in document order
    fn children_by_tag(&self, tag: &str) -> Result<Vec<UIElement>, AutomationError>;
    fn create_locator(&self, selector: Selector) -> Result<Locator, AutomationError>;
    fn as_any(&self) -> &dyn std::any::Any;
    fn clone_box(&self) -> Box<dyn UIElementImpl>;
}

/// Represents a live element on a portal page
#[derive(Debug)]
pub struct UIElement {
    inner: Box<dyn UIElementImpl>,
}

impl UIElement {
    /// Create a new UI element from an engine-specific implementation
    pub fn new(impl_: Box<dyn UIElementImpl>) -> Self {
        Self { inner: impl_ }
    }

    pub fn id(&self) -> Option<String> {
        self.inner.id()
    }

    pub fn tag(&self) -> String {
        self.inner.tag()
    }

    pub fn text(&self) -> Result<String, AutomationError> {
        self.inner.text()
    }

    /// Read an attribute; a missing attribute is `Ok(None)`, not an error.
    pub fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError> {
        self.inner.attribute(name)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn click(&self) -> Result<(), AutomationError> {
        self.inner.click()
    }

    #[instrument(level = "debug", skip(self, text))]
    pub fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.inner.type_text(text)
    }

    pub fn children_by_tag(&self, tag: &str) -> Result<Vec<UIElement>, AutomationError> {
        self.inner.children_by_tag(tag)
    }

    /// Locator scoped to the subtree of this element
    pub fn locator(&self, selector: impl Into<Selector>) -> Result<Locator, AutomationError> {
        let selector = selector.into();
        self.inner.create_locator(selector)
    }

    /// Child at `index` among the children with `tag`.
    pub fn nth_child(&self, tag: &str, index: usize) -> Result<UIElement, AutomationError> {
        let mut children = self.children_by_tag(tag)?;
        let count = children.len();
        if index < count {
            Ok(children.swap_remove(index))
        } else {
            Err(AutomationError::ElementNotFound(format!(
                "<{tag}> #{index} under {} (only {count} present)",
                self.describe()
            )))
        }
    }

    /// Engines downcast scoped-search roots back to their own element type.
    pub fn as_any(&self) -> &dyn std::any::Any {
        self.inner.as_any()
    }

    /// Short rendering for logs and error messages
    pub fn describe(&self) -> String {
        match self.id() {
            Some(id) if !id.is_empty() => format!("<{} id={id}>", self.tag()),
            _ => format!("<{}>", self.tag()),
        }
    }
}

impl Clone for UIElement {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for UIElement {
    fn eq(&self, other: &Self) -> bool {
        self.inner.object_id() == other.inner.object_id()
    }
}

impl Eq for UIElement {}
