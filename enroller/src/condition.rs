//! Preconditions gating an action.
//!
//! A condition is re-evaluated every time it is asked; one that held before an
//! earlier action ran may no longer hold afterwards. Evaluation never fails:
//! a portal caught mid-transition simply reads as `false`.

use crate::selector::Selector;
use crate::session::SpireEnrollment;
use async_trait::async_trait;
use std::fmt;

#[async_trait]
pub trait Condition: Send + Sync + fmt::Display {
    async fn evaluate(&self, ctx: &SpireEnrollment) -> bool;
}

/// The class is in the cached shopping cart.
#[derive(Debug, Clone)]
pub struct InCart {
    class_id: String,
}

impl InCart {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
        }
    }
}

#[async_trait]
impl Condition for InCart {
    async fn evaluate(&self, ctx: &SpireEnrollment) -> bool {
        ctx.in_cart(&self.class_id)
    }
}

impl fmt::Display for InCart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is in the shopping cart", self.class_id)
    }
}

/// The class is absent from the cached shopping cart.
#[derive(Debug, Clone)]
pub struct NotInCart {
    class_id: String,
}

impl NotInCart {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
        }
    }
}

#[async_trait]
impl Condition for NotInCart {
    async fn evaluate(&self, ctx: &SpireEnrollment) -> bool {
        !ctx.in_cart(&self.class_id)
    }
}

impl fmt::Display for NotInCart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not in the shopping cart", self.class_id)
    }
}

/// The portal is not asking for a term.
#[derive(Debug, Clone, Default)]
pub struct TermSelected;

#[async_trait]
impl Condition for TermSelected {
    async fn evaluate(&self, ctx: &SpireEnrollment) -> bool {
        !ctx.needs_term_selection().await
    }
}

impl fmt::Display for TermSelected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a term is selected")
    }
}

/// An element shows up within the probe bound.
#[derive(Debug, Clone)]
pub struct ElementPresent {
    selector: Selector,
}

impl ElementPresent {
    pub fn new(selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

#[async_trait]
impl Condition for ElementPresent {
    async fn evaluate(&self, ctx: &SpireEnrollment) -> bool {
        let probe = ctx.config().timeouts.probe_wait();
        ctx.wait_for_within(&self.selector, probe).await.is_ok()
    }
}

impl fmt::Display for ElementPresent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is present", self.selector)
    }
}

/// Holds when the wrapped condition does not.
pub struct Not(Box<dyn Condition>);

impl Not {
    pub fn new(inner: impl Condition + 'static) -> Self {
        Self(Box::new(inner))
    }
}

#[async_trait]
impl Condition for Not {
    async fn evaluate(&self, ctx: &SpireEnrollment) -> bool {
        !self.0.evaluate(ctx).await
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not ({})", self.0)
    }
}

/// Render a condition set for audit logs, e.g. `[a term is selected; 12345 is in the shopping cart]`.
pub fn describe_conditions(conditions: &[Box<dyn Condition>]) -> String {
    let parts: Vec<String> = conditions.iter().map(|c| c.to_string()).collect();
    format!("[{}]", parts.join("; "))
}
