//! Condition-gated enrollment actions for a UI-only registration portal
//!
//! The portal's state can only be observed by reading its pages, so every
//! action here establishes a known view, checks what the page shows, drives
//! the portal through its dialogs and confirms the result by reading the page
//! again. The page-automation backend sits behind [`PortalEngine`].

use std::env;
use std::sync::Arc;
use tracing::{instrument, Level};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub mod action;
pub mod add;
pub mod condition;
pub mod config;
pub mod element;
pub mod engine;
pub mod errors;
pub mod locator;
pub mod model;
pub mod room;
pub mod selector;
pub mod sequence;
pub mod session;
#[cfg(test)]
mod tests;

pub use action::{Action, ActionState, Outcome};
pub use add::Add;
pub use condition::{Condition, ElementPresent, InCart, Not, NotInCart, TermSelected};
pub use config::EnrollerConfig;
pub use element::{UIElement, UIElementImpl};
pub use engine::PortalEngine;
pub use errors::{AutomationError, EnrollmentError};
pub use locator::Locator;
pub use model::{CartEntry, Discussion, Lecture, Term};
pub use room::{AreaLookup, Room};
pub use selector::Selector;
pub use sequence::{ActionSequence, SequenceReport, StepReport, StepStatus};
pub use session::{CartRow, SpireEnrollment};

/// The entry point for driving a portal through an engine
#[derive(Clone)]
pub struct Portal {
    engine: Arc<dyn PortalEngine>,
}

impl Portal {
    pub fn new(engine: Arc<dyn PortalEngine>) -> Self {
        Self { engine }
    }

    pub fn from_engine(engine: impl PortalEngine + 'static) -> Self {
        Self::new(Arc::new(engine))
    }

    #[instrument(level = "trace", skip(self, selector))]
    pub fn locator(&self, selector: impl Into<Selector>) -> Locator {
        let selector = selector.into();
        Locator::new(self.engine.clone(), selector)
    }

    pub fn engine(&self) -> Arc<dyn PortalEngine> {
        self.engine.clone()
    }
}

/// Install a stderr `tracing` subscriber. The level comes from `LOG_LEVEL`
/// (error, warn, info, debug; info when unset), refined by `RUST_LOG`.
pub fn init_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    let log_level = env::var("LOG_LEVEL")
        .map(|level| match level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            _ => Level::INFO,
        })
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish()
        .try_init()
}
