use crate::condition::{describe_conditions, Condition};
use crate::errors::EnrollmentError;
use crate::session::SpireEnrollment;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// What the most recent `perform` call observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Not performed yet
    #[default]
    Pending,
    Succeeded,
    /// The portal answered without the success marker (conflict, prerequisite, ...)
    Rejected { indicator: String },
    /// No row of the discussion table carried the wanted section
    NoMatchingSection { section: String },
    /// The shopping cart had no row for the class when it came to enrolling
    CartEntryMissing { class_id: String },
    /// An automation failure cut the workflow short
    Aborted { error: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pending => f.write_str("not performed"),
            Outcome::Succeeded => f.write_str("succeeded"),
            Outcome::Rejected { indicator } if indicator.is_empty() => {
                f.write_str("rejected by the portal (empty result indicator)")
            }
            Outcome::Rejected { indicator } => {
                write!(f, "rejected by the portal (result indicator: {indicator})")
            }
            Outcome::NoMatchingSection { section } => {
                write!(f, "no discussion row matched section {section}")
            }
            Outcome::CartEntryMissing { class_id } => {
                write!(f, "{class_id} was not found in the shopping cart")
            }
            Outcome::Aborted { error } => write!(f, "aborted: {error}"),
        }
    }
}

/// Fields every action carries: its conditions and the result of its last run.
#[derive(Default)]
pub struct ActionState {
    conditions: Vec<Box<dyn Condition>>,
    satisfied: Option<bool>,
    outcome: Outcome,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_condition(&mut self, condition: Box<dyn Condition>) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[Box<dyn Condition>] {
        &self.conditions
    }

    pub fn satisfied(&self) -> Option<bool> {
        self.satisfied
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Overwrite the result of the previous run. Returns whether it succeeded.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        let succeeded = outcome.is_success();
        self.satisfied = Some(succeeded);
        self.outcome = outcome;
        succeeded
    }
}

impl fmt::Debug for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionState")
            .field("conditions", &describe_conditions(&self.conditions))
            .field("satisfied", &self.satisfied)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// A unit of work against the portal, gated by conditions.
///
/// Drivers must only call [`Action::perform`] once [`Action::conditions_met`]
/// holds against the live session. `satisfied` describes the last run only;
/// other actions running afterwards may have invalidated it.
#[async_trait]
pub trait Action: Send + Sync + fmt::Display {
    fn state(&self) -> &ActionState;

    fn state_mut(&mut self) -> &mut ActionState;

    /// Drive the portal through this action's protocol. `Ok(false)` means the
    /// portal did not confirm success; `Err` means automation broke down.
    async fn perform(&mut self, ctx: &mut SpireEnrollment) -> Result<bool, EnrollmentError>;

    /// `None` until the first `perform` call.
    fn satisfied(&self) -> Option<bool> {
        self.state().satisfied()
    }

    fn is_satisfied(&self) -> bool {
        self.satisfied() == Some(true)
    }

    fn outcome(&self) -> &Outcome {
        self.state().outcome()
    }

    fn has_conditions(&self) -> bool {
        !self.state().conditions().is_empty()
    }

    /// Descriptions of the conditions that currently evaluate to false.
    async fn unmet_conditions(&self, ctx: &SpireEnrollment) -> Vec<String> {
        let mut unmet = Vec::new();
        for condition in self.state().conditions() {
            if !condition.evaluate(ctx).await {
                unmet.push(condition.to_string());
            }
        }
        unmet
    }

    async fn conditions_met(&self, ctx: &SpireEnrollment) -> bool {
        self.unmet_conditions(ctx).await.is_empty()
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}
