use crate::action::{Action, Outcome};
use crate::config::SequencePolicy;
use crate::session::SpireEnrollment;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    /// The action ran but the portal did not confirm it
    Failed { outcome: Outcome },
    /// Some condition did not hold, so the action was not attempted
    Skipped { unmet: Vec<String> },
    /// Automation broke down mid-action
    Errored { error: String },
    /// An earlier failure stopped the sequence
    NotRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SequenceReport {
    pub steps: Vec<StepReport>,
    pub halted: bool,
}

impl SequenceReport {
    /// Every action ran and succeeded.
    pub fn succeeded(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.status, StepStatus::Succeeded))
    }

    pub fn count(&self, predicate: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|s| predicate(&s.status)).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs actions one after another against a single session.
///
/// Conditions are evaluated right before each action, after every earlier
/// action has finished mutating the portal.
pub struct ActionSequence {
    actions: Vec<Box<dyn Action>>,
    stop_on_failure: bool,
}

impl Default for ActionSequence {
    fn default() -> Self {
        Self::new(SequencePolicy::default())
    }
}

impl ActionSequence {
    pub fn new(policy: SequencePolicy) -> Self {
        Self {
            actions: Vec::new(),
            stop_on_failure: policy.stop_on_failure,
        }
    }

    pub fn with_action(mut self, action: impl Action + 'static) -> Self {
        self.push(Box::new(action));
        self
    }

    pub fn push(&mut self, action: Box<dyn Action>) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[instrument(skip_all, fields(actions = self.actions.len(), stop_on_failure = self.stop_on_failure))]
    pub async fn run(&mut self, ctx: &mut SpireEnrollment) -> SequenceReport {
        let mut report = SequenceReport::default();

        for (index, action) in self.actions.iter_mut().enumerate() {
            let description = action.describe();
            if report.halted {
                report.steps.push(StepReport {
                    index,
                    action: description,
                    status: StepStatus::NotRun,
                });
                continue;
            }

            let unmet = action.unmet_conditions(ctx).await;
            if !unmet.is_empty() {
                info!(
                    "Skipping action {}: {} (unmet: {})",
                    index,
                    description,
                    unmet.join("; ")
                );
                report.steps.push(StepReport {
                    index,
                    action: description,
                    status: StepStatus::Skipped { unmet },
                });
                continue;
            }

            info!("Performing action {}: {}", index, description);
            let status = match action.perform(ctx).await {
                Ok(true) => {
                    info!("Action {} succeeded", index);
                    StepStatus::Succeeded
                }
                Ok(false) => {
                    warn!("Action did not succeed: {} ({})", description, action.outcome());
                    StepStatus::Failed {
                        outcome: action.outcome().clone(),
                    }
                }
                Err(e) => {
                    error!(
                        automation = e.is_automation_failure(),
                        "Action {} stopped on an automation failure: {}", index, e
                    );
                    StepStatus::Errored {
                        error: e.to_string(),
                    }
                }
            };

            if self.stop_on_failure && status != StepStatus::Succeeded {
                warn!("Stopping the sequence after action {}", index);
                report.halted = true;
            }
            report.steps.push(StepReport {
                index,
                action: description,
                status,
            });
        }

        report
    }
}
