use crate::action::{Action, ActionState, Outcome};
use crate::condition::{describe_conditions, Condition};
use crate::errors::{AutomationError, EnrollmentError};
use crate::model::{Discussion, Lecture};
use crate::session::SpireEnrollment;
use async_trait::async_trait;
use std::fmt;
use tracing::{info, instrument, warn};

/// Enroll in a lecture, staging it (and its discussion) in the shopping cart first.
///
/// When the cached cart already holds the lecture, the add-by-id step and the
/// discussion dialog are skipped and the action goes straight to enrolling.
/// The enrollment only counts as successful when the portal's result
/// indicator shows the success marker; conflicts and unmet prerequisites come
/// back as `Ok(false)`.
///
/// Each desired discussion needs its own `Add`.
// TODO: detect a lecture already in the cart with a different discussion attached.
pub struct Add {
    lecture: Lecture,
    discussion: Option<Discussion>,
    state: ActionState,
}

impl Add {
    pub fn new(lecture: Lecture) -> Self {
        Self {
            lecture,
            discussion: None,
            state: ActionState::new(),
        }
    }

    pub fn with_discussion(lecture: Lecture, discussion: Discussion) -> Self {
        Self {
            discussion: Some(discussion),
            ..Self::new(lecture)
        }
    }

    pub fn with_condition(mut self, condition: impl Condition + 'static) -> Self {
        self.state.add_condition(Box::new(condition));
        self
    }

    pub fn lecture(&self) -> &Lecture {
        &self.lecture
    }

    pub fn discussion(&self) -> Option<&Discussion> {
        self.discussion.as_ref()
    }

    async fn ensure_add_tab(&self, ctx: &SpireEnrollment) -> Result<(), AutomationError> {
        let selectors = &ctx.config().selectors;
        info!("Checking if Add is the current tab.");
        let title = ctx.wait_for(&selectors.section_title).await?.text()?;
        if !title.contains(&ctx.config().markers.add_tab_title) {
            info!("Not in the Add tab; clicking Add tab.");
            ctx.wait_for(&selectors.add_tab).await?.click()?;
        }
        Ok(())
    }

    async fn ensure_term(&self, ctx: &SpireEnrollment) -> Result<(), AutomationError> {
        info!("Checking if the portal first needs a term selected.");
        if ctx.needs_term_selection().await {
            info!("Selecting term {}.", ctx.term());
            ctx.select_current_term().await?;
        }
        Ok(())
    }

    /// Add-by-id plus the optional discussion dialog. Returns the wanted
    /// section when no discussion row carried it.
    async fn add_to_cart(&self, ctx: &SpireEnrollment) -> Result<Option<String>, AutomationError> {
        let selectors = &ctx.config().selectors;
        info!("Typing in class ID of Lecture into Add by ID field.");
        ctx.wait_for(&selectors.add_by_id_field)
            .await?
            .type_text(self.lecture.class_id())?;
        info!("Clicking the enter button next to the Add by ID field.");
        ctx.wait_for(&selectors.add_by_id_enter).await?.click()?;

        let mut unmatched = None;
        if let Some(discussion) = &self.discussion {
            if !self.select_discussion(ctx, discussion).await? {
                warn!(
                    section = discussion.section(),
                    "No discussion row matched; continuing to the cart."
                );
                unmatched = Some(discussion.section().to_string());
            }
        }

        info!("Clicking on the confirm button to finish adding to cart, which returns to the shopping cart.");
        ctx.wait_for(&selectors.confirm_add_to_cart).await?.click()?;
        Ok(unmatched)
    }

    /// Pick the first discussion row whose section cell contains the wanted label.
    async fn select_discussion(
        &self,
        ctx: &SpireEnrollment,
        discussion: &Discussion,
    ) -> Result<bool, AutomationError> {
        let selectors = &ctx.config().selectors;
        let layout = &ctx.config().layout;
        let table = ctx.wait_for(&selectors.discussion_table).await?;
        let rows = table.children_by_tag(&layout.row_tag)?;
        for (index, row) in rows.iter().enumerate().skip(1) {
            let section = row
                .nth_child(&layout.cell_tag, layout.discussion_section_column)?
                .text()?;
            if section.contains(discussion.section()) {
                info!(row = index, "Clicking on the discussion's radio button and the next button.");
                let control = row.nth_child(&layout.cell_tag, layout.discussion_control_column)?;
                ctx.wait_in(&control, &selectors.radio_button).await?.click()?;
                ctx.wait_for(&selectors.discussion_confirm).await?.click()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Check the lecture's cart row, enroll, finish and read the verdict.
    async fn enroll_from_cart(&self, ctx: &mut SpireEnrollment) -> Result<Outcome, AutomationError> {
        let class_id = self.lecture.class_id();
        let rows = ctx.scan_cart().await?;
        let Some(row) = rows.iter().find(|r| r.entry.description.contains(class_id)) else {
            warn!(class_id, "Lecture not found in the shopping cart.");
            return Ok(Outcome::CartEntryMissing {
                class_id: class_id.to_string(),
            });
        };

        let config = ctx.config();
        let selectors = &config.selectors;
        info!("Checking this lecture's checkbox and clicking the enroll button.");
        let control = row.cell(config.layout.cart_control_column)?;
        ctx.wait_in(control, &selectors.cart_checkbox).await?.click()?;
        ctx.wait_for(&selectors.enroll_button).await?.click()?;

        let finish_wait = config.timeouts.finish_wait();
        info!(
            "Clicking the button to finally confirm adding this lecture. Waiting up to {:?}...",
            finish_wait
        );
        ctx.wait_for_within(&selectors.finish_button, finish_wait)
            .await?
            .click()?;

        info!("Waiting and looking for success text...");
        let indicator = ctx
            .wait_for(&selectors.result_icon)
            .await?
            .attribute(&config.markers.result_attribute)?
            .unwrap_or_default();
        if indicator == config.markers.success_marker {
            info!("Success text found.");
            Ok(Outcome::Succeeded)
        } else {
            Ok(Outcome::Rejected { indicator })
        }
    }

    async fn return_to_cart(
        &self,
        ctx: &SpireEnrollment,
        timeout: std::time::Duration,
    ) -> Result<(), AutomationError> {
        info!("Going back to the shopping cart. There are no tabs on this page so we must use the button.");
        ctx.wait_for_within(&ctx.config().selectors.back_to_cart, timeout)
            .await?
            .click()
    }

    async fn stage_and_enroll(&self, ctx: &mut SpireEnrollment) -> Result<Outcome, AutomationError> {
        info!("Checking if the Lecture is not already in the shopping cart.");
        let unmatched_section = if ctx.in_cart(self.lecture.class_id()) {
            info!("Lecture already in the shopping cart; skipping add-by-id.");
            None
        } else {
            self.add_to_cart(ctx).await?
        };

        let outcome = self.enroll_from_cart(ctx).await?;
        Ok(match (outcome, unmatched_section) {
            (Outcome::Succeeded, _) => Outcome::Succeeded,
            (_, Some(section)) => Outcome::NoMatchingSection { section },
            (outcome, None) => outcome,
        })
    }

    async fn run(&self, ctx: &mut SpireEnrollment) -> Result<Outcome, AutomationError> {
        self.ensure_add_tab(ctx).await?;
        self.ensure_term(ctx).await?;

        match self.stage_and_enroll(ctx).await {
            Ok(outcome) => {
                let wait = ctx.config().timeouts.default_wait();
                self.return_to_cart(ctx, wait).await?;
                Ok(outcome)
            }
            Err(e) => {
                // Leave the portal on the cart view for whoever runs next.
                let wait = ctx.config().timeouts.probe_wait();
                if let Err(back) = self.return_to_cart(ctx, wait).await {
                    warn!("Could not return to the shopping cart after failure: {}", back);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Action for Add {
    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    #[instrument(skip(self, ctx), fields(class_id = %self.lecture.class_id()))]
    async fn perform(&mut self, ctx: &mut SpireEnrollment) -> Result<bool, EnrollmentError> {
        match self.run(ctx).await {
            Ok(outcome) => {
                if !outcome.is_success() {
                    warn!("{} did not succeed: {}", self, outcome);
                }
                Ok(self.state.record(outcome))
            }
            Err(e) => {
                self.state.record(Outcome::Aborted {
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }
}

impl fmt::Display for Add {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Add {}", self.lecture.name_and_section())?;
        if let Some(discussion) = &self.discussion {
            write!(f, " with {}", discussion.name_and_section())?;
        }
        if self.has_conditions() {
            write!(f, " under conditions: {}", describe_conditions(self.state.conditions()))?;
        }
        Ok(())
    }
}
