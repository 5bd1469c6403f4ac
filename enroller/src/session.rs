use crate::config::EnrollerConfig;
use crate::element::UIElement;
use crate::errors::{AutomationError, EnrollmentError};
use crate::locator::Locator;
use crate::model::{CartEntry, Term};
use crate::selector::Selector;
use crate::Portal;
use regex::Regex;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// A shopping cart row as scanned from the page, cells kept for follow-up clicks.
#[derive(Debug, Clone)]
pub struct CartRow {
    pub entry: CartEntry,
    cells: Vec<UIElement>,
}

impl CartRow {
    pub fn cell(&self, column: usize) -> Result<&UIElement, AutomationError> {
        self.cells.get(column).ok_or_else(|| {
            AutomationError::ElementNotFound(format!(
                "column {column} of cart row '{}' ({} cells)",
                self.entry.description,
                self.cells.len()
            ))
        })
    }
}

/// Per-session state shared by every action of one enrollment run: the portal
/// handle, the selected term and the cached view of the shopping cart.
///
/// The cart cache is only ever replaced from a fresh scan of the page; nothing
/// writes an entry before the portal shows it.
pub struct SpireEnrollment {
    portal: Portal,
    term: Term,
    config: EnrollerConfig,
    class_id_regex: Regex,
    shopping_cart: BTreeMap<String, CartEntry>,
}

impl SpireEnrollment {
    pub fn new(portal: Portal, term: Term, config: EnrollerConfig) -> Result<Self, EnrollmentError> {
        config.validate()?;
        let class_id_regex = config.markers.class_id_regex()?;
        Ok(Self {
            portal,
            term,
            config,
            class_id_regex,
            shopping_cart: BTreeMap::new(),
        })
    }

    pub fn portal(&self) -> &Portal {
        &self.portal
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn config(&self) -> &EnrollerConfig {
        &self.config
    }

    /// Locator for `selector` carrying the configured default wait.
    pub fn locate(&self, selector: &Selector) -> Locator {
        self.portal
            .locator(selector.clone())
            .set_default_timeout(self.config.timeouts.default_wait())
    }

    pub async fn wait_for(&self, selector: &Selector) -> Result<UIElement, AutomationError> {
        self.locate(selector).wait(None).await
    }

    pub async fn wait_for_within(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<UIElement, AutomationError> {
        self.locate(selector).wait(Some(timeout)).await
    }

    /// Wait for `selector` inside the subtree of `root`.
    pub async fn wait_in(
        &self,
        root: &UIElement,
        selector: &Selector,
    ) -> Result<UIElement, AutomationError> {
        root.locator(selector.clone())?
            .wait(Some(self.config.timeouts.default_wait()))
            .await
    }

    /// Whether the portal is showing its term-selection step. Absence of the
    /// term table within the probe bound, or any automation error, reads as
    /// "no selection needed".
    pub async fn needs_term_selection(&self) -> bool {
        let probe = self.config.timeouts.probe_wait();
        match self
            .wait_for_within(&self.config.selectors.term_table, probe)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                debug!("No term selection pending: {}", e);
                false
            }
        }
    }

    /// Pick `term` in the term-selection table and continue.
    #[instrument(level = "debug", skip(self))]
    pub async fn select_term(&self, term: &Term) -> Result<(), AutomationError> {
        let selectors = &self.config.selectors;
        let layout = &self.config.layout;
        let table = self.wait_for(&selectors.term_table).await?;
        let rows = table.children_by_tag(&layout.row_tag)?;
        for row in rows.iter().skip(1) {
            let label = row
                .nth_child(&layout.cell_tag, layout.term_label_column)?
                .text()?;
            if label.contains(term.label()) {
                let control = row.nth_child(&layout.cell_tag, layout.term_control_column)?;
                self.wait_in(&control, &selectors.radio_button)
                    .await?
                    .click()?;
                self.wait_for(&selectors.term_continue).await?.click()?;
                info!("Selected term {}", term);
                return Ok(());
            }
        }
        Err(AutomationError::ElementNotFound(format!(
            "term '{}' in {}",
            term, selectors.term_table
        )))
    }

    /// Select the session's own term.
    pub async fn select_current_term(&self) -> Result<(), AutomationError> {
        self.select_term(&self.term).await
    }

    pub fn cart_entries(&self) -> &BTreeMap<String, CartEntry> {
        &self.shopping_cart
    }

    pub fn in_cart(&self, class_id: &str) -> bool {
        self.shopping_cart.contains_key(class_id)
    }

    /// Class id of a cart row: the pattern's first capture, or the whole
    /// trimmed text when the pattern does not match.
    pub fn class_id_of(&self, description: &str) -> String {
        self.class_id_regex
            .captures(description)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| description.trim().to_string())
    }

    /// Re-read the shopping cart table, replace the cache with what the page
    /// shows and hand back the scanned rows.
    pub async fn scan_cart(&mut self) -> Result<Vec<CartRow>, AutomationError> {
        let selectors = &self.config.selectors;
        let layout = &self.config.layout;
        let table = self.wait_for(&selectors.shopping_cart_table).await?;
        let rows = table.children_by_tag(&layout.row_tag)?;

        let mut scanned = Vec::with_capacity(rows.len().saturating_sub(1));
        let mut cache = BTreeMap::new();
        for row in rows.iter().skip(1) {
            let cells = row.children_by_tag(&layout.cell_tag)?;
            let Some(name_cell) = cells.get(layout.cart_name_column) else {
                debug!("Skipping cart row with {} cells", cells.len());
                continue;
            };
            let description = name_cell.text()?.trim().to_string();
            if description.is_empty() {
                continue;
            }
            let entry = CartEntry {
                class_id: self.class_id_of(&description),
                description,
            };
            cache.insert(entry.class_id.clone(), entry.clone());
            scanned.push(CartRow { entry, cells });
        }

        self.shopping_cart = cache;
        info!(entries = self.shopping_cart.len(), "Refreshed shopping cart cache");
        Ok(scanned)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn refresh_cart(&mut self) -> Result<usize, AutomationError> {
        Ok(self.scan_cart().await?.len())
    }
}
