//! Stock lookup page: one search box, one prediction card.

use std::sync::Arc;
use tracing::{debug, warn};

use super::notice::{self, Notice};
use super::view_state::{LoadSlot, PendingLoad, Settled, ViewState};
use crate::domain::{NewPick, StockPrediction};
use crate::gateway::PredictionGateway;
use crate::view::StockCard;

pub const STOCK_LOOKUP_FAILED: &str = "Failed to get prediction";

/// Trim and upper-case user input; `None` for blank input
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

pub struct StockLookupController {
    gateway: Arc<dyn PredictionGateway>,
    prediction: LoadSlot<StockPrediction>,
    notice: Option<Notice>,
}

impl StockLookupController {
    pub fn new(gateway: Arc<dyn PredictionGateway>) -> Self {
        Self {
            gateway,
            prediction: LoadSlot::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> &ViewState<StockPrediction> {
        self.prediction.state()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn card(&self) -> Option<StockCard> {
        self.state().data().map(StockCard::from)
    }

    /// Start a lookup. Blank input is ignored and leaves the state untouched.
    pub fn begin_search(&mut self, raw_symbol: &str) -> Option<PendingLoad<StockPrediction>> {
        let symbol = normalize_symbol(raw_symbol)?;
        let ticket = self.prediction.begin();
        let gateway = Arc::clone(&self.gateway);

        debug!("Looking up prediction for {}", symbol);
        Some(PendingLoad::new(ticket, async move {
            gateway.get_stock_prediction(&symbol).await
        }))
    }

    /// Apply a finished lookup. Returns false when a newer search superseded it.
    pub fn apply(&mut self, settled: Settled<StockPrediction>) -> bool {
        let outcome = settled.result.map_err(|e| {
            warn!("Stock lookup failed: {}", e);
            e.user_message(STOCK_LOOKUP_FAILED)
        });

        let applied = self.prediction.settle(settled.ticket, outcome);
        if !applied {
            debug!(
                "Discarding stale stock lookup (generation {})",
                settled.ticket.generation()
            );
        }
        applied
    }

    /// Search and wait for the result. Returns false for blank input.
    pub async fn search(&mut self, raw_symbol: &str) -> bool {
        let Some(pending) = self.begin_search(raw_symbol) else {
            return false;
        };
        let settled = pending.resolve().await;
        self.apply(settled);
        true
    }

    /// Save the displayed prediction as a pick.
    ///
    /// Returns `None` without calling the service when nothing is loaded.
    /// The displayed prediction is never modified.
    pub async fn save_pick(&mut self) -> Option<Notice> {
        let prediction = self.state().data()?;
        let pick = NewPick::from_stock(prediction);

        let result = notice::save_pick(self.gateway.as_ref(), pick).await;
        self.notice = Some(result.clone());
        Some(result)
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
