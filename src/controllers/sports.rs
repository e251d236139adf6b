//! Sports page: a league selector over a list of event predictions.

use std::sync::Arc;
use tracing::{debug, warn};

use super::notice::{self, Notice};
use super::view_state::{LoadSlot, PendingLoad, Settled, ViewState};
use crate::domain::{NewPick, SportsPrediction, DEFAULT_SPORT};
use crate::gateway::PredictionGateway;
use crate::view::SportsCard;

pub const SPORTS_LOAD_FAILED: &str = "Failed to load predictions";

pub struct SportsListController {
    gateway: Arc<dyn PredictionGateway>,
    selected_sport: String,
    predictions: LoadSlot<Vec<SportsPrediction>>,
    notice: Option<Notice>,
}

impl SportsListController {
    /// Controller starting on the default league
    pub fn new(gateway: Arc<dyn PredictionGateway>) -> Self {
        Self::with_sport(gateway, DEFAULT_SPORT)
    }

    pub fn with_sport(gateway: Arc<dyn PredictionGateway>, sport: impl Into<String>) -> Self {
        Self {
            gateway,
            selected_sport: sport.into(),
            predictions: LoadSlot::new(),
            notice: None,
        }
    }

    pub fn selected_sport(&self) -> &str {
        &self.selected_sport
    }

    pub fn state(&self) -> &ViewState<Vec<SportsPrediction>> {
        self.predictions.state()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn cards(&self) -> Vec<SportsCard> {
        self.state()
            .data()
            .map(|list| list.iter().map(SportsCard::from).collect())
            .unwrap_or_default()
    }

    /// True once a load finished without error and returned nothing
    pub fn is_empty(&self) -> bool {
        self.state().data().is_some_and(|list| list.is_empty())
    }

    /// First load when the page appears
    pub fn mount(&mut self) -> PendingLoad<Vec<SportsPrediction>> {
        self.begin_load()
    }

    /// Change league. Reloads only when the selection actually changes.
    pub fn select_sport(&mut self, sport: &str) -> Option<PendingLoad<Vec<SportsPrediction>>> {
        let sport = sport.trim();
        if sport.is_empty() || sport == self.selected_sport {
            return None;
        }
        self.selected_sport = sport.to_string();
        Some(self.begin_load())
    }

    pub fn refresh(&mut self) -> PendingLoad<Vec<SportsPrediction>> {
        self.begin_load()
    }

    fn begin_load(&mut self) -> PendingLoad<Vec<SportsPrediction>> {
        let ticket = self.predictions.begin();
        let gateway = Arc::clone(&self.gateway);
        let sport = self.selected_sport.clone();

        debug!("Loading {} predictions (generation {})", sport, ticket.generation());
        PendingLoad::new(ticket, async move {
            gateway.get_sports_predictions(Some(&sport)).await
        })
    }

    /// Apply a finished load. Results of superseded loads are dropped.
    pub fn apply(&mut self, settled: Settled<Vec<SportsPrediction>>) -> bool {
        let outcome = settled.result.map_err(|e| {
            warn!("Sports predictions failed: {}", e);
            e.user_message(SPORTS_LOAD_FAILED)
        });

        let applied = self.predictions.settle(settled.ticket, outcome);
        if !applied {
            debug!(
                "Discarding stale sports load (generation {})",
                settled.ticket.generation()
            );
        }
        applied
    }

    /// Mount and wait for the first load
    pub async fn load(&mut self) {
        let settled = self.mount().resolve().await;
        self.apply(settled);
    }

    /// Select a league and wait for its load; no-op if unchanged
    pub async fn change_sport(&mut self, sport: &str) -> bool {
        let Some(pending) = self.select_sport(sport) else {
            return false;
        };
        let settled = pending.resolve().await;
        self.apply(settled);
        true
    }

    pub async fn reload(&mut self) {
        let settled = self.refresh().resolve().await;
        self.apply(settled);
    }

    /// Save one listed prediction. The list itself is not touched.
    pub async fn save_pick(&mut self, item: &SportsPrediction) -> Notice {
        let pick = NewPick::from_sports(item);
        let result = notice::save_pick(self.gateway.as_ref(), pick).await;
        self.notice = Some(result.clone());
        result
    }

    /// Save the prediction at `index` in the displayed list
    pub async fn save_pick_at(&mut self, index: usize) -> Option<Notice> {
        let item = self.state().data()?.get(index)?.clone();
        Some(self.save_pick(&item).await)
    }
}
