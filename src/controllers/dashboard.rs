//! Dashboard: accuracy metrics next to the most recent picks.
//!
//! Both sources are fetched together but settle independently; one failing
//! leaves the other panel intact.

use std::sync::Arc;
use tracing::{debug, warn};

use super::view_state::{LoadSlot, LoadTicket, ViewState};
use crate::domain::{AccuracyMetric, Pick};
use crate::error::Result;
use crate::gateway::PredictionGateway;
use crate::view::{ChartPoint, MetricRow, PickRow};

pub const METRICS_LOAD_FAILED: &str = "Failed to load accuracy metrics";
pub const PICKS_LOAD_FAILED: &str = "Failed to load picks";

/// Number of picks shown when no limit is configured
pub const DEFAULT_RECENT_PICKS: usize = 5;

/// In-flight dashboard load; resolves once both sources have settled
pub struct PendingDashboard {
    metrics_ticket: LoadTicket,
    picks_ticket: LoadTicket,
    gateway: Arc<dyn PredictionGateway>,
}

impl PendingDashboard {
    pub async fn resolve(self) -> DashboardSettled {
        let (metrics, picks) = futures::join!(
            self.gateway.get_accuracy_metrics(None),
            self.gateway.get_user_picks()
        );

        DashboardSettled {
            metrics_ticket: self.metrics_ticket,
            picks_ticket: self.picks_ticket,
            metrics,
            picks,
        }
    }
}

#[derive(Debug)]
pub struct DashboardSettled {
    metrics_ticket: LoadTicket,
    picks_ticket: LoadTicket,
    pub metrics: Result<Vec<AccuracyMetric>>,
    pub picks: Result<Vec<Pick>>,
}

pub struct DashboardController {
    gateway: Arc<dyn PredictionGateway>,
    metrics: LoadSlot<Vec<AccuracyMetric>>,
    picks: LoadSlot<Vec<Pick>>,
    recent_limit: usize,
}

impl DashboardController {
    pub fn new(gateway: Arc<dyn PredictionGateway>) -> Self {
        Self::with_recent_limit(gateway, DEFAULT_RECENT_PICKS)
    }

    pub fn with_recent_limit(gateway: Arc<dyn PredictionGateway>, recent_limit: usize) -> Self {
        Self {
            gateway,
            metrics: LoadSlot::new(),
            picks: LoadSlot::new(),
            recent_limit,
        }
    }

    /// Combined loading flag: true until both sources have settled
    pub fn is_loading(&self) -> bool {
        self.metrics.state().is_loading() || self.picks.state().is_loading()
    }

    pub fn metrics(&self) -> &ViewState<Vec<AccuracyMetric>> {
        self.metrics.state()
    }

    /// Recent picks, already truncated to the display limit
    pub fn picks(&self) -> &ViewState<Vec<Pick>> {
        self.picks.state()
    }

    pub fn recent_picks(&self) -> &[Pick] {
        self.picks.state().data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn metric_rows(&self) -> Vec<MetricRow> {
        self.metrics
            .state()
            .data()
            .map(|m| m.iter().map(MetricRow::from).collect())
            .unwrap_or_default()
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        self.metrics
            .state()
            .data()
            .map(|m| m.iter().map(ChartPoint::from).collect())
            .unwrap_or_default()
    }

    pub fn pick_rows(&self) -> Vec<PickRow> {
        self.recent_picks().iter().map(PickRow::from).collect()
    }

    /// Fire both loads; used on mount and on refresh
    pub fn begin_load(&mut self) -> PendingDashboard {
        PendingDashboard {
            metrics_ticket: self.metrics.begin(),
            picks_ticket: self.picks.begin(),
            gateway: Arc::clone(&self.gateway),
        }
    }

    /// Apply both outcomes. Each source is applied or discarded on its own ticket.
    pub fn apply(&mut self, settled: DashboardSettled) {
        let metrics = settled.metrics.map_err(|e| {
            warn!("Failed to load accuracy metrics: {}", e);
            e.user_message(METRICS_LOAD_FAILED)
        });
        if !self.metrics.settle(settled.metrics_ticket, metrics) {
            debug!("Discarding stale accuracy metrics");
        }

        let limit = self.recent_limit;
        let picks = settled
            .picks
            .map(|mut picks| {
                picks.truncate(limit);
                picks
            })
            .map_err(|e| {
                warn!("Failed to load user picks: {}", e);
                e.user_message(PICKS_LOAD_FAILED)
            });
        if !self.picks.settle(settled.picks_ticket, picks) {
            debug!("Discarding stale dashboard picks");
        }
    }

    pub async fn load(&mut self) {
        let settled = self.begin_load().resolve().await;
        self.apply(settled);
    }
}
