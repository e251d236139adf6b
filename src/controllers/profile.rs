//! Profile page: identity header and the complete pick history.

use std::sync::Arc;
use tracing::{debug, warn};

use super::view_state::{LoadSlot, PendingLoad, Settled, ViewState};
use crate::auth::UserIdentity;
use crate::domain::Pick;
use crate::gateway::PredictionGateway;
use crate::view::{PickRow, ProfileSummary};

pub const PROFILE_PICKS_FAILED: &str = "Failed to load picks";

pub struct ProfileController {
    gateway: Arc<dyn PredictionGateway>,
    identity: UserIdentity,
    picks: LoadSlot<Vec<Pick>>,
}

impl ProfileController {
    pub fn new(gateway: Arc<dyn PredictionGateway>, identity: UserIdentity) -> Self {
        Self {
            gateway,
            identity,
            picks: LoadSlot::new(),
        }
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Identity comes from outside; it is never fetched here
    pub fn set_identity(&mut self, identity: UserIdentity) {
        self.identity = identity;
    }

    pub fn state(&self) -> &ViewState<Vec<Pick>> {
        self.picks.state()
    }

    pub fn pick_rows(&self) -> Vec<PickRow> {
        self.state()
            .data()
            .map(|picks| picks.iter().map(PickRow::from).collect())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> ProfileSummary {
        let picks = self.state().data().map(Vec::as_slice).unwrap_or(&[]);
        ProfileSummary::new(&self.identity, picks)
    }

    pub fn mount(&mut self) -> PendingLoad<Vec<Pick>> {
        let ticket = self.picks.begin();
        let gateway = Arc::clone(&self.gateway);
        PendingLoad::new(ticket, async move { gateway.get_user_picks().await })
    }

    pub fn apply(&mut self, settled: Settled<Vec<Pick>>) -> bool {
        let outcome = settled.result.map_err(|e| {
            warn!("Failed to load profile picks: {}", e);
            e.user_message(PROFILE_PICKS_FAILED)
        });

        let applied = self.picks.settle(settled.ticket, outcome);
        if !applied {
            debug!("Discarding stale profile picks");
        }
        applied
    }

    pub async fn load(&mut self) {
        let settled = self.mount().resolve().await;
        self.apply(settled);
    }
}
