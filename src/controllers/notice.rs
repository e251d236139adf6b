use serde::Serialize;
use tracing::warn;

use crate::domain::NewPick;
use crate::error::Result;
use crate::gateway::PredictionGateway;

pub const SAVE_FAILED: &str = "Failed to save pick";

/// Transient result of a save action, shown beside the page state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Saved { pick_id: i64, symbol_or_event: String },
    Failed { message: String },
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Saved { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Saved { .. } => "Pick saved successfully!".to_string(),
            Notice::Failed { message } => message.clone(),
        }
    }
}

/// Save a pick and turn the outcome into a notice; errors never escape.
pub(crate) async fn save_pick(gateway: &dyn PredictionGateway, pick: Result<NewPick>) -> Notice {
    let outcome = match pick {
        Ok(pick) => gateway.save_pick(&pick).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(saved) => Notice::Saved {
            pick_id: saved.id,
            symbol_or_event: saved.symbol_or_event,
        },
        Err(e) => {
            warn!("Failed to save pick: {}", e);
            Notice::Failed {
                message: e.user_message(SAVE_FAILED),
            }
        }
    }
}
