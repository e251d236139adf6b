use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PickwiseError, Result};

/// Historical hit rate of one prediction type, computed by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetric {
    pub prediction_type: String,
    pub accuracy_rate: f64,
    pub correct_predictions: u64,
    pub total_predictions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

impl AccuracyMetric {
    /// Check the service's own invariants before the metric is displayed.
    ///
    /// The rate is not recomputed; only its range and the counts are checked.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.accuracy_rate) {
            return Err(PickwiseError::DataIntegrity(format!(
                "accuracy metric '{}' has rate {} outside [0, 1]",
                self.prediction_type, self.accuracy_rate
            )));
        }

        if self.correct_predictions > self.total_predictions {
            return Err(PickwiseError::DataIntegrity(format!(
                "accuracy metric '{}' reports {} correct of {} total predictions",
                self.prediction_type, self.correct_predictions, self.total_predictions
            )));
        }

        Ok(())
    }
}

/// Response of the auth verification endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user_id: i64,
    #[serde(default)]
    pub clerk_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
