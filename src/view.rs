//! Display models derived from service payloads.
//!
//! These are optimized for rendering; nothing here talks to the network.

use serde::Serialize;
use tabled::Tabled;

use crate::auth::UserIdentity;
use crate::domain::{AccuracyMetric, Pick, SportsPrediction, StockPrediction};

/// Placeholder for fields the service left out
pub const MISSING: &str = "-";

/// `0.823` -> `"82.3%"`
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// `189.5` -> `"$189.50"`
pub fn price(value: f64) -> String {
    format!("${:.2}", value)
}

/// Short label for a sports event id
pub fn event_label(event_id: &str) -> String {
    let short: String = event_id.chars().take(8).collect();
    format!("Event {}", short)
}

/// Stock prediction card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockCard {
    pub symbol: String,
    pub direction: String,
    pub probability: String,
    pub confidence: String,
    pub current_price: Option<String>,
    pub price_target: Option<String>,
    pub model_version: String,
    /// Width of the probability bar, 0.0 to 1.0
    pub probability_fill: f64,
}

impl From<&StockPrediction> for StockCard {
    fn from(p: &StockPrediction) -> Self {
        Self {
            symbol: p.symbol.clone(),
            direction: p.direction.as_str().to_uppercase(),
            probability: percent(p.probability),
            confidence: percent(p.confidence),
            current_price: p.current_price.map(price),
            price_target: p.price_target.map(price),
            model_version: p.model_version.clone(),
            probability_fill: p.probability.clamp(0.0, 1.0),
        }
    }
}

/// One card in the sports prediction grid
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SportsCard {
    #[tabled(rename = "Event")]
    pub label: String,
    #[tabled(rename = "Team")]
    pub team: String,
    #[tabled(rename = "Outcome")]
    pub outcome: String,
    #[tabled(rename = "Probability")]
    pub probability: String,
    #[tabled(rename = "Confidence")]
    pub confidence: String,
    #[tabled(rename = "Odds")]
    pub odds: String,
    #[tabled(rename = "Implied")]
    pub implied_probability: String,
}

impl From<&SportsPrediction> for SportsCard {
    fn from(p: &SportsPrediction) -> Self {
        Self {
            label: event_label(&p.event_id),
            team: p.team.clone().unwrap_or_else(|| MISSING.to_string()),
            outcome: p.outcome.as_str().to_uppercase(),
            probability: percent(p.probability),
            confidence: percent(p.confidence),
            odds: p
                .odds
                .map(|o| o.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            implied_probability: p
                .implied_probability
                .map(percent)
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

/// Saved pick row
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PickRow {
    #[tabled(rename = "Type")]
    pub prediction_type: String,
    #[tabled(rename = "Symbol/Event")]
    pub symbol_or_event: String,
    #[tabled(rename = "Confidence")]
    pub confidence: String,
    #[tabled(rename = "Saved")]
    pub created: String,
}

impl From<&Pick> for PickRow {
    fn from(p: &Pick) -> Self {
        Self {
            prediction_type: p.prediction_type.as_str().to_uppercase(),
            symbol_or_event: p.symbol_or_event.clone(),
            confidence: percent(p.confidence),
            created: p.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Accuracy row, `correct / total` alongside the service's rate
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Type")]
    pub prediction_type: String,
    #[tabled(rename = "Accuracy")]
    pub accuracy: String,
    #[tabled(rename = "Correct / Total")]
    pub counts: String,
}

impl From<&AccuracyMetric> for MetricRow {
    fn from(m: &AccuracyMetric) -> Self {
        Self {
            prediction_type: m.prediction_type.clone(),
            accuracy: percent(m.accuracy_rate),
            counts: format!("{} / {}", m.correct_predictions, m.total_predictions),
        }
    }
}

/// Point on the accuracy chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    /// Accuracy in percent, rounded to one decimal
    pub accuracy_pct: f64,
    pub total: u64,
}

impl From<&AccuracyMetric> for ChartPoint {
    fn from(m: &AccuracyMetric) -> Self {
        Self {
            label: m.prediction_type.clone(),
            accuracy_pct: (m.accuracy_rate * 1000.0).round() / 10.0,
            total: m.total_predictions,
        }
    }
}

/// Profile header plus pick count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub email: String,
    pub user_id: String,
    pub pick_count: usize,
}

impl ProfileSummary {
    pub fn new(identity: &UserIdentity, picks: &[Pick]) -> Self {
        Self {
            email: identity.display_email().to_string(),
            user_id: identity.display_id().to_string(),
            pick_count: picks.len(),
        }
    }
}
