use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Predicted price direction of a stock
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Up,
    Down,
    Flat,
    /// Value the client does not know yet, kept verbatim
    Other(String),
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Flat => "flat",
            Direction::Other(raw) => raw,
        }
    }
}

impl From<String> for Direction {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "flat" | "neutral" => Direction::Flat,
            _ => Direction::Other(raw),
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.as_str().to_string()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted result of a sporting event from the picked side's view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Home,
    Away,
    Draw,
    Win,
    Loss,
    Over,
    Under,
    Other(String),
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Home => "home",
            Outcome::Away => "away",
            Outcome::Draw => "draw",
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Over => "over",
            Outcome::Under => "under",
            Outcome::Other(raw) => raw,
        }
    }
}

impl From<String> for Outcome {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Outcome::Home,
            "away" => Outcome::Away,
            "draw" => Outcome::Draw,
            "win" => Outcome::Win,
            "loss" => Outcome::Loss,
            "over" => Outcome::Over,
            "under" => Outcome::Under,
            _ => Outcome::Other(raw),
        }
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.as_str().to_string()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction prediction for one stock symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrediction {
    pub symbol: String,
    pub direction: Direction,
    /// Probability of `direction`, in [0, 1]
    pub probability: f64,
    /// Model confidence, in [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_target: Option<f64>,
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Outcome prediction for one sporting event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportsPrediction {
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub outcome: Outcome,
    pub probability: f64,
    pub confidence: f64,
    /// Bookmaker price for the outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}
