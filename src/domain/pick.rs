use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SportsPrediction, StockPrediction};
use crate::error::{PickwiseError, Result};

/// Kind of prediction a pick or metric refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PredictionType {
    Stock,
    Sports,
    /// Type this client cannot decode, kept verbatim
    Other(String),
}

impl PredictionType {
    pub fn as_str(&self) -> &str {
        match self {
            PredictionType::Stock => "stock",
            PredictionType::Sports => "sports",
            PredictionType::Other(raw) => raw,
        }
    }
}

impl From<String> for PredictionType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stock" => PredictionType::Stock,
            "sports" => PredictionType::Sports,
            _ => PredictionType::Other(raw),
        }
    }
}

impl From<PredictionType> for String {
    fn from(kind: PredictionType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for PredictionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PredictionType {
    type Err = PickwiseError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stock" | "stocks" => Ok(PredictionType::Stock),
            "sports" | "sport" => Ok(PredictionType::Sports),
            other => Err(PickwiseError::Validation(format!(
                "unknown prediction type '{}'; expected stock|sports",
                other
            ))),
        }
    }
}

/// Request body for saving a pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPick {
    pub prediction_type: PredictionType,
    pub symbol_or_event: String,
    pub prediction: Value,
    pub confidence: f64,
}

impl NewPick {
    /// Pick for a displayed stock prediction, keyed by its symbol
    pub fn from_stock(prediction: &StockPrediction) -> Result<Self> {
        Ok(Self {
            prediction_type: PredictionType::Stock,
            symbol_or_event: prediction.symbol.clone(),
            prediction: serde_json::to_value(prediction)?,
            confidence: prediction.confidence,
        })
    }

    /// Pick for one sports prediction, keyed by its event id
    pub fn from_sports(prediction: &SportsPrediction) -> Result<Self> {
        Ok(Self {
            prediction_type: PredictionType::Sports,
            symbol_or_event: prediction.event_id.clone(),
            prediction: serde_json::to_value(prediction)?,
            confidence: prediction.confidence,
        })
    }
}

/// A saved pick as stored by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub id: i64,
    pub prediction_type: PredictionType,
    pub symbol_or_event: String,
    /// Snapshot of the prediction at save time; shape depends on `prediction_type`
    pub prediction: Value,
    pub confidence: f64,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Typed view of a pick's embedded prediction
#[derive(Debug, Clone, PartialEq)]
pub enum PickedPrediction {
    Stock(StockPrediction),
    Sports(SportsPrediction),
}

impl Pick {
    pub fn decode_prediction(&self) -> Result<PickedPrediction> {
        let decoded = match &self.prediction_type {
            PredictionType::Stock => {
                PickedPrediction::Stock(serde_json::from_value(self.prediction.clone())?)
            }
            PredictionType::Sports => {
                PickedPrediction::Sports(serde_json::from_value(self.prediction.clone())?)
            }
            PredictionType::Other(kind) => {
                return Err(PickwiseError::Validation(format!(
                    "pick {} has unsupported prediction type '{}'",
                    self.id, kind
                )))
            }
        };
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use serde_json::json;

    fn stock() -> StockPrediction {
        StockPrediction {
            symbol: "AAPL".to_string(),
            direction: Direction::Up,
            probability: 0.66,
            confidence: 0.82,
            current_price: Some(190.0),
            price_target: None,
            model_version: "v1.0".to_string(),
            prediction_type: Some("stock".to_string()),
            metadata: None,
        }
    }

    #[test]
    fn test_new_pick_from_stock_embeds_prediction() {
        let pick = NewPick::from_stock(&stock()).unwrap();
        assert_eq!(pick.prediction_type, PredictionType::Stock);
        assert_eq!(pick.symbol_or_event, "AAPL");
        assert_eq!(pick.confidence, 0.82);
        assert_eq!(pick.prediction["direction"], "up");

        let body = serde_json::to_value(&pick).unwrap();
        assert_eq!(body["prediction_type"], "stock");
    }

    #[test]
    fn test_pick_decodes_embedded_prediction() {
        let pick: Pick = serde_json::from_value(json!({
            "id": 7,
            "prediction_type": "stock",
            "symbol_or_event": "AAPL",
            "prediction": serde_json::to_value(stock()).unwrap(),
            "confidence": 0.82,
            "created_at": "2024-03-01T12:30:00Z"
        }))
        .unwrap();

        match pick.decode_prediction().unwrap() {
            PickedPrediction::Stock(p) => assert_eq!(p, stock()),
            other => panic!("expected stock prediction, got {:?}", other),
        }
    }

    #[test]
    fn test_pick_accepts_naive_created_at() {
        let pick: Pick = serde_json::from_value(json!({
            "id": 8,
            "prediction_type": "sports",
            "symbol_or_event": "evt-1",
            "prediction": {},
            "confidence": 0.4,
            "created_at": "2024-03-01T12:30:00.123456"
        }))
        .unwrap();
        assert_eq!(pick.created_at.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 12:30");
    }

    #[test]
    fn test_mismatched_payload_fails_to_decode() {
        let pick = Pick {
            id: 1,
            prediction_type: PredictionType::Sports,
            symbol_or_event: "evt".to_string(),
            prediction: json!({"symbol": "AAPL"}),
            confidence: 0.5,
            created_at: Utc::now(),
        };
        assert!(pick.decode_prediction().is_err());
    }

    #[test]
    fn test_unknown_pick_type_still_deserializes() {
        let picks: Vec<Pick> = serde_json::from_value(json!([
            {
                "id": 1,
                "prediction_type": "stock",
                "symbol_or_event": "AAPL",
                "prediction": serde_json::to_value(stock()).unwrap(),
                "confidence": 0.82,
                "created_at": "2024-03-01T12:30:00Z"
            },
            {
                "id": 2,
                "prediction_type": "crypto",
                "symbol_or_event": "BTC",
                "prediction": {"direction": "up"},
                "confidence": 0.6,
                "created_at": "2024-03-01T12:31:00Z"
            }
        ]))
        .unwrap();

        assert_eq!(picks.len(), 2);
        assert_eq!(picks[1].prediction_type, PredictionType::Other("crypto".into()));
        assert_eq!(picks[1].prediction_type.as_str(), "crypto");
        assert!(picks[0].decode_prediction().is_ok());
        assert!(matches!(
            picks[1].decode_prediction(),
            Err(PickwiseError::Validation(_))
        ));
        assert_eq!(serde_json::to_value(&picks[1]).unwrap()["prediction_type"], "crypto");
    }

    #[test]
    fn test_prediction_type_from_str() {
        assert_eq!("Stock".parse::<PredictionType>().unwrap(), PredictionType::Stock);
        assert_eq!("sports".parse::<PredictionType>().unwrap(), PredictionType::Sports);
        assert!("crypto".parse::<PredictionType>().is_err());
    }
}
