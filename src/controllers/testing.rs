//! Scriptable gateway for controller tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::domain::{
    AccuracyMetric, AuthStatus, Direction, NewPick, Outcome, Pick, PredictionType,
    SportsPrediction, StockPrediction,
};
use crate::error::{PickwiseError, Result};
use crate::gateway::PredictionGateway;

/// A queued response: either ready now or released later by the test
pub enum Reply<T> {
    Ready(Result<T>),
    Deferred(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn take(reply: Option<Reply<T>>) -> Result<T> {
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(PickwiseError::Internal("reply dropped".into()))),
            None => Err(PickwiseError::Internal("no reply scripted".into())),
        }
    }
}

#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<String>>,
    stock: Mutex<HashMap<String, VecDeque<Reply<StockPrediction>>>>,
    sports: Mutex<HashMap<String, VecDeque<Reply<Vec<SportsPrediction>>>>>,
    picks: Mutex<VecDeque<Reply<Vec<Pick>>>>,
    metrics: Mutex<VecDeque<Reply<Vec<AccuracyMetric>>>>,
    saved: Mutex<Vec<NewPick>>,
    save_error: Mutex<Option<(u16, String)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saved(&self) -> Vec<NewPick> {
        self.saved.lock().unwrap().clone()
    }

    pub fn push_stock(&self, symbol: &str, reply: Result<StockPrediction>) {
        self.stock
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_default()
            .push_back(Reply::Ready(reply));
    }

    pub fn push_sports(&self, sport: &str, reply: Result<Vec<SportsPrediction>>) {
        self.sports
            .lock()
            .unwrap()
            .entry(sport.to_string())
            .or_default()
            .push_back(Reply::Ready(reply));
    }

    /// Script a sports reply that resolves only when the returned sender fires
    pub fn defer_sports(&self, sport: &str) -> oneshot::Sender<Result<Vec<SportsPrediction>>> {
        let (tx, rx) = oneshot::channel();
        self.sports
            .lock()
            .unwrap()
            .entry(sport.to_string())
            .or_default()
            .push_back(Reply::Deferred(rx));
        tx
    }

    pub fn defer_stock(&self, symbol: &str) -> oneshot::Sender<Result<StockPrediction>> {
        let (tx, rx) = oneshot::channel();
        self.stock
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_default()
            .push_back(Reply::Deferred(rx));
        tx
    }

    pub fn push_picks(&self, reply: Result<Vec<Pick>>) {
        self.picks.lock().unwrap().push_back(Reply::Ready(reply));
    }

    pub fn defer_picks(&self) -> oneshot::Sender<Result<Vec<Pick>>> {
        let (tx, rx) = oneshot::channel();
        self.picks.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn push_metrics(&self, reply: Result<Vec<AccuracyMetric>>) {
        self.metrics.lock().unwrap().push_back(Reply::Ready(reply));
    }

    pub fn fail_saves(&self, status: u16, detail: &str) {
        *self.save_error.lock().unwrap() = Some((status, detail.to_string()));
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PredictionGateway for FakeGateway {
    async fn get_stock_prediction(&self, symbol: &str) -> Result<StockPrediction> {
        self.record(format!("stock:{}", symbol));
        let reply = self
            .stock
            .lock()
            .unwrap()
            .get_mut(symbol)
            .and_then(|q| q.pop_front());
        Reply::take(reply).await
    }

    async fn get_sports_predictions(&self, sport: Option<&str>) -> Result<Vec<SportsPrediction>> {
        let sport = sport.unwrap_or(crate::domain::DEFAULT_SPORT).to_string();
        self.record(format!("sports:{}", sport));
        let reply = self
            .sports
            .lock()
            .unwrap()
            .get_mut(&sport)
            .and_then(|q| q.pop_front());
        Reply::take(reply).await
    }

    async fn save_pick(&self, pick: &NewPick) -> Result<Pick> {
        self.record(format!("save:{}", pick.symbol_or_event));
        if let Some((status, detail)) = self.save_error.lock().unwrap().clone() {
            return Err(request_failed(status, &detail));
        }

        let mut saved = self.saved.lock().unwrap();
        saved.push(pick.clone());
        Ok(Pick {
            id: saved.len() as i64,
            prediction_type: pick.prediction_type.clone(),
            symbol_or_event: pick.symbol_or_event.clone(),
            prediction: pick.prediction.clone(),
            confidence: pick.confidence,
            created_at: Utc::now(),
        })
    }

    async fn get_user_picks(&self) -> Result<Vec<Pick>> {
        self.record("picks".to_string());
        let reply = self.picks.lock().unwrap().pop_front();
        Reply::take(reply).await
    }

    async fn get_accuracy_metrics(
        &self,
        prediction_type: Option<&str>,
    ) -> Result<Vec<AccuracyMetric>> {
        self.record(format!("metrics:{}", prediction_type.unwrap_or("*")));
        let reply = self.metrics.lock().unwrap().pop_front();
        Reply::take(reply).await
    }

    async fn verify_auth(&self) -> Result<AuthStatus> {
        self.record("verify".to_string());
        Ok(AuthStatus {
            authenticated: true,
            user_id: 1,
            clerk_id: None,
            email: None,
        })
    }
}

pub fn request_failed(status: u16, detail: &str) -> PickwiseError {
    PickwiseError::RequestFailed {
        context: "fake".to_string(),
        status: Some(status),
        body: Some(serde_json::json!({ "detail": detail }).to_string()),
    }
}

pub fn stock(symbol: &str) -> StockPrediction {
    StockPrediction {
        symbol: symbol.to_string(),
        direction: Direction::Up,
        probability: 0.64,
        confidence: 0.82,
        current_price: Some(101.25),
        price_target: Some(104.0),
        model_version: "v1.0".to_string(),
        prediction_type: Some("stock".to_string()),
        metadata: None,
    }
}

pub fn sports(event_id: &str) -> SportsPrediction {
    SportsPrediction {
        event_id: event_id.to_string(),
        team: Some("Home Team".to_string()),
        outcome: Outcome::Home,
        probability: 0.58,
        confidence: 0.4,
        odds: Some(-130.0),
        implied_probability: Some(0.565),
        model_version: Some("v1.0".to_string()),
        prediction_type: Some("sports".to_string()),
        metadata: None,
    }
}

pub fn pick(id: i64, symbol_or_event: &str) -> Pick {
    Pick {
        id,
        prediction_type: PredictionType::Stock,
        symbol_or_event: symbol_or_event.to_string(),
        prediction: serde_json::to_value(stock(symbol_or_event)).unwrap(),
        confidence: 0.7,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

pub fn metric(prediction_type: &str, correct: u64, total: u64) -> AccuracyMetric {
    AccuracyMetric {
        prediction_type: prediction_type.to_string(),
        accuracy_rate: if total == 0 { 0.0 } else { correct as f64 / total as f64 },
        correct_predictions: correct,
        total_predictions: total,
        model_version: Some("v1.0".to_string()),
        last_updated: None,
    }
}
