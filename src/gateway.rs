//! Typed operations against the prediction service.
//!
//! Every call builds its own [`TransportClient`], so a token refreshed between
//! two calls is always the one that gets sent.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::CredentialProvider;
use crate::config::ApiConfig;
use crate::domain::{
    AccuracyMetric, AuthStatus, NewPick, Pick, SportsPrediction, StockPrediction, DEFAULT_SPORT,
};
use crate::error::{PickwiseError, Result};
use crate::transport::TransportClient;

pub const STOCK_PREDICTIONS_PATH: &str = "/stocks/predictions";
pub const SPORTS_PREDICTIONS_PATH: &str = "/sports/predictions";
pub const USER_PICKS_PATH: &str = "/user/picks";
pub const ACCURACY_PATH: &str = "/analytics/accuracy";
pub const AUTH_VERIFY_PATH: &str = "/auth/verify";

#[async_trait]
pub trait PredictionGateway: Send + Sync {
    /// Prediction for an already upper-cased symbol
    async fn get_stock_prediction(&self, symbol: &str) -> Result<StockPrediction>;

    /// Predictions for one league, in service order. `None` means the default league.
    async fn get_sports_predictions(&self, sport: Option<&str>) -> Result<Vec<SportsPrediction>>;

    async fn save_pick(&self, pick: &NewPick) -> Result<Pick>;

    /// All picks of the authenticated user, in service order
    async fn get_user_picks(&self) -> Result<Vec<Pick>>;

    /// Accuracy metrics, filtered by type when one is given
    async fn get_accuracy_metrics(&self, prediction_type: Option<&str>)
        -> Result<Vec<AccuracyMetric>>;

    async fn verify_auth(&self) -> Result<AuthStatus>;
}

/// Gateway over HTTP
#[derive(Clone)]
pub struct HttpGateway {
    config: ApiConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpGateway {
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        self.config.base()
    }

    async fn client(&self) -> Result<TransportClient> {
        TransportClient::build(self.credentials.as_ref(), &self.config).await
    }
}

#[async_trait]
impl PredictionGateway for HttpGateway {
    async fn get_stock_prediction(&self, symbol: &str) -> Result<StockPrediction> {
        if symbol.trim().is_empty() {
            return Err(PickwiseError::Validation(
                "stock symbol must not be empty".to_string(),
            ));
        }

        let client = self.client().await?;
        client
            .get(STOCK_PREDICTIONS_PATH, &[("symbol", symbol)])
            .await
    }

    async fn get_sports_predictions(&self, sport: Option<&str>) -> Result<Vec<SportsPrediction>> {
        let sport = sport
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SPORT);

        let client = self.client().await?;
        let predictions: Vec<SportsPrediction> = client
            .get(SPORTS_PREDICTIONS_PATH, &[("sport", sport)])
            .await?;
        debug!("{} predictions for {}", predictions.len(), sport);
        Ok(predictions)
    }

    async fn save_pick(&self, pick: &NewPick) -> Result<Pick> {
        let client = self.client().await?;
        let saved: Pick = client.post(USER_PICKS_PATH, pick).await?;
        info!(
            "Saved {} pick {} for {}",
            saved.prediction_type, saved.id, saved.symbol_or_event
        );
        Ok(saved)
    }

    async fn get_user_picks(&self) -> Result<Vec<Pick>> {
        let client = self.client().await?;
        client.get(USER_PICKS_PATH, &[]).await
    }

    async fn get_accuracy_metrics(
        &self,
        prediction_type: Option<&str>,
    ) -> Result<Vec<AccuracyMetric>> {
        let filter = prediction_type.map(str::trim).filter(|t| !t.is_empty());
        let query: Vec<(&str, &str)> = filter.map(|t| ("prediction_type", t)).into_iter().collect();

        let client = self.client().await?;
        let metrics: Vec<AccuracyMetric> = client.get(ACCURACY_PATH, &query).await?;

        for metric in &metrics {
            if let Err(e) = metric.validate() {
                warn!("Rejecting accuracy metrics: {}", e);
                return Err(e);
            }
        }

        Ok(metrics)
    }

    async fn verify_auth(&self) -> Result<AuthStatus> {
        let client = self.client().await?;
        client.get(AUTH_VERIFY_PATH, &[]).await
    }
}
