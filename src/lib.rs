pub mod auth;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod transport;
pub mod view;

pub use auth::{CredentialProvider, EnvToken, FnCredentials, StaticToken, UserIdentity};
pub use config::AppConfig;
pub use controllers::{
    DashboardController, Notice, ProfileController, SportsListController, StockLookupController,
    ViewState,
};
pub use domain::{
    AccuracyMetric, AuthStatus, NewPick, Pick, PredictionType, Sport, SportsPrediction,
    StockPrediction,
};
pub use error::{PickwiseError, Result};
pub use gateway::{HttpGateway, PredictionGateway};
pub use transport::TransportClient;
