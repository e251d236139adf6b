//! Command handlers. Each one drives a page controller and prints its view models.

use anyhow::{anyhow, bail};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use super::output::{self, OutputMode};
use super::{resolve_sport, Cli, Commands};
use crate::auth::{CredentialProvider, EnvToken, StaticToken, UserIdentity};
use crate::config::AppConfig;
use crate::controllers::{
    DashboardController, Notice, ProfileController, SportsListController, StockLookupController,
    ViewState,
};
use crate::gateway::{HttpGateway, PredictionGateway};

const VERIFY_FAILED: &str = "Authentication check failed";

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let mode = OutputMode::from_json_flag(cli.json);

    let credentials: Arc<dyn CredentialProvider> = match cli.token {
        Some(token) => Arc::new(StaticToken::new(token)),
        None => Arc::new(EnvToken::default()),
    };
    let gateway: Arc<dyn PredictionGateway> =
        Arc::new(HttpGateway::new(config.api.clone(), credentials));
    debug!("Using prediction service at {}", config.api.base());

    match cli.command {
        Commands::Stock { symbol, save } => stock(gateway, &symbol, save, mode).await,
        Commands::Sports { sport, save } => {
            let sport = sport
                .map(|s| resolve_sport(&s))
                .unwrap_or_else(|| config.sports.default_sport.clone());
            sports(gateway, sport, save, mode).await
        }
        Commands::Dashboard => dashboard(gateway, config.dashboard.recent_picks, mode).await,
        Commands::Profile { email, user_id } => {
            let identity = UserIdentity { id: user_id, email };
            profile(gateway, identity, mode).await
        }
        Commands::Verify => verify(gateway.as_ref(), mode).await,
    }
}

async fn stock(
    gateway: Arc<dyn PredictionGateway>,
    symbol: &str,
    save: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut ctl = StockLookupController::new(gateway);
    if !ctl.search(symbol).await {
        bail!("Enter a stock symbol");
    }
    if let Some(message) = ctl.state().error() {
        bail!("{}", message);
    }

    if let Some(card) = ctl.card() {
        output::print_item(&card, mode)?;
    }

    if save {
        if let Some(notice) = ctl.save_pick().await {
            report_notice(&notice, mode)?;
        }
    }
    Ok(())
}

async fn sports(
    gateway: Arc<dyn PredictionGateway>,
    sport: String,
    save: Option<usize>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut ctl = SportsListController::with_sport(gateway, sport);
    ctl.load().await;
    if let Some(message) = ctl.state().error() {
        bail!("{}", message);
    }

    if ctl.is_empty() && mode == OutputMode::Table {
        println!("No predictions available for {}", ctl.selected_sport());
    } else {
        output::print_items(&ctl.cards(), mode)?;
    }

    if let Some(row) = save {
        let notice = match row.checked_sub(1) {
            Some(index) => ctl.save_pick_at(index).await,
            None => None,
        };
        let notice = notice.ok_or_else(|| anyhow!("No prediction at row {}", row))?;
        report_notice(&notice, mode)?;
    }
    Ok(())
}

async fn dashboard(
    gateway: Arc<dyn PredictionGateway>,
    recent_picks: usize,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut ctl = DashboardController::with_recent_limit(gateway, recent_picks);
    ctl.load().await;

    match mode {
        OutputMode::Json => {
            let report = json!({
                "metrics": section(ctl.metrics(), ctl.metric_rows()),
                "chart": ctl.chart(),
                "recent_picks": section(ctl.picks(), ctl.pick_rows()),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputMode::Table => {
            output::print_heading("Model accuracy", mode);
            match ctl.metrics().error() {
                Some(message) => output::print_error(message),
                None => output::print_items(&ctl.metric_rows(), mode)?,
            }

            output::print_heading("Recent picks", mode);
            match ctl.picks().error() {
                Some(message) => output::print_error(message),
                None => output::print_items(&ctl.pick_rows(), mode)?,
            }
        }
    }

    // One panel failing still renders the other
    if ctl.metrics().error().is_some() && ctl.picks().error().is_some() {
        bail!("Dashboard unavailable");
    }
    Ok(())
}

async fn profile(
    gateway: Arc<dyn PredictionGateway>,
    identity: UserIdentity,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut ctl = ProfileController::new(gateway, identity);
    ctl.load().await;

    match mode {
        OutputMode::Json => {
            let report = json!({
                "profile": ctl.summary(),
                "picks": section(ctl.state(), ctl.pick_rows()),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputMode::Table => {
            output::print_item(&ctl.summary(), mode)?;
            output::print_heading("Your picks", mode);
            if ctl.state().is_loaded() {
                output::print_items(&ctl.pick_rows(), mode)?;
            }
        }
    }

    if let Some(message) = ctl.state().error() {
        bail!("{}", message);
    }
    Ok(())
}

async fn verify(gateway: &dyn PredictionGateway, mode: OutputMode) -> anyhow::Result<()> {
    let status = gateway
        .verify_auth()
        .await
        .map_err(|e| anyhow!(e.user_message(VERIFY_FAILED)))?;
    output::print_item(&status, mode)
}

fn report_notice(notice: &Notice, mode: OutputMode) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        output::print_item(notice, mode)?;
    }
    if !notice.is_success() {
        bail!("{}", notice.message());
    }
    if mode == OutputMode::Table {
        output::print_success(&notice.message());
    }
    Ok(())
}

/// JSON shape of one independently loaded panel
fn section<T, R: Serialize>(state: &ViewState<T>, rows: Vec<R>) -> serde_json::Value {
    json!({
        "status": state.label(),
        "error": state.error(),
        "rows": rows,
    })
}
