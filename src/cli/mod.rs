//! `pickwise` command line.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::domain::Sport;

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "pickwise")]
#[command(version)]
#[command(about = "Stock and sports predictions from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON instead of human-readable tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Bearer token for the prediction service. Falls back to PICKWISE_TOKEN.
    /// CLI args are visible in `ps` output and shell history.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Config directory
    #[arg(short, long, global = true, default_value = "config")]
    pub config: String,

    /// Only log warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Look up the prediction for a stock symbol
    Stock {
        /// Ticker symbol (case-insensitive)
        symbol: String,
        /// Save the prediction as a pick
        #[arg(long)]
        save: bool,
    },
    /// List predictions for a league
    Sports {
        /// League key or short name (nba, nfl, nhl, mlb, epl)
        #[arg(short, long)]
        sport: Option<String>,
        /// Save the prediction at this row (1 = first row)
        #[arg(long)]
        save: Option<usize>,
    },
    /// Accuracy metrics and recent picks
    Dashboard,
    /// Identity and full pick history
    Profile {
        #[arg(long, env = "PICKWISE_USER_EMAIL")]
        email: Option<String>,
        #[arg(long, env = "PICKWISE_USER_ID")]
        user_id: Option<String>,
    },
    /// Check that the current token is accepted
    Verify,
}

/// Map short names onto league keys; unknown keys pass through unchanged.
pub fn resolve_sport(raw: &str) -> String {
    raw.parse::<Sport>()
        .map(|s| s.api_key().to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}
