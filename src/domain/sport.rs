use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// League loaded when no sport has been chosen
pub const DEFAULT_SPORT: &str = "basketball_nba";

/// Leagues the prediction service has models for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "basketball_nba")]
    NBA,
    #[serde(rename = "americanfootball_nfl")]
    NFL,
    #[serde(rename = "icehockey_nhl")]
    NHL,
    #[serde(rename = "baseball_mlb")]
    MLB,
    #[serde(rename = "soccer_epl")]
    EPL,
}

impl Sport {
    pub const ALL: [Sport; 5] = [Sport::NBA, Sport::NFL, Sport::NHL, Sport::MLB, Sport::EPL];

    pub fn api_key(&self) -> &'static str {
        match self {
            Sport::NBA => "basketball_nba",
            Sport::NFL => "americanfootball_nfl",
            Sport::NHL => "icehockey_nhl",
            Sport::MLB => "baseball_mlb",
            Sport::EPL => "soccer_epl",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::NBA => "NBA",
            Sport::NFL => "NFL",
            Sport::NHL => "NHL",
            Sport::MLB => "MLB",
            Sport::EPL => "Premier League",
        }
    }
}

impl Default for Sport {
    fn default() -> Self {
        Sport::NBA
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_key())
    }
}

impl FromStr for Sport {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basketball_nba" | "nba" => Ok(Sport::NBA),
            "americanfootball_nfl" | "nfl" => Ok(Sport::NFL),
            "icehockey_nhl" | "nhl" => Ok(Sport::NHL),
            "baseball_mlb" | "mlb" => Ok(Sport::MLB),
            "soccer_epl" | "epl" => Ok(Sport::EPL),
            _ => Err("unknown sport; expected nba|nfl|nhl|mlb|epl"),
        }
    }
}
