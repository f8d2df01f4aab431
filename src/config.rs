//! Command-line / environment configuration

use clap::Parser;

pub const DEFAULT_API_URL: &str = "http://localhost:18888/api";

#[derive(Parser, Debug, Clone)]
#[command(name = "octopod-player")]
#[command(about = "Swipe through short podcast clips from the terminal")]
#[command(version)]
pub struct Config {
    /// Base URL of the Octopod API
    #[arg(long, default_value = DEFAULT_API_URL, env = "OCTOPOD_API_URL")]
    pub api_url: String,

    /// Bearer token; the last one used is remembered in .cache/token
    #[arg(long, env = "OCTOPOD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Listening budget requested for each playlist
    #[arg(long, default_value_t = 30, env = "OCTOPOD_SESSION_MINUTES")]
    pub session_minutes: u32,

    /// Amount sent with each tip
    #[arg(long, default_value_t = 100.0, env = "OCTOPOD_TIP_AMOUNT")]
    pub tip_amount: f64,

    /// Rows a vertical mouse drag must travel before it changes clip
    #[arg(long, default_value_t = 3, env = "OCTOPOD_SWIPE_THRESHOLD")]
    pub swipe_threshold: u16,
}

impl Config {
    pub fn session_budget_seconds(&self) -> u32 {
        self.session_minutes.saturating_mul(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_web_client() {
        let config = Config::try_parse_from(["octopod-player"]).expect("defaults parse");
        assert_eq!(config.session_budget_seconds(), 1800);
        assert_eq!(config.tip_amount, 100.0);
        assert_eq!(config.swipe_threshold, 3);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "octopod-player",
            "--api-url",
            "https://octopod.example/api",
            "--session-minutes",
            "5",
            "--swipe-threshold",
            "6",
        ])
        .expect("flags parse");
        assert_eq!(config.api_url, "https://octopod.example/api");
        assert_eq!(config.session_budget_seconds(), 300);
        assert_eq!(config.swipe_threshold, 6);
    }
}
