//! Configuration
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

/// Stoke - engagement scoring and leaderboard engine
#[derive(Parser, Debug, Clone)]
#[command(name = "stoke")]
#[command(about = "Engagement scoring and leaderboard engine backed by Redis")]
pub struct Args {
    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Seconds between decay sweeps (nominally one day)
    #[arg(long, env = "DECAY_INTERVAL_SECS", default_value = "86400")]
    pub decay_interval_secs: u64,

    /// Ranking index page size used while enumerating subscribers in a sweep
    #[arg(long, env = "DECAY_PAGE_SIZE", default_value = "100")]
    pub decay_page_size: usize,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if self.decay_interval_secs == 0 {
            return Err("DECAY_INTERVAL_SECS must be greater than zero".to_string());
        }
        if self.decay_page_size == 0 {
            return Err("DECAY_PAGE_SIZE must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let args = Args::parse_from(["stoke"]);
        assert!(args.validate().is_ok());
        assert_eq!(args.decay_interval_secs, 86_400);
        assert_eq!(args.decay_page_size, 100);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let args = Args::parse_from(["stoke", "--decay-interval-secs", "0"]);
        assert!(args.validate().is_err());
    }
}
