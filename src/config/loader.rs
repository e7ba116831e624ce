//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    house_edge = config.market.house_edge,
    min_wager = config.market.min_wager,
    max_wager = config.market.max_wager,
    tau = config.rating.tau,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Valid probability/fraction ranges
/// - Ordered wager limits
/// - Positive rating-system parameters
fn validate_config(config: &AppConfig) -> Result<()> {
  // Market validation
  anyhow::ensure!(
    config.market.house_edge >= 0.0 && config.market.house_edge < 1.0,
    "house_edge must be in [0, 1), got {}",
    config.market.house_edge
  );
  anyhow::ensure!(
    config.market.min_odds >= 1.0,
    "min_odds must be at least 1.0, got {}",
    config.market.min_odds
  );
  anyhow::ensure!(
    config.market.min_wager > 0,
    "min_wager must be positive, got {}",
    config.market.min_wager
  );
  anyhow::ensure!(
    config.market.max_wager >= config.market.min_wager,
    "max_wager ({}) must be >= min_wager ({})",
    config.market.max_wager,
    config.market.min_wager
  );
  anyhow::ensure!(
    config.market.starting_balance > 0,
    "starting_balance must be positive, got {}",
    config.market.starting_balance
  );
  anyhow::ensure!(
    config.market.superforecaster_min_accuracy_pct <= 100,
    "superforecaster_min_accuracy_pct must be <= 100, got {}",
    config.market.superforecaster_min_accuracy_pct
  );

  // Rating validation
  anyhow::ensure!(
    config.rating.tau > 0.0,
    "rating tau must be positive, got {}",
    config.rating.tau
  );
  anyhow::ensure!(
    config.rating.initial_deviation > 0.0,
    "initial_deviation must be positive, got {}",
    config.rating.initial_deviation
  );
  anyhow::ensure!(
    config.rating.min_deviation > 0.0
      && config.rating.min_deviation < config.rating.initial_deviation,
    "min_deviation must be in (0, initial_deviation), got {}",
    config.rating.min_deviation
  );
  anyhow::ensure!(
    config.rating.default_volatility > 0.0,
    "default_volatility must be positive, got {}",
    config.rating.default_volatility
  );
  anyhow::ensure!(
    config.rating.rating_period_days > 0.0,
    "rating_period_days must be positive, got {}",
    config.rating.rating_period_days
  );
  anyhow::ensure!(
    config.rating.controversy_threshold > 0.0,
    "controversy_threshold must be positive, got {}",
    config.rating.controversy_threshold
  );

  Ok(())
}
