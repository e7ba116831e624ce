//! Configuration Module - TOML-based Arena Configuration
//!
//! Loads and validates configuration from `config.toml`. All market
//! economics and rating-system parameters are externalized here -
//! nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level arena core configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the engine begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and metadata.
  pub arena: ArenaConfig,
  /// Parimutuel market economics.
  pub market: MarketConfig,
  /// Glicko-2 rating system parameters.
  pub rating: RatingConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
  /// Persistence configuration.
  pub persistence: PersistenceConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Parimutuel market economics.
///
/// The empty-pool defaults and empty-side placeholders are fixed product
/// constants; only the edge, floor, and wager limits are tunable here.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
  /// Fraction of the pool withheld before computing odds.
  #[serde(default = "default_house_edge")]
  pub house_edge: f64,
  /// Hard floor on payout multipliers.
  #[serde(default = "default_min_odds")]
  pub min_odds: f64,
  /// Minimum wager in points (inclusive).
  #[serde(default = "default_min_wager")]
  pub min_wager: i64,
  /// Maximum wager in points (inclusive).
  #[serde(default = "default_max_wager")]
  pub max_wager: i64,
  /// Points granted to a fresh profile.
  #[serde(default = "default_starting_balance")]
  pub starting_balance: i64,
  /// Wagers required before the superforecaster badge can be earned.
  #[serde(default = "default_superforecaster_min_bets")]
  pub superforecaster_min_bets: u64,
  /// Accuracy threshold for the badge, in whole percent.
  #[serde(default = "default_superforecaster_accuracy")]
  pub superforecaster_min_accuracy_pct: u64,
}

/// Glicko-2 rating system parameters, shared by both tracks.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingConfig {
  /// Rating every new model starts at.
  #[serde(default = "default_initial_rating")]
  pub initial_rating: f64,
  /// Deviation every new model starts at; also the inflation cap.
  #[serde(default = "default_initial_deviation")]
  pub initial_deviation: f64,
  /// Deviation floor after heavy play.
  #[serde(default = "default_min_deviation")]
  pub min_deviation: f64,
  /// System volatility for new models and for the crowd track.
  #[serde(default = "default_volatility")]
  pub default_volatility: f64,
  /// Volatility-change constraint (smaller = steadier ratings).
  #[serde(default = "default_tau")]
  pub tau: f64,
  /// Length of one rating period in days; idle deviation inflation is
  /// measured in these.
  #[serde(default = "default_rating_period_days")]
  pub rating_period_days: f64,
  /// Crowd/AI gap above which a model is flagged controversial.
  #[serde(default = "default_controversy_threshold")]
  pub controversy_threshold: f64,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Directory for JSONL audit logs.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_house_edge() -> f64 {
  0.05
}

fn default_min_odds() -> f64 {
  1.1
}

fn default_min_wager() -> i64 {
  10
}

fn default_max_wager() -> i64 {
  500
}

fn default_starting_balance() -> i64 {
  1000
}

fn default_superforecaster_min_bets() -> u64 {
  10
}

fn default_superforecaster_accuracy() -> u64 {
  80
}

fn default_initial_rating() -> f64 {
  1500.0
}

fn default_initial_deviation() -> f64 {
  350.0
}

fn default_min_deviation() -> f64 {
  30.0
}

fn default_volatility() -> f64 {
  0.06
}

fn default_tau() -> f64 {
  0.5
}

fn default_rating_period_days() -> f64 {
  7.0
}

fn default_controversy_threshold() -> f64 {
  150.0
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_health_port() -> u16 {
  8080
}

fn default_data_dir() -> String {
  "data".to_string()
}
