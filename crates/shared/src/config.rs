//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Ledger policy knobs.
///
/// These control behavior the accounting policy leaves open rather than
/// hard invariants of the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Days a period must stay closed before it may be locked.
    #[serde(default = "default_lock_grace_days")]
    pub lock_grace_days: i64,
    /// Reject reversals dated before the original entry's date.
    #[serde(default)]
    pub reject_backdated_reversals: bool,
}

fn default_lock_grace_days() -> i64 {
    30
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_grace_days: default_lock_grace_days(),
            reject_backdated_reversals: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `TALLY__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
