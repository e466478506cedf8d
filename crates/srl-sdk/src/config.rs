use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use srl_ledger::DirectoryMode;
use srl_reveal::{RevealConfig, StatusBanner};

use crate::error::{SdkError, SdkResult};

/// Client configuration, usually read from `srl.toml`.
///
/// Every field has a default, so a partial file only overrides what it
/// names:
///
/// ```toml
/// operation_timeout_ms = 10000
/// directory_mode = "conditional"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrlConfig {
    /// Upper bound on any single ledger call.
    pub operation_timeout_ms: u64,
    /// Upper bound on waiting for a reveal signature.
    pub sign_timeout_ms: u64,
    /// Validity window announced in the reveal challenge.
    pub validity_days: u32,
    pub directory_mode: DirectoryMode,
    /// Attempts per directory append in conditional mode.
    pub max_retries: u32,
    pub success_hold_ms: u64,
    pub error_hold_ms: u64,
    /// Entries kept in the in-session activity log.
    pub activity_capacity: usize,
}

impl Default for SrlConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: 30_000,
            sign_timeout_ms: 120_000,
            validity_days: 30,
            directory_mode: DirectoryMode::LastWriteWins,
            max_retries: srl_ledger::DEFAULT_MAX_RETRIES,
            success_hold_ms: 2_000,
            error_hold_ms: 3_000,
            activity_capacity: 50,
        }
    }
}

impl SrlConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> SdkResult<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.operation_timeout_ms == 0 || self.sign_timeout_ms == 0 {
            return Err(SdkError::Config("timeouts must be greater than zero".into()));
        }
        if self.validity_days == 0 {
            return Err(SdkError::Config("validity_days must be at least 1".into()));
        }
        Ok(())
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            sign_timeout: Duration::from_millis(self.sign_timeout_ms),
        }
    }

    pub fn banner(&self) -> StatusBanner {
        StatusBanner::new(
            Duration::from_millis(self.success_hold_ms),
            Duration::from_millis(self.error_hold_ms),
        )
    }
}
