use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the reveal ceremony. The validity window announced in
/// the challenge belongs to the [`crate::SessionContext`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Maximum time to wait for the wallet to sign.
    pub sign_timeout: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            sign_timeout: Duration::from_secs(120),
        }
    }
}
