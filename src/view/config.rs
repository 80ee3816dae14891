//! View configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default animation time per visual line (250 ms).
pub const DEFAULT_MILLIS_PER_LINE: u64 = 250;

/// Default address label for slots whose player has no connected client.
pub const DEFAULT_MISSING_ADDRESS: &str = "missing";

/// Tunables for the lobby view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Enter/exit animation time for one line of content
    pub millis_per_line: u64,

    /// Address shown in a slot tooltip when the player is disconnected
    pub missing_address: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            millis_per_line: DEFAULT_MILLIS_PER_LINE,
            missing_address: DEFAULT_MISSING_ADDRESS.to_string(),
        }
    }
}

impl ViewConfig {
    /// Load from JSON. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Animation duration for a node spanning `lines` lines.
    pub fn duration_for(&self, lines: usize) -> Duration {
        Duration::from_millis(self.millis_per_line.saturating_mul(lines as u64))
    }
}
