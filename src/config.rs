use serde::{Deserialize, Serialize};

use crate::codec::Mode;
use crate::CartpackError;

/// Chain entries the greedy encoder inspects per match search.
pub const DEFAULT_SEARCH_DEPTH: usize = 32;

/// Runtime configuration for the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoder used by [`compress_with`](crate::compress_with).
    pub mode: Mode,
    /// Maximum hash-chain entries walked per position in [`Mode::Fast`].
    pub search_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Optimal,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl Config {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, CartpackError> {
        let config: Config =
            serde_json::from_str(text).map_err(|e| CartpackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CartpackError> {
        if self.search_depth == 0 {
            return Err(CartpackError::Config(
                "search_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
