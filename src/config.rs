//! Game configuration. Defaults reproduce the classic board: four squares,
//! twenty steps to win, half-second cadence, lenient (non-strict) mistakes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of squares the board can lay out.
pub const MAX_SQUARES: u8 = 4;

/// Errors raised while building a [`SimonConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("square count must be between 1 and 4, got {0}")]
    SquareCount(u8),

    #[error("max steps must be at least 1")]
    ZeroMaxSteps,

    #[error("step duration must be at least 1 ms")]
    ZeroStep,

    #[error("{sequence} sequence references square {square}, board has {count}")]
    SquareOutOfRange {
        sequence: &'static str,
        square: u8,
        count: u8,
    },

    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Immutable game parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimonConfig {
    /// Cadence of target playback (ms). The pause between rounds is twice this.
    pub step_ms: u32,
    /// Cadence of the intro sequence played at boot (ms).
    pub intro_ms: u32,
    /// Cadence of the error pattern played after a mistake (ms).
    pub error_ms: u32,
    /// Cadence of the celebration pattern (ms).
    pub win_ms: u32,
    /// How long a single square stays lit (ms).
    pub flash_ms: u32,
    /// Sequence length the player must reproduce to win.
    pub max_steps: usize,
    /// End the game on the first mistake instead of replaying the round.
    pub strict_mode: bool,
    pub square_count: u8,
    pub intro_sequence: Vec<u8>,
    pub error_sequence: Vec<u8>,
    pub win_sequence: Vec<u8>,
}

impl Default for SimonConfig {
    fn default() -> Self {
        Self {
            step_ms: 500,
            intro_ms: 300,
            error_ms: 1,
            win_ms: 100,
            flash_ms: 400,
            max_steps: 20,
            strict_mode: false,
            square_count: MAX_SQUARES,
            intro_sequence: vec![0, 1, 2, 3],
            error_sequence: vec![0, 1, 2, 3],
            win_sequence: vec![0, 1, 2, 3, 0, 1, 2, 3],
        }
    }
}

impl SimonConfig {
    /// Check ranges and that every decorative sequence fits on the board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.square_count == 0 || self.square_count > MAX_SQUARES {
            return Err(ConfigError::SquareCount(self.square_count));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if self.step_ms == 0 {
            return Err(ConfigError::ZeroStep);
        }
        let sequences = [
            ("intro", &self.intro_sequence),
            ("error", &self.error_sequence),
            ("win", &self.win_sequence),
        ];
        for (name, seq) in sequences {
            if let Some(&square) = seq.iter().find(|&&s| s >= self.square_count) {
                return Err(ConfigError::SquareOutOfRange {
                    sequence: name,
                    square,
                    count: self.square_count,
                });
            }
        }
        Ok(())
    }

    /// Consume and return the config if it is valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validated()
    }

    /// Delay between a completed round and the next step being added.
    pub fn round_pause_ms(&self) -> u32 {
        self.step_ms.saturating_mul(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SimonConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_steps, 20);
        assert_eq!(cfg.round_pause_ms(), 1000);
        assert!(!cfg.strict_mode);
    }

    #[test]
    fn rejects_bad_square_count() {
        let cfg = SimonConfig { square_count: 5, ..SimonConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::SquareCount(5))));
        let cfg = SimonConfig { square_count: 0, ..SimonConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::SquareCount(0))));
    }

    #[test]
    fn rejects_zero_steps_and_zero_cadence() {
        let cfg = SimonConfig { max_steps: 0, ..SimonConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroMaxSteps)));
        let cfg = SimonConfig { step_ms: 0, ..SimonConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroStep)));
    }

    #[test]
    fn rejects_sequence_outside_board() {
        let cfg = SimonConfig {
            square_count: 2,
            intro_sequence: vec![0, 1],
            error_sequence: vec![1, 0],
            win_sequence: vec![0, 3],
            ..SimonConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::SquareOutOfRange { sequence, square, count }) => {
                assert_eq!(sequence, "win");
                assert_eq!(square, 3);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimonConfig::from_json(r#"{ "strict_mode": true, "max_steps": 5 }"#).unwrap();
        assert!(cfg.strict_mode);
        assert_eq!(cfg.max_steps, 5);
        assert_eq!(cfg.step_ms, 500);
        assert_eq!(cfg.win_sequence.len(), 8);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_is_validated() {
        let err = SimonConfig::from_json(r#"{ "max_steps": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxSteps));
        let err = SimonConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid config JSON"));
    }
}
