//! Summary generation limits

use serde::Deserialize;

use super::error::ValidationError;

/// Character budgets and chunking for summaries.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// Budget used when a request gives no `max_chars`.
    #[serde(default = "default_max_chars")]
    pub default_max_chars: usize,

    /// Smallest budget a request may ask for.
    #[serde(default = "default_min_allowed")]
    pub min_max_chars: usize,

    /// Largest budget a request may ask for.
    #[serde(default = "default_max_allowed")]
    pub max_max_chars: usize,

    /// Analyses estimated above this many tokens are split into chunks.
    #[serde(default = "default_chunk_tokens")]
    pub chunk_max_tokens: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_max_chars == 0
            || self.min_max_chars > self.default_max_chars
            || self.default_max_chars > self.max_max_chars
        {
            return Err(ValidationError::InvalidSummaryLimits);
        }
        if self.chunk_max_tokens == 0 {
            return Err(ValidationError::InvalidChunkBudget);
        }
        Ok(())
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            default_max_chars: default_max_chars(),
            min_max_chars: default_min_allowed(),
            max_max_chars: default_max_allowed(),
            chunk_max_tokens: default_chunk_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_max_chars() -> usize {
    8_000
}

fn default_min_allowed() -> usize {
    500
}

fn default_max_allowed() -> usize {
    50_000
}

fn default_chunk_tokens() -> usize {
    12_000
}

fn default_temperature() -> f32 {
    0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults_are_valid() {
        let config = SummaryConfig::default();
        assert_eq!(config.default_max_chars, 8_000);
        assert_eq!((config.min_max_chars, config.max_max_chars), (500, 50_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_outside_range_is_rejected() {
        let config = SummaryConfig {
            default_max_chars: 100,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSummaryLimits));
    }

    #[test]
    fn test_zero_chunk_budget_is_rejected() {
        let config = SummaryConfig {
            chunk_max_tokens: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidChunkBudget));
    }
}
