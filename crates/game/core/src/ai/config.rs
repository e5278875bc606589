use crate::combat::VarianceMode;

/// Tuning for the AI evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    /// Variance used when simulating damage. `Random` also enables jitter.
    pub variance: VarianceMode,
    /// Score every candidate starts from.
    pub base_score: i32,
    /// Upper bound (inclusive) of the random jitter added in `Random` mode.
    pub jitter: i32,
}

impl AiConfig {
    pub fn with_variance(mut self, variance: VarianceMode) -> Self {
        self.variance = variance;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            variance: VarianceMode::Median,
            base_score: 1,
            jitter: 3,
        }
    }
}
