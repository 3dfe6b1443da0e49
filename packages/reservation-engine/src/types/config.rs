//! Configuration types for normalization, assembly and matching.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EngineError;
use crate::types::codes::Estado;

/// Minimum score a candidate must strictly exceed to be selected.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 30.0;

/// Confidence assigned when the extraction carries none.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Options shared by every field normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Read `NN/NN/YYYY` as day/month when both components are ≤ 12.
    ///
    /// Dates where one component exceeds 12 are never ambiguous and ignore
    /// this flag. Default: true (day-first).
    pub prefer_day_first: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            prefer_day_first: true,
        }
    }
}

impl NormalizeOptions {
    /// Month-first reading of ambiguous slash dates.
    pub fn month_first() -> Self {
        Self {
            prefer_day_first: false,
        }
    }
}

/// Configuration for building a canonical reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Field normalization options.
    #[serde(default)]
    pub normalize: NormalizeOptions,

    /// Estado applied to details whose own estado is missing or invalid.
    ///
    /// Default: None (the estado stays empty).
    #[serde(default)]
    pub default_estado: Option<Estado>,

    /// Confidence used when the extraction has none. Default: 0.5.
    pub default_confidence: f64,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            default_estado: None,
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }
}

/// What the caller should do when no candidate clears the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Pick the first row of the candidate list.
    #[default]
    FirstRow,

    /// Select nothing; the caller aborts the step.
    Abort,
}

impl FromStr for FallbackPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_row" | "first" => Ok(Self::FirstRow),
            "abort" | "none" => Ok(Self::Abort),
            _ => Err(EngineError::InvalidConfig {
                key: "fallback_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for candidate selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// A candidate is only selected when its score is strictly above this.
    ///
    /// Scores range 0-100. Default: 30.
    pub threshold: f64,

    /// Policy applied by `resolve_match` when nothing clears the threshold.
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl MatcherConfig {
    /// Set the selection threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub assembly: AssemblyConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl EngineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how ambiguous slash dates are read.
    pub fn with_prefer_day_first(mut self, day_first: bool) -> Self {
        self.assembly.normalize.prefer_day_first = day_first;
        self
    }

    /// Set the estado applied to details without a valid one.
    pub fn with_default_estado(mut self, estado: Option<Estado>) -> Self {
        self.assembly.default_estado = estado;
        self
    }

    /// Set the matcher threshold.
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.matcher.threshold = threshold;
        self
    }

    /// Set the matcher fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.matcher.fallback = fallback;
        self
    }

    /// Normalization options in effect.
    pub fn normalize(&self) -> NormalizeOptions {
        self.assembly.normalize
    }
}
