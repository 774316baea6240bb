//! Configuration for the parser pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How duplicate candidates for one event number are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPolicy {
    /// Count populated key fields
    #[default]
    FieldCount,
    /// Compare serialized JSON length
    SerializedSize,
}

/// Chunk size presets offered by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkPreset {
    /// 8000 characters
    Large,
    /// 5000 characters
    Medium,
    /// 3000 characters
    Small,
    /// 2000 characters
    VerySmall,
}

impl ChunkPreset {
    /// All presets, largest first
    pub const ALL: [ChunkPreset; 4] = [
        ChunkPreset::Large,
        ChunkPreset::Medium,
        ChunkPreset::Small,
        ChunkPreset::VerySmall,
    ];

    /// Chunk size in characters
    pub fn size(&self) -> usize {
        match self {
            ChunkPreset::Large => 8000,
            ChunkPreset::Medium => 5000,
            ChunkPreset::Small => 3000,
            ChunkPreset::VerySmall => 2000,
        }
    }

    /// Short label
    pub fn label(&self) -> &'static str {
        match self {
            ChunkPreset::Large => "large",
            ChunkPreset::Medium => "medium",
            ChunkPreset::Small => "small",
            ChunkPreset::VerySmall => "very-small",
        }
    }
}

impl fmt::Display for ChunkPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} chars)", self.label(), self.size())
    }
}

impl FromStr for ChunkPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "large" => Ok(ChunkPreset::Large),
            "medium" => Ok(ChunkPreset::Medium),
            "small" => Ok(ChunkPreset::Small),
            "very-small" | "very_small" | "verysmall" => Ok(ChunkPreset::VerySmall),
            other => Err(format!("Unknown chunk preset: {}", other)),
        }
    }
}

/// Configuration for [`crate::MeetParser`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Chunk window size (characters)
    pub chunk_size: usize,

    /// Fraction of each window shared with the next, in `[0, 1)`
    pub overlap_fraction: f64,

    /// Pause between consecutive remote extraction calls (milliseconds)
    pub chunk_delay_ms: u64,

    /// Maximum time for a single completion call (seconds)
    pub request_timeout_secs: u64,

    /// Only pages with an ordinal up to this limit may serve as context
    pub max_context_pages: Option<usize>,

    /// Duplicate arbitration
    pub scoring: ScoringPolicy,
}

impl ParserConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the inter-chunk delay as a Duration
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if !(0.0..1.0).contains(&self.overlap_fraction) {
            return Err(format!(
                "overlap_fraction must be in [0, 1), got {}",
                self.overlap_fraction
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_context_pages == Some(0) {
            return Err("max_context_pages must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    /// Use a preset chunk size, keeping everything else
    pub fn with_preset(mut self, preset: ChunkPreset) -> Self {
        self.chunk_size = preset.size();
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            chunk_size: ChunkPreset::VerySmall.size(),
            overlap_fraction: 0.10,
            chunk_delay_ms: 1000,
            request_timeout_secs: 120,
            max_context_pages: Some(3),
            scoring: ScoringPolicy::FieldCount,
        }
    }
}

impl ParserConfig {
    /// Fast preset: large windows, no inter-call pause
    pub fn fast() -> Self {
        Self {
            chunk_size: ChunkPreset::Large.size(),
            chunk_delay_ms: 0,
            request_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Careful preset: small windows, generous overlap and timeouts
    pub fn careful() -> Self {
        Self {
            chunk_size: ChunkPreset::VerySmall.size(),
            overlap_fraction: 0.20,
            chunk_delay_ms: 2000,
            request_timeout_secs: 300,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
