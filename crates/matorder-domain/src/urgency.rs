//! Urgency module - the closed priority scale for material requests

use serde::{Deserialize, Serialize};
use std::fmt;

/// How soon the requested material is needed
///
/// Only these three values are ever emitted; anything else the model
/// invents is mapped to "no urgency stated" (`None` on the record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// No time pressure
    Low,

    /// Needed within a stated timeframe
    Medium,

    /// Needed immediately ("asap", "urgent")
    High,
}

impl Urgency {
    /// All values in ascending order
    pub const ALL: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }

    /// Parse an urgency, ignoring case and surrounding whitespace
    ///
    /// The match is exact otherwise: `"urgent"` or `"high!"` are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            _ => None,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid urgency: {}", s))
    }
}
