use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of recorded activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Running,
    Cycling,
    Walking,
    Swimming,
    Hiking,
    Yoga,
    Gym,
    Crossfit,
    #[default]
    Other,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActivityType {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "running" => Some(Self::Running),
            "cycling" => Some(Self::Cycling),
            "walking" => Some(Self::Walking),
            "swimming" => Some(Self::Swimming),
            "hiking" => Some(Self::Hiking),
            "yoga" => Some(Self::Yoga),
            "gym" => Some(Self::Gym),
            "crossfit" => Some(Self::Crossfit),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Walking => "walking",
            Self::Swimming => "swimming",
            Self::Hiking => "hiking",
            Self::Yoga => "yoga",
            Self::Gym => "gym",
            Self::Crossfit => "crossfit",
            Self::Other => "other",
        }
    }
}
