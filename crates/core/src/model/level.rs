use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five fixed difficulty tiers, ordered easiest first.
///
/// The set is closed: levels are not user-extensible, and the serialized
/// identifiers double as storage-record keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelId {
    Iniciante,
    Basico,
    Intermedio,
    Avancado,
    Profissional,
}

/// Number of difficulty tiers. Progress math relies on this being fixed.
pub const LEVEL_COUNT: usize = 5;

impl LevelId {
    /// All levels in difficulty order.
    pub const ALL: [LevelId; LEVEL_COUNT] = [
        LevelId::Iniciante,
        LevelId::Basico,
        LevelId::Intermedio,
        LevelId::Avancado,
        LevelId::Profissional,
    ];

    /// Stable identifier used in storage records and phrase file lookup.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LevelId::Iniciante => "iniciante",
            LevelId::Basico => "basico",
            LevelId::Intermedio => "intermedio",
            LevelId::Avancado => "avancado",
            LevelId::Profissional => "profissional",
        }
    }

    /// Human-readable name for level selection.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            LevelId::Iniciante => "Iniciante",
            LevelId::Basico => "Básico",
            LevelId::Intermedio => "Intermediário",
            LevelId::Avancado => "Avançado",
            LevelId::Profissional => "Profissional",
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for parsing a `LevelId` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    raw: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level: {}", self.raw)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LevelId {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LevelId::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseLevelError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_difficulty() {
        assert!(LevelId::Iniciante < LevelId::Basico);
        assert!(LevelId::Avancado < LevelId::Profissional);
    }

    #[test]
    fn level_roundtrips_through_str() {
        for level in LevelId::ALL {
            let parsed: LevelId = level.as_str().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn unknown_level_fails_to_parse() {
        assert!("expert".parse::<LevelId>().is_err());
    }
}
