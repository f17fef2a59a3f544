//! Static phrase catalogs, one per level.
//!
//! Phrase files ship inside the binary and are treated as a read-only lookup
//! table for the lifetime of the process.

use devenglish_core::model::{LevelId, Phrase};

use crate::error::ContentError;

/// Source of a level's ordered phrase sequence.
///
/// A trait so tests can substitute fixed sequences for the shipped catalogs.
pub trait PhraseSource: Send + Sync {
    /// Load the full phrase sequence for a level.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the phrase data is missing or corrupt.
    fn phrases(&self, level: LevelId) -> Result<Vec<Phrase>, ContentError>;
}

const PHRASES_INICIANTE: &str = include_str!("../assets/phrases_iniciante.json");
const PHRASES_BASICO: &str = include_str!("../assets/phrases_basico.json");
const PHRASES_INTERMEDIO: &str = include_str!("../assets/phrases_intermedio.json");
const PHRASES_AVANCADO: &str = include_str!("../assets/phrases_avancado.json");
const PHRASES_PROFISSIONAL: &str = include_str!("../assets/phrases_profissional.json");

/// The phrase catalogs embedded in the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl EmbeddedCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn raw(level: LevelId) -> &'static str {
        match level {
            LevelId::Iniciante => PHRASES_INICIANTE,
            LevelId::Basico => PHRASES_BASICO,
            LevelId::Intermedio => PHRASES_INTERMEDIO,
            LevelId::Avancado => PHRASES_AVANCADO,
            LevelId::Profissional => PHRASES_PROFISSIONAL,
        }
    }
}

impl PhraseSource for EmbeddedCatalog {
    fn phrases(&self, level: LevelId) -> Result<Vec<Phrase>, ContentError> {
        serde_json::from_str(Self::raw(level))
            .map_err(|source| ContentError::Parse { level, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_catalog_parses() {
        let catalog = EmbeddedCatalog::new();
        for level in LevelId::ALL {
            let phrases = catalog.phrases(level).unwrap();
            assert!(!phrases.is_empty(), "{level} catalog is empty");
        }
    }

    #[test]
    fn catalogs_keep_their_order_between_loads() {
        let catalog = EmbeddedCatalog::new();
        let first = catalog.phrases(LevelId::Basico).unwrap();
        let second = catalog.phrases(LevelId::Basico).unwrap();
        assert_eq!(first, second);
    }
}
