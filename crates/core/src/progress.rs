//! Percentage math for per-level and aggregate progress.
//!
//! Rounding is load-bearing: both percentages round half away from zero to
//! one decimal place, and display formatting drops the decimal when it is
//! exactly zero.

use serde::{Deserialize, Serialize};

use crate::model::{LEVEL_COUNT, LevelId};

/// Rounds half away from zero to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of a level covered after `seen` of `total` phrases.
///
/// Returns 0.0 for an empty sequence.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_complete(seen: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(seen as f64 / total as f64 * 100.0)
}

/// Formats a percentage, dropping the decimal when it is exactly zero.
#[must_use]
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Per-level completion percentages, always fully populated.
///
/// Absent fields in a stored record default to 0.0, so records written
/// before a level existed remain readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    #[serde(default)]
    iniciante: f64,
    #[serde(default)]
    basico: f64,
    #[serde(default)]
    intermedio: f64,
    #[serde(default)]
    avancado: f64,
    #[serde(default)]
    profissional: f64,
}

impl LevelProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, level: LevelId) -> f64 {
        match level {
            LevelId::Iniciante => self.iniciante,
            LevelId::Basico => self.basico,
            LevelId::Intermedio => self.intermedio,
            LevelId::Avancado => self.avancado,
            LevelId::Profissional => self.profissional,
        }
    }

    /// Records a percentage for a level, clamped into 0.0..=100.0.
    pub fn set(&mut self, level: LevelId, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        match level {
            LevelId::Iniciante => self.iniciante = percent,
            LevelId::Basico => self.basico = percent,
            LevelId::Intermedio => self.intermedio = percent,
            LevelId::Avancado => self.avancado = percent,
            LevelId::Profissional => self.profissional = percent,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        LevelId::ALL.into_iter().map(|level| self.get(level)).sum()
    }
}

/// Aggregate percentage across all five levels.
///
/// Always recomputable from `LevelProgress`; the stored aggregate is a
/// display cache, never the source of truth.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn total_percent(levels: &LevelProgress) -> f64 {
    round1(levels.sum() / (LEVEL_COUNT as f64 * 100.0) * 100.0)
}

/// Persisted cursor values used to continue a level across sessions.
///
/// Entries absent from a stored record imply 0. Values may be stale if a
/// phrase file changed length between sessions; callers clamp at level open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePositions {
    #[serde(default)]
    iniciante: usize,
    #[serde(default)]
    basico: usize,
    #[serde(default)]
    intermedio: usize,
    #[serde(default)]
    avancado: usize,
    #[serde(default)]
    profissional: usize,
}

impl ResumePositions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, level: LevelId) -> usize {
        match level {
            LevelId::Iniciante => self.iniciante,
            LevelId::Basico => self.basico,
            LevelId::Intermedio => self.intermedio,
            LevelId::Avancado => self.avancado,
            LevelId::Profissional => self.profissional,
        }
    }

    pub fn set(&mut self, level: LevelId, index: usize) {
        match level {
            LevelId::Iniciante => self.iniciante = index,
            LevelId::Basico => self.basico = index,
            LevelId::Intermedio => self.intermedio = index,
            LevelId::Avancado => self.avancado = index,
            LevelId::Profissional => self.profissional = index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round1(33.35), 33.4);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(12.34), 12.3);
    }

    #[test]
    fn percent_complete_matches_reading_sequence() {
        // 10-phrase level: after advancing to index 1, two phrases are seen.
        assert_eq!(percent_complete(2, 10), 20.0);
        assert_eq!(percent_complete(10, 10), 100.0);
        assert_eq!(percent_complete(1, 3), 33.3);
        assert_eq!(percent_complete(2, 3), 66.7);
    }

    #[test]
    fn percent_complete_of_empty_sequence_is_zero() {
        assert_eq!(percent_complete(0, 0), 0.0);
    }

    #[test]
    fn total_is_sum_over_five_hundred() {
        let mut levels = LevelProgress::new();
        levels.set(LevelId::Basico, 100.0);
        assert_eq!(total_percent(&levels), 20.0);

        levels.set(LevelId::Iniciante, 33.3);
        assert_eq!(total_percent(&levels), round1(133.3 / 5.0));
    }

    #[test]
    fn total_of_all_complete_is_one_hundred() {
        let mut levels = LevelProgress::new();
        for level in LevelId::ALL {
            levels.set(level, 100.0);
        }
        assert_eq!(total_percent(&levels), 100.0);
    }

    #[test]
    fn set_clamps_out_of_range_percentages() {
        let mut levels = LevelProgress::new();
        levels.set(LevelId::Avancado, 120.0);
        assert_eq!(levels.get(LevelId::Avancado), 100.0);
        levels.set(LevelId::Avancado, -5.0);
        assert_eq!(levels.get(LevelId::Avancado), 0.0);
    }

    #[test]
    fn format_drops_exact_zero_decimal() {
        assert_eq!(format_percent(20.0), "20");
        assert_eq!(format_percent(33.3), "33.3");
        assert_eq!(format_percent(0.0), "0");
    }

    #[test]
    fn absent_fields_default_to_zero() {
        let levels: LevelProgress = serde_json::from_str(r#"{"basico": 50.0}"#).unwrap();
        assert_eq!(levels.get(LevelId::Basico), 50.0);
        assert_eq!(levels.get(LevelId::Profissional), 0.0);

        let resume: ResumePositions = serde_json::from_str("{}").unwrap();
        assert_eq!(resume.get(LevelId::Iniciante), 0);
    }
}
