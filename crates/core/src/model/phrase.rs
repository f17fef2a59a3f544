use serde::{Deserialize, Serialize};

/// An immutable source/translation pair.
///
/// Phrase sequences are loaded in full when a level opens and never mutated
/// for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    en: String,
    pt: String,
}

impl Phrase {
    #[must_use]
    pub fn new(en: impl Into<String>, pt: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            pt: pt.into(),
        }
    }

    /// The technical-English source text.
    #[must_use]
    pub fn en(&self) -> &str {
        &self.en
    }

    /// The translated text.
    #[must_use]
    pub fn pt(&self) -> &str {
        &self.pt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_deserializes_from_catalog_shape() {
        let phrase: Phrase =
            serde_json::from_str(r#"{"en":"Merge the branch","pt":"Faça o merge da branch"}"#)
                .unwrap();
        assert_eq!(phrase.en(), "Merge the branch");
        assert_eq!(phrase.pt(), "Faça o merge da branch");
    }
}
