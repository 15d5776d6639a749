//! Speaker catalogs: the enumerated set of voices an engine accepts.

use crate::error::{NarratorError, NarratorResult};
use serde::{Deserialize, Serialize};

/// Gender classification for voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male voice
    Male,
    /// Female voice
    Female,
    /// Non-binary or neutral voice
    Neutral,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// One pre-trained voice inside an external engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Reference passed to the engine (e.g. `v2/en_speaker_6`, `af_bella`)
    pub id: String,
    /// Short description of the voice
    pub description: String,
    /// Voice gender, when the engine documents it
    pub gender: Option<Gender>,
}

impl Speaker {
    /// Create a new speaker
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            gender: None,
        }
    }

    /// Set the speaker description
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the speaker gender
    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }
}

/// Ordered set of valid speakers for one engine, with a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerCatalog {
    speakers: Vec<Speaker>,
    default_id: String,
}

impl SpeakerCatalog {
    /// Create a catalog. The default speaker is appended when it is not
    /// already part of `speakers`; duplicate ids keep their first entry.
    #[must_use]
    pub fn new(speakers: Vec<Speaker>, default: Speaker) -> Self {
        let mut unique: Vec<Speaker> = Vec::with_capacity(speakers.len() + 1);
        for speaker in speakers.into_iter().chain(std::iter::once(default.clone())) {
            if !unique.iter().any(|existing| existing.id == speaker.id) {
                unique.push(speaker);
            }
        }

        Self {
            speakers: unique,
            default_id: default.id,
        }
    }

    /// Check whether `speaker_id` belongs to the catalog
    #[must_use]
    pub fn contains(&self, speaker_id: &str) -> bool {
        self.speakers.iter().any(|speaker| speaker.id == speaker_id)
    }

    /// Get a speaker by id
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not in the catalog
    pub fn get(&self, speaker_id: &str) -> NarratorResult<&Speaker> {
        self.speakers
            .iter()
            .find(|speaker| speaker.id == speaker_id)
            .ok_or_else(|| NarratorError::invalid_input(format!("Speaker '{speaker_id}' not found")))
    }

    /// The engine's default speaker
    #[must_use]
    pub fn default_speaker(&self) -> &Speaker {
        self.speakers
            .iter()
            .find(|speaker| speaker.id == self.default_id)
            .unwrap_or(&self.speakers[0])
    }

    /// Check whether `speaker_id` is the default speaker
    #[must_use]
    pub fn is_default(&self, speaker_id: &str) -> bool {
        self.default_id == speaker_id
    }

    /// Speaker ids in catalog order
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.speakers.iter().map(|speaker| speaker.id.as_str()).collect()
    }

    /// Iterate over speakers in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Speaker> {
        self.speakers.iter()
    }

    /// Number of speakers
    #[must_use]
    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    /// Always false: a catalog holds at least its default speaker
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpeakerCatalog {
        SpeakerCatalog::new(
            vec![
                Speaker::new("alpha").with_gender(Gender::Female),
                Speaker::new("beta").with_gender(Gender::Male),
                Speaker::new("gamma"),
            ],
            Speaker::new("beta"),
        )
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::Female.to_string(), "Female");
        assert_eq!(Gender::Neutral.to_string(), "Neutral");
    }

    #[test]
    fn test_speaker_creation() {
        let speaker = Speaker::new("af_bella")
            .with_description("American female voice")
            .with_gender(Gender::Female);

        assert_eq!(speaker.id, "af_bella");
        assert_eq!(speaker.description, "American female voice");
        assert_eq!(speaker.gender, Some(Gender::Female));
    }

    #[test]
    fn test_catalog_contains_and_get() {
        let catalog = catalog();
        assert!(catalog.contains("alpha"));
        assert!(!catalog.contains("delta"));
        assert_eq!(catalog.get("gamma").unwrap().id, "gamma");
        assert!(catalog.get("delta").is_err());
    }

    #[test]
    fn test_catalog_default() {
        let catalog = catalog();
        assert_eq!(catalog.default_speaker().id, "beta");
        assert!(catalog.is_default("beta"));
        assert!(!catalog.is_default("alpha"));
    }

    #[test]
    fn test_catalog_appends_missing_default() {
        let catalog = SpeakerCatalog::new(vec![Speaker::new("one")], Speaker::new("two"));
        assert_eq!(catalog.ids(), vec!["one", "two"]);
        assert_eq!(catalog.default_speaker().id, "two");
    }

    #[test]
    fn test_catalog_deduplicates() {
        let catalog = SpeakerCatalog::new(
            vec![Speaker::new("one"), Speaker::new("one"), Speaker::new("two")],
            Speaker::new("one"),
        );
        assert_eq!(catalog.ids(), vec!["one", "two"]);
        assert_eq!(catalog.len(), 2);
    }
}
