//! Emotional styles and the per-engine style tables.

use crate::error::{NarratorError, NarratorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Emotional tone requested for a narration
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StyleId {
    /// Balanced, clear narration
    #[default]
    Neutral,
    /// Excited, energetic delivery
    Enthusiastic,
    /// Formal, authoritative tone
    Serious,
    /// Thoughtful, reflective with pauses
    Contemplative,
    /// Melancholic, sorrowful
    Sad,
    /// Very energetic, joyful
    Excited,
    /// Intense, forceful
    Angry,
}

impl StyleId {
    /// Every style, in presentation order
    pub const ALL: [Self; 7] = [
        Self::Neutral,
        Self::Enthusiastic,
        Self::Serious,
        Self::Contemplative,
        Self::Sad,
        Self::Excited,
        Self::Angry,
    ];

    /// Lowercase name used on the command line and in config files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Enthusiastic => "enthusiastic",
            Self::Serious => "serious",
            Self::Contemplative => "contemplative",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Angry => "angry",
        }
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleId {
    type Err = NarratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| NarratorError::invalid_input(format!("Unknown style '{s}'")))
    }
}

/// Synthesis parameters bound to one emotional style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Style this profile belongs to
    pub style: StyleId,
    /// Default speaker reference for the style
    pub speaker: String,
    /// Prosody marker placed before the text
    pub text_prefix: String,
    /// Prosody marker placed after the text
    pub text_suffix: String,
    /// Speech-rate multiplier (1.0 = normal speed)
    pub speed_multiplier: Option<f32>,
    /// Human-readable description of the delivery
    pub description: String,
}

impl StyleProfile {
    /// Create a profile with no markers and no rate change
    #[must_use]
    pub fn new(style: StyleId, speaker: &str) -> Self {
        Self {
            style,
            speaker: speaker.to_string(),
            text_prefix: String::new(),
            text_suffix: String::new(),
            speed_multiplier: None,
            description: String::new(),
        }
    }

    /// Set the prosody markers wrapped around the text
    #[must_use]
    pub fn with_markers(mut self, prefix: &str, suffix: &str) -> Self {
        self.text_prefix = prefix.to_string();
        self.text_suffix = suffix.to_string();
        self
    }

    /// Set the speech-rate multiplier
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed_multiplier = Some(speed);
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Wrap `text` in this profile's prosody markers
    #[must_use]
    pub fn decorate(&self, text: &str) -> String {
        format!("{}{}{}", self.text_prefix, text, self.text_suffix)
    }

    /// Validate profile configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the speaker is empty or the speed multiplier is
    /// outside 0.1 to 3.0
    pub fn validate(&self) -> NarratorResult<()> {
        if self.speaker.trim().is_empty() {
            return Err(NarratorError::invalid_input(format!(
                "Style '{}' has no speaker",
                self.style
            )));
        }

        if let Some(speed) = self.speed_multiplier {
            if !(0.1..=3.0).contains(&speed) {
                return Err(NarratorError::invalid_input(format!(
                    "Speed must be between 0.1 and 3.0, got {speed}"
                )));
            }
        }

        Ok(())
    }
}

/// Immutable mapping from style to profile for one engine
///
/// A `neutral` profile is always present; it is the fallback for any style
/// the table does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    profiles: HashMap<StyleId, StyleProfile>,
}

impl StyleTable {
    /// Start a table from its neutral profile
    #[must_use]
    pub fn new(neutral: StyleProfile) -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(StyleId::Neutral, StyleProfile { style: StyleId::Neutral, ..neutral });
        Self { profiles }
    }

    /// Add or replace the profile for `profile.style`
    #[must_use]
    pub fn with_profile(mut self, profile: StyleProfile) -> Self {
        self.profiles.insert(profile.style, profile);
        self
    }

    /// Look a style up by name
    #[must_use]
    pub fn get(&self, style_id: &str) -> Option<&StyleProfile> {
        style_id
            .parse::<StyleId>()
            .ok()
            .and_then(|style| self.profiles.get(&style))
    }

    /// Look a style up by id
    #[must_use]
    pub fn get_style(&self, style: StyleId) -> Option<&StyleProfile> {
        self.profiles.get(&style)
    }

    /// The neutral fallback profile
    #[must_use]
    pub fn neutral(&self) -> &StyleProfile {
        &self.profiles[&StyleId::Neutral]
    }

    /// Styles this table supports, in presentation order
    #[must_use]
    pub fn styles(&self) -> Vec<StyleId> {
        StyleId::ALL
            .into_iter()
            .filter(|style| self.profiles.contains_key(style))
            .collect()
    }

    /// Profiles in presentation order
    pub fn profiles(&self) -> impl Iterator<Item = &StyleProfile> {
        StyleId::ALL
            .into_iter()
            .filter_map(|style| self.profiles.get(&style))
    }

    /// Number of styles in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always false: the neutral profile is mandatory
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
