//! Core data models for SoulSync
//!
//! These models are used throughout the pipeline for representing
//! user profiles and prediction results.

use serde::{Deserialize, Serialize};

/// A dating profile as submitted by the caller.
///
/// Numeric trait fields are caller-supplied and not range-checked here;
/// range enforcement, if any, belongs to the outer service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: u32,
    pub gender: String,
    pub location: String,

    /// Big Five traits, 0-10 scale
    pub openness: f64,
    pub extroversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub conscientiousness: f64,

    /// Love-language scores, 0-5 scale
    pub words_of_affirmation: f64,
    pub quality_time: f64,
    pub gifts: f64,
    pub physical_touch: f64,
    pub acts_of_service: f64,

    // Interest flags
    pub likes_music: bool,
    pub likes_travel: bool,
    pub likes_pets: bool,
    pub foodie: bool,
    pub gym_person: bool,
    pub movie_lover: bool,
    pub gamer: bool,
    pub reader: bool,
    pub night_owl: bool,
    pub early_bird: bool,

    // Categorical fields, encoded via the mapping table
    pub zodiac_sign: String,
    pub relationship_goal: String,
    pub fav_music_genre: String,

    /// Free-text bio, scored for sentiment
    pub bio_text: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 18,
            gender: "Other".to_string(),
            location: "Unknown".to_string(),
            openness: 5.0,
            extroversion: 5.0,
            agreeableness: 5.0,
            neuroticism: 5.0,
            conscientiousness: 5.0,
            words_of_affirmation: 5.0,
            quality_time: 5.0,
            gifts: 5.0,
            physical_touch: 5.0,
            acts_of_service: 5.0,
            likes_music: false,
            likes_travel: false,
            likes_pets: false,
            foodie: false,
            gym_person: false,
            movie_lover: false,
            gamer: false,
            reader: false,
            night_owl: false,
            early_bird: false,
            zodiac_sign: "Unknown".to_string(),
            relationship_goal: "Unknown".to_string(),
            fav_music_genre: "Pop".to_string(),
            bio_text: String::new(),
        }
    }
}

/// Tier for a personality flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagTier {
    Green,
    Beige,
    Red,
}

impl std::fmt::Display for FlagTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagTier::Green => write!(f, "green"),
            FlagTier::Beige => write!(f, "beige"),
            FlagTier::Red => write!(f, "red"),
        }
    }
}

/// A short heuristic personality highlight or warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub tier: FlagTier,
    pub text: String,
}

/// A milestone in the projected relationship timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub time: String,
    pub event: String,
}

/// Sub-trait summary scores, each on a 0-100 scale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDetails {
    pub personality_strength: f64,
    pub love_style_intensity: f64,
    pub lifestyle_match: f64,
}

/// Full result of running a profile through the prediction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Model probability (x100) that a conversation succeeds
    pub compatibility_score: f64,
    /// Complement of the compatibility score (x100)
    pub ghosting_probability: f64,
    /// Raw success probability from the model, 0.0..1.0
    pub conversation_success: f64,
    pub bio_feedback: String,
    /// Hand-tuned heuristic on a 0-100 scale, not model-derived
    pub safety_score: f64,
    pub match_details: MatchDetails,
    pub icebreakers: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub flags: Vec<Flag>,
    /// RFC 3339 timestamp of when the prediction was generated
    pub generated_at: String,
}
