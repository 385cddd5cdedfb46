//! Frozen 37-column feature schema and vector builder
//!
//! The classifier was trained against a fixed 37-column schema. Reordering
//! or omitting a column silently corrupts inference (the model only sees a
//! flat numeric vector), so the schema lives in exactly one place here:
//! `RawFeatures` carries named fields and `ordered()` is the single
//! ordering authority.
//!
//! Column groups:
//!   0..3   - demographics (age, encoded gender, encoded location)
//!   3..8   - Big Five traits
//!   8..13  - love-language scores
//!  13..23  - interest flags as 0/1
//!  23..26  - encoded categoricals (zodiac, relationship goal, music genre)
//!  26..28  - bio (text slot fixed to 0, derived sentiment)
//!  28..34  - behavioral columns imputed with the reference mean
//!  34..37  - training-time target columns imputed with the reference mean

use crate::config::{CategoryMappings, FeatureStats};
use crate::models::UserProfile;
use crate::predictor::sentiment::analyze_bio;

/// Number of columns in the frozen model schema.
pub const NUM_FEATURES: usize = 37;

/// Column names in the exact order the model was trained on.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "age",
    "gender",
    "location",
    "openness",
    "extroversion",
    "agreeableness",
    "neuroticism",
    "conscientiousness",
    "words_of_affirmation",
    "quality_time",
    "gifts",
    "physical_touch",
    "acts_of_service",
    "likes_music",
    "likes_travel",
    "likes_pets",
    "foodie",
    "gym_person",
    "movie_lover",
    "gamer",
    "reader",
    "night_owl",
    "early_bird",
    "zodiac_sign",
    "relationship_goal",
    "fav_music_genre",
    "bio_text",
    "bio_sentiment",
    "humor_score",
    "confidence_score",
    "reply_time_avg",
    "msg_length_avg",
    "sentiment_chat",
    "engagement_rate",
    "compatibility_score",
    "ghosting_probability",
    "toxicity_label",
];

/// Behavioral and target columns that cannot be observed at prediction time.
/// Imputed with the reference-dataset column mean so the model sees a
/// neutral value rather than an arbitrary one.
pub const IMPUTED_COLUMNS: [&str; 9] = [
    "humor_score",
    "confidence_score",
    "reply_time_avg",
    "msg_length_avg",
    "sentiment_chat",
    "engagement_rate",
    "compatibility_score",
    "ghosting_probability",
    "toxicity_label",
];

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Fully assembled, scaled 37-column vector ready for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: [f64; NUM_FEATURES],
}

impl FeatureVector {
    /// Create from a fixed-size array.
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self { values }
    }

    /// Return as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Named-field view of the schema, pre-scaling.
///
/// Field names and `ordered()` positions must stay in lockstep with
/// `FEATURE_NAMES`.
#[derive(Debug, Clone, Default)]
pub struct RawFeatures {
    pub age: f64,
    pub gender: f64,
    pub location: f64,
    pub openness: f64,
    pub extroversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub conscientiousness: f64,
    pub words_of_affirmation: f64,
    pub quality_time: f64,
    pub gifts: f64,
    pub physical_touch: f64,
    pub acts_of_service: f64,
    pub likes_music: f64,
    pub likes_travel: f64,
    pub likes_pets: f64,
    pub foodie: f64,
    pub gym_person: f64,
    pub movie_lover: f64,
    pub gamer: f64,
    pub reader: f64,
    pub night_owl: f64,
    pub early_bird: f64,
    pub zodiac_sign: f64,
    pub relationship_goal: f64,
    pub fav_music_genre: f64,
    pub bio_text: f64,
    pub bio_sentiment: f64,
    pub humor_score: f64,
    pub confidence_score: f64,
    pub reply_time_avg: f64,
    pub msg_length_avg: f64,
    pub sentiment_chat: f64,
    pub engagement_rate: f64,
    pub compatibility_score: f64,
    pub ghosting_probability: f64,
    pub toxicity_label: f64,
}

#[inline]
fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl RawFeatures {
    /// Encode a profile into the schema's named fields.
    ///
    /// Categoricals go through the mapping table (exact match, then
    /// case-insensitive, then 0). The bio text slot is fixed to 0 because
    /// exact text matching against training data is infeasible; its
    /// informational content is carried by the derived sentiment instead.
    /// Columns unobservable at prediction time take the reference mean.
    pub fn from_profile(
        profile: &UserProfile,
        mappings: &CategoryMappings,
        stats: &FeatureStats,
    ) -> Self {
        Self {
            age: f64::from(profile.age),
            gender: mappings.encode("gender", &profile.gender) as f64,
            location: mappings.encode("location", &profile.location) as f64,
            openness: profile.openness,
            extroversion: profile.extroversion,
            agreeableness: profile.agreeableness,
            neuroticism: profile.neuroticism,
            conscientiousness: profile.conscientiousness,
            words_of_affirmation: profile.words_of_affirmation,
            quality_time: profile.quality_time,
            gifts: profile.gifts,
            physical_touch: profile.physical_touch,
            acts_of_service: profile.acts_of_service,
            likes_music: flag(profile.likes_music),
            likes_travel: flag(profile.likes_travel),
            likes_pets: flag(profile.likes_pets),
            foodie: flag(profile.foodie),
            gym_person: flag(profile.gym_person),
            movie_lover: flag(profile.movie_lover),
            gamer: flag(profile.gamer),
            reader: flag(profile.reader),
            night_owl: flag(profile.night_owl),
            early_bird: flag(profile.early_bird),
            zodiac_sign: mappings.encode("zodiac_sign", &profile.zodiac_sign) as f64,
            relationship_goal: mappings.encode("relationship_goal", &profile.relationship_goal)
                as f64,
            fav_music_genre: mappings.encode("fav_music_genre", &profile.fav_music_genre) as f64,
            bio_text: 0.0,
            bio_sentiment: analyze_bio(&profile.bio_text),
            humor_score: stats.mean("humor_score"),
            confidence_score: stats.mean("confidence_score"),
            reply_time_avg: stats.mean("reply_time_avg"),
            msg_length_avg: stats.mean("msg_length_avg"),
            sentiment_chat: stats.mean("sentiment_chat"),
            engagement_rate: stats.mean("engagement_rate"),
            compatibility_score: stats.mean("compatibility_score"),
            ghosting_probability: stats.mean("ghosting_probability"),
            toxicity_label: stats.mean("toxicity_label"),
        }
    }

    /// The single ordering authority for the frozen schema.
    ///
    /// Positions must match `FEATURE_NAMES` exactly.
    pub fn ordered(&self) -> [f64; NUM_FEATURES] {
        [
            self.age,
            self.gender,
            self.location,
            self.openness,
            self.extroversion,
            self.agreeableness,
            self.neuroticism,
            self.conscientiousness,
            self.words_of_affirmation,
            self.quality_time,
            self.gifts,
            self.physical_touch,
            self.acts_of_service,
            self.likes_music,
            self.likes_travel,
            self.likes_pets,
            self.foodie,
            self.gym_person,
            self.movie_lover,
            self.gamer,
            self.reader,
            self.night_owl,
            self.early_bird,
            self.zodiac_sign,
            self.relationship_goal,
            self.fav_music_genre,
            self.bio_text,
            self.bio_sentiment,
            self.humor_score,
            self.confidence_score,
            self.reply_time_avg,
            self.msg_length_avg,
            self.sentiment_chat,
            self.engagement_rate,
            self.compatibility_score,
            self.ghosting_probability,
            self.toxicity_label,
        ]
    }

    /// Z-score every column present in the statistics table, in schema
    /// order. Columns without statistics pass through unchanged.
    pub fn scaled(&self, stats: &FeatureStats) -> FeatureVector {
        let mut values = self.ordered();
        for (value, name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            *value = stats.scale(name, *value);
        }
        FeatureVector::new(values)
    }
}

/// Assemble the scaled feature vector for a profile.
///
/// Pure and deterministic given the two static tables.
pub fn build_feature_vector(
    profile: &UserProfile,
    mappings: &CategoryMappings,
    stats: &FeatureStats,
) -> FeatureVector {
    RawFeatures::from_profile(profile, mappings, stats).scaled(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_mappings() -> CategoryMappings {
        let mut gender = HashMap::new();
        gender.insert("Male".to_string(), 1);
        gender.insert("Female".to_string(), 2);

        let mut zodiac = HashMap::new();
        zodiac.insert("Scorpio".to_string(), 8);

        let mut columns = HashMap::new();
        columns.insert("gender".to_string(), gender);
        columns.insert("zodiac_sign".to_string(), zodiac);
        CategoryMappings::from_columns(columns)
    }

    #[test]
    fn test_schema_has_37_columns() {
        assert_eq!(FEATURE_NAMES.len(), NUM_FEATURES);
        assert_eq!(RawFeatures::default().ordered().len(), NUM_FEATURES);
    }

    #[test]
    fn test_ordered_positions_match_names() {
        // Spot-check the ordering authority against known schema positions.
        let raw = RawFeatures {
            age: 1.0,
            gender: 2.0,
            conscientiousness: 3.0,
            bio_text: 4.0,
            bio_sentiment: 5.0,
            toxicity_label: 6.0,
            ..Default::default()
        };

        let ordered = raw.ordered();
        assert_eq!(ordered[0], 1.0);
        assert_eq!(FEATURE_NAMES[0], "age");
        assert_eq!(ordered[1], 2.0);
        assert_eq!(FEATURE_NAMES[1], "gender");
        assert_eq!(ordered[7], 3.0);
        assert_eq!(FEATURE_NAMES[7], "conscientiousness");
        assert_eq!(ordered[26], 4.0);
        assert_eq!(FEATURE_NAMES[26], "bio_text");
        assert_eq!(ordered[27], 5.0);
        assert_eq!(FEATURE_NAMES[27], "bio_sentiment");
        assert_eq!(ordered[36], 6.0);
        assert_eq!(FEATURE_NAMES[36], "toxicity_label");
    }

    #[test]
    fn test_categorical_encoding_and_unknown_fallback() {
        let mappings = sample_mappings();
        let stats = FeatureStats::empty();
        let profile = UserProfile {
            gender: "Female".to_string(),
            zodiac_sign: "Scorpio".to_string(),
            location: "Atlantis".to_string(),
            ..UserProfile::default()
        };

        let raw = RawFeatures::from_profile(&profile, &mappings, &stats);
        assert_eq!(raw.gender, 2.0);
        assert_eq!(raw.zodiac_sign, 8.0);
        // No location mapping loaded -> unknown encodes to 0
        assert_eq!(raw.location, 0.0);
    }

    #[test]
    fn test_bio_text_slot_fixed_to_zero() {
        let profile = UserProfile {
            bio_text: "I love long walks".to_string(),
            ..UserProfile::default()
        };
        let raw =
            RawFeatures::from_profile(&profile, &CategoryMappings::empty(), &FeatureStats::empty());
        assert_eq!(raw.bio_text, 0.0);
        assert!(raw.bio_sentiment > 0.0);
    }

    #[test]
    fn test_imputed_columns_scale_to_zero() {
        // When a column is imputed with its own mean, scaling it yields
        // exactly (mean - mean) / std = 0.
        let stats = FeatureStats::from_pairs(vec![
            ("humor_score".to_string(), 6.5, 2.0),
            ("engagement_rate".to_string(), 0.4, 0.1),
        ]);
        let vector = build_feature_vector(
            &UserProfile::default(),
            &CategoryMappings::empty(),
            &stats,
        );

        let humor_idx = FEATURE_NAMES.iter().position(|&n| n == "humor_score").unwrap();
        let engagement_idx = FEATURE_NAMES
            .iter()
            .position(|&n| n == "engagement_rate")
            .unwrap();
        assert!(vector.values[humor_idx].abs() < 1e-9);
        assert!(vector.values[engagement_idx].abs() < 1e-9);
    }

    #[test]
    fn test_scaling_applies_to_listed_columns_only() {
        let stats = FeatureStats::from_pairs(vec![("age".to_string(), 30.0, 10.0)]);
        let profile = UserProfile {
            age: 40,
            openness: 7.0,
            ..UserProfile::default()
        };
        let vector = build_feature_vector(&profile, &CategoryMappings::empty(), &stats);

        // age z-scored: (40 - 30) / 10
        assert!((vector.values[0] - 1.0).abs() < 1e-9);
        // openness has no stats entry and passes through unscaled
        assert!((vector.values[3] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_is_deterministic() {
        let mappings = sample_mappings();
        let stats = FeatureStats::from_pairs(vec![("age".to_string(), 25.0, 5.0)]);
        let profile = UserProfile {
            age: 28,
            gender: "Male".to_string(),
            bio_text: "Happy and outgoing, love travel".to_string(),
            likes_travel: true,
            ..UserProfile::default()
        };

        let a = build_feature_vector(&profile, &mappings, &stats);
        let b = build_feature_vector(&profile, &mappings, &stats);
        assert_eq!(a, b);
    }
}
