//! Heuristic post-processing of raw model output
//!
//! Derives the full prediction from the raw success probability and the
//! original profile: compatibility/ghosting scores, a clamped safety score,
//! sub-trait averages, icebreakers, personality flags, and a projected
//! relationship timeline.
//!
//! The icebreaker, flag, and timeline chains are ordered (predicate, output)
//! tables evaluated top to bottom; tie-break order is part of the contract.
//! Score constants are hand-tuned values, not learned ones.

use crate::models::{Flag, FlagTier, MatchDetails, Prediction, TimelineEntry, UserProfile};
use crate::predictor::model::ProbabilityPair;
use crate::predictor::sentiment::analyze_bio;

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Interest-triggered icebreaker candidates, evaluated in order.
const ICEBREAKER_RULES: &[(fn(&UserProfile) -> bool, &str)] = &[
    (
        |p| p.likes_music,
        "I see you like music! What's the best concert you've ever been to?",
    ),
    (
        |p| p.likes_travel,
        "If you could teleport anywhere right now, where would you go?",
    ),
    (|p| p.foodie, "What's your absolute comfort food?"),
    (
        |p| p.gamer,
        "Console or PC? (Careful, there's a right answer)",
    ),
    (
        |p| p.reader,
        "What's the last book that kept you up all night?",
    ),
];

/// Fallback when no interest flag matches.
const GENERIC_ICEBREAKER: &str = "What's the most spontaneous thing you've done recently?";

const MAX_ICEBREAKERS: usize = 3;

/// Flag rules in green -> beige -> red scan order. Predicates see the
/// profile and the derived ghosting probability (0-100 scale).
const FLAG_RULES: &[(FlagTier, fn(&UserProfile, f64) -> bool, &str)] = &[
    (
        FlagTier::Green,
        |p, _| p.conscientiousness > 7.0,
        "Replies fast",
    ),
    (FlagTier::Green, |p, _| p.openness > 7.0, "Adventurous"),
    (
        FlagTier::Green,
        |p, _| p.agreeableness > 7.0,
        "Walking Therapist",
    ),
    (FlagTier::Beige, |p, _| p.gym_person, "Protein obsession"),
    (FlagTier::Beige, |p, _| p.gamer, "Gamer Rage potential"),
    (
        FlagTier::Beige,
        |p, _| p.zodiac_sign == "Scorpio",
        "Mysterious AF",
    ),
    (FlagTier::Beige, |p, _| p.foodie, "Food > You"),
    (
        FlagTier::Red,
        |p, _| p.neuroticism > 8.0,
        "Overthinks everything",
    ),
    (FlagTier::Red, |_, ghosting| ghosting > 60.0, "Ghosting Risk"),
];

const MAX_FLAGS: usize = 4;

/// Per-milestone narrative rules; first matching condition wins.
const MONTH_ONE_RULES: &[(fn(&UserProfile) -> bool, &str)] = &[
    (|p| p.foodie, "Exploring the city's hidden food gems"),
    (|p| p.gamer, "Co-op gaming marathon"),
    (|p| p.likes_music, "First concert date together"),
];
const MONTH_ONE_DEFAULT: &str = "Late night drive & deep talks";

const MONTH_SIX_RULES: &[(fn(&UserProfile) -> bool, &str)] = &[
    (|p| p.likes_travel, "First weekend getaway trip"),
    (|p| p.likes_pets, "Adopted a stray cat together"),
];
const MONTH_SIX_DEFAULT: &str = "Meeting the best friends";

const YEAR_ONE_RULES: &[(fn(&UserProfile) -> bool, &str)] = &[
    (|p| p.relationship_goal == "Long-term", "Moving in together?"),
    (|p| p.relationship_goal == "Marriage", "The 'Talk' happens"),
];
const YEAR_ONE_DEFAULT: &str = "Still vibing (surprisingly)";

const POSITIVE_BIO_FEEDBACK: &str = "Great bio!";
const NEGATIVE_BIO_FEEDBACK: &str = "Consider making your bio more positive.";

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Derive the full prediction from the profile and raw class probabilities.
///
/// Single-pass: no retries, no partial results. The bio sentiment is
/// recomputed here so the function needs no access to the intermediate
/// feature vector.
pub fn post_process(profile: &UserProfile, probabilities: ProbabilityPair) -> Prediction {
    let success = probabilities.success;
    let compatibility_score = success * 100.0;
    let ghosting_probability = (1.0 - success) * 100.0;

    let bio_sentiment = analyze_bio(&profile.bio_text);

    // Hand-tuned: agreeable, conscientious profiles with a positive bio
    // read as safer.
    let safety_score = (50.0
        + profile.agreeableness * 3.0
        + profile.conscientiousness * 3.0
        + bio_sentiment * 10.0)
        .clamp(0.0, 100.0);

    let match_details = MatchDetails {
        personality_strength: mean(&[
            profile.openness,
            profile.extroversion,
            profile.agreeableness,
            profile.neuroticism,
            profile.conscientiousness,
        ]) * 10.0,
        love_style_intensity: mean(&[
            profile.words_of_affirmation,
            profile.quality_time,
            profile.gifts,
            profile.physical_touch,
            profile.acts_of_service,
        ]) * 20.0,
        lifestyle_match: mean(&[
            as_unit(profile.likes_music),
            as_unit(profile.likes_travel),
            as_unit(profile.foodie),
            as_unit(profile.gym_person),
        ]) * 100.0,
    };

    let bio_feedback = if bio_sentiment >= 0.0 {
        POSITIVE_BIO_FEEDBACK.to_string()
    } else {
        NEGATIVE_BIO_FEEDBACK.to_string()
    };

    Prediction {
        compatibility_score,
        ghosting_probability,
        conversation_success: success,
        bio_feedback,
        safety_score,
        match_details,
        icebreakers: select_icebreakers(profile),
        timeline: build_timeline(profile),
        flags: select_flags(profile, ghosting_probability),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[inline]
fn as_unit(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Up to `MAX_ICEBREAKERS` matches in table order, or the generic fallback.
fn select_icebreakers(profile: &UserProfile) -> Vec<String> {
    let mut lines: Vec<String> = ICEBREAKER_RULES
        .iter()
        .filter(|(matches, _)| matches(profile))
        .take(MAX_ICEBREAKERS)
        .map(|(_, line)| (*line).to_string())
        .collect();
    if lines.is_empty() {
        lines.push(GENERIC_ICEBREAKER.to_string());
    }
    lines
}

/// Up to `MAX_FLAGS` flags in green -> beige -> red scan order.
fn select_flags(profile: &UserProfile, ghosting_probability: f64) -> Vec<Flag> {
    FLAG_RULES
        .iter()
        .filter(|(_, triggered, _)| triggered(profile, ghosting_probability))
        .take(MAX_FLAGS)
        .map(|&(tier, _, text)| Flag {
            tier,
            text: text.to_string(),
        })
        .collect()
}

fn milestone(
    profile: &UserProfile,
    rules: &[(fn(&UserProfile) -> bool, &str)],
    default: &str,
) -> String {
    rules
        .iter()
        .find(|(matches, _)| matches(profile))
        .map(|(_, event)| (*event).to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Three fixed milestones, each with a profile-conditioned narrative.
fn build_timeline(profile: &UserProfile) -> Vec<TimelineEntry> {
    vec![
        TimelineEntry {
            time: "Month 1".to_string(),
            event: milestone(profile, MONTH_ONE_RULES, MONTH_ONE_DEFAULT),
        },
        TimelineEntry {
            time: "Month 6".to_string(),
            event: milestone(profile, MONTH_SIX_RULES, MONTH_SIX_DEFAULT),
        },
        TimelineEntry {
            time: "Year 1".to_string(),
            event: milestone(profile, YEAR_ONE_RULES, YEAR_ONE_DEFAULT),
        },
    ]
}
