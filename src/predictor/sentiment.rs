//! Bio sentiment scoring
//!
//! Lexicon-based polarity scorer for free-text bios. The valence word list
//! (integer scores -5..5) ships embedded in the binary and is parsed once on
//! first use.

use std::collections::HashMap;
use std::sync::OnceLock;

const BIO_LEXICON: &str = include_str!("../../data/bio_lexicon.txt");

/// Normalization divisor: lexicon scores live on a 5-point scale.
const SCALE: f64 = 5.0;

fn lexicon() -> &'static HashMap<&'static str, i8> {
    static SCORES: OnceLock<HashMap<&'static str, i8>> = OnceLock::new();
    SCORES.get_or_init(|| {
        let mut map = HashMap::new();
        for line in BIO_LEXICON.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((word, score)) = line.split_once('\t') {
                if let Ok(score) = score.trim().parse::<i8>() {
                    map.insert(word.trim(), score);
                }
            }
        }
        map
    })
}

/// Score the sentiment of a bio, returning a polarity in [-1.0, 1.0].
///
/// The polarity is the mean valence of matched words divided by the
/// lexicon's 5-point scale. Empty text and text with no lexicon hits both
/// score 0.0.
pub fn analyze_bio(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let scores = lexicon();
    let mut total: i64 = 0;
    let mut hits: u32 = 0;

    for word in text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        if let Some(&score) = scores.get(word.as_str()) {
            total += i64::from(score);
            hits += 1;
        }
    }

    if hits == 0 {
        return 0.0;
    }

    (total as f64 / f64::from(hits) / SCALE).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(analyze_bio(""), 0.0);
    }

    #[test]
    fn test_no_lexicon_hits_scores_zero() {
        assert_eq!(analyze_bio("qwerty zxcvb asdfgh"), 0.0);
    }

    #[test]
    fn test_positive_bio() {
        let score = analyze_bio("I love hiking and coding.");
        // Single hit: love (+3) -> 3 / 5 = 0.6
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_negative_bio() {
        let score = analyze_bio("Everything is terrible and boring here");
        assert!(score < 0.0);
    }

    #[test]
    fn test_mixed_bio_averages() {
        // love (+3) and hate (-3) cancel out
        let score = analyze_bio("love hate");
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let a = analyze_bio("LOVE travel!");
        let b = analyze_bio("love travel");
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_polarity_stays_in_range() {
        let score = analyze_bio("amazing awesome fantastic fun funny wonderful");
        assert!((-1.0..=1.0).contains(&score));
        assert!(score > 0.5);
    }
}
