//! Moral vocabulary shared by choices and quest branches.

use serde::{Deserialize, Serialize};

const GOOD_KEYWORDS: [&str; 7] = ["help", "save", "protect", "heal", "rescue", "defend", "spare"];
const EVIL_KEYWORDS: [&str; 6] = ["kill", "destroy", "betray", "steal", "murder", "torture"];
const COMPLEX_KEYWORDS: [&str; 2] = ["sacrifice", "compromise"];
const INFLECTIONS: [&str; 12] = [
    "s", "es", "d", "ed", "er", "ers", "or", "ors", "ing", "ion", "ions", "ful",
];

/// Ethical colouring of a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoralTag {
    /// Altruistic or protective.
    Good,
    /// Cruel or treacherous.
    Evil,
    /// A real dilemma with costs on every side.
    Complex,
    /// No ethical weight.
    #[default]
    Neutral,
}

impl MoralTag {
    /// Infers a tag from free text supplied by the narrative generator.
    ///
    /// Keywords match whole words and their inflections ("saved",
    /// "killing"), never fragments of other words ("skill", "stealth").
    /// Checked in order good, evil, complex; the first family with a hit
    /// wins.
    #[must_use]
    pub fn infer(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let hit = |keywords: &[&str]| {
            keywords
                .iter()
                .any(|k| words.iter().any(|w| is_form_of(w, k)))
        };
        if hit(&GOOD_KEYWORDS) {
            Self::Good
        } else if hit(&EVIL_KEYWORDS) {
            Self::Evil
        } else if hit(&COMPLEX_KEYWORDS) {
            Self::Complex
        } else {
            Self::Neutral
        }
    }

    /// Base alignment shift toward good (+) or evil (-).
    #[must_use]
    pub fn alignment_shift(self) -> f64 {
        match self {
            Self::Good => 2.0,
            Self::Evil => -2.0,
            Self::Complex | Self::Neutral => 0.0,
        }
    }
}

/// Whether `word` is `keyword` or one of its inflections. A trailing `e`
/// on the keyword may drop before the suffix ("saving").
fn is_form_of(word: &str, keyword: &str) -> bool {
    let inflected = |stem: &str| {
        word.strip_prefix(stem)
            .is_some_and(|rest| rest.is_empty() || INFLECTIONS.contains(&rest))
    };
    inflected(keyword) || keyword.strip_suffix('e').is_some_and(inflected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_good_before_evil() {
        assert_eq!(MoralTag::infer("Protect the village"), MoralTag::Good);
        assert_eq!(MoralTag::infer("Kill them to save the child"), MoralTag::Good);
    }

    #[test]
    fn test_infer_evil_complex_neutral() {
        assert_eq!(MoralTag::infer("Betray the guild"), MoralTag::Evil);
        assert_eq!(MoralTag::infer("Offer a compromise"), MoralTag::Complex);
        assert_eq!(MoralTag::infer("Walk to the market"), MoralTag::Neutral);
    }

    #[test]
    fn test_infer_ignores_keywords_inside_other_words() {
        assert_eq!(MoralTag::infer("Use my skill to pick the lock"), MoralTag::Neutral);
        assert_eq!(MoralTag::infer("Slip past in stealth"), MoralTag::Neutral);
        assert_eq!(MoralTag::infer("An unhelpful clerk waves us off"), MoralTag::Neutral);
        assert_eq!(MoralTag::infer("Drink to your health"), MoralTag::Neutral);
    }

    #[test]
    fn test_infer_matches_inflected_keywords() {
        assert_eq!(MoralTag::infer("She saved the miller"), MoralTag::Good);
        assert_eq!(MoralTag::infer("Saving the ferry crew"), MoralTag::Good);
        assert_eq!(MoralTag::infer("Killing the witness"), MoralTag::Evil);
        assert_eq!(MoralTag::infer("He betrayed the wardens"), MoralTag::Evil);
        assert_eq!(MoralTag::infer("Compromising with the syndicate"), MoralTag::Complex);
    }
}
