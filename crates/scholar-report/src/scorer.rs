//! Lexicon sentiment heuristic for abstracts.

use serde::Serialize;

/// Cue words and their weights.
///
/// Keys are lowercase. An entry counts once when it occurs anywhere in the
/// lower-cased text, so inflected forms (`"novos"` for `"novo"`) also match.
pub(crate) const LEXICON: &[(&str, i32)] = &[
    // Positive cues
    ("inovação", 1),
    ("oportunidades", 1),
    ("avanços", 1),
    ("eficiente", 1),
    ("sucesso", 1),
    ("melhor", 1),
    ("novo", 1),
    ("promissor", 1),
    // Negative cues
    ("desafios", -1),
    ("problemas", -1),
    ("riscos", -1),
    ("limitações", -1),
    ("ameaça", -1),
    ("dificuldade", -1),
    ("complexo", -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Net lexicon score: positive cues present minus negative cues present.
#[must_use]
pub fn lexicon_score(text: &str) -> i32 {
    let lower = text.to_lowercase();
    LEXICON
        .iter()
        .filter(|(cue, _)| lower.contains(cue))
        .map(|&(_, weight)| weight)
        .sum()
}

/// Label an abstract. A missing abstract is neutral.
#[must_use]
pub fn classify(text: Option<&str>) -> SentimentLabel {
    match text.map(lexicon_score) {
        Some(score) if score > 0 => SentimentLabel::Positive,
        Some(score) if score < 0 => SentimentLabel::Negative,
        _ => SentimentLabel::Neutral,
    }
}

/// Per-label totals over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}
