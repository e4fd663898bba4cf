//! Keyword frequency over titles and abstracts.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::Serialize;

/// Portuguese function words plus a short English list, since result
/// listings mix both languages.
const BASE_STOPWORDS: &[&str] = &[
    // Portuguese
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
    "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois",
    "do", "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram",
    "essa", "essas", "esse", "esses", "esta", "está", "estas", "este", "estes", "eu",
    "foi", "foram", "há", "isso", "isto", "já", "lhe", "lhes", "mais", "mas", "me",
    "mesmo", "meu", "minha", "muito", "na", "não", "nas", "nem", "no", "nos", "nós",
    "nossa", "nosso", "num", "numa", "o", "os", "ou", "para", "pela", "pelas", "pelo",
    "pelos", "por", "qual", "quando", "que", "quem", "são", "se", "seja", "sem", "ser",
    "seu", "seus", "só", "sua", "suas", "também", "te", "tem", "têm", "ter", "um",
    "uma", "umas", "uns", "você", "vocês",
    // English
    "an", "and", "are", "by", "for", "from", "in", "is", "of", "on", "or", "the", "this",
    "to", "with", "we", "our", "its", "at", "be", "that", "these", "using",
];

/// Topic words that would otherwise dominate every listing.
const DOMAIN_STOPWORDS: &[&str] = &[
    "computacao", "computação", "quantica", "quântica", "quântico", "quantum", "trabalho",
    "estudo", "pesquisa", "neste", "este", "para", "com", "que", "uma", "como", "sobre",
    "dados", "resultados",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    BASE_STOPWORDS
        .iter()
        .chain(DOMAIN_STOPWORDS)
        .copied()
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Lower-case `text` and drop every character that is neither a letter nor
/// whitespace.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect()
}

#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Cleaned, stopword-free words of `text`, in order.
#[must_use]
pub fn keywords(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .filter(|w| !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// The `limit` most frequent keywords across `texts`.
///
/// Ties are broken alphabetically so the result is stable.
#[must_use]
pub fn top_words<'a>(texts: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<WordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in keywords(text) {
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut ranked: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(limit);
    ranked
}
