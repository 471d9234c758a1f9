//! Sinhala text normalization and segmentation.
//!
//! Everything downstream (statistical scoring, embedding, web query
//! construction) operates on normalized text produced here. Normalization is
//! lossy on purpose: zero-width joiners are dropped and anything outside the
//! Sinhala block becomes whitespace.

#[cfg(test)]
mod tests;

/// Closed-class Sinhala function words filtered before token-level comparison
/// and web query construction.
pub const SINHALA_STOPWORDS: &[&str] = &[
    "මම", "ඔබ", "එය", "සහ", "නමුත්", "හෝ", "ඒ", "මෙය", "අප", "ඔවුන්",
    "කොහේ", "කවුද", "මොකද", "කොහොමද", "කවදා", "කොහෙන්", "මට", "ඔහු",
    "ඇය", "එහි", "මෙහි", "එම", "මෙම", "එවිට", "මෙවිට", "එසේ", "මෙසේ",
    "හා", "බව", "නම්", "විසින්", "සඳහා", "ලෙස", "අතර", "අපි",
    "යන", "යනු", "වේ", "වෙයි", "විය", "ඇත", "නැත", "නිසා", "එහෙත්",
    "විට", "තුළ", "හරහා", "මගින්", "අනුව", "ගැන", "සමග", "සමඟ",
];

const SINHALA_BLOCK_START: char = '\u{0D80}';
const SINHALA_BLOCK_END: char = '\u{0DFF}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';
const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';

/// Returns `true` for codepoints inside the Sinhala Unicode block.
#[inline]
pub fn is_sinhala(c: char) -> bool {
    (SINHALA_BLOCK_START..=SINHALA_BLOCK_END).contains(&c)
}

/// Normalizes raw text for comparison: lowercases, strips zero-width
/// joiners, replaces everything outside the Sinhala block with a space, and
/// collapses whitespace runs.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;

    for c in text.to_lowercase().chars() {
        if c == ZERO_WIDTH_JOINER || c == ZERO_WIDTH_NON_JOINER {
            continue;
        }
        if is_sinhala(c) {
            out.push(c);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }

    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Splits text into paragraphs on blank lines, falling back to the whole
/// text as a single paragraph when no blank line exists.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let parts: Vec<String> = text
        .split("\n\n")
        .flat_map(|p| p.split("\r\n\r\n"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() && !text.trim().is_empty() {
        return vec![text.trim().to_string()];
    }
    parts
}

/// Naive sentence splitter: `.`, `?`, `!`, the danda (U+0964), or the
/// Sinhala full stop end a sentence; newlines also break.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '.' | '?' | '!' | '\u{0964}' => {
                if !current.trim().is_empty() {
                    sentences.push(current.trim().to_string());
                }
                current.clear();
            }
            '\n' => {
                if !current.trim().is_empty() {
                    sentences.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}

/// Tokenizes normalized text, dropping stopwords and single-character tokens.
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() > 1 && !SINHALA_STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Removes stopwords from text without other filtering. Used for web query
/// construction where short tokens still carry search relevance.
pub fn strip_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| !SINHALA_STOPWORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Character n-grams of the text with spaces removed. Text shorter than `n`
/// yields the whole text as a single gram.
pub fn char_ngrams(text: &str, n: usize) -> Vec<String> {
    let compact: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.len() < n {
        return vec![compact.iter().collect()];
    }
    compact
        .windows(n)
        .map(|w| w.iter().collect())
        .collect()
}

/// Proportion of Sinhala codepoints in the text, in [0, 1]. Empty text is 0.
pub fn sinhala_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut sinhala = 0usize;
    for c in text.chars() {
        total += 1;
        if is_sinhala(c) {
            sinhala += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        sinhala as f32 / total as f32
    }
}

/// An input document with its derived, comparison-ready segments.
///
/// Immutable once created; all fields are produced from `raw` at
/// construction time.
#[derive(Debug, Clone)]
pub struct Document {
    /// Original input text, untouched.
    pub raw: String,
    /// Normalized form of the full text.
    pub normalized: String,
    /// Normalized paragraphs.
    pub paragraphs: Vec<String>,
    /// Normalized sentences.
    pub sentences: Vec<String>,
}

impl Document {
    /// Builds a document from raw input, normalizing each segment.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let paragraphs: Vec<String> = split_paragraphs(&raw)
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty())
            .collect();
        let sentences: Vec<String> = split_sentences(&raw)
            .iter()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            normalized: normalize(&raw),
            raw,
            paragraphs,
            sentences,
        }
    }

    /// Returns `true` when the normalized text is too short to score
    /// meaningfully.
    pub fn is_degenerate(&self) -> bool {
        self.normalized.chars().count() < 20
    }
}
