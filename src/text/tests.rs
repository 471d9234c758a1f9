use super::*;

#[test]
fn normalize_strips_non_sinhala_and_collapses_whitespace() {
    let input = "ගුරුතුමා,  පාඩම 123 ඉගැන්නුවා!";
    assert_eq!(normalize(input), "ගුරුතුමා පාඩම ඉගැන්නුවා");
}

#[test]
fn normalize_removes_zero_width_joiners() {
    let input = "ශ්\u{200D}රී ලංකාව";
    let normalized = normalize(input);
    assert!(!normalized.contains('\u{200D}'));
    assert!(normalized.contains("ලංකාව"));
}

#[test]
fn normalize_empty_input() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("   \n\t  "), "");
    assert_eq!(normalize("abc 123 !!"), "");
}

#[test]
fn split_paragraphs_on_blank_lines() {
    let text = "පළමු ඡේදය\n\nදෙවන ඡේදය\n\n\nතෙවන ඡේදය";
    let paras = split_paragraphs(text);
    assert_eq!(paras.len(), 3);
    assert_eq!(paras[0], "පළමු ඡේදය");
}

#[test]
fn split_paragraphs_whole_text_fallback() {
    let paras = split_paragraphs("තනි ඡේදයක් පමණි");
    assert_eq!(paras, vec!["තනි ඡේදයක් පමණි".to_string()]);
    assert!(split_paragraphs("").is_empty());
}

#[test]
fn split_sentences_on_terminators() {
    let text = "පළමු වාක්‍යය. දෙවන වාක්‍යය? තෙවන වාක්‍යය";
    let sents = split_sentences(text);
    assert_eq!(sents.len(), 3);
    assert_eq!(sents[2], "තෙවන වාක්‍යය");
}

#[test]
fn tokenize_drops_stopwords_and_short_tokens() {
    let normalized = normalize("මම පාසල යමි සහ ඔහු ගෙදර යයි");
    let tokens = tokenize(&normalized);
    assert!(!tokens.iter().any(|t| t == "මම"));
    assert!(!tokens.iter().any(|t| t == "සහ"));
    assert!(tokens.iter().any(|t| t == "පාසල"));
}

#[test]
fn char_ngrams_basic() {
    let grams = char_ngrams("අබ ක", 2);
    assert_eq!(grams, vec!["අබ".to_string(), "බක".to_string()]);
}

#[test]
fn char_ngrams_short_text_yields_whole_text() {
    assert_eq!(char_ngrams("අ", 3), vec!["අ".to_string()]);
    assert_eq!(char_ngrams("", 2), vec![String::new()]);
}

#[test]
fn sinhala_ratio_bounds() {
    assert_eq!(sinhala_ratio(""), 0.0);
    assert_eq!(sinhala_ratio("abcd"), 0.0);
    assert_eq!(sinhala_ratio("අආඉඊ"), 1.0);
    let mixed = sinhala_ratio("අආab");
    assert!((mixed - 0.5).abs() < f32::EPSILON);
}

#[test]
fn document_derives_segments() {
    let doc = Document::new("ගුරුතුමා පාඩම ඉගැන්නුවා.\n\nසිසුවා පාඩම ඉගෙන ගත්තා.");
    assert_eq!(doc.paragraphs.len(), 2);
    assert_eq!(doc.sentences.len(), 2);
    assert!(!doc.is_degenerate());
}

#[test]
fn degenerate_document() {
    assert!(Document::new("කෙටි").is_degenerate());
    assert!(Document::new("").is_degenerate());
}
