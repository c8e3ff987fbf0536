//! Sentence and paragraph splitting shared by the formatter and validator.
//!
//! A sentence boundary is a run of terminal punctuation (`.`, `!`, `?`, `…`),
//! optionally followed by closing quotes or brackets, then whitespace, then
//! an uppercase letter or an opening quote followed by an uppercase letter.

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']')
}

fn is_opening_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '‘')
}

fn starts_sentence(rest: &[(usize, char)]) -> bool {
    match rest {
        [(_, c), ..] if c.is_uppercase() => true,
        [(_, q), (_, c), ..] if is_opening_quote(*q) => c.is_uppercase(),
        _ => false,
    }
}

/// Split text into trimmed sentences.
///
/// Text after the last boundary counts as a sentence even without terminal
/// punctuation.
///
/// # Examples
///
/// ```
/// use fablewright_prose::split_sentences;
///
/// let sentences = split_sentences("She ran. \"Wait!\" he called. It was too late");
/// assert_eq!(sentences, vec!["She ran.", "\"Wait!\" he called.", "It was too late"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if !is_terminal(chars[i].1) {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < chars.len() && is_terminal(chars[j].1) {
            j += 1;
        }
        while j < chars.len() && is_closing(chars[j].1) {
            j += 1;
        }
        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        if k > j && starts_sentence(&chars[k..]) {
            let sentence = text[start..chars[j].0].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = chars[k].0;
            i = k;
        } else {
            i = j;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Number of sentences in `text`.
pub fn count_sentences(text: &str) -> usize {
    split_sentences(text).len()
}

/// Split text into non-empty, trimmed paragraphs.
///
/// Both blank lines and single newlines separate paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
