//! Text measurements shared across the pipeline.

/// Count whitespace-separated words.
///
/// # Examples
///
/// ```
/// use fablewright_core::count_words;
///
/// assert_eq!(count_words("  The door  creaked open.\n"), 4);
/// assert_eq!(count_words(""), 0);
/// ```
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
