/// Splits genre text into lowercase word tokens.
///
/// A token is a maximal run of word characters (Unicode alphanumerics plus
/// `_`) at least two characters long; everything else separates tokens and
/// single-character runs are discarded.
///
/// # Arguments
/// * `text` - raw genre text, e.g. `"Sci-Fi, Slice of Life"`
///
/// # Returns
/// * `Vec<String>` - tokens in source order, e.g. `["sci", "fi", "slice", "of", "life"]`
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !is_word_char(c))
        .filter(|run| run.chars().count() >= 2)
        .map(|run| run.to_lowercase())
        .collect()
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
