use serde::{Deserialize, Serialize};

/// The derived feature record for a single product title.
///
/// Every field is recomputed from the title string on each call to
/// [`derive`]; nothing is cached, so the fields can never go stale relative
/// to the `title` they were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFeatures {
    /// The raw title text, passed through as-is (no trimming).
    pub title: String,
    /// Number of Unicode characters in the title.
    pub title_length: usize,
    /// Number of whitespace-delimited tokens in the title.
    pub word_count: usize,
    /// Whether the title contains at least one decimal digit.
    pub has_number: bool,
}

/// Derives the feature record for a product title.
///
/// This is the single derivation used on the prediction path, and the
/// reference for whatever produces the pre-featurized training file. The
/// trained pipeline pairs meaning to feature positions, so both sides must
/// agree on exactly this derivation.
///
/// # Example
/// ```
/// use shelftag::features::derive;
///
/// let f = derive("Model X 2024");
/// assert_eq!(f.title_length, 12);
/// assert_eq!(f.word_count, 3);
/// assert!(f.has_number);
/// ```
pub fn derive(title: &str) -> TitleFeatures {
    TitleFeatures {
        title: title.to_string(),
        title_length: title.chars().count(),
        word_count: title.split_whitespace().count(),
        has_number: title.chars().any(|c| c.is_ascii_digit()),
    }
}
