//! Keyword matching against inbound text

use crate::entities::MatchType;

/// Return the keywords that match `text`, as originally written and in list order.
///
/// Text and keywords are compared after trimming and lower-casing only.
/// Keywords that are empty after trimming never match.
pub fn match_keywords<'k>(match_type: MatchType, text: &str, keywords: &'k [String]) -> Vec<&'k str> {
    let text = text.trim().to_lowercase();

    keywords
        .iter()
        .filter(|kw| {
            let needle = kw.trim().to_lowercase();
            if needle.is_empty() {
                return false;
            }
            match match_type {
                MatchType::Contains => text.contains(&needle),
                MatchType::Equals => text == needle,
            }
        })
        .map(String::as_str)
        .collect()
}
