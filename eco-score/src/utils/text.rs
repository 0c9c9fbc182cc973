//! Text normalization shared by tables, resolver and encoder

/// Title-case every alphabetic run: first letter upper, rest lower
///
/// "stainless steel" → "Stainless Steel", "USA" → "Usa", "very low" → "Very Low".
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_alpha = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            out.push(c);
            previous_is_alpha = false;
        }
    }
    out
}

/// Lookup key: trimmed, inner whitespace collapsed, lowercase
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True for blank text or the literal "unknown" in any case
pub fn is_unknown(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown")
}

/// Whole-word/phrase containment, case-insensitive
///
/// `contains_phrase("made in australia", "us")` is false; `"us"` must stand
/// alone between non-alphanumeric boundaries.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let phrase = phrase.to_lowercase();
    if phrase.is_empty() {
        return false;
    }
    haystack.match_indices(&phrase).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
