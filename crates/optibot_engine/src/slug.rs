use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_CHARS: usize = 100;

/// ASCII file stem for an article title.
///
/// Accents are folded away (NFKD, non-ASCII dropped), the text is lowercased,
/// and every run of characters outside `a-z0-9` becomes one hyphen. Leading and
/// trailing hyphens are trimmed. Returns an empty string when nothing survives.
pub fn slugify(title: &str) -> String {
    let folded: String = title.nfkd().filter(|c| c.is_ascii()).collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_CHARS);
    slug.trim_end_matches('-').to_string()
}
