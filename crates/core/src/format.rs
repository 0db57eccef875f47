//! Small text helpers shared by the site views.

/// Build a URL slug: lowercase ASCII alphanumerics with single hyphens.
/// Whitespace, underscores, and hyphen runs collapse to one hyphen; every
/// other character is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }
    slug
}

/// Truncate to at most `max_chars` characters, trimming trailing whitespace
/// and appending "..." when anything was cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Grilled Chicken Bowl"), "grilled-chicken-bowl");
        assert_eq!(slugify("  Chia__Pudding -- Deluxe "), "chia-pudding-deluxe");
    }

    #[test]
    fn slugify_drops_punctuation_and_accents() {
        assert_eq!(slugify("Café au Lait!"), "caf-au-lait");
        assert_eq!(slugify("100% Natural"), "100-natural");
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn truncate_trims_before_the_ellipsis() {
        assert_eq!(truncate("fresh mint lemonade", 11), "fresh mint...");
    }
}
