//! URL slug derivation for document titles.

/// Derive a URL-friendly slug from a title: lowercase, every run of
/// characters outside `[a-z0-9]` collapsed to a single hyphen,
/// leading/trailing hyphens trimmed.
///
/// Slugs are not guaranteed unique; two documents titled the same way
/// collide and lookups by slug return whichever row matches first.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_collapses_to_single_hyphen() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
    }

    #[test]
    fn leading_and_trailing_separators_are_trimmed() {
        assert_eq!(generate_slug("  ---Test---  "), "test");
    }

    #[test]
    fn mixed_case_and_digits_survive() {
        assert_eq!(generate_slug("Getting Started v2"), "getting-started-v2");
    }

    #[test]
    fn all_punctuation_yields_empty_slug() {
        assert_eq!(generate_slug("!!!"), "");
    }
}
