//! Slug derivation and validation.

/// Derive a URL-safe slug from an organization name.
///
/// Lowercases, collapses whitespace runs into single hyphens, and drops
/// every character that is not alphanumeric or a hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphens

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Whether the string is a valid, URL-safe organization slug.
///
/// Slugs are non-empty, lowercase alphanumeric with interior hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
