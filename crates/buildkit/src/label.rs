//! Target label normalization.
//!
//! `cquery` prints labels of the main repository with an explicit repository
//! prefix (`@@//pkg:name` with bzlmod, `@//pkg:name` without). Manifests use
//! the plain `//pkg:name` form, so the prefix is stripped before lookup.

/// Strip a main-repository prefix (`@@` or `@`) in front of `//`.
///
/// Labels from external repositories (`@repo//pkg:name`) are left as-is.
pub fn normalize(label: &str) -> &str {
    if let Some(rest) = label.strip_prefix("@@")
        && rest.starts_with("//")
    {
        return rest;
    }
    if let Some(rest) = label.strip_prefix('@')
        && rest.starts_with("//")
    {
        return rest;
    }
    label
}
