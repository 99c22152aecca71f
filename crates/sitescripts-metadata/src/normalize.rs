//! PEP 503 name normalization
//!
//! `My-Package`, `my_package` and `my.package` all name the same project.

/// Normalize a distribution name: lowercase, runs of `-`, `_` and `.`
/// collapsed to a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
            continue;
        }
        in_separator = false;
        normalized.push(ch.to_ascii_lowercase());
    }
    normalized
}

/// Split a metadata directory name into its name and version parts.
///
/// `foo_bar-1.0.dist-info` gives `("foo_bar", Some("1.0"))`. Wheel-style names
/// escape `-` inside the name, so the first `-` separates the two.
pub fn split_metadata_dir_name(stem: &str) -> (&str, Option<&str>) {
    match stem.split_once('-') {
        Some((name, version)) if !version.is_empty() => (name, Some(version)),
        Some((name, _)) => (name, None),
        None => (stem, None),
    }
}
