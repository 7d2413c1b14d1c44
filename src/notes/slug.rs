//! Title normalization for note filenames

/// Turn a free-text title into a filename-safe slug.
///
/// Trims, lowercases, drops anything outside `[a-z0-9 -]`, then folds every
/// run of spaces and hyphens into a single `-`. Leading or trailing hyphens
/// that survive the filter are kept, so `"a !"` becomes `"a-"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());

    for c in input.trim().to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            ' ' | '-' => {
                if !slug.ends_with('-') {
                    slug.push('-');
                }
            }
            _ => {}
        }
    }

    slug
}
