/// Reduces a guild or asset name to a filesystem-safe component.
///
/// Keeps alphanumeric characters (Unicode-aware), spaces, underscores and
/// hyphens, then trims surrounding whitespace. The result may be empty.
#[must_use]
pub fn clean_name_for_fs(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    kept.trim().to_string()
}
