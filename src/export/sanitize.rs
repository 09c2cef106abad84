/// Make `name` usable as a table or column identifier.
///
/// Spaces become underscores, anything that is not alphanumeric or `_` is
/// removed, and `fc_` is prepended when the result would start with a digit
/// (or be empty).
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    match cleaned.chars().next() {
        Some(c) if !c.is_ascii_digit() => cleaned,
        _ => format!("fc_{}", cleaned),
    }
}
