/// Lowercases `text` and splits it into word units.
///
/// Anything that is not alphanumeric or `_` separates words, so
/// `"sub-breeds: toy"` yields `["sub", "breeds", "toy"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
