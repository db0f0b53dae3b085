/// Placeholder token check, shaped as a pure function so the endpoint can
/// swap in a real validator later: accepts tokens longer than ten characters
/// that are not a single repeated character. Blank tokens are rejected.
pub fn is_valid_token(token: &str, _doc_id: &str) -> bool {
    if token.trim().is_empty() {
        return false;
    }
    let mut chars = token.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    token.chars().count() > 10 && !chars.all(|c| c == first)
}
