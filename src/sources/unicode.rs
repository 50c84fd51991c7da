/// Extensions cleaned by `strip-unicode`.
pub const SCRIPT_EXTENSIONS: &[&str] = &["pory", "inc"];

/// Drop every non-ASCII character. Returns `None` when nothing changes.
pub fn strip_non_ascii(text: &str) -> Option<String> {
    if text.is_ascii() {
        return None;
    }
    Some(text.chars().filter(char::is_ascii).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_when_needed() {
        assert_eq!(strip_non_ascii("msgbox(\"Pokémon\")").as_deref(), Some("msgbox(\"Pokmon\")"));
        assert_eq!(strip_non_ascii("end\n"), None);
    }
}
