// Output formatting — terminal rendering lives in its own module so main.rs
// stays focused on wiring.

pub mod terminal;

/// Truncate a string to at most `max` characters, appending an ellipsis
/// when anything was cut. Operates on characters, not bytes, so multi-byte
/// ids don't split mid-codepoint.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_chars("actor-1", 10), "actor-1");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_chars("abcdefghij", 5), "abcd…");
    }
}
