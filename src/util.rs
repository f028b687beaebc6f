//! Small helpers shared by the front ends.

use std::fmt;

/// Holds the API credential. Debug and Display print `***` so the key never
/// reaches a log line or an error message.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Raw value, for the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Round to two decimal places, the precision used for every reported rating.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keep at most `max` characters, appending `...` when something was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// `question_answering` -> `Question Answering`
pub fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_hides_in_debug_and_display() {
        let secret = SecretString::new("AIza-very-secret");
        assert_eq!(format!("{:?}", secret), "***");
        assert_eq!(format!("{}", secret), "***");
        assert_eq!(secret.expose(), "AIza-very-secret");
    }

    #[test]
    fn test_secret_string_blank() {
        assert!(SecretString::new("   ").is_blank());
        assert!(!SecretString::from("k".to_string()).is_blank());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(11.0 / 3.0), 3.67);
        assert_eq!(round2(4.5), 4.5);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 60), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        // Multi-byte characters are never split
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("question_answering"), "Question Answering");
        assert_eq!(title_case("creative_generation"), "Creative Generation");
        assert_eq!(title_case("custom"), "Custom");
    }
}
