/// A user's question, guaranteed to contain at least one non-whitespace character.
///
/// The text is kept exactly as typed; only the emptiness check ignores whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Character count, used in logs instead of the text itself.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected() {
        assert!(Query::new("").is_none());
        assert!(Query::new("   ").is_none());
        assert!(Query::new("\n\t \r\n").is_none());
        assert!(Query::new("\u{3000}").is_none());
    }

    #[test]
    fn text_is_kept_verbatim() {
        let q = Query::new("  How do I fix a null pointer error?\n").unwrap();
        assert_eq!(q.as_str(), "  How do I fix a null pointer error?\n");
        assert_eq!(Query::new("héllo").unwrap().char_count(), 5);
    }
}
