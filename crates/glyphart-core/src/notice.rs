//! Per-call diagnostics
//!
//! Conflicting style rules and justification fallbacks never abort a
//! render. They are reported as [`Notice`]s returned next to the result, so
//! concurrent callers each see only their own warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-fatal diagnostic produced while rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Several whole-line color rules were given; only the last is used
    DuplicateDefaultColor { count: usize },
    /// Several rules target the same substring; only the last is used
    DuplicateSubstringRule { substring: String, count: usize },
    /// A line could not be justified and was rendered left-aligned
    JustifyFallback { line: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DuplicateDefaultColor { count } => write!(
                f,
                "{} default colors specified, using the last one ({} discarded)",
                count,
                count.saturating_sub(1)
            ),
            Notice::DuplicateSubstringRule { substring, count } => write!(
                f,
                "{} color rules for substring {:?}, using the last one",
                count, substring
            ),
            Notice::JustifyFallback { line } => {
                write!(f, "cannot justify {:?} (fewer than two words), using left align", line)
            }
        }
    }
}

/// A result paired with the notices raised while producing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> Outcome<T> {
    /// A clean result
    pub fn new(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    pub fn with_notices(value: T, notices: Vec<Notice>) -> Self {
        Self { value, notices }
    }

    /// Transform the value, keeping the notices
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        Outcome {
            value: f(self.value),
            notices: self.notices,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_display() {
        let notice = Notice::DuplicateDefaultColor { count: 3 };
        assert_eq!(
            notice.to_string(),
            "3 default colors specified, using the last one (2 discarded)"
        );

        let notice = Notice::DuplicateSubstringRule {
            substring: "ab".into(),
            count: 2,
        };
        assert_eq!(
            notice.to_string(),
            "2 color rules for substring \"ab\", using the last one"
        );
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_string(&Notice::JustifyFallback {
            line: "word".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"justify_fallback","line":"word"}"#);
    }

    #[test]
    fn test_outcome_map_keeps_notices() {
        let outcome = Outcome::with_notices(2, vec![Notice::DuplicateDefaultColor { count: 2 }]);
        let mapped = outcome.map(|v| v * 10);
        assert_eq!(mapped.value, 20);
        assert!(!mapped.is_clean());
        assert!(Outcome::new(()).is_clean());
    }
}
