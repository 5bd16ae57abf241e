//! Rule-based intent inference.

use crate::types::{Intent, MessageCategory};

/// Maps a message category to an interaction intent.
///
/// The graph builder only depends on this trait, so a learned classifier can
/// replace [`RuleClassifier`] without touching graph construction.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, category: MessageCategory) -> Intent;
}

/// The fixed lookup table used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

impl IntentClassifier for RuleClassifier {
    fn classify(&self, category: MessageCategory) -> Intent {
        classify(category)
    }
}

/// Derive an intent from a category.
pub fn classify(category: MessageCategory) -> Intent {
    match category {
        MessageCategory::Delegation => Intent::Delegation,
        MessageCategory::Action => Intent::Coordination,
        MessageCategory::Response => Intent::InformationResponse,
        MessageCategory::Feedback => Intent::Feedback,
        MessageCategory::Thought | MessageCategory::Observation | MessageCategory::System => {
            Intent::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table() {
        assert_eq!(classify(MessageCategory::Delegation), Intent::Delegation);
        assert_eq!(classify(MessageCategory::Action), Intent::Coordination);
        assert_eq!(
            classify(MessageCategory::Response),
            Intent::InformationResponse
        );
        assert_eq!(classify(MessageCategory::Feedback), Intent::Feedback);
    }

    #[test]
    fn test_everything_else_is_unknown() {
        for c in [
            MessageCategory::Thought,
            MessageCategory::Observation,
            MessageCategory::System,
        ] {
            assert_eq!(classify(c), Intent::Unknown);
        }
    }

    #[test]
    fn test_rule_classifier_matches_function() {
        for c in MessageCategory::ALL {
            assert_eq!(RuleClassifier.classify(c), classify(c));
        }
    }
}
