use serde::{Deserialize, Serialize};

use crate::common::{ModerationError, ModerationResult, MAX_REASON_LEN};

/// Canned rejection reasons offered by the review screens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresetReason {
    Inappropriate,
    Duplicate,
    IncompleteInformation,
    Spam,
    OutOfArea,
}

impl PresetReason {
    pub fn text(&self) -> &'static str {
        match self {
            PresetReason::Inappropriate => "Inappropriate content",
            PresetReason::Duplicate => "Duplicate submission",
            PresetReason::IncompleteInformation => "Incomplete information",
            PresetReason::Spam => "Spam or advertising abuse",
            PresetReason::OutOfArea => "Not relevant to the municipality",
        }
    }
}

/// Why an item was rejected: an allow-listed preset or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Preset(PresetReason),
    Other(String),
}

impl RejectionReason {
    pub fn other(text: impl Into<String>) -> Self {
        RejectionReason::Other(text.into())
    }

    /// Validates and returns the text stored in `rejection_reason`.
    ///
    /// Free text is trimmed; it must be non-empty and at most
    /// `MAX_REASON_LEN` characters.
    pub fn into_text(self) -> ModerationResult<String> {
        match self {
            RejectionReason::Preset(preset) => Ok(preset.text().to_string()),
            RejectionReason::Other(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ModerationError::validation(
                        "rejection reason must not be empty",
                    ));
                }
                let len = trimmed.chars().count();
                if len > MAX_REASON_LEN {
                    return Err(ModerationError::validation(format!(
                        "rejection reason must be at most {} characters (got {})",
                        MAX_REASON_LEN, len
                    )));
                }
                Ok(trimmed.to_string())
            }
        }
    }
}

impl From<PresetReason> for RejectionReason {
    fn from(preset: PresetReason) -> Self {
        RejectionReason::Preset(preset)
    }
}

impl From<&str> for RejectionReason {
    fn from(text: &str) -> Self {
        RejectionReason::Other(text.to_string())
    }
}

impl From<String> for RejectionReason {
    fn from(text: String) -> Self {
        RejectionReason::Other(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_reasons_are_rejected() {
        assert!(RejectionReason::other("").into_text().is_err());
        assert!(RejectionReason::other("   \n").into_text().is_err());
    }

    #[test]
    fn length_limit_counts_characters_not_bytes() {
        let at_limit: String = "é".repeat(MAX_REASON_LEN);
        assert!(RejectionReason::other(at_limit).into_text().is_ok());

        let over: String = "a".repeat(MAX_REASON_LEN + 1);
        let err = RejectionReason::other(over).into_text().unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));
    }

    #[test]
    fn free_text_is_trimmed() {
        let text = RejectionReason::other("  blurry photo ").into_text().unwrap();
        assert_eq!(text, "blurry photo");
    }

    #[test]
    fn presets_carry_their_own_text() {
        let text = RejectionReason::from(PresetReason::Duplicate)
            .into_text()
            .unwrap();
        assert_eq!(text, "Duplicate submission");
    }
}
