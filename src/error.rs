use thiserror::Error;

/// Main error type for the itinerary engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Day {requested} not found. Available days: {available}")]
    DayNotFound { requested: u32, available: String },

    #[error("Time slot '{requested}' not found on day {day}. Available slots: {available}")]
    SlotNotFound {
        day: u32,
        requested: String,
        available: String,
    },

    #[error("Could not find an activity matching '{subject}' on day {day}")]
    ActivityNotFound { day: u32, subject: String },

    #[error("No places found for '{query}'")]
    PlaceNotFound { query: String },

    #[error("No place name or category was given for the activity to add")]
    MissingSubject,

    #[error("Nothing found for '{query}'")]
    NothingFound { query: String },

    #[error("Unsupported modification: {0}")]
    UnsupportedModification(String),

    #[error("Could not extract a place name from the message")]
    ExtractionFailure,

    #[error("Model call failed: {0}")]
    Model(String),

    #[error("Place lookup failed: {0}")]
    Resolver(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Model(_)
                | EngineError::Resolver(_)
                | EngineError::RateLimit { .. }
                | EngineError::Timeout(_)
        )
    }

    /// Whether this is a user-facing itinerary error (bad input, not infrastructure)
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EngineError::DayNotFound { .. }
                | EngineError::SlotNotFound { .. }
                | EngineError::ActivityNotFound { .. }
                | EngineError::PlaceNotFound { .. }
                | EngineError::MissingSubject
                | EngineError::NothingFound { .. }
                | EngineError::UnsupportedModification(_)
                | EngineError::ExtractionFailure
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::Config(_) => "CONFIG_ERROR",
            EngineError::DayNotFound { .. } => "DAY_NOT_FOUND",
            EngineError::SlotNotFound { .. } => "SLOT_NOT_FOUND",
            EngineError::ActivityNotFound { .. } => "ACTIVITY_NOT_FOUND",
            EngineError::PlaceNotFound { .. } => "PLACE_NOT_FOUND",
            EngineError::MissingSubject => "MISSING_SUBJECT",
            EngineError::NothingFound { .. } => "NOTHING_FOUND",
            EngineError::UnsupportedModification(_) => "UNSUPPORTED_MODIFICATION",
            EngineError::ExtractionFailure => "EXTRACTION_FAILURE",
            EngineError::Model(_) => "MODEL_ERROR",
            EngineError::Resolver(_) => "RESOLVER_ERROR",
            EngineError::Serialization(_) => "SERIALIZATION_ERROR",
            EngineError::Store(_) => "STORE_ERROR",
            EngineError::Timeout(_) => "TIMEOUT_ERROR",
            EngineError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            EngineError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// An actionable follow-up the caller can show alongside the error message
    pub fn suggestion(&self) -> String {
        match self {
            EngineError::DayNotFound { available, .. } => {
                format!("Pick one of the existing days: {}", available)
            }
            EngineError::SlotNotFound { available, .. } => {
                format!("Try one of the available slots: {}", available)
            }
            EngineError::ActivityNotFound { day, .. } => {
                format!("Check the activity name against what is planned for day {}", day)
            }
            EngineError::PlaceNotFound { .. } | EngineError::NothingFound { .. } => {
                "Try a different place name or a broader category".to_string()
            }
            EngineError::MissingSubject | EngineError::ExtractionFailure => {
                "Tell me which place or kind of place you want, e.g. \"add the Louvre to day 2\""
                    .to_string()
            }
            EngineError::UnsupportedModification(_) => {
                "Try phrasing the change as an add, remove, replace, or move".to_string()
            }
            EngineError::Timeout(_) | EngineError::RateLimit { .. } => {
                "Please try again in a moment".to_string()
            }
            _ => "Please try again".to_string(),
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = EngineError::MissingSubject;
        assert_eq!(err.error_code(), "MISSING_SUBJECT");
        assert!(err.is_user_facing());
        assert!(!err.is_retryable());

        let err = EngineError::Timeout("30s elapsed".to_string());
        assert_eq!(err.error_code(), "TIMEOUT_ERROR");
        assert!(err.is_retryable());
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_not_found_messages_enumerate_alternatives() {
        let err = EngineError::DayNotFound {
            requested: 9,
            available: "1, 2, 3".to_string(),
        };
        assert!(err.to_string().contains("1, 2, 3"));
        assert!(err.suggestion().contains("1, 2, 3"));

        let err = EngineError::SlotNotFound {
            day: 2,
            requested: "night".to_string(),
            available: "morning, afternoon, evening".to_string(),
        };
        assert!(err.to_string().contains("morning, afternoon, evening"));
    }

    #[test]
    fn test_error_payload() {
        let payload = EngineError::PlaceNotFound {
            query: "louvre in Paris".to_string(),
        }
        .to_error_payload();
        assert_eq!(payload["error"]["code"], "PLACE_NOT_FOUND");
        assert_eq!(payload["error"]["retryable"], false);
    }
}
