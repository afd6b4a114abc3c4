use thiserror::Error;

/// Broad class of a [`DeskError`].
///
/// The controller absorbs every error, but it logs them differently: a lookup
/// miss means "nothing to do", a guarded rejection means an invariant held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The addressed group, strategy, connection or edit does not exist.
    LookupMiss,
    /// The mutation would break an invariant and was refused.
    Guarded,
    /// A closed enumeration could not be parsed from text.
    Parse,
}

/// Dashboard error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    #[error("Strategy group not found: {0}")]
    GroupNotFound(String),

    #[error("Strategy {strategy_id} not found in {group}")]
    StrategyNotFound { group: String, strategy_id: String },

    #[error("Brokerage connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("No strategy edit in progress")]
    NoEditInProgress,

    #[error("Strategy {0} is active and cannot be removed")]
    StrategyActive(String),

    #[error("{action} is not available for {group}")]
    NotSupported { action: &'static str, group: String },

    #[error("Unknown brokerage: {0}")]
    UnknownFirm(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown strategy kind: {0}")]
    UnknownKind(String),

    #[error("Unknown order type: {0}")]
    UnknownOrderType(String),

    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

impl DeskError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            DeskError::GroupNotFound(_)
            | DeskError::StrategyNotFound { .. }
            | DeskError::ConnectionNotFound(_)
            | DeskError::NoEditInProgress => ErrorClass::LookupMiss,
            DeskError::StrategyActive(_) | DeskError::NotSupported { .. } => ErrorClass::Guarded,
            DeskError::UnknownFirm(_)
            | DeskError::UnknownPreset(_)
            | DeskError::UnknownKind(_)
            | DeskError::UnknownOrderType(_)
            | DeskError::UnknownOrderStatus(_)
            | DeskError::UnknownSection(_) => ErrorClass::Parse,
        }
    }

    pub fn is_lookup_miss(&self) -> bool {
        self.class() == ErrorClass::LookupMiss
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(DeskError::GroupNotFound("x".into()).class(), ErrorClass::LookupMiss);
        assert_eq!(DeskError::NoEditInProgress.class(), ErrorClass::LookupMiss);
        assert_eq!(DeskError::StrategyActive("1".into()).class(), ErrorClass::Guarded);
        assert_eq!(DeskError::UnknownPreset("Meh".into()).class(), ErrorClass::Parse);
    }

    #[test]
    fn test_error_messages() {
        let err = DeskError::StrategyNotFound {
            group: "SDTE".to_string(),
            strategy_id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Strategy 42 not found in SDTE");
        assert_eq!(
            DeskError::StrategyActive("1".into()).to_string(),
            "Strategy 1 is active and cannot be removed"
        );
    }
}
