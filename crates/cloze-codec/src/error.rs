//! Codec error types

/// Errors raised while decoding stored strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Token is not a positive integer identifier
    #[error("invalid record id: '{0}'")]
    InvalidId(String),

    /// Legacy answer position is not a positive integer
    #[error("invalid answer position: '{0}'")]
    InvalidPosition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_display() {
        let err = CodecError::InvalidId("abc".to_string());
        assert_eq!(err.to_string(), "invalid record id: 'abc'");
    }

    #[test]
    fn invalid_position_display() {
        let err = CodecError::InvalidPosition("x".to_string());
        assert!(err.to_string().contains("invalid answer position"));
    }
}
