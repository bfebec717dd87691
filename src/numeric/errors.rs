// ============================================================================
// Numeric Errors
// Error types for price and quantity arithmetic
// ============================================================================

/// Errors that can occur while parsing or combining prices and quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum NumericError {
    /// Result exceeded the representable range
    #[error("arithmetic overflow: result exceeded maximum value")]
    Overflow,
    /// Attempted division by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Input string or value is invalid
    #[error("invalid input: could not parse value")]
    InvalidInput,
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::Overflow.to_string(),
            "arithmetic overflow: result exceeded maximum value"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::Overflow, NumericError::Overflow);
        assert_ne!(NumericError::Overflow, NumericError::InvalidInput);
    }
}
