// ============================================================================
// Numeral Errors
// Error types for channel encoding, parsing and arithmetic
// ============================================================================

use std::fmt;

/// Where a canonical text form stopped matching the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseFailure {
    /// Text did not start with `.` (after an optional `-`)
    MissingPoint,
    /// Mantissa digits missing, not binary, or wider than the profile
    MantissaDigits,
    /// Expected `e-` (or `e+` for direct-sense profiles)
    ExponentMarker,
    /// Exponent digits missing, not binary, or wider than the profile
    ExponentDigits,
    /// Bias suffix is not of the form `(+<digits>)`
    BiasLiteral,
    /// Bias literal parsed but differs from the profile's bias
    BiasMismatch,
    /// Characters left over after the closing parenthesis
    TrailingInput,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::MissingPoint => write!(f, "expected '.' before mantissa"),
            ParseFailure::MantissaDigits => write!(f, "invalid mantissa digits"),
            ParseFailure::ExponentMarker => write!(f, "invalid exponent marker"),
            ParseFailure::ExponentDigits => write!(f, "invalid exponent digits"),
            ParseFailure::BiasLiteral => write!(f, "invalid bias literal"),
            ParseFailure::BiasMismatch => write!(f, "bias does not match profile"),
            ParseFailure::TrailingInput => write!(f, "unexpected trailing input"),
        }
    }
}

/// Errors that can occur while building or combining channel numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumeralError {
    /// Text does not match the canonical grammar
    Parse(ParseFailure),
    /// Exponent does not fit the profile's exponent channels
    Range,
    /// Input value is NaN or infinite
    Domain,
    /// Operands were built from different profiles
    ProfileMismatch,
    /// Channel set length or contents disagree with the profile
    MalformedChannels,
}

impl fmt::Display for NumeralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumeralError::Parse(reason) => write!(f, "parse error: {}", reason),
            NumeralError::Range => {
                write!(f, "range error: exponent outside the profile's channel span")
            },
            NumeralError::Domain => write!(f, "domain error: value is not finite"),
            NumeralError::ProfileMismatch => write!(f, "operands use different profiles"),
            NumeralError::MalformedChannels => {
                write!(f, "malformed channel set for this profile")
            },
        }
    }
}

impl std::error::Error for NumeralError {}

impl From<ParseFailure> for NumeralError {
    fn from(reason: ParseFailure) -> Self {
        NumeralError::Parse(reason)
    }
}

/// Result type alias for numeral operations
pub type NumeralResult<T> = Result<T, NumeralError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumeralError::Range.to_string(),
            "range error: exponent outside the profile's channel span"
        );
        assert_eq!(
            NumeralError::Parse(ParseFailure::BiasMismatch).to_string(),
            "parse error: bias does not match profile"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumeralError::Domain, NumeralError::Domain);
        assert_ne!(
            NumeralError::Parse(ParseFailure::MissingPoint),
            NumeralError::Parse(ParseFailure::TrailingInput)
        );
        assert_eq!(
            NumeralError::from(ParseFailure::ExponentDigits),
            NumeralError::Parse(ParseFailure::ExponentDigits)
        );
    }
}
