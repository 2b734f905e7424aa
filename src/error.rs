//! Errors raised while sizing or constructing a filter.
use thiserror::Error;

/// Error returned by filter constructors.
///
/// Once a filter exists, none of its operations can fail.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum FilterError {
    /// A sizing input is out of range, e.g. zero expected items or a false positive rate outside
    /// of `(0, 1)`.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// The bit array would need more bits than the backend can address.
    #[error("filter needs {required} bits but at most {max} are addressable")]
    CapacityOverflow {
        /// Number of bits the filter would need.
        required: u64,
        /// Largest number of bits supported.
        max: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::FilterError;

    #[test]
    fn display_invalid_parameter() {
        let err = FilterError::InvalidParameter {
            name: "expected_items",
            reason: "must be greater than 0",
        };
        assert_eq!(
            err.to_string(),
            "invalid parameter `expected_items`: must be greater than 0"
        );
    }

    #[test]
    fn display_capacity_overflow() {
        let err = FilterError::CapacityOverflow {
            required: 10,
            max: 5,
        };
        assert_eq!(
            err.to_string(),
            "filter needs 10 bits but at most 5 are addressable"
        );
    }
}
