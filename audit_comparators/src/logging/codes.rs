//! Stable event codes for comparator log lines
//!
//! Codes are attached to error-level events so audit tooling can group
//! failures without parsing message text.

/// Event code wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CODES
// ============================================================================

/// Rule specification is missing a key or names an unusable mode
pub const MALFORMED_RULE: Code = Code::new("CMP001");

/// Number expression or regex pattern could not be parsed
pub const INVALID_OPERAND: Code = Code::new("CMP002");

/// Registry lookup or registration failed
pub const REGISTRY_FAILURE: Code = Code::new("CMP003");

/// Delegation exceeded the configured nesting depth
pub const NESTING_LIMIT: Code = Code::new("CMP004");

/// Actual value had the wrong shape for the requested mode
pub const SHAPE_MISMATCH: Code = Code::new("CMP010");

/// Short description for a code
pub fn get_description(code: Code) -> &'static str {
    match code.as_str() {
        "CMP001" => "Malformed rule specification",
        "CMP002" => "Invalid comparison operand",
        "CMP003" => "Comparator registry failure",
        "CMP004" => "Rule nesting limit exceeded",
        "CMP010" => "Actual value shape mismatch",
        _ => "Unknown code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_description() {
        for code in [
            MALFORMED_RULE,
            INVALID_OPERAND,
            REGISTRY_FAILURE,
            NESTING_LIMIT,
            SHAPE_MISMATCH,
        ] {
            assert_ne!(get_description(code), "Unknown code", "{}", code);
        }
    }
}
