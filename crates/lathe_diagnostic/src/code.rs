//! Diagnostic codes for the formatter.
//!
//! Format: one letter plus four digits. The letter is the tier, the first
//! digit the area:
//! - F0xxx: fatal input-structure defects (the render of that file aborts)
//! - W1xxx: doc-comment repairs and synthesis
//! - W2xxx: layout degradations

use std::fmt;

/// A diagnostic code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagCode {
    // Fatal input defects (F0xxx)
    /// An expected child node is missing
    F0001,
    /// Unmatched bracket or parenthesis token
    F0002,
    /// Comment chain out of source order
    F0003,

    // Doc-comment repairs (W1xxx)
    /// Missing `@param` tag inserted
    W1001,
    /// Misspelled `@param` name renamed by fuzzy match
    W1002,
    /// Obsolete `@param` tag dropped
    W1003,
    /// Missing doc comment, stub generated
    W1004,
    /// Missing file header
    W1005,

    // Layout degradations (W2xxx)
    /// Alignment column not representable under the all-tabs policy
    W2001,
}

impl DiagCode {
    /// Check whether this code aborts the render of its file.
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, DiagCode::F0001 | DiagCode::F0002 | DiagCode::F0003)
    }

    /// The code as displayed to users, e.g. `"W1002"`.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagCode::F0001 => "F0001",
            DiagCode::F0002 => "F0002",
            DiagCode::F0003 => "F0003",
            DiagCode::W1001 => "W1001",
            DiagCode::W1002 => "W1002",
            DiagCode::W1003 => "W1003",
            DiagCode::W1004 => "W1004",
            DiagCode::W1005 => "W1005",
            DiagCode::W2001 => "W2001",
        }
    }

    /// One-line description of what the code means.
    pub fn description(self) -> &'static str {
        match self {
            DiagCode::F0001 => "an expected child node is missing",
            DiagCode::F0002 => "unmatched bracket or parenthesis",
            DiagCode::F0003 => "comment chain is out of source order",
            DiagCode::W1001 => "missing @param tag inserted",
            DiagCode::W1002 => "misspelled @param name renamed",
            DiagCode::W1003 => "obsolete @param tag dropped",
            DiagCode::W1004 => "missing doc comment, stub generated",
            DiagCode::W1005 => "missing file header",
            DiagCode::W2001 => "alignment column rounded to a tab stop",
        }
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_tier_is_the_f_codes() {
        assert!(DiagCode::F0001.is_fatal());
        assert!(DiagCode::F0003.is_fatal());
        assert!(!DiagCode::W1001.is_fatal());
        assert!(!DiagCode::W2001.is_fatal());
    }

    #[test]
    fn display_matches_code_name() {
        assert_eq!(DiagCode::W1002.to_string(), "W1002");
        assert_eq!(DiagCode::F0002.as_str(), "F0002");
    }
}
