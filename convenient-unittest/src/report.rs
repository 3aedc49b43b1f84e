//! Human-readable assertion failure reports.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const HEAVY_RULE: &str =
    "======================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------------";

/// A failed assertion inside a test case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssertionFailure {
    /// Test function name
    pub test: String,
    /// Suite (test case group) name
    pub suite: String,
    /// Source file of the assertion
    pub file: String,
    /// Source line of the assertion
    pub line: u32,
    /// Asserted expression as written
    pub expr: String,
    /// Optional user message
    pub message: Option<String>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEAVY_RULE}")?;
        writeln!(f, "FAIL:\t\t{}\t\t({}.{})", self.test, self.suite, self.test)?;
        writeln!(f, "{LIGHT_RULE}")?;
        writeln!(f, "Traceback...")?;
        writeln!(
            f,
            "\tFile \"{}\", line {}, in {}",
            self.file, self.line, self.test
        )?;
        match &self.message {
            Some(message) => writeln!(f, "AssertionError:\t \"{}\",\t\"{message}\" ", self.expr)?,
            None => writeln!(f, "AssertionError:\t \"{}\"", self.expr)?,
        }
        writeln!(f)
    }
}
