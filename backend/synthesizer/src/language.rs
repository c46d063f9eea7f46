//! Heuristic language classification.
//!
//! Substring sniffing, not parsing. Exactly two languages are supported and
//! anything ambiguous falls through to JavaScript; adversarial input will be
//! misclassified and that is accepted behavior.

use std::fmt;

/// The two languages the synthesizer knows how to "fix".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Javascript,
}

impl Language {
    /// Label used for markdown code fences and report text.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const PYTHON_MARKERS: [&str; 3] = ["def ", "import ", "print("];
const JAVASCRIPT_MARKERS: [&str; 3] = ["function ", "const ", "console.log"];

/// Classify a snippet. Checks are case-sensitive, python markers win, and the
/// default is JavaScript when nothing matches.
pub fn detect(code: &str) -> Language {
    if PYTHON_MARKERS.iter().any(|m| code.contains(m)) {
        return Language::Python;
    }
    if JAVASCRIPT_MARKERS.iter().any(|m| code.contains(m)) {
        return Language::Javascript;
    }
    Language::Javascript
}
