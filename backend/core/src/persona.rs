//! Agent persona table.
//!
//! Three fixed response-generation profiles. The table is read-only after
//! process start; personas are looked up by their lowercase tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MentorError;

/// A named response-generation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Debugger,
    Optimizer,
    Evaluator,
}

/// Static attributes of a persona.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub style: &'static str,
    pub greeting: &'static str,
}

static DEBUGGER: PersonaProfile = PersonaProfile {
    name: "Debugger",
    role: "Bug Hunter",
    style: "Technical, precise, and analytical. Focuses on finding errors, explaining root causes, and providing fixed code snippets.",
    greeting: "I am ready to analyze your code. Paste a snippet or upload a file, and I will identify the issues.",
};

static OPTIMIZER: PersonaProfile = PersonaProfile {
    name: "Optimizer",
    role: "Performance Specialist",
    style: "Efficiency-focused. Looks for O(n) improvements, memory leaks, and readable refactors.",
    greeting: "Let's make your code faster and cleaner. Show me what you have.",
};

static EVALUATOR: PersonaProfile = PersonaProfile {
    name: "Evaluator",
    role: "Code Reviewer",
    style: "Constructive and comprehensive. Evaluates best practices, security, and maintainability.",
    greeting: "I will review your implementation against industry standards. Please provide context.",
};

impl Persona {
    /// All personas, in display order.
    pub const ALL: [Persona; 3] = [Persona::Debugger, Persona::Optimizer, Persona::Evaluator];

    /// The lowercase tag used on the wire (`mode` form field, history keys).
    pub fn tag(&self) -> &'static str {
        match self {
            Persona::Debugger => "debugger",
            Persona::Optimizer => "optimizer",
            Persona::Evaluator => "evaluator",
        }
    }

    pub fn profile(&self) -> &'static PersonaProfile {
        match self {
            Persona::Debugger => &DEBUGGER,
            Persona::Optimizer => &OPTIMIZER,
            Persona::Evaluator => &EVALUATOR,
        }
    }
}

impl FromStr for Persona {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debugger" => Ok(Persona::Debugger),
            "optimizer" => Ok(Persona::Optimizer),
            "evaluator" => Ok(Persona::Evaluator),
            other => Err(MentorError::InvalidPersona(other.to_string())),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
