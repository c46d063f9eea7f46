//! Simulated response generation.
//!
//! There is no model behind this: each persona applies a handful of textual
//! substitutions to the user's last message and wraps the result in a fixed
//! report template. Output is deterministic; the only randomness in the
//! system lives in the gateway's emit pacing.

pub mod debugger;
pub mod evaluator;
pub mod language;
pub mod optimizer;

use tracing::debug;

use mentor_core::{AttachedFile, Persona};

pub use language::{detect, Language};

/// Produce the complete response text for one turn.
///
/// Persona validation happens at the boundary (parsing the tag), so this
/// cannot fail: every input, including the empty string, yields some text.
/// When files are attached the persona logic is skipped entirely and only
/// the filenames are acknowledged; contents are never inspected.
pub fn synthesize(persona: Persona, last_user_text: &str, files: &[AttachedFile]) -> String {
    if !files.is_empty() {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        debug!(count = files.len(), "Acknowledging file upload");
        return format!(
            "I received {} file(s): **{}**. \n\nI am analyzing the contents...",
            files.len(),
            names.join(", ")
        );
    }

    match persona {
        Persona::Debugger => debugger::respond(last_user_text),
        Persona::Optimizer => optimizer::respond(last_user_text),
        Persona::Evaluator => evaluator::respond(last_user_text),
    }
}
