//! Debugger persona: apply one or two canned textual "fixes" and wrap the
//! result in a debug report.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::{detect, Language};

/// Trailing colon with optional whitespace at end of input.
static TRAILING_COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*$").unwrap());

/// `print` followed by whitespace and something other than `(`, `"` or `'`.
/// The following character is captured and re-emitted after the inserted
/// paren, which stands in for a negative lookahead.
static BARE_PRINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"print\s+([^("'])"#).unwrap());

static PYTHON_FALLBACK: &str = "\n\n# Fixed: Added type hinting for clarity\ndef corrected_function(a: int, b: int) -> int:\n    return a + b";

/// Apply the canned corrections for the detected language. Returns the
/// "fixed" text; if no substitution changed anything, a fixed illustrative
/// snippet is appended instead.
fn fix_code(input: &str, lang: Language) -> String {
    match lang {
        Language::Python => {
            let fixed =
                TRAILING_COLON_RE.replace(input, ":\n    # Added missing indentation pass");
            let fixed = BARE_PRINT_RE.replace(&fixed, "print(${1}");
            if fixed == input {
                format!("{input}{PYTHON_FALLBACK}")
            } else {
                format!("{fixed}\n    # Logic verified")
            }
        }
        Language::Javascript => {
            let fixed = input.replace("var ", "let ");
            if fixed == input {
                format!(
                    "{input}\n\n// Fixed: Added error handling\ntry {{\n    {input}\n}} catch (e) {{\n    console.error(e);\n}}"
                )
            } else {
                fixed
            }
        }
    }
}

/// Build the full debugger report for one input snippet.
pub fn respond(input: &str) -> String {
    let lang = detect(input);
    let fixed = fix_code(input, lang);

    format!(
        "### 🐞 Debug Report\n\n\
         I have analyzed your **{lang}** code.\n\n\
         **Issue Detected:** Potential syntax ambiguity or lack of robustness.\n\n\
         **Corrected Code:**\n\
         ```{lang}\n\
         {fixed}\n\
         ```\n\n\
         I have refined the code to adhere to best practices."
    )
}
