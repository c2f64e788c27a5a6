//! Source validator
//!
//! Static pre-checks run before any execution is attempted. Validation is a
//! pure function over its inputs: a failure here is surfaced to the caller
//! immediately and never creates a submission with execution results.

use crate::{
    constants::MAX_SOURCE_CODE_SIZE,
    error::{AppError, AppResult},
    judge::languages::LanguageProfile,
};

/// Validate submitted source code for a language.
///
/// Rejects, in order: empty or whitespace-only code, oversized code, code
/// matching the language's deny-list of capability-escalating constructs,
/// and code with no plausible callable unit. A deny-list match is an
/// unconditional rejection, never a warning.
pub fn validate(code: &str, language: &str) -> AppResult<()> {
    let profile = LanguageProfile::for_language(language)
        .map_err(|_| AppError::Validation(format!("Unsupported language: {}", language)))?;

    if code.trim().is_empty() {
        return Err(AppError::Validation("Code cannot be empty".to_string()));
    }

    if code.len() > MAX_SOURCE_CODE_SIZE {
        return Err(AppError::Validation(format!(
            "Source code exceeds maximum size of {} bytes",
            MAX_SOURCE_CODE_SIZE
        )));
    }

    for pattern in profile.deny_patterns() {
        if pattern.is_match(code) {
            return Err(AppError::Validation(
                "Code contains potentially dangerous operations".to_string(),
            ));
        }
    }

    let plausible = profile
        .plausibility_markers()
        .iter()
        .any(|marker| code.contains(marker));
    if !plausible {
        return Err(AppError::Validation(format!(
            "Code does not look like valid {} source",
            profile.language()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::languages;

    #[test]
    fn test_empty_code_is_rejected_for_every_language() {
        for lang in languages::ALL {
            assert!(validate("", lang).is_err());
            assert!(validate("   \n\t  ", lang).is_err());
        }
    }

    #[test]
    fn test_valid_python_is_accepted() {
        let code = "def reverse(s):\n    return s[::-1]\n\nprint(reverse(input()))\n";
        assert!(validate(code, "python").is_ok());
    }

    #[test]
    fn test_valid_javascript_is_accepted() {
        let code = "const reverse = (s) => s.split('').reverse().join('');\n";
        assert!(validate(code, "javascript").is_ok());
    }

    #[test]
    fn test_banned_construct_rejected_despite_valid_syntax() {
        let code = "def solve():\n    import os\n    return 1\n";
        assert!(validate(code, "python").is_err());

        let code = "function f() { return require('fs'); }";
        assert!(validate(code, "javascript").is_err());
    }

    #[test]
    fn test_process_invocation_pattern_is_rejected() {
        let code = "def solve():\n    subprocess.run(['ls'])\n";
        assert!(validate(code, "python").is_err());

        let code = "const x = () => process.exit(0);";
        assert!(validate(code, "javascript").is_err());
    }

    #[test]
    fn test_dynamic_evaluation_is_rejected() {
        assert!(validate("def f():\n    eval('1+1')\n", "python").is_err());
        assert!(validate("const f = () => eval('1');", "javascript").is_err());
    }

    #[test]
    fn test_implausible_code_is_rejected() {
        // No callable unit at all
        assert!(validate("1 + 1", "python").is_err());
        assert!(validate("42;", "javascript").is_err());
    }

    #[test]
    fn test_oversized_code_is_rejected() {
        let code = format!("def f():\n    pass\n# {}", "x".repeat(MAX_SOURCE_CODE_SIZE));
        assert!(validate(&code, "python").is_err());
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(validate("def f(): pass", "brainfuck").is_err());
    }
}
