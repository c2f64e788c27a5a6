//! Language capability profiles
//!
//! Each supported language registers one profile describing how to validate
//! and execute code for it. Dispatch is by language tag; adding a language
//! means adding a profile module and a registry arm, without touching the
//! scheduling logic.

pub mod javascript;
pub mod python;

use regex::Regex;

use crate::{constants, error::AppResult};

/// Capability profile for one supported language
#[derive(Debug)]
pub struct LanguageProfile {
    language: &'static str,
    image: &'static str,
    source_file: &'static str,
    run_command: &'static str,
    /// At least one of these substrings must appear for the code to be a
    /// plausible callable unit
    plausibility_markers: &'static [&'static str],
    /// Capability-escalating constructs; any match is an unconditional
    /// rejection
    deny_patterns: Vec<Regex>,
}

impl LanguageProfile {
    fn new(
        language: &'static str,
        image: &'static str,
        source_file: &'static str,
        run_command: &'static str,
        plausibility_markers: &'static [&'static str],
        deny_patterns: &[&str],
    ) -> Self {
        let deny_patterns = deny_patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid deny-list pattern"))
            .collect();

        Self {
            language,
            image,
            source_file,
            run_command,
            plausibility_markers,
            deny_patterns,
        }
    }

    /// Get the profile for a specific language tag
    pub fn for_language(language: &str) -> AppResult<&'static Self> {
        match language {
            constants::languages::PYTHON => Ok(python::profile()),
            constants::languages::JAVASCRIPT => Ok(javascript::profile()),
            _ => Err(anyhow::anyhow!("Unsupported language: {}", language).into()),
        }
    }

    /// Language tag
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Container image the sandbox runs this language in
    pub fn image(&self) -> &'static str {
        self.image
    }

    /// File name the source code is written to inside the sandbox
    pub fn source_file(&self) -> &'static str {
        self.source_file
    }

    /// Interpreter invocation for the source file
    pub fn run_command(&self) -> &'static str {
        self.run_command
    }

    /// Markers of a callable unit for the plausibility pre-check
    pub fn plausibility_markers(&self) -> &'static [&'static str] {
        self.plausibility_markers
    }

    /// Compiled deny-list patterns for this language
    pub fn deny_patterns(&self) -> &[Regex] {
        &self.deny_patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_supported_languages() {
        for tag in constants::languages::ALL {
            let profile = LanguageProfile::for_language(tag).unwrap();
            assert_eq!(profile.language(), *tag);
            assert!(!profile.deny_patterns().is_empty());
            assert!(!profile.plausibility_markers().is_empty());
        }
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(LanguageProfile::for_language("cobol").is_err());
    }
}
