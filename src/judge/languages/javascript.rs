//! JavaScript language profile

use std::sync::LazyLock;

use super::LanguageProfile;
use crate::constants::container_images;

static PROFILE: LazyLock<LanguageProfile> = LazyLock::new(|| {
    LanguageProfile::new(
        "javascript",
        container_images::JAVASCRIPT,
        "main.js",
        "node main.js",
        &["function", "=>", "const ", "let "],
        &[
            r"(?i)\brequire\s*\(",
            r"(?i)\bimport\s",
            r"(?i)\beval\s*\(",
            r"(?i)\bprocess\s*\.",
            r"(?i)child_process",
            // Function constructor only; must stay case-sensitive so plain
            // `function (...)` expressions are not caught.
            r"\bFunction\s*\(",
        ],
    )
});

/// Get the JavaScript profile
pub fn profile() -> &'static LanguageProfile {
    &PROFILE
}
