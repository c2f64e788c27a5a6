//! Python language profile

use std::sync::LazyLock;

use super::LanguageProfile;
use crate::constants::container_images;

static PROFILE: LazyLock<LanguageProfile> = LazyLock::new(|| {
    LanguageProfile::new(
        "python",
        container_images::PYTHON,
        "main.py",
        "python3 main.py",
        &["def ", "lambda"],
        // Module loading, process spawning and dynamic evaluation are all
        // unconditional rejections.
        &[
            r"(?i)\bimport\s",
            r"(?i)__import__",
            r"(?i)\bsubprocess\b",
            r"(?i)\beval\s*\(",
            r"(?i)\bexec\s*\(",
            r"(?i)\bos\s*\.\s*system",
        ],
    )
});

/// Get the Python profile
pub fn profile() -> &'static LanguageProfile {
    &PROFILE
}
