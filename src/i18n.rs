//! Localized user-facing notices

use serde::{Deserialize, Serialize};

/// Display language for notices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Vietnamese
    Vi,
}

/// Notices the session manager can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Shown once per forced logout
    SessionExpired,
}

impl Notice {
    /// Localized text for this notice
    pub fn message(&self, language: Language) -> &'static str {
        match (self, language) {
            (Notice::SessionExpired, Language::En) => {
                "Your session has expired. Please log in again."
            }
            (Notice::SessionExpired, Language::Vi) => {
                "Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại."
            }
        }
    }
}
