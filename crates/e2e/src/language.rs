//! Locales supported by the signing application

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::E2eError;

/// A UI/document language of the application under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Sv,
    De,
    Fr,
    It,
    Es,
    Pt,
    Nl,
    Da,
    No,
    El,
    Fi,
    Is,
    Et,
    Lv,
    Lt,
    Cs,
    Pl,
    Hu,
}

impl Language {
    /// Every supported language, in the order test cases are generated
    pub const ALL: [Language; 19] = [
        Language::En,
        Language::Sv,
        Language::De,
        Language::Fr,
        Language::It,
        Language::Es,
        Language::Pt,
        Language::Nl,
        Language::Da,
        Language::No,
        Language::El,
        Language::Fi,
        Language::Is,
        Language::Et,
        Language::Lv,
        Language::Lt,
        Language::Cs,
        Language::Pl,
        Language::Hu,
    ];

    /// ISO 639-1 code as used by the document API
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sv => "sv",
            Language::De => "de",
            Language::Fr => "fr",
            Language::It => "it",
            Language::Es => "es",
            Language::Pt => "pt",
            Language::Nl => "nl",
            Language::Da => "da",
            Language::No => "no",
            Language::El => "el",
            Language::Fi => "fi",
            Language::Is => "is",
            Language::Et => "et",
            Language::Lv => "lv",
            Language::Lt => "lt",
            Language::Cs => "cs",
            Language::Pl => "pl",
            Language::Hu => "hu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == needle)
            .ok_or_else(|| E2eError::InvalidConfig(format!("Unsupported language: {}", s)))
    }
}
