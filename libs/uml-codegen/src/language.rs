//! Supported target languages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Java,
    Python,
    Ruby,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Cpp,
        Language::Java,
        Language::Python,
        Language::Ruby,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::Python => "Python",
            Language::Ruby => "Ruby",
        }
    }

    /// Identifier used on the command line and in configuration files
    pub fn id(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
            Language::Ruby => "ruby",
        }
    }

    /// All supported targets compare identifiers and file names verbatim.
    pub fn is_case_sensitive(&self) -> bool {
        true
    }

    /// Separator between package segments in qualified names
    pub fn package_separator(&self) -> &'static str {
        match self {
            Language::Cpp => "::",
            Language::Ruby => "::",
            Language::Java | Language::Python => ".",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "python" | "py" => Ok(Language::Python),
            "ruby" | "rb" => Ok(Language::Ruby),
            other => Err(Error::UnknownLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!(" py ".parse::<Language>().unwrap(), Language::Python);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_id_round_trips() {
        for language in Language::ALL {
            assert_eq!(language.id().parse::<Language>().unwrap(), language);
        }
    }
}
