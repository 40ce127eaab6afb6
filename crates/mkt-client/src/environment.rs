//! Platform environments.

use std::fmt;
use std::str::FromStr;

use mkt_model::InputError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Self::Sandbox, Self::Staging, Self::Production];

    /// Default API base URL, including the version segment.
    pub fn api_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandboxapi.ordercloud.io/v1",
            Self::Staging => "https://stagingapi.ordercloud.io/v1",
            Self::Production => "https://api.ordercloud.io/v1",
        }
    }

    /// Region new marketplaces are created in.
    pub fn region(self) -> &'static str {
        "us-west"
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Name the portal uses for the environment.
    pub fn portal_name(self) -> &'static str {
        match self {
            Self::Sandbox => "Sandbox",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InputError::InvalidEnvironment {
                name: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Sandbox".parse::<Environment>().ok(), Some(Environment::Sandbox));
        assert_eq!(" STAGING ".parse::<Environment>().ok(), Some(Environment::Staging));
        assert_eq!(
            "production".parse::<Environment>().ok(),
            Some(Environment::Production)
        );
    }

    #[test]
    fn unknown_names_are_input_errors() {
        let error = "qa".parse::<Environment>().expect_err("unknown environment");
        assert!(matches!(error, InputError::InvalidEnvironment { ref name } if name == "qa"));
    }
}
