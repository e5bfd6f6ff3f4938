use crate::error::ConfigError;

const AUTH_ID: &str = "SMARTY_AUTH_ID";
const AUTH_TOKEN: &str = "SMARTY_AUTH_TOKEN";
const LICENSE: &str = "SMARTY_LICENSE";
const MAX_CANDIDATES: &str = "SMARTY_MAX_CANDIDATES";
const MATCH_STRATEGY: &str = "SMARTY_MATCH_STRATEGY";

pub const DEFAULT_LICENSE: &str = "us-core-cloud";
/// the US Street API never returns more than 10 candidates
pub const DEFAULT_MAX_CANDIDATES: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Strict,
    Invalid,
    Enhanced,
}

impl TryFrom<&str> for Strategy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "strict" => Ok(Strategy::Strict),
            "invalid" => Ok(Strategy::Invalid),
            "enhanced" => Ok(Strategy::Enhanced),
            _ => Err(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartyConfig {
    pub auth_id: String,
    pub auth_token: String,
    pub license: String,
    pub max_candidates: u8,
    pub strategy: Strategy,
}

impl SmartyConfig {
    /// load settings from `SMARTY_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let max_candidates = match optional(MAX_CANDIDATES) {
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=DEFAULT_MAX_CANDIDATES).contains(n))
                .ok_or(ConfigError::Invalid { name: MAX_CANDIDATES, value: raw })?,
            None => DEFAULT_MAX_CANDIDATES,
        };
        let strategy = match optional(MATCH_STRATEGY) {
            Some(raw) => Strategy::try_from(raw.trim())
                .map_err(|value| ConfigError::Invalid { name: MATCH_STRATEGY, value })?,
            None => Strategy::default(),
        };

        Ok(Self {
            auth_id: required(AUTH_ID)?,
            auth_token: required(AUTH_TOKEN)?,
            license: optional(LICENSE).unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
            max_candidates,
            strategy,
        })
    }
}
