//! Site content and settings, embedded from `config/site.json`.

use crate::logging::{log_event, LogLevel, DEFAULT_LOG_LEVEL};
use crate::motion::DEFAULT_ROLES;
use serde::Deserialize;
use serde_json::json;

const EMBEDDED_SITE_CONFIG: &str = include_str!("../config/site.json");

#[derive(Debug, thiserror::Error)]
pub enum SiteConfigError {
    #[error("site config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("site config field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub owner_name: String,
    #[serde(default)]
    pub tagline: String,
    pub contact_email: String,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Skill {
    pub name: String,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Stat {
    pub label: String,
    pub target: f64,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner_name: "Portfolio".to_string(),
            tagline: String::new(),
            contact_email: "hello@example.com".to_string(),
            log_level: None,
            roles: DEFAULT_ROLES.iter().map(ToString::to_string).collect(),
            about: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            stats: Vec::new(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SiteConfigError> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Embedded config, or the built-in defaults when it does not validate.
    pub fn embedded() -> Self {
        match Self::from_json(EMBEDDED_SITE_CONFIG) {
            Ok(config) => config,
            Err(error) => {
                log_event(
                    LogLevel::Warn,
                    "site_config_rejected",
                    json!({ "error": error.to_string() }),
                );
                Self::default()
            }
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    fn validate(&self) -> Result<(), SiteConfigError> {
        if self.owner_name.trim().is_empty() {
            return Err(SiteConfigError::Invalid {
                field: "ownerName",
                reason: "must not be empty".to_string(),
            });
        }

        if !self.contact_email.contains('@') {
            return Err(SiteConfigError::Invalid {
                field: "contactEmail",
                reason: format!("`{}` is not an email address", self.contact_email),
            });
        }

        if self.roles.iter().all(|role| role.is_empty()) {
            return Err(SiteConfigError::Invalid {
                field: "roles",
                reason: "needs at least one non-empty role".to_string(),
            });
        }

        if let Some(skill) = self
            .skills
            .iter()
            .find(|skill| !(0.0..=100.0).contains(&skill.percent))
        {
            return Err(SiteConfigError::Invalid {
                field: "skills",
                reason: format!("`{}` percent {} is outside 0..=100", skill.name, skill.percent),
            });
        }

        Ok(())
    }
}
