//! Env-file configuration for the five CI/CD stack services.
//!
//! # Design
//! Service URLs and tokens resolve with precedence environment > file >
//! built-in default. The file is a dotenv-style env file; loading it never
//! overwrites variables already present in the process environment, which is
//! what gives the environment its precedence. Per service `NAME`, `NAME_URL`
//! overrides the default URL and `NAME_TOKEN` is required.

use std::env;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for one service on the CI/CD network.
///
/// The URL's hostname or IP must match the service's TLS certificate for
/// connections to succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub url: String,
    /// Token or password for the service API. Which kind each service expects
    /// is documented by the service itself.
    pub token: Option<String>,
}

/// Aggregates all service configs into one manageable object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Source control.
    pub gitlab: ServiceConfig,
    /// Build server.
    pub jenkins: ServiceConfig,
    /// Code-quality server.
    pub sonarqube: ServiceConfig,
    /// Artifact repository.
    pub artifactory: ServiceConfig,
    /// Chat hub.
    pub mattermost: ServiceConfig,
}

/// Loads a [`GlobalConfig`] from an env file.
///
/// Required variables: `GITLAB_TOKEN`, `JENKINS_TOKEN`, `SONARQUBE_TOKEN`,
/// `ARTIFACTORY_TOKEN`, `MATTERMOST_TOKEN`. Optional `*_URL` variables
/// override the built-in stack URLs.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the default location, `~/data/cicd.env`.
    ///
    /// Precedence: environment > default file > built-in URLs.
    pub fn load_default() -> Result<GlobalConfig, ConfigError> {
        Self::from_file(default_config_path())
    }

    /// Load from a caller-supplied env file, for stacks that deviate from the
    /// default layout.
    ///
    /// Precedence: environment > file > built-in URLs.
    pub fn from_file(path: impl AsRef<Path>) -> Result<GlobalConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        // dotenv leaves variables already in the environment untouched,
        // which is exactly the precedence we want.
        dotenv::from_path(path).map_err(|e| ConfigError::FileInvalid {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        debug!("loaded configuration from {}", path.display());

        Ok(GlobalConfig {
            gitlab: resolve_service("gitlab", "https://gitlab.cicd.local:10300")?,
            jenkins: resolve_service("jenkins", "https://jenkins.cicd.local:10400")?,
            sonarqube: resolve_service("sonarqube", "http://sonarqube.cicd.local:9000")?,
            artifactory: resolve_service("artifactory", "https://artifactory.cicd.local:8082")?,
            mattermost: resolve_service("mattermost", "https://mattermost.cicd.local:8065")?,
        })
    }
}

fn default_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("data").join("cicd.env"),
        None => PathBuf::from("~/data/cicd.env"),
    }
}

fn resolve_service(name: &'static str, default_url: &str) -> Result<ServiceConfig, ConfigError> {
    let upper = name.to_uppercase();
    let url = env::var(format!("{upper}_URL")).unwrap_or_else(|_| default_url.to_string());
    let token = match env::var(format!("{upper}_TOKEN")) {
        Ok(token) => token,
        Err(_) => return Err(ConfigError::MissingToken(name)),
    };
    debug!("resolved {name} at {url}");
    Ok(ServiceConfig {
        url,
        token: Some(token),
    })
}
