//! Layered resolution of the three API secrets the scanner needs.
//!
//! Each secret is looked up first in the platform-managed secrets file (a flat
//! YAML map), then in the process environment. Absence is not an error at
//! this layer: callers check [`Credentials::status`] before running a scan, or
//! call [`Credentials::require`] to turn absence into
//! [`ConfigError::MissingCredentials`].

use std::collections::HashMap;
use std::path::Path;

use crate::ConfigError;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GOOGLE_CX_ID: &str = "GOOGLE_CX_ID";

/// Secrets resolved from the layered sources. Any of them may be missing.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cx_id: Option<String>,
}

/// All three secrets, guaranteed present.
#[derive(Clone)]
pub struct ResolvedCredentials {
    pub openai_api_key: String,
    pub google_api_key: String,
    pub google_cx_id: String,
}

/// Configuration status suitable for display before a scan is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStatus {
    pub missing: Vec<&'static str>,
}

impl CredentialStatus {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing.is_empty()
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.missing.is_empty() {
            write!(f, "configured")
        } else {
            write!(f, "not configured (missing: {})", self.missing.join(", "))
        }
    }
}

impl Credentials {
    /// Resolve credentials from the secrets file at `secrets_path`, falling
    /// back to the process environment.
    ///
    /// A missing secrets file is treated as an empty layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SecretsFileIo`] if the file exists but cannot be
    /// read, or [`ConfigError::SecretsFileParse`] if it is not a YAML map.
    pub fn load(secrets_path: &Path) -> Result<Self, ConfigError> {
        let secrets = load_secrets_file(secrets_path)?;
        Ok(Self::resolve(&secrets, |key| std::env::var(key)))
    }

    /// Resolve credentials from an already-loaded secrets layer and an env lookup.
    pub fn resolve<F>(secrets: &HashMap<String, String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let get = |key: &str| -> Option<String> {
            secrets
                .get(key)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| lookup(key).ok().filter(|v| !v.trim().is_empty()))
        };

        Self {
            openai_api_key: get(OPENAI_API_KEY),
            google_api_key: get(GOOGLE_API_KEY),
            google_cx_id: get(GOOGLE_CX_ID),
        }
    }

    #[must_use]
    pub fn status(&self) -> CredentialStatus {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if self.google_api_key.is_none() {
            missing.push(GOOGLE_API_KEY);
        }
        if self.google_cx_id.is_none() {
            missing.push(GOOGLE_CX_ID);
        }
        CredentialStatus { missing }
    }

    /// Require all three secrets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] naming every absent secret.
    pub fn require(&self) -> Result<ResolvedCredentials, ConfigError> {
        match (&self.openai_api_key, &self.google_api_key, &self.google_cx_id) {
            (Some(openai), Some(google), Some(cx)) => Ok(ResolvedCredentials {
                openai_api_key: openai.clone(),
                google_api_key: google.clone(),
                google_cx_id: cx.clone(),
            }),
            _ => Err(ConfigError::MissingCredentials(
                self.status()
                    .missing
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_cx_id",
                &self.google_cx_id.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl std::fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("openai_api_key", &"[redacted]")
            .field("google_api_key", &"[redacted]")
            .field("google_cx_id", &"[redacted]")
            .finish()
    }
}

/// Read the secrets layer. Returns an empty map when the file does not exist.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_secrets_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => {
            return Err(ConfigError::SecretsFileIo {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let secrets: HashMap<String, String> = serde_yaml::from_str(&content)?;
    Ok(secrets)
}
