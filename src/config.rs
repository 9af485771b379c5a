// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `UPLOAD_DIR` | Directory uploads are written to | `uploads` |
//! | `UPLOAD_MAX_BYTES` | Request body limit for uploads | `10485760` |
//! | `TOKEN_ALGORITHM` | `HS256`, `HS384` or `HS512` | `HS256` |
//! | `TOKEN_SECRET` | Signing key | Generated per process |
//! | `TOKEN_SECRET_FILE` | File holding the signing key, re-read on `SIGHUP` | Unset |
//! | `TOKEN_USERS` | `user:password` pairs, comma separated | Unset (any username accepted) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::auth::secret::{parse_algorithm, SecretError, SecretMaterial};
use crate::auth::StaticIdentities;
use crate::storage::paths::UPLOAD_ROOT;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";
pub const UPLOAD_MAX_BYTES_ENV: &str = "UPLOAD_MAX_BYTES";
pub const TOKEN_ALGORITHM_ENV: &str = "TOKEN_ALGORITHM";
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";
pub const TOKEN_SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
pub const TOKEN_USERS_ENV: &str = "TOKEN_USERS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("TOKEN_SECRET and TOKEN_SECRET_FILE are mutually exclusive")]
    ConflictingSecrets,
    #[error("failed to read {path:?}: {source}")]
    SecretFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Secret(#[from] SecretError),
}

/// Where the signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Key given directly in the environment
    Inline(Vec<u8>),
    /// Key read from a file; re-read on reload
    File(PathBuf),
    /// Random key generated at startup
    Ephemeral,
}

impl fmt::Debug for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretSource::Inline(_) => f.write_str("Inline([REDACTED])"),
            SecretSource::File(path) => f.debug_tuple("File").field(path).finish(),
            SecretSource::Ephemeral => f.write_str("Ephemeral"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub token_algorithm: Algorithm,
    pub secret_source: SecretSource,
    /// `None` means open issuance: any non-empty username gets a token.
    pub users: Option<StaticIdentities>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let host = vars
            .get(HOST_ENV)
            .cloned()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = parse_or(vars, PORT_ENV, DEFAULT_PORT)?;

        let upload_dir = vars
            .get(UPLOAD_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(UPLOAD_ROOT));

        let upload_max_bytes = parse_or(vars, UPLOAD_MAX_BYTES_ENV, DEFAULT_UPLOAD_MAX_BYTES)?;

        let token_algorithm = match vars.get(TOKEN_ALGORITHM_ENV) {
            Some(name) => parse_algorithm(name)?,
            None => Algorithm::HS256,
        };

        let secret_source = match (vars.get(TOKEN_SECRET_ENV), vars.get(TOKEN_SECRET_FILE_ENV)) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingSecrets),
            (Some(secret), None) => {
                if secret.is_empty() {
                    return Err(SecretError::EmptyKey.into());
                }
                SecretSource::Inline(secret.as_bytes().to_vec())
            }
            (None, Some(path)) => SecretSource::File(PathBuf::from(path)),
            (None, None) => SecretSource::Ephemeral,
        };

        let users = match vars.get(TOKEN_USERS_ENV) {
            Some(list) => Some(parse_users(list)?),
            None => None,
        };

        let log_format = match vars.get(LOG_FORMAT_ENV).map(|s| s.to_ascii_lowercase()) {
            Some(format) if format == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host,
            port,
            upload_dir,
            upload_max_bytes,
            token_algorithm,
            secret_source,
            users,
            log_format,
        })
    }

    /// `host:port` string to bind to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the signing material described by this configuration.
    ///
    /// File-backed keys are read from disk on every call, which is what a
    /// reload relies on.
    pub fn load_secret(&self) -> Result<SecretMaterial, ConfigError> {
        match &self.secret_source {
            SecretSource::Inline(key) => Ok(SecretMaterial::new(key.clone(), self.token_algorithm)?),
            SecretSource::File(path) => {
                let contents = std::fs::read(path).map_err(|source| ConfigError::SecretFile {
                    path: path.clone(),
                    source,
                })?;
                let key = trim_trailing_newlines(contents);
                Ok(SecretMaterial::new(key, self.token_algorithm)?)
            }
            SecretSource::Ephemeral => Ok(SecretMaterial::ephemeral(self.token_algorithm)?),
        }
    }
}

fn parse_or<T>(vars: &HashMap<String, String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match vars.get(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

fn parse_users(list: &str) -> Result<StaticIdentities, ConfigError> {
    let mut users = HashMap::new();
    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, password) = entry
            .split_once(':')
            .filter(|(username, _)| !username.is_empty())
            .ok_or_else(|| ConfigError::InvalidValue {
                name: TOKEN_USERS_ENV,
                reason: "entries must look like user:password".to_string(),
            })?;
        users.insert(username.to_string(), password.to_string());
    }
    Ok(StaticIdentities::new(users))
}

fn trim_trailing_newlines(mut bytes: Vec<u8>) -> Vec<u8> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    bytes
}
