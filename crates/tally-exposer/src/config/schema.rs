use std::net::SocketAddr;

use serde::Deserialize;
use tally_core::error::{Result, TallyError};
use tally_core::{JsonSerializer, Serializer, TextSerializer};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    pub version: u32,

    #[serde(default)]
    pub exposer: ExposerSection,
}

impl TallyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TallyError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.exposer.validate()
    }
}

/// Rendering used for the metrics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    /// Serializer that renders scrapes in this format.
    pub fn serializer(self) -> &'static dyn Serializer {
        match self {
            Format::Text => &TextSerializer,
            Format::Json => &JsonSerializer,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExposerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub format: Format,
}

impl Default for ExposerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            format: Format::default(),
        }
    }
}

impl ExposerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') || self.path.len() < 2 {
            return Err(TallyError::BadConfig(
                "exposer.path must start with '/' and name a route".into(),
            ));
        }
        if self.path == "/healthz" {
            return Err(TallyError::BadConfig(
                "exposer.path collides with /healthz".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            TallyError::BadConfig(format!(
                "exposer.listen must be a valid SocketAddr, got {:?}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:9100".into()
}
fn default_path() -> String {
    "/metrics".into()
}
