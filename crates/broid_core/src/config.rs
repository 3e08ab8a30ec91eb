// config.rs: JSON-configured builder field lists
use serde::Deserialize;
use std::fs;
use tracing::debug;

use crate::builder::BrowserIdBuilder;
use crate::error::ConfigError;
use crate::field::{cookie_field, cookie_number_field, header_field, FieldFunc};

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind { Header, Cookie, CookieNumber }

#[derive(Deserialize, Clone, Debug)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub key: String,
}

impl FieldSpec {
    pub fn to_field(&self) -> FieldFunc {
        match self.kind {
            FieldKind::Header => header_field(self.key.as_str()),
            FieldKind::Cookie => cookie_field(self.key.as_str()),
            FieldKind::CookieNumber => cookie_number_field(self.key.as_str()),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct BuilderConfig {
    pub version: Option<u32>,
    #[serde(default)]
    pub include_defaults: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl BuilderConfig {
    pub fn into_builder(self) -> BrowserIdBuilder {
        let mut b = if self.include_defaults {
            BrowserIdBuilder::with_default_fields()
        } else {
            BrowserIdBuilder::new()
        };
        for field in &self.fields {
            b.add_field(field.to_field());
        }
        b
    }
}

pub fn builder_from_json(json: &str) -> Result<BrowserIdBuilder, ConfigError> {
    let cfg: BuilderConfig = serde_json::from_str(json)?;
    if let Some(v) = cfg.version {
        if v != 1 {
            return Err(ConfigError::UnsupportedVersion(v));
        }
    }
    let builder = cfg.into_builder();
    debug!(fields = builder.len(), "loaded browser id builder config");
    Ok(builder)
}

pub fn load_builder(path: &str) -> Result<BrowserIdBuilder, ConfigError> {
    let data = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
    builder_from_json(&data)
}
