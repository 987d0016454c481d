//! Document reader for RetroTector JSON output
//!
//! Only the top-level shape is checked here: `header` and `footer` must be
//! objects, `soloLTRs` and `pseuGID` must be sequences. Every section may be
//! absent or `null`. The contents are left as raw JSON for the mappers.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Errors raised while obtaining a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One RetroTector output document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    header: Option<Map<String, Value>>,
    #[serde(default)]
    footer: Option<Map<String, Value>>,
    #[serde(rename = "soloLTRs", default)]
    solo_ltrs: Option<Vec<Value>>,
    #[serde(rename = "pseuGID", default)]
    chain_blocks: Option<Vec<Value>>,
}

impl Document {
    /// Read and parse a document file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn header(&self) -> Option<&Map<String, Value>> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&Map<String, Value>> {
        self.footer.as_ref()
    }

    /// Root-level LTRs not attached to any chain
    pub fn solo_ltrs(&self) -> &[Value] {
        self.solo_ltrs.as_deref().unwrap_or_default()
    }

    /// Chain blocks (`pseuGID`) in source order
    pub fn chain_blocks(&self) -> &[Value] {
        self.chain_blocks.as_deref().unwrap_or_default()
    }
}
