//! Module containing the manifest analysis logic.
//!
//! Manifests inside packages are usually stored as binary XML, so the default decoder does not
//! parse them: it looks for permission identifiers and component declarations in whatever text
//! fragments survive a lossy decode. Decoders are pluggable through [`ManifestDecoder`].

mod pattern;
mod xml;

pub use self::{pattern::PatternDecoder, xml::XmlDecoder};
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Location of the manifest inside the extracted package.
pub const MANIFEST_FILE: &str = "AndroidManifest.xml";

/// Signals extracted from the manifest.
///
/// Repeated declarations are kept, since they reflect the raw occurrence count.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestSignals {
    permissions: Vec<String>,
    activities: Vec<String>,
    services: Vec<String>,
    error: Option<String>,
}

impl ManifestSignals {
    /// Creates a new set of manifest signals.
    pub fn new(permissions: Vec<String>, activities: Vec<String>, services: Vec<String>) -> Self {
        Self {
            permissions,
            activities,
            services,
            error: None,
        }
    }

    /// Creates empty signals for a manifest that could not be decoded.
    pub fn with_error<S: Into<String>>(error: S) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Gets the requested permissions.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Gets the declared activity names.
    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    /// Gets the declared service names.
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Gets the decode error, if the manifest could not be read.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Turns the raw bytes of a manifest into signals.
pub trait ManifestDecoder {
    /// Short name of the decoder, for logging.
    fn name(&self) -> &'static str;

    /// Decodes the manifest bytes.
    fn decode(&self, bytes: &[u8]) -> Result<ManifestSignals>;
}

/// Available manifest decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// Pattern matching over the lossy decoded bytes.
    Pattern,
    /// Plain text XML parsing.
    Xml,
}

impl Default for DecoderKind {
    fn default() -> Self {
        Self::Pattern
    }
}

impl DecoderKind {
    /// Creates the decoder.
    pub fn decoder(self) -> Box<dyn ManifestDecoder> {
        match self {
            Self::Pattern => Box::new(PatternDecoder),
            Self::Xml => Box::new(XmlDecoder),
        }
    }
}

/// Performs the manifest analysis.
///
/// A missing manifest yields empty signals. A manifest that cannot be read or decoded yields
/// empty signals with the error set; it never stops the analysis.
pub fn analysis<P: AsRef<Path>>(root: P, decoder: &dyn ManifestDecoder) -> ManifestSignals {
    let path = root.as_ref().join(MANIFEST_FILE);
    if !path.is_file() {
        debug!("no {} found in the package", MANIFEST_FILE);
        return ManifestSignals::default();
    }

    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) => return ManifestSignals::with_error(format!("could not read the manifest: {}", e)),
    };

    debug!("decoding the manifest with the {} decoder", decoder.name());
    match decoder.decode(&bytes) {
        Ok(signals) => signals,
        Err(e) => ManifestSignals::with_error(format!("could not decode the manifest: {:#}", e)),
    }
}
