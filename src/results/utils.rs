//! Utilities for the results.

use anyhow::{Context, Result};
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::{fs::File, io::Read, path::Path};

/// Digests of the package archive, as lower-case hexadecimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerPrint {
    md5: String,
    sha1: String,
    sha256: String,
}

impl FingerPrint {
    /// Computes the fingerprint of the given package.
    pub fn new<P: AsRef<Path>>(package: P) -> Result<Self> {
        let package = package.as_ref();
        let mut f = File::open(package)
            .with_context(|| format!("could not open {} to fingerprint it", package.display()))?;
        let mut buffer = Vec::new();
        let _ = f.read_to_end(&mut buffer)?;

        Ok(Self {
            md5: format!("{:x}", md5::compute(&buffer)),
            sha1: hex::encode(Sha1::digest(&buffer)),
            sha256: hex::encode(Sha256::digest(&buffer)),
        })
    }

    /// Gets the MD5 digest.
    pub fn md5(&self) -> &str {
        &self.md5
    }

    /// Gets the SHA-1 digest.
    pub fn sha1(&self) -> &str {
        &self.sha1
    }

    /// Gets the SHA-256 digest.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}
