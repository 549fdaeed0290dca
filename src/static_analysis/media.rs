//! Image extraction.
//!
//! Images are copied out of the extracted package into a separate folder, keeping their relative
//! paths, so they can be reviewed and packed in the evidence bundle.

use super::{list_files, structure::extension_of};
use crate::{
    cancellation::Cancellation,
    error::{Stage, Warning},
};
use anyhow::Result;
use filetime::{set_file_times, FileTime};
use log::debug;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Extensions of the files considered images.
pub const IMAGE_EXTENSIONS: [&str; 8] = [
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".ico", ".svg",
];

/// Result of the image extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaExtraction {
    folder: PathBuf,
    copied: usize,
}

impl MediaExtraction {
    /// Gets the folder where images were copied.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Gets the number of copied images.
    pub fn copied(&self) -> usize {
        self.copied
    }
}

/// Copies every image under `root` into `output`, recreating its relative folder.
///
/// A failed copy does not stop the extraction: it is returned as a warning for that file.
pub fn extract_images<P: AsRef<Path>, O: AsRef<Path>>(
    root: P,
    output: O,
    cancellation: &Cancellation,
) -> Result<(MediaExtraction, Vec<Warning>)> {
    let root = root.as_ref();
    let output = output.as_ref();
    let mut warnings = Vec::new();
    let mut copied = 0;

    if output.exists() {
        if let Err(e) = fs::remove_dir_all(output) {
            warnings.push(Warning::new(
                Stage::Media,
                output,
                format!("could not remove the previous images: {}", e),
            ));
        }
    }

    if let Err(e) = fs::create_dir_all(output) {
        warnings.push(Warning::new(
            Stage::Media,
            output,
            format!("could not create the image folder: {}", e),
        ));
    }

    for file in list_files(root, Stage::Media, &mut warnings) {
        cancellation.check(Stage::Media)?;

        let relative = file.strip_prefix(root).unwrap_or(&file);
        if !IMAGE_EXTENSIONS.contains(&extension_of(relative).as_str()) {
            continue;
        }

        match copy_preserving_times(&file, &output.join(relative)) {
            Ok(()) => copied += 1,
            Err(e) => warnings.push(Warning::new(Stage::Media, relative, e)),
        }
    }

    debug!("{} images copied to {}", copied, output.display());

    Ok((
        MediaExtraction {
            folder: output.to_path_buf(),
            copied,
        },
        warnings,
    ))
}

/// Copies a file, keeping its permissions and timestamps where the platform allows it.
fn copy_preserving_times(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    let _ = fs::copy(from, to)?;

    let metadata = fs::metadata(from)?;
    set_file_times(
        to,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;

    Ok(())
}
