//! File structure classification.

use super::list_files;
use crate::{
    cancellation::Cancellation,
    error::{Stage, Warning},
};
use anyhow::Result;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Extensions of files that are worth a manual look.
pub const SUSPICIOUS_EXTENSIONS: [&str; 5] = [".dex", ".so", ".xml", ".json", ".properties"];

/// File type histogram of the extracted package.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FileStructure {
    total_files: usize,
    extension_counts: BTreeMap<String, usize>,
    suspicious_files: Vec<PathBuf>,
}

impl FileStructure {
    /// Gets the number of files.
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Gets the number of files per lower-cased extension.
    ///
    /// Files without extension are counted under the empty string.
    pub fn extension_counts(&self) -> &BTreeMap<String, usize> {
        &self.extension_counts
    }

    /// Gets the files with a suspicious extension, relative to the extraction root.
    pub fn suspicious_files(&self) -> &[PathBuf] {
        &self.suspicious_files
    }

    fn add_file(&mut self, relative_path: &Path) {
        let extension = extension_of(relative_path);
        self.total_files += 1;
        if SUSPICIOUS_EXTENSIONS.contains(&extension.as_str()) {
            self.suspicious_files.push(relative_path.to_path_buf());
        }
        *self.extension_counts.entry(extension).or_insert(0) += 1;
    }
}

/// Gets the lower-cased extension of the path, with its leading dot.
///
/// Returns an empty string for files without extension, such as `LICENSE` or `.gitignore`.
pub fn extension_of<P: AsRef<Path>>(path: P) -> String {
    match path.as_ref().extension() {
        Some(extension) if !extension.is_empty() => {
            format!(".{}", extension.to_string_lossy().to_lowercase())
        }
        _ => String::new(),
    }
}

/// Classifies every file in the extracted package.
pub fn analysis<P: AsRef<Path>>(
    root: P,
    cancellation: &Cancellation,
) -> Result<(FileStructure, Vec<Warning>)> {
    let root = root.as_ref();
    let mut warnings = Vec::new();
    let mut structure = FileStructure::default();

    for file in list_files(root, Stage::FileStructure, &mut warnings) {
        cancellation.check(Stage::FileStructure)?;
        structure.add_file(file.strip_prefix(root).unwrap_or(&file));
    }

    Ok((structure, warnings))
}
