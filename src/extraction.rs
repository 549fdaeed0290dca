//! Package archive extraction and file inventory.

use crate::{
    cancellation::Cancellation,
    error::{ErrorKind, Stage},
};
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::{
    fmt,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::ZipArchive;

/// One extracted file: its path relative to the extraction root and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    path: PathBuf,
    size: u64,
}

impl InventoryEntry {
    /// Creates a new inventory entry.
    pub fn new<P: Into<PathBuf>>(path: P, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Gets the path of the file, relative to the extraction root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Inventory line: `<path> (<size> bytes)`.
impl fmt::Display for InventoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.path.display(), self.size)
    }
}

/// Decompresses the package in the given destination and returns its file inventory.
///
/// Every entry is extracted. Entry names are sanitized first, so components like `..` or a
/// leading `/` are dropped and nothing is written outside `destination`.
pub fn decompress<P: AsRef<Path>, D: AsRef<Path>>(
    package: P,
    destination: D,
    cancellation: &Cancellation,
) -> Result<Vec<InventoryEntry>> {
    let package = package.as_ref();
    let destination = destination.as_ref();

    let file = File::open(package).map_err(|e| {
        ErrorKind::archive(format!("could not open `{}`: {}", package.display(), e))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        ErrorKind::archive(format!(
            "`{}` is not a valid package: {}",
            package.display(),
            e
        ))
    })?;

    if archive.is_empty() {
        return Err(ErrorKind::archive(format!("`{}` is empty", package.display())).into());
    }

    fs::create_dir_all(destination).map_err(|e| {
        ErrorKind::archive(format!(
            "could not create the folder `{}`: {}",
            destination.display(),
            e
        ))
    })?;

    for i in 0..archive.len() {
        cancellation.check(Stage::Extraction)?;

        let mut entry = archive
            .by_index(i)
            .map_err(|e| ErrorKind::archive(format!("could not read entry #{}: {}", i, e)))?;
        let out_path = destination.join(entry.mangled_name());
        let extraction_error = |e: io::Error| {
            ErrorKind::archive(format!("could not extract `{}`: {}", out_path.display(), e))
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(extraction_error)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(extraction_error)?;
            }
            let mut out_file = File::create(&out_path).map_err(extraction_error)?;
            let _ = io::copy(&mut entry, &mut out_file).map_err(extraction_error)?;
        }
    }

    debug!(
        "{} archive entries extracted in {}",
        archive.len(),
        destination.display()
    );

    inventory(destination)
}

/// Lists every file under `root`, with paths relative to it, in file name order.
pub fn inventory<P: AsRef<Path>>(root: P) -> Result<Vec<InventoryEntry>> {
    let root = root.as_ref();
    let mut inventory = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ErrorKind::archive(format!("could not list the extracted files: {}", e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let size = entry
            .metadata()
            .map_err(|e| {
                ErrorKind::archive(format!(
                    "could not read the size of `{}`: {}",
                    entry.path().display(),
                    e
                ))
            })?
            .len();
        let path = entry.path().strip_prefix(root).unwrap_or_else(|_| entry.path());
        inventory.push(InventoryEntry::new(path, size));
    }

    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::{decompress, InventoryEntry};
    use crate::{cancellation::Cancellation, error::ErrorKind, test_utils::create_package};
    use std::{fs::File, io::Write, path::Path};

    fn archive_error(error: &anyhow::Error) -> bool {
        matches!(
            error.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::Archive { .. })
        )
    }

    #[test]
    fn it_decompress_inventory() {
        let temp = tempfile::tempdir().unwrap();
        let package = temp.path().join("app.apk");
        create_package(
            &package,
            &[
                ("AndroidManifest.xml", "<manifest/>"),
                ("classes.dex", "dex\n035"),
                ("res/drawable/icon.png", "PNG!"),
                ("res/values/strings.xml", ""),
            ],
        );

        let out = temp.path().join("out");
        let inventory = decompress(&package, &out, &Cancellation::new()).unwrap();

        assert_eq!(inventory.len(), 4);
        assert!(inventory.contains(&InventoryEntry::new("AndroidManifest.xml", 11)));
        assert!(inventory.contains(&InventoryEntry::new("classes.dex", 7)));
        assert!(inventory.contains(&InventoryEntry::new(
            Path::new("res").join("drawable").join("icon.png"),
            4
        )));
        assert!(inventory.contains(&InventoryEntry::new(
            Path::new("res").join("values").join("strings.xml"),
            0
        )));
        assert!(out.join("res").join("drawable").join("icon.png").is_file());
    }

    #[test]
    fn it_decompress_sanitizes_traversal() {
        let temp = tempfile::tempdir().unwrap();
        let package = temp.path().join("evil.apk");
        create_package(&package, &[("../../escaped.txt", "lock")]);

        let out = temp.path().join("out");
        let inventory = decompress(&package, &out, &Cancellation::new()).unwrap();

        assert_eq!(inventory, vec![InventoryEntry::new("escaped.txt", 4)]);
        assert!(!temp.path().join("escaped.txt").exists());
    }

    #[test]
    fn it_decompress_invalid_archive() {
        let temp = tempfile::tempdir().unwrap();
        let package = temp.path().join("broken.apk");
        File::create(&package)
            .unwrap()
            .write_all(b"this is not a zip file")
            .unwrap();

        let error = decompress(&package, temp.path().join("out"), &Cancellation::new())
            .unwrap_err();
        assert!(archive_error(&error));
    }

    #[test]
    fn it_decompress_empty_archive() {
        let temp = tempfile::tempdir().unwrap();
        let package = temp.path().join("empty.apk");
        create_package(&package, &[]);

        let error = decompress(&package, temp.path().join("out"), &Cancellation::new())
            .unwrap_err();
        assert!(archive_error(&error));
    }

    #[test]
    fn it_decompress_missing_archive() {
        let temp = tempfile::tempdir().unwrap();
        let error = decompress(
            temp.path().join("missing.apk"),
            temp.path().join("out"),
            &Cancellation::new(),
        )
        .unwrap_err();
        assert!(archive_error(&error));
    }

    #[test]
    fn it_decompress_cancelled() {
        let temp = tempfile::tempdir().unwrap();
        let package = temp.path().join("app.apk");
        create_package(&package, &[("classes.dex", "dex")]);

        let cancellation = Cancellation::new();
        cancellation.cancel();
        let error = decompress(&package, temp.path().join("out"), &cancellation).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::Cancelled { .. })
        ));
    }

    #[test]
    fn it_inventory_line() {
        let entry = InventoryEntry::new("classes.dex", 1024);
        assert_eq!(format!("{}", entry), "classes.dex (1024 bytes)");
    }
}
