//! Evidence bundle creation.
//!
//! The bundle is a single ZIP file holding the original package, the text reports and the
//! extracted images, ready to be handed over for manual review.

use crate::{error::ErrorKind, get_package_name, results::RenderedReport};
use anyhow::{Context, Result};
use log::debug;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Component, Path, PathBuf},
};
use walkdir::WalkDir;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

/// Prefix of the bundle file name ("suspected malware").
pub const BUNDLE_PREFIX: &str = "疑似病毒_";
/// Folder of the original package inside the bundle.
pub const ORIGINAL_FOLDER: &str = "原始APK";
/// Entry of the overview report.
pub const OVERVIEW_ENTRY: &str = "分析报告.txt";
/// Entry of the detailed report.
pub const DETAILS_ENTRY: &str = "详细分析.txt";
/// Entry of the file inventory.
pub const INVENTORY_ENTRY: &str = "文件列表.txt";
/// Folder of the extracted images inside the bundle.
pub const MEDIA_FOLDER: &str = "提取图片";

/// Gets the file name of the bundle for the given package.
pub fn bundle_name<P: AsRef<Path>>(package: P) -> String {
    format!("{}{}.zip", BUNDLE_PREFIX, get_package_name(package))
}

/// Creates the evidence bundle of `package` in `destination` and returns its path.
///
/// An existing bundle with the same name is replaced. If the bundle cannot be completed, the
/// partial file is removed.
pub fn create_bundle<P: AsRef<Path>, D: AsRef<Path>>(
    package: P,
    destination: D,
    report: &RenderedReport,
    media: Option<&Path>,
) -> Result<PathBuf> {
    let package = package.as_ref();
    let destination = destination.as_ref();

    if !package.is_file() {
        return Err(ErrorKind::bundle(format!(
            "the package `{}` no longer exists",
            package.display()
        ))
        .into());
    }

    fs::create_dir_all(destination).map_err(|e| {
        ErrorKind::bundle(format!(
            "could not create the folder `{}`: {}",
            destination.display(),
            e
        ))
    })?;

    let path = destination.join(bundle_name(package));
    let file = File::create(&path).map_err(|e| {
        ErrorKind::bundle(format!("could not create `{}`: {}", path.display(), e))
    })?;

    if let Err(e) = write_bundle(file, package, report, media) {
        let _ = fs::remove_file(&path);
        return Err(ErrorKind::bundle(format!("{:#}", e)).into());
    }

    debug!("evidence bundle written to {}", path.display());
    Ok(path)
}

fn write_bundle(
    file: File,
    package: &Path,
    report: &RenderedReport,
    media: Option<&Path>,
) -> Result<()> {
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let original = format!("{}/{}.apk", ORIGINAL_FOLDER, get_package_name(package));
    zip.start_file(original, options)?;
    let mut source = File::open(package)
        .with_context(|| format!("could not open the package `{}`", package.display()))?;
    let _ = io::copy(&mut source, &mut zip)?;

    for (name, text) in [
        (OVERVIEW_ENTRY, report.overview()),
        (DETAILS_ENTRY, report.details()),
        (INVENTORY_ENTRY, report.inventory()),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(text.as_bytes())?;
    }

    if let Some(media) = media.filter(|folder| folder.is_dir()) {
        for entry in WalkDir::new(media).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(media)?;
            zip.start_file(format!("{}/{}", MEDIA_FOLDER, entry_name(relative)), options)?;
            let mut image = File::open(entry.path())?;
            let _ = io::copy(&mut image, &mut zip)?;
        }
    }

    let _ = zip.finish()?;
    Ok(())
}

/// Joins the components of a relative path with `/`, as ZIP entry names require.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
