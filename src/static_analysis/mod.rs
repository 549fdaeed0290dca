//! Static analysis of the extracted package.
//!
//! Every stage walks the extraction folder on its own and never modifies it. Stages that are
//! disabled in the configuration keep the empty default of their result.

pub mod code;
pub mod manifest;
pub mod media;
pub mod resources;
pub mod structure;

use crate::{
    cancellation::Cancellation,
    error::{Stage, Warning},
    results::Results,
    utils::print_warning,
    Config,
};
use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists every file under `root`, in file name order.
///
/// Entries that cannot be walked are skipped and reported as warnings of the given stage.
pub(crate) fn list_files(root: &Path, stage: Stage, warnings: &mut Vec<Warning>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.strip_prefix(root).unwrap_or(p).to_path_buf())
                    .unwrap_or_default();
                warnings.push(Warning::new(stage, path, e));
            }
        }
    }

    files
}

/// Runs every enabled analysis stage over the extracted package in `root`.
///
/// Images are copied to `media_folder`. Per-file problems are added to the warnings of the
/// results; only a cancellation stops the analysis.
pub fn static_analysis<P: AsRef<Path>, M: AsRef<Path>>(
    config: &Config,
    root: P,
    media_folder: M,
    cancellation: &Cancellation,
    results: &mut Results,
) -> Result<()> {
    let root = root.as_ref();

    cancellation.check(Stage::FileStructure)?;
    let (file_structure, warnings) = structure::analysis(root, cancellation)?;
    debug!(
        "{} files classified, {} of them suspicious",
        file_structure.total_files(),
        file_structure.suspicious_files().len()
    );
    results.set_file_structure(file_structure);
    results.add_warnings(warnings);

    if config.has_to_extract_images() {
        cancellation.check(Stage::Media)?;
        let (media, warnings) = media::extract_images(root, media_folder, cancellation)?;
        info!("{} images extracted.", media.copied());
        results.set_media(media);
        results.add_warnings(warnings);
    }

    if config.has_to_analyze_manifest() {
        cancellation.check(Stage::Manifest)?;
        let decoder = config.manifest_decoder().decoder();
        let signals = manifest::analysis(root, &*decoder);
        if let Some(error) = signals.error() {
            print_warning(format!("the manifest could not be decoded: {}", error));
        }
        results.set_manifest(signals);
    }

    if config.has_to_analyze_code() {
        cancellation.check(Stage::Code)?;
        match code::load_rules(config) {
            Ok(rules) => {
                let (signals, warnings) =
                    code::analysis(root, rules, config.threads(), cancellation)?;
                info!("Source code analyzed.");
                results.set_code(signals);
                results.add_warnings(warnings);
            }
            Err(e) => {
                print_warning(format!(
                    "An error occurred when loading code analysis rules, the code scan will be \
                     skipped. Error: {:#}",
                    e
                ));
                results.add_warnings(vec![Warning::new(
                    Stage::Code,
                    config.rules_json().unwrap_or_else(|| Path::new("rules.json")),
                    format!("{:#}", e),
                )]);
            }
        }
    }

    if config.has_to_analyze_resources() {
        cancellation.check(Stage::Resources)?;
        let (inventory, warnings) = resources::analysis(root, cancellation)?;
        results.set_resources(inventory);
        results.add_warnings(warnings);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::list_files;
    use crate::{error::Stage, test_utils::write_file};
    use std::path::PathBuf;

    #[test]
    fn it_list_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        write_file(temp.path().join("b.txt"), b"b");
        write_file(temp.path().join("a").join("z.txt"), b"z");
        write_file(temp.path().join("c.txt"), b"c");

        let mut warnings = Vec::new();
        let files: Vec<PathBuf> = list_files(temp.path(), Stage::Code, &mut warnings)
            .into_iter()
            .map(|f| f.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();

        assert!(warnings.is_empty());
        assert_eq!(
            files,
            [
                PathBuf::from("a").join("z.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("c.txt"),
            ]
        );
    }

    #[test]
    fn it_list_files_missing_root() {
        let temp = tempfile::tempdir().unwrap();
        let mut warnings = Vec::new();

        let files = list_files(&temp.path().join("missing"), Stage::Media, &mut warnings);

        assert!(files.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].stage(), Stage::Media);
    }
}
