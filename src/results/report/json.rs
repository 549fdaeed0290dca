//! JSON report generation module.

use crate::{results::Results, Config};
use anyhow::{Context, Result};
use log::debug;
use serde_json::ser;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
};

/// Writes the results to `<results folder>/<package>/results.json`.
pub fn write_json(config: &Config, results: &Results) -> Result<PathBuf> {
    let folder = config.results_folder().join(results.package_name());
    fs::create_dir_all(&folder)
        .with_context(|| format!("could not create the folder {}", folder.display()))?;

    let path = folder.join("results.json");
    debug!("writing the JSON results to {}", path.display());
    let mut f = BufWriter::new(
        File::create(&path).with_context(|| format!("could not create {}", path.display()))?,
    );
    ser::to_writer_pretty(&mut f, results)?;

    Ok(path)
}
