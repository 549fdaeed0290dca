//! APK Triage
//!
//! Static triage of Android application packages. A package is extracted to a private working
//! folder, its files are classified and scanned for suspicious signals, the signals are rated
//! and everything is packed in an evidence bundle for manual review.

#![forbid(anonymous_parameters, unsafe_code)]
#![warn(
    clippy::pedantic,
    deprecated_in_future,
    keyword_idents,
    macro_use_extern_crate,
    missing_debug_implementations,
    missing_docs,
    non_ascii_idents,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::non_ascii_literal,
    clippy::missing_errors_doc
)]

mod bundle;
mod cancellation;
pub mod cli;
mod config;
mod error;
mod extraction;
mod heuristics;
mod results;
mod risk_tier;
mod static_analysis;
#[cfg(test)]
mod test_utils;
mod utils;

pub use crate::{
    bundle::{
        bundle_name, create_bundle, BUNDLE_PREFIX, DETAILS_ENTRY, INVENTORY_ENTRY, MEDIA_FOLDER,
        ORIGINAL_FOLDER, OVERVIEW_ENTRY,
    },
    cancellation::Cancellation,
    config::Config,
    error::{ErrorKind, Stage, Warning},
    extraction::{decompress, InventoryEntry},
    heuristics::{assess, Finding, Policy, RiskAssessment},
    results::{FingerPrint, RenderedReport, Results, TextReport},
    risk_tier::RiskTier,
    static_analysis::{
        code::{CategoryMatch, CodeSignals},
        manifest::{DecoderKind, ManifestDecoder, ManifestSignals, PatternDecoder, XmlDecoder},
        media::MediaExtraction,
        resources::ResourceInventory,
        structure::FileStructure,
    },
    utils::{get_package_name, print_error, print_finding, print_warning},
};
use crate::{results::write_json, static_analysis::static_analysis};
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use env_logger::Builder;
use log::{debug, info, Level, LevelFilter};
use std::{env, fs, io::Write, path::Path};

/// Initializes the config with the config files and command line options.
///
/// On UNIX, if the local file (`config.toml`) does not exist, but the global one does
/// (`/etc/apk-triage/config.toml`), the latter is used. Otherwise, the local file is used.
/// Finally, if none of the files exist, the default config is used.
pub fn initialize_config(cli: &ArgMatches<'_>) -> Result<Config> {
    let config_path = Path::new("config.toml");
    let global_config_path = Path::new("/etc/apk-triage/config.toml");

    let mut config =
        if cfg!(target_family = "unix") && !config_path.exists() && global_config_path.exists() {
            Config::from_file(global_config_path).context(
                "there was an error when reading the /etc/apk-triage/config.toml file",
            )?
        } else if config_path.exists() {
            Config::from_file(config_path)
                .context("there was an error when reading the config.toml file")?
        } else {
            Config::default()
        };

    config
        .decorate_with_cli(cli)
        .context("there was an error reading config from CLI")?;

    Ok(config)
}

/// Analyzes the given package with the given config.
///
/// The package is extracted to a fresh folder under the configured work folder. That folder is
/// removed when the analysis ends, whether it succeeds or not. Fatal errors are always an
/// [`ErrorKind`], so the failing stage can be retrieved with [`ErrorKind::stage`].
pub fn analyze_package<P: AsRef<Path>>(
    package: P,
    config: &Config,
    cancellation: &Cancellation,
) -> Result<Results> {
    let package = package.as_ref();
    let package_name = get_package_name(package);
    info!("Starting analysis of {}.", package_name.italic());

    cancellation.check(Stage::Extraction)?;
    let mut results = Results::init(package).map_err(|e| ErrorKind::archive(format!("{:#}", e)))?;

    fs::create_dir_all(config.work_folder()).map_err(|e| {
        ErrorKind::archive(format!(
            "could not create the work folder `{}`: {}",
            config.work_folder().display(),
            e
        ))
    })?;
    let work_dir = tempfile::Builder::new()
        .prefix(&format!("apk_analysis_{}_", package_name))
        .tempdir_in(config.work_folder())
        .map_err(|e| ErrorKind::archive(format!("could not create the work folder: {}", e)))?;
    debug!("extracting the package in {}", work_dir.path().display());

    let inventory = decompress(package, work_dir.path(), cancellation)?;
    info!("Package extracted: {} files.", inventory.len());
    results.set_inventory(inventory);

    let media_folder = config
        .results_folder()
        .join(&package_name)
        .join("media");
    static_analysis(
        config,
        work_dir.path(),
        &media_folder,
        cancellation,
        &mut results,
    )?;

    cancellation.check(Stage::Heuristics)?;
    let risk = assess(results.manifest(), results.code(), config.policy());
    for finding in risk.findings() {
        print_finding(finding);
    }
    results.set_risk(risk);

    if config.has_to_bundle() {
        cancellation.check(Stage::Report)?;
        let report = TextReport::new()?.render(&results)?;

        cancellation.check(Stage::Bundle)?;
        let bundle = create_bundle(
            package,
            config.results_folder(),
            &report,
            results.media().map(MediaExtraction::folder),
        )?;
        info!("Evidence bundle created: {}", bundle.display());
        results.set_bundle(bundle);
    }

    if config.has_to_generate_json() {
        match write_json(config, &results) {
            Ok(path) => debug!("JSON results written to {}", path.display()),
            Err(e) => print_warning(format!(
                "there was an error generating the JSON results: {:#}",
                e
            )),
        }
    }

    if let Err(e) = work_dir.close() {
        print_warning(format!("the work folder could not be removed: {}", e));
    }

    Ok(results)
}

/// Initializes the logger.
///
/// The `RUST_LOG` environment variable overrides the level chosen with the flags.
pub fn initialize_logger(is_verbose: bool, is_quiet: bool) {
    let log_level = if is_verbose {
        LevelFilter::Debug
    } else if is_quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    let _ = builder.format(|buf, record| match record.level() {
        Level::Warn => writeln!(
            buf,
            "{}{}",
            "Warning: ".bold().yellow(),
            record.args().to_string().yellow()
        ),
        Level::Error => writeln!(
            buf,
            "{}{}",
            "Error: ".bold().red(),
            record.args().to_string().red()
        ),
        Level::Debug => writeln!(
            buf,
            "{}{}",
            "Debug: ".bold(),
            record.args().to_string().bold()
        ),
        Level::Info => writeln!(buf, "{}", record.args()),
        Level::Trace => writeln!(buf, "{}: {}", record.level(), record.args()),
    });

    if let Ok(env_log) = env::var("RUST_LOG") {
        let _ = builder.parse_filters(&env_log);
    } else {
        let _ = builder
            .filter(Some("apk_triage_core"), log_level)
            .filter(Some("apk_triage"), log_level);
    }

    if let Err(e) = builder.try_init() {
        println!("Could not initialize logger: {}", e);
    }
}
