//! Configuration module.
//!
//! Handles and configures the initial settings and variables needed to run the program. The
//! configuration is read from a TOML file and then decorated with the command line options.

use crate::{
    cancellation::Cancellation, error::ErrorKind, heuristics::Policy,
    static_analysis::manifest::DecoderKind,
};
use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Largest number of worker threads.
const MAX_THREADS: u64 = u8::MAX as u64;

/// Config structure.
///
/// Contains configuration related fields. Every field is optional in the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Boolean to represent `--verbose` mode.
    verbose: bool,
    /// Boolean to represent `--quiet` mode.
    quiet: bool,
    /// Number of threads of the code scan.
    threads: u8,
    /// Folder where the per-run extraction folders are created.
    work_folder: PathBuf,
    /// Folder where the results, images and bundles are stored.
    results_folder: PathBuf,
    /// Rule file replacing the built-in category rules.
    rules_json: Option<PathBuf>,
    /// Maximum duration of the analysis of a package, in seconds.
    timeout: Option<u64>,
    /// Whether the evidence bundle is created.
    bundle: bool,
    /// Whether the JSON results are written.
    json: bool,
    /// Decoder used for the manifest.
    manifest_decoder: DecoderKind,
    /// Whether images are extracted.
    extract_images: bool,
    /// Whether the manifest is analyzed.
    analyze_manifest: bool,
    /// Whether the contents of the files are scanned.
    analyze_code: bool,
    /// Whether the resource inventory is built.
    analyze_resources: bool,
    /// Heuristic policy tables.
    policy: Policy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            threads: num_cpus::get().clamp(1, u8::MAX as usize) as u8,
            work_folder: env::temp_dir(),
            results_folder: PathBuf::from("results"),
            rules_json: None,
            timeout: None,
            bundle: true,
            json: true,
            manifest_decoder: DecoderKind::default(),
            extract_images: true,
            analyze_manifest: true,
            analyze_code: true,
            analyze_resources: true,
            policy: Policy::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from the given TOML file.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let toml = fs::read_to_string(config_path)
            .with_context(|| format!("could not read {}", config_path.display()))?;
        let config: Self = toml::from_str(&toml).map_err(|e| ErrorKind::Config {
            message: format!("invalid {} file: {}", config_path.display(), e),
        })?;

        if config.threads == 0 {
            return Err(ErrorKind::Config {
                message: format!(
                    "the `threads` option must be an integer between 1 and {}",
                    MAX_THREADS
                ),
            }
            .into());
        }

        Ok(config)
    }

    /// Modifies the options from the CLI.
    pub fn decorate_with_cli(&mut self, cli: &ArgMatches<'_>) -> Result<()> {
        self.verbose = self.verbose || cli.is_present("verbose");
        self.quiet = !self.verbose && (self.quiet || cli.is_present("quiet"));

        if let Some(threads) = cli.value_of("threads") {
            match threads.parse::<u64>() {
                Ok(t) if t > 0 && t <= MAX_THREADS => {
                    self.threads = t as u8;
                }
                _ => {
                    return Err(ErrorKind::Config {
                        message: format!(
                            "the threads option must be an integer between 1 and {}",
                            MAX_THREADS
                        ),
                    }
                    .into());
                }
            }
        }
        if let Some(timeout) = cli.value_of("timeout") {
            let seconds = timeout.parse().map_err(|_| ErrorKind::Config {
                message: format!("invalid timeout `{}`, seconds expected", timeout),
            })?;
            self.timeout = Some(seconds);
        }
        if let Some(folder) = cli.value_of("results") {
            self.results_folder = PathBuf::from(folder);
        }
        if let Some(folder) = cli.value_of("work-dir") {
            self.work_folder = PathBuf::from(folder);
        }
        if let Some(rules) = cli.value_of("rules") {
            self.rules_json = Some(PathBuf::from(rules));
        }

        self.extract_images = self.extract_images && !cli.is_present("no-images");
        self.analyze_manifest = self.analyze_manifest && !cli.is_present("no-manifest");
        self.analyze_code = self.analyze_code && !cli.is_present("no-code");
        self.analyze_resources = self.analyze_resources && !cli.is_present("no-resources");
        self.bundle = self.bundle && !cli.is_present("no-bundle");
        self.json = self.json && !cli.is_present("no-json");
        if cli.is_present("xml-manifest") {
            self.manifest_decoder = DecoderKind::Xml;
        }

        Ok(())
    }

    /// Returns true if the application is running in `--verbose` mode.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Returns true if the application is running in `--quiet` mode.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Returns the `threads` field.
    pub fn threads(&self) -> u8 {
        self.threads
    }

    /// Sets the number of threads of the code scan.
    pub fn set_threads(&mut self, threads: u8) {
        self.threads = threads.max(1);
    }

    /// Returns the folder where the extraction folders are created.
    pub fn work_folder(&self) -> &Path {
        &self.work_folder
    }

    /// Sets the folder where the extraction folders are created.
    pub fn set_work_folder<P: Into<PathBuf>>(&mut self, work_folder: P) {
        self.work_folder = work_folder.into();
    }

    /// Returns the `results_folder` field.
    pub fn results_folder(&self) -> &Path {
        &self.results_folder
    }

    /// Sets the results folder.
    pub fn set_results_folder<P: Into<PathBuf>>(&mut self, results_folder: P) {
        self.results_folder = results_folder.into();
    }

    /// Returns the path to the rule file, if the built-in rules are replaced.
    pub fn rules_json(&self) -> Option<&Path> {
        self.rules_json.as_deref()
    }

    /// Sets the rule file.
    pub fn set_rules_json(&mut self, rules_json: Option<PathBuf>) {
        self.rules_json = rules_json;
    }

    /// Returns the timeout of the analysis of a package.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Creates the cancellation handle of a new run, honoring the timeout.
    pub fn cancellation(&self) -> Cancellation {
        self.timeout()
            .map_or_else(Cancellation::new, Cancellation::with_timeout)
    }

    /// Returns true if the evidence bundle has to be created.
    pub fn has_to_bundle(&self) -> bool {
        self.bundle
    }

    /// Sets whether the evidence bundle has to be created.
    pub fn set_bundle(&mut self, bundle: bool) {
        self.bundle = bundle;
    }

    /// Returns true if the JSON results have to be written.
    pub fn has_to_generate_json(&self) -> bool {
        self.json
    }

    /// Sets whether the JSON results have to be written.
    pub fn set_json(&mut self, json: bool) {
        self.json = json;
    }

    /// Returns the manifest decoder.
    pub fn manifest_decoder(&self) -> DecoderKind {
        self.manifest_decoder
    }

    /// Returns true if images have to be extracted.
    pub fn has_to_extract_images(&self) -> bool {
        self.extract_images
    }

    /// Sets whether images have to be extracted.
    pub fn set_extract_images(&mut self, extract_images: bool) {
        self.extract_images = extract_images;
    }

    /// Returns true if the manifest has to be analyzed.
    pub fn has_to_analyze_manifest(&self) -> bool {
        self.analyze_manifest
    }

    /// Sets whether the manifest has to be analyzed.
    pub fn set_analyze_manifest(&mut self, analyze_manifest: bool) {
        self.analyze_manifest = analyze_manifest;
    }

    /// Returns true if the file contents have to be scanned.
    pub fn has_to_analyze_code(&self) -> bool {
        self.analyze_code
    }

    /// Sets whether the file contents have to be scanned.
    pub fn set_analyze_code(&mut self, analyze_code: bool) {
        self.analyze_code = analyze_code;
    }

    /// Returns true if the resource inventory has to be built.
    pub fn has_to_analyze_resources(&self) -> bool {
        self.analyze_resources
    }

    /// Sets whether the resource inventory has to be built.
    pub fn set_analyze_resources(&mut self, analyze_resources: bool) {
        self.analyze_resources = analyze_resources;
    }

    /// Returns the heuristic policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}
