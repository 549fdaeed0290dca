//! Code analysis module.
//!
//! Every extracted file is decoded as text, whatever its type, and checked against the category
//! rules. URL-like strings are harvested on the way.

mod rule;
#[cfg(test)]
mod tests;

pub use self::rule::{load_rules, Rule};
use super::list_files;
use crate::{
    cancellation::Cancellation,
    error::{Stage, Warning},
    utils::{decode_lossy, print_warning},
};
use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use std::{
    ffi::OsStr,
    fmt, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

lazy_static! {
    static ref URL: Regex = Regex::new(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#).unwrap();
}

/// A file whose text matches one of the behavior categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    category: String,
    file: PathBuf,
}

impl CategoryMatch {
    /// Creates a new category match.
    pub fn new<S: Into<String>, P: Into<PathBuf>>(category: S, file: P) -> Self {
        Self {
            category: category.into(),
            file: file.into(),
        }
    }

    /// Gets the category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Gets the matching file, relative to the extraction root.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl fmt::Display for CategoryMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.file.display())
    }
}

/// Signals found in the contents of the extracted files.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSignals {
    category_matches: Vec<CategoryMatch>,
    urls: Vec<String>,
}

impl CodeSignals {
    /// Creates a new set of code signals.
    pub fn new(category_matches: Vec<CategoryMatch>, urls: Vec<String>) -> Self {
        Self {
            category_matches,
            urls,
        }
    }

    /// Gets the category matches, at most one per file and category.
    pub fn category_matches(&self) -> &[CategoryMatch] {
        &self.category_matches
    }

    /// Gets every URL found, duplicates included.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Gets the URLs without duplicates, in the order they were first found.
    pub fn unique_urls(&self) -> Vec<&str> {
        let mut unique: Vec<&str> = Vec::new();
        for url in &self.urls {
            if !unique.contains(&url.as_str()) {
                unique.push(url);
            }
        }
        unique
    }
}

/// Outcome of scanning a single file.
#[derive(Debug)]
struct FileScan {
    index: usize,
    outcome: Result<CodeSignals, Warning>,
}

/// Scans the whole extracted package with the given rules.
///
/// Files are distributed between `threads` workers. Results are merged in file walk order, so
/// the output does not depend on the scheduling of the workers. Files that cannot be read are
/// skipped and returned as warnings.
pub fn analysis<P: AsRef<Path>>(
    root: P,
    rules: Vec<Rule>,
    threads: u8,
    cancellation: &Cancellation,
) -> Result<(CodeSignals, Vec<Warning>)> {
    let root = root.as_ref();
    let mut warnings = Vec::new();

    let files: Vec<(usize, PathBuf)> = list_files(root, Stage::Code, &mut warnings)
        .into_iter()
        .enumerate()
        .collect();
    let total_files = files.len();

    info!(
        "Starting analysis of the code with {} threads. {} files to go!",
        threads, total_files
    );

    let root = Arc::new(root.to_path_buf());
    let rules = Arc::new(rules);
    let files = Arc::new(Mutex::new(files));
    let scans: Arc<Mutex<Vec<FileScan>>> = Arc::new(Mutex::new(Vec::with_capacity(total_files)));

    let handles: Vec<_> = (0..threads.max(1))
        .map(|_| {
            let thread_root = Arc::clone(&root);
            let thread_rules = Arc::clone(&rules);
            let thread_files = Arc::clone(&files);
            let thread_scans = Arc::clone(&scans);
            let thread_cancellation = cancellation.clone();

            thread::spawn(move || loop {
                if thread_cancellation.is_cancelled() {
                    break;
                }
                let next = thread_files
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop();
                let (index, path) = match next {
                    Some(f) => f,
                    None => break,
                };

                let outcome = analyze_file(&path, &thread_root, &thread_rules);
                thread_scans
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(FileScan { index, outcome });
            })
        })
        .collect();

    for t in handles {
        if let Err(e) = t.join() {
            #[allow(clippy::use_debug)]
            print_warning(format!(
                "an error occurred when joining analysis threads: Error: {:?}",
                e
            ));
        }
    }

    cancellation.check(Stage::Code)?;

    let mut scans = std::mem::take(&mut *scans.lock().unwrap_or_else(PoisonError::into_inner));
    scans.sort_by_key(|scan| scan.index);

    let mut signals = CodeSignals::default();
    for scan in scans {
        match scan.outcome {
            Ok(file_signals) => {
                signals.category_matches.extend(file_signals.category_matches);
                signals.urls.extend(file_signals.urls);
            }
            Err(warning) => warnings.push(warning),
        }
    }

    debug!(
        "{} category matches and {} URLs found in {} files",
        signals.category_matches.len(),
        signals.urls.len(),
        total_files
    );

    Ok((signals, warnings))
}

/// Analyzes the given file.
fn analyze_file(path: &Path, root: &Path, rules: &[Rule]) -> Result<CodeSignals, Warning> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let bytes = fs::read(path)
        .map_err(|e| Warning::new(Stage::Code, relative, format!("could not read: {}", e)))?;

    Ok(scan_text(&decode_lossy(&bytes), relative, rules))
}

/// Checks the decoded contents of a file against every rule, in rule order.
///
/// A category is reported once per file, however many times it matches.
fn scan_text(code: &str, relative: &Path, rules: &[Rule]) -> CodeSignals {
    let filename = relative.file_name().and_then(OsStr::to_str);

    let category_matches = rules
        .iter()
        .filter(|rule| filename.map_or(true, |f| rule.has_to_check(f)))
        .filter(|rule| rule.regex().is_match(code))
        .inspect(|rule| {
            debug!(
                "{} matches `{}`: {}",
                relative.display(),
                rule.label(),
                rule.description()
            )
        })
        .map(|rule| CategoryMatch::new(rule.label(), relative))
        .collect();
    let urls = URL.find_iter(code).map(|m| m.as_str().to_owned()).collect();

    CodeSignals::new(category_matches, urls)
}
