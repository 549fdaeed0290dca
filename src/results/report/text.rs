//! Plain text report rendering.

use crate::{error::ErrorKind, results::Results};
use anyhow::Result;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};
use std::path::Path;

const OVERVIEW_TEMPLATE: &str = include_str!("../../../templates/overview.hbs");
const DETAILS_TEMPLATE: &str = include_str!("../../../templates/details.hbs");

/// The three text entries of the evidence bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    overview: String,
    details: String,
    inventory: String,
}

impl RenderedReport {
    /// Gets the overview report.
    pub fn overview(&self) -> &str {
        &self.overview
    }

    /// Gets the detailed report.
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Gets the file inventory, one `<path> (<size> bytes)` line per file.
    pub fn inventory(&self) -> &str {
        &self.inventory
    }
}

/// Handlebars text report renderer.
pub struct TextReport<'r> {
    handler: Handlebars<'r>,
}

impl<'r> TextReport<'r> {
    /// Creates the renderer with the built-in templates.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars
            .register_template_string("overview", OVERVIEW_TEMPLATE)
            .map_err(|e| ErrorKind::Report {
                message: format!("invalid overview template: {}", e),
            })?;
        handlebars
            .register_template_string("details", DETAILS_TEMPLATE)
            .map_err(|e| ErrorKind::Report {
                message: format!("invalid details template: {}", e),
            })?;

        Ok(Self {
            handler: handlebars,
        })
    }

    /// Renders the reports of the given results.
    pub fn render(&self, results: &Results) -> Result<RenderedReport> {
        let render = |name: &str, data: &Value| {
            self.handler.render(name, data).map_err(|e| ErrorKind::Report {
                message: format!("could not render the {} report: {}", name, e),
            })
        };

        Ok(RenderedReport {
            overview: render("overview", &overview_data(results))?,
            details: render("details", &details_data(results))?,
            inventory: inventory_text(results),
        })
    }
}

fn display_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect()
}

fn overview_data(results: &Results) -> Value {
    let manifest = results.manifest();
    let findings: Vec<String> = results
        .risk()
        .findings()
        .iter()
        .map(ToString::to_string)
        .collect();

    json!({
        "name": results.package_name(),
        "path": results.package().display().to_string(),
        "fingerprint": results.fingerprint(),
        "date": chrono::Local::now().to_rfc2822(),
        "total_files": results.file_structure().total_files(),
        "media": results.media().map(|media| json!({
            "copied": media.copied(),
            "folder": media.folder().display().to_string(),
        })),
        "permissions": manifest.permissions().len(),
        "activities": manifest.activities().len(),
        "services": manifest.services().len(),
        "findings": findings,
        "tier": results.risk().tier().to_string(),
    })
}

fn details_data(results: &Results) -> Value {
    let manifest = results.manifest();
    let structure = results.file_structure();
    let resources = results.resources();

    let extensions: Vec<Value> = structure
        .extension_counts()
        .iter()
        .map(|(extension, count)| {
            let extension = if extension.is_empty() {
                "(no extension)"
            } else {
                extension.as_str()
            };
            json!({ "extension": extension, "count": count })
        })
        .collect();
    let warnings: Vec<String> = results.warnings().iter().map(ToString::to_string).collect();

    json!({
        "name": results.package_name(),
        "permissions": manifest.permissions(),
        "activities": manifest.activities(),
        "services": manifest.services(),
        "manifest_error": manifest.error(),
        "urls": results.code().unique_urls(),
        "suspicious_files": display_paths(structure.suspicious_files()),
        "extensions": extensions,
        "strings": display_paths(resources.strings()),
        "layouts": display_paths(resources.layouts()),
        "drawables": display_paths(resources.drawables()),
        "warnings": warnings,
    })
}

fn inventory_text(results: &Results) -> String {
    results
        .inventory()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
