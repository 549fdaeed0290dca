//! Results of the analysis of a package.

mod report;
mod utils;

pub use self::{
    report::{write_json, RenderedReport, TextReport},
    utils::FingerPrint,
};
use crate::{
    error::Warning,
    extraction::InventoryEntry,
    get_package_name,
    heuristics::RiskAssessment,
    static_analysis::{
        code::CodeSignals, manifest::ManifestSignals, media::MediaExtraction,
        resources::ResourceInventory, structure::FileStructure,
    },
};
use anyhow::Result;
use chrono::Local;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::path::{Path, PathBuf};

/// Everything found in one package.
///
/// Stages that did not run keep their empty default.
#[derive(Debug, Clone)]
pub struct Results {
    package: PathBuf,
    package_name: String,
    fingerprint: FingerPrint,
    inventory: Vec<InventoryEntry>,
    file_structure: FileStructure,
    media: Option<MediaExtraction>,
    manifest: ManifestSignals,
    code: CodeSignals,
    resources: ResourceInventory,
    risk: RiskAssessment,
    warnings: Vec<Warning>,
    bundle: Option<PathBuf>,
}

impl Results {
    /// Initializes the results of the given package, computing its fingerprint.
    pub fn init<P: AsRef<Path>>(package: P) -> Result<Self> {
        let package = package.as_ref();
        let fingerprint = FingerPrint::new(package)?;

        Ok(Self {
            package: package.to_path_buf(),
            package_name: get_package_name(package),
            fingerprint,
            inventory: Vec::new(),
            file_structure: FileStructure::default(),
            media: None,
            manifest: ManifestSignals::default(),
            code: CodeSignals::default(),
            resources: ResourceInventory::default(),
            risk: RiskAssessment::default(),
            warnings: Vec::new(),
            bundle: None,
        })
    }

    /// Gets the path of the analyzed package.
    pub fn package(&self) -> &Path {
        &self.package
    }

    /// Gets the name of the package, the archive file name without extension.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Gets the fingerprint of the package.
    pub fn fingerprint(&self) -> &FingerPrint {
        &self.fingerprint
    }

    /// Gets the file inventory.
    pub fn inventory(&self) -> &[InventoryEntry] {
        &self.inventory
    }

    /// Sets the file inventory.
    pub fn set_inventory(&mut self, inventory: Vec<InventoryEntry>) {
        self.inventory = inventory;
    }

    /// Gets the file structure.
    pub fn file_structure(&self) -> &FileStructure {
        &self.file_structure
    }

    /// Sets the file structure.
    pub fn set_file_structure(&mut self, file_structure: FileStructure) {
        self.file_structure = file_structure;
    }

    /// Gets the image extraction results, if images were extracted.
    pub fn media(&self) -> Option<&MediaExtraction> {
        self.media.as_ref()
    }

    /// Sets the image extraction results.
    pub fn set_media(&mut self, media: MediaExtraction) {
        self.media = Some(media);
    }

    /// Gets the manifest signals.
    pub fn manifest(&self) -> &ManifestSignals {
        &self.manifest
    }

    /// Sets the manifest signals.
    pub fn set_manifest(&mut self, manifest: ManifestSignals) {
        self.manifest = manifest;
    }

    /// Gets the code signals.
    pub fn code(&self) -> &CodeSignals {
        &self.code
    }

    /// Sets the code signals.
    pub fn set_code(&mut self, code: CodeSignals) {
        self.code = code;
    }

    /// Gets the resource inventory.
    pub fn resources(&self) -> &ResourceInventory {
        &self.resources
    }

    /// Sets the resource inventory.
    pub fn set_resources(&mut self, resources: ResourceInventory) {
        self.resources = resources;
    }

    /// Gets the risk assessment.
    pub fn risk(&self) -> &RiskAssessment {
        &self.risk
    }

    /// Sets the risk assessment.
    pub fn set_risk(&mut self, risk: RiskAssessment) {
        self.risk = risk;
    }

    /// Gets the per-file warnings of every stage.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Adds per-file warnings.
    pub fn add_warnings<I: IntoIterator<Item = Warning>>(&mut self, warnings: I) {
        self.warnings.extend(warnings);
    }

    /// Gets the path of the evidence bundle, if one was created.
    pub fn bundle(&self) -> Option<&Path> {
        self.bundle.as_deref()
    }

    /// Sets the path of the evidence bundle.
    pub fn set_bundle<P: Into<PathBuf>>(&mut self, bundle: P) {
        self.bundle = Some(bundle.into());
    }
}

impl Serialize for Results {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let now = Local::now();
        let mut ser_struct = serializer.serialize_struct("Results", 16)?;

        ser_struct.serialize_field("version", env!("CARGO_PKG_VERSION"))?;
        ser_struct.serialize_field("now", &now)?;
        ser_struct.serialize_field("now_rfc3339", &now.to_rfc3339())?;

        ser_struct.serialize_field("package", &self.package)?;
        ser_struct.serialize_field("package_name", &self.package_name)?;
        ser_struct.serialize_field("fingerprint", &self.fingerprint)?;
        ser_struct.serialize_field("inventory", &self.inventory)?;
        ser_struct.serialize_field("file_structure", &self.file_structure)?;
        ser_struct.serialize_field("media", &self.media)?;
        ser_struct.serialize_field("manifest", &self.manifest)?;
        ser_struct.serialize_field("code", &self.code)?;
        ser_struct.serialize_field("resources", &self.resources)?;
        ser_struct.serialize_field("findings", self.risk.findings())?;
        ser_struct.serialize_field("tier", &self.risk.tier())?;
        ser_struct.serialize_field("warnings", &self.warnings)?;
        ser_struct.serialize_field("bundle", &self.bundle)?;

        ser_struct.end()
    }
}
