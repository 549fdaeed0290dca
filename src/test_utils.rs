//! Helpers shared by the unit tests.

use std::{fs::File, io::Write, path::Path};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

/// Writes a package archive with the given `(name, content)` entries.
pub fn create_package<P: AsRef<Path>>(path: P, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    let _ = zip.finish().unwrap();
}

/// Writes a file, creating its parent folders.
pub fn write_file<P: AsRef<Path>>(path: P, content: &[u8]) {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}
