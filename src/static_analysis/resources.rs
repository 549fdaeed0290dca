//! Resource inventory.

use super::list_files;
use crate::{
    cancellation::Cancellation,
    error::{Stage, Warning},
};
use anyhow::Result;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Resources declared in the `res/` folder of the package.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInventory {
    strings: Vec<PathBuf>,
    layouts: Vec<PathBuf>,
    drawables: Vec<PathBuf>,
}

impl ResourceInventory {
    /// Gets the string tables.
    pub fn strings(&self) -> &[PathBuf] {
        &self.strings
    }

    /// Gets the layout files.
    pub fn layouts(&self) -> &[PathBuf] {
        &self.layouts
    }

    /// Gets the drawables, mipmaps included.
    pub fn drawables(&self) -> &[PathBuf] {
        &self.drawables
    }

    /// Checks if no resource was found.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.layouts.is_empty() && self.drawables.is_empty()
    }
}

/// Lists the string tables, layouts and drawables of the package.
pub fn analysis<P: AsRef<Path>>(
    root: P,
    cancellation: &Cancellation,
) -> Result<(ResourceInventory, Vec<Warning>)> {
    let root = root.as_ref();
    let res = root.join("res");
    let mut warnings = Vec::new();
    let mut inventory = ResourceInventory::default();

    if !res.is_dir() {
        return Ok((inventory, warnings));
    }

    for file in list_files(&res, Stage::Resources, &mut warnings) {
        cancellation.check(Stage::Resources)?;

        let in_res = file.strip_prefix(&res).unwrap_or(&file);
        let folder = match in_res.components().next() {
            Some(Component::Normal(folder)) if in_res.components().count() > 1 => {
                folder.to_string_lossy()
            }
            _ => continue,
        };
        let relative = file.strip_prefix(root).unwrap_or(&file).to_path_buf();

        if folder.starts_with("values") {
            if in_res.file_name().map_or(false, |name| name == "strings.xml") {
                inventory.strings.push(relative);
            }
        } else if folder.starts_with("layout") {
            inventory.layouts.push(relative);
        } else if folder.starts_with("drawable") || folder.starts_with("mipmap") {
            inventory.drawables.push(relative);
        }
    }

    Ok((inventory, warnings))
}

#[cfg(test)]
mod tests {
    use super::analysis;
    use crate::{cancellation::Cancellation, test_utils::write_file};
    use std::path::PathBuf;

    #[test]
    fn it_resource_inventory() {
        let temp = tempfile::tempdir().unwrap();
        let res = temp.path().join("res");
        write_file(res.join("values").join("strings.xml"), b"<resources/>");
        write_file(res.join("values-zh").join("strings.xml"), b"<resources/>");
        write_file(res.join("values").join("colors.xml"), b"<resources/>");
        write_file(res.join("layout").join("main.xml"), b"<x/>");
        write_file(res.join("layout-land").join("main.xml"), b"<x/>");
        write_file(res.join("drawable-hdpi").join("icon.png"), b"png");
        write_file(res.join("mipmap").join("launcher.webp"), b"webp");
        write_file(res.join("raw").join("sound.ogg"), b"ogg");
        write_file(res.join("loose.xml"), b"<x/>");
        write_file(temp.path().join("layout").join("outside.xml"), b"<x/>");

        let (inventory, warnings) = analysis(temp.path(), &Cancellation::new()).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(
            inventory.strings(),
            &[
                PathBuf::from("res/values/strings.xml"),
                PathBuf::from("res/values-zh/strings.xml"),
            ]
        );
        assert_eq!(
            inventory.layouts(),
            &[
                PathBuf::from("res/layout/main.xml"),
                PathBuf::from("res/layout-land/main.xml"),
            ]
        );
        assert_eq!(
            inventory.drawables(),
            &[
                PathBuf::from("res/drawable-hdpi/icon.png"),
                PathBuf::from("res/mipmap/launcher.webp"),
            ]
        );
    }

    #[test]
    fn it_resource_inventory_without_res() {
        let temp = tempfile::tempdir().unwrap();
        write_file(temp.path().join("classes.dex"), b"dex");

        let (inventory, warnings) = analysis(temp.path(), &Cancellation::new()).unwrap();

        assert!(inventory.is_empty());
        assert!(warnings.is_empty());
    }
}
