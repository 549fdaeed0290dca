//! Pattern based manifest decoder.

use super::{ManifestDecoder, ManifestSignals};
use crate::utils::decode_lossy;
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PERMISSION: Regex = Regex::new(r"android\.permission\.[A-Z_]+").unwrap();
    static ref ACTIVITY: Regex = Regex::new(r#"<activity[^>]*android:name="([^"]*)""#).unwrap();
    static ref SERVICE: Regex = Regex::new(r#"<service[^>]*android:name="([^"]*)""#).unwrap();
}

/// Best-effort decoder: matches permissions and component declarations in the decoded text.
///
/// Invalid byte sequences are dropped before matching, so text fragments in a binary manifest
/// are still found. Entries split by the binary encoding are missed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDecoder;

impl ManifestDecoder for PatternDecoder {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ManifestSignals> {
        let text = decode_lossy(bytes);

        let permissions = PERMISSION
            .find_iter(&text)
            .map(|m| m.as_str().to_owned())
            .collect();
        let activities = captured_names(&ACTIVITY, &text);
        let services = captured_names(&SERVICE, &text);

        Ok(ManifestSignals::new(permissions, activities, services))
    }
}

fn captured_names(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_owned())
        .collect()
}
