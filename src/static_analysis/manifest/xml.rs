//! Plain text XML manifest decoder.

use super::{ManifestDecoder, ManifestSignals};
use anyhow::{bail, Context, Result};
use quick_xml::{
    events::{attributes::Attributes, Event},
    Reader,
};
use std::str;

/// Decoder for manifests already in text form, such as the ones decoded by external tools.
///
/// Binary manifests are rejected with an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl ManifestDecoder for XmlDecoder {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ManifestSignals> {
        let code = str::from_utf8(bytes).context("the manifest is not a text XML document")?;
        let mut reader = Reader::from_str(code);
        let _ = reader.trim_text(true);

        let mut permissions = Vec::new();
        let mut activities = Vec::new();
        let mut services = Vec::new();
        let mut found_root = false;

        loop {
            match reader.read_event().context("invalid XML in the manifest")? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let list = match e.name().as_ref() {
                        b"manifest" => {
                            found_root = true;
                            continue;
                        }
                        b"uses-permission" => &mut permissions,
                        b"activity" => &mut activities,
                        b"service" => &mut services,
                        _ => continue,
                    };
                    if let Some(name) = android_name(e.attributes())? {
                        list.push(name);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !found_root {
            bail!("no <manifest> element found");
        }

        Ok(ManifestSignals::new(permissions, activities, services))
    }
}

/// Gets the value of the `android:name` attribute.
fn android_name(attributes: Attributes<'_>) -> Result<Option<String>> {
    for attr in attributes {
        let attr = attr?;

        if attr.key.as_ref() == b"android:name" {
            let value = attr
                .unescape_value()
                .context("invalid value for the android:name attribute")?;
            return Ok(Some(value.into_owned()));
        }
    }

    Ok(None)
}
