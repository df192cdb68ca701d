//! `pack.mcmeta` reader.
//!
//! The descriptor file is mandatory; its contents are not. Anything missing or
//! malformed inside it falls back to a generated description.

use crate::services::identity::PackIdentity;
use crate::types::{MetadataOrigin, PackError, PackMetadata, PackResult, PackSource};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Descriptor file name, relative to the pack root.
pub const DESCRIPTOR_FILE: &str = "pack.mcmeta";

pub fn default_description(identity: &PackIdentity) -> String {
    format!("Auto-generated datapack for {identity}")
}

/// Resolve metadata for a discovered pack.
///
/// Only fails with [`PackError::MissingDescriptor`].
pub fn resolve_metadata(source: &PackSource) -> PackResult<PackMetadata> {
    read_descriptor(&source.root, &source.identity)
}

/// Read `pack.mcmeta` under `root`.
pub fn read_descriptor(root: &Path, identity: &PackIdentity) -> PackResult<PackMetadata> {
    let path = root.join(DESCRIPTOR_FILE);
    if !path.is_file() {
        return Err(PackError::MissingDescriptor(root.to_path_buf()));
    }

    let parsed = fs::read_to_string(&path)
        .map_err(|e| format!("unreadable: {e}"))
        .and_then(|content| parse_description(&content));

    match parsed {
        Ok(description) => Ok(PackMetadata {
            description,
            origin: MetadataOrigin::Descriptor,
        }),
        Err(reason) => {
            let err = PackError::MetadataParse { path, reason };
            log::warn!("[{identity}] {err}; using default description");
            Ok(PackMetadata {
                description: default_description(identity),
                origin: MetadataOrigin::Defaulted,
            })
        }
    }
}

/// Pull `pack.description` out of descriptor JSON and flatten it to text.
pub fn parse_description(content: &str) -> Result<String, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let json: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;

    let raw = json
        .get("pack")
        .and_then(|pack| pack.get("description"))
        .ok_or_else(|| "missing pack.description".to_string())?;

    flatten_text_component(raw)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| "pack.description has no text".to_string())
}

/// Flatten a Minecraft text component to plain text.
///
/// Handles plain strings, numbers and booleans, `{"text", "extra"}` objects
/// (with `translate` as a fallback key), and arrays of components.
pub fn flatten_text_component(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_text_component).collect();
            (!parts.is_empty()).then(|| parts.concat())
        }
        Value::Object(map) => {
            let base = map
                .get("text")
                .or_else(|| map.get("translate"))
                .and_then(flatten_text_component);
            let extra = map.get("extra").and_then(flatten_text_component);
            match (base, extra) {
                (None, None) => None,
                (base, extra) => Some(format!(
                    "{}{}",
                    base.unwrap_or_default(),
                    extra.unwrap_or_default()
                )),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/metadata_tests.rs"]
mod tests;
