//! `fabric.mod.json` generation.
//!
//! The manifest has a fixed shape. Everything in it derives from the pack
//! identity, its metadata and the optional entrypoint.

use crate::services::identity::{self, PackIdentity};
use crate::types::PackMetadata;
use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

/// Entry name the Fabric loader reads.
pub const MANIFEST_ENTRY: &str = "fabric.mod.json";

pub const MOD_VERSION: &str = "1.0.0";

/// Version constraints every generated mod declares.
pub const DEPENDS: &[(&str, &str)] = &[
    ("fabricloader", ">=0.16.14"),
    ("minecraft", "~1.21.1"),
    ("java", ">=21"),
    ("fabric-api", "*"),
];

pub const AUTHORS: &[&str] = &[
    "Auto-Generated by PokePatcher!",
    "If they put it there, the original author should be in the description!",
];

/// Icon path inside the jar for this identifier.
pub fn icon_path(identity: &PackIdentity) -> String {
    format!("assets/{identity}/icon.png")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabricManifest {
    pub id: String,
    pub name: String,
    /// Raw description; serde escapes it on render.
    pub description: String,
    pub icon: String,
    /// Fully-qualified class of the `main` entrypoint, if one was compiled.
    pub entrypoint: Option<String>,
}

impl FabricManifest {
    /// Build the manifest for a pack.
    pub fn generate(
        identity: &PackIdentity,
        metadata: &PackMetadata,
        entrypoint: Option<&str>,
    ) -> Self {
        Self {
            id: identity.to_string(),
            name: identity::display_name(identity),
            description: metadata.description.clone(),
            icon: icon_path(identity),
            entrypoint: entrypoint.map(str::to_string),
        }
    }

    /// Render the JSON document, tab-indented with a trailing newline.
    pub fn render(&self) -> serde_json::Result<String> {
        let document = ManifestDocument {
            schema_version: 1,
            id: &self.id,
            version: MOD_VERSION,
            name: &self.name,
            description: &self.description,
            authors: AUTHORS,
            license: "MIT",
            icon: &self.icon,
            environment: "*",
            entrypoints: Entrypoints {
                main: self.entrypoint.as_deref().into_iter().collect(),
            },
            depends: Depends(DEPENDS),
        };

        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        document.serialize(&mut serializer)?;
        out.push(b'\n');
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// On-disk shape of `fabric.mod.json`. Field order is the emitted order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestDocument<'a> {
    schema_version: u32,
    id: &'a str,
    version: &'a str,
    name: &'a str,
    description: &'a str,
    authors: &'a [&'a str],
    license: &'a str,
    icon: &'a str,
    environment: &'a str,
    entrypoints: Entrypoints<'a>,
    depends: Depends,
}

/// Serializes as `{}` when nothing was compiled.
#[derive(Serialize)]
struct Entrypoints<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    main: Vec<&'a str>,
}

/// Dependency pairs as a JSON object, keeping declaration order.
struct Depends(&'static [(&'static str, &'static str)]);

impl Serialize for Depends {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().copied())
    }
}

#[cfg(test)]
#[path = "tests/manifest_tests.rs"]
mod tests;
