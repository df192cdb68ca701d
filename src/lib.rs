//! Packages Minecraft datapacks into Fabric mod jars.
//!
//! Datapacks (directories or `.zip` bundles) dropped into
//! `config/pokepatcher/datapacks` are turned into `mods/<id>.jar`. A ledger
//! keeps each pack from being packaged twice.

pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::config::{ConfigService, PatcherConfig};
pub use services::pipeline::package_datapacks;
pub use types::{PackError, PackResult, RunSummary};
