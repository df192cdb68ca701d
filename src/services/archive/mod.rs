//! Archive container: narrow read/write traits over zip.
//!
//! Bundles are read through [`ArchiveReader`]; output jars are written through
//! [`ArchiveWriter`], which stages into a temp file and only publishes on close.

mod reader;
mod types;
mod writer;

pub use reader::{ArchiveReader, ZipBundleReader};
pub use types::{ArchiveEntry, ArchiveError, ArchiveFormat};
pub use writer::{ArchiveWriter, ZipJarWriter};

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
