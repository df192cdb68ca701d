pub mod archive;
pub mod assembler;
pub mod compiler;
pub mod config;
pub mod extraction;
pub mod fs_utils;
pub mod identity;
pub mod ledger;
pub mod manifest;
pub mod metadata;
pub mod pipeline;
