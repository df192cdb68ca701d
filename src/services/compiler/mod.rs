//! Optional entrypoint compilation.
//!
//! A generated pack can carry a tiny `ModInitializer` so the loader logs it at
//! startup. Compiling one needs a JDK, so the capability sits behind
//! [`CompilerService`] and is disabled unless configured.

mod javac;
pub mod source;

pub use javac::{parse_diagnostics, JavacCompiler};
pub use source::{entrypoint_class_name, entrypoint_source, GENERATED_PACKAGE};

use crate::services::config::models::PatcherConfig;
use crate::services::identity::PackIdentity;
use crate::types::{Diagnostic, PackError, PackResult};
use std::collections::BTreeMap;
use thiserror::Error;

/// One Java compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Fully-qualified class name, e.g. `pokepatcher.generated.Datapack_x`.
    pub class_name: String,
    pub source: String,
}

/// Class bytes keyed by fully-qualified name.
pub type CompiledClasses = BTreeMap<String, Vec<u8>>;

/// Compiled entrypoint for one pack.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub entrypoint: String,
    pub classes: CompiledClasses,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("compiler reported {} diagnostic(s)", .0.len())]
    Diagnostics(Vec<Diagnostic>),
    #[error("compiler I/O failed: {0}")]
    Io(String),
    #[error("compiler unavailable: {0}")]
    Unavailable(String),
}

/// Compiles Java sources into class bytes held in memory.
pub trait CompilerService: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(())` when [`compile`](Self::compile) can be expected to run.
    fn availability(&self) -> Result<(), String>;

    fn compile(&self, units: &[SourceUnit]) -> Result<CompiledClasses, CompileError>;
}

/// Used when entrypoints are turned off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCompiler;

impl CompilerService for DisabledCompiler {
    fn name(&self) -> &str {
        "disabled"
    }

    fn availability(&self) -> Result<(), String> {
        Err("entrypoint compilation is disabled".to_string())
    }

    fn compile(&self, _units: &[SourceUnit]) -> Result<CompiledClasses, CompileError> {
        Err(CompileError::Unavailable(
            "entrypoint compilation is disabled".to_string(),
        ))
    }
}

/// Pick the compiler adapter for this configuration.
pub fn select(config: &PatcherConfig) -> Box<dyn CompilerService> {
    if config.entrypoints.enabled {
        Box::new(JavacCompiler::from_config(config))
    } else {
        Box::new(DisabledCompiler)
    }
}

/// Generate, compile and check the entrypoint class for one pack.
pub fn build_entrypoint(
    compiler: &dyn CompilerService,
    identity: &PackIdentity,
) -> PackResult<CompiledUnit> {
    let unit = entrypoint_source(identity);
    let class_name = unit.class_name.clone();

    let classes = match compiler.compile(std::slice::from_ref(&unit)) {
        Ok(classes) => classes,
        Err(CompileError::Unavailable(reason)) => {
            return Err(PackError::CompilerUnavailable(reason));
        }
        Err(CompileError::Diagnostics(diagnostics)) => {
            for diagnostic in &diagnostics {
                log::error!("[{identity}] {class_name}: {diagnostic}");
            }
            return Err(PackError::CompilationDiagnostic {
                class_name,
                diagnostics,
            });
        }
        Err(CompileError::Io(reason)) => {
            log::error!("[{identity}] {class_name}: {reason}");
            return Err(PackError::CompilationDiagnostic {
                class_name,
                diagnostics: vec![Diagnostic {
                    line: None,
                    source_line: None,
                    message: reason,
                }],
            });
        }
    };

    if !classes.contains_key(&class_name) {
        let message = format!("{} produced no class named {class_name}", compiler.name());
        log::error!("[{identity}] {message}");
        return Err(PackError::CompilationDiagnostic {
            class_name,
            diagnostics: vec![Diagnostic {
                line: None,
                source_line: None,
                message,
            }],
        });
    }

    log::debug!(
        "[{identity}] compiled {} class(es) with {}",
        classes.len(),
        compiler.name()
    );

    Ok(CompiledUnit {
        entrypoint: class_name,
        classes,
    })
}

#[cfg(test)]
#[path = "tests/compiler_tests.rs"]
mod tests;
