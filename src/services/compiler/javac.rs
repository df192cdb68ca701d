use super::{CompileError, CompiledClasses, CompilerService, SourceUnit};
use crate::services::config::models::PatcherConfig;
use crate::types::Diagnostic;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tempfile::TempDir;
use walkdir::WalkDir;

static RE_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*\.java):(\d+): (error|warning): (.*)$").expect("Invalid regex")
});

/// Shells out to a JDK `javac`. Sources and class files live in a temp dir
/// that is removed when compilation returns.
#[derive(Debug, Clone)]
pub struct JavacCompiler {
    javac: Result<PathBuf, String>,
    classpath: Vec<PathBuf>,
    release: String,
}

impl JavacCompiler {
    pub fn new(javac: PathBuf, classpath: Vec<PathBuf>, release: impl Into<String>) -> Self {
        Self {
            javac: Ok(javac),
            classpath,
            release: release.into(),
        }
    }

    /// Use the configured `javac`, or the first one on `PATH`.
    pub fn from_config(config: &PatcherConfig) -> Self {
        let javac = match config.entrypoints.javac {
            Some(ref path) => Ok(path.clone()),
            None => which::which("javac").map_err(|e| format!("javac not found on PATH: {e}")),
        };
        Self {
            javac,
            classpath: config.classpath(),
            release: config.entrypoints.release.clone(),
        }
    }

    fn javac(&self) -> Result<&Path, String> {
        self.javac.as_deref().map_err(Clone::clone)
    }

    fn run(&self, work: &Path, units: &[SourceUnit]) -> Result<CompiledClasses, CompileError> {
        let javac = self.javac().map_err(CompileError::Unavailable)?;
        let src_dir = work.join("src");
        let out_dir = work.join("classes");
        fs::create_dir_all(&out_dir).map_err(|e| CompileError::Io(e.to_string()))?;

        let mut files = Vec::with_capacity(units.len());
        for unit in units {
            let path = src_dir.join(format!("{}.java", unit.class_name.replace('.', "/")));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| CompileError::Io(e.to_string()))?;
            }
            fs::write(&path, &unit.source).map_err(|e| CompileError::Io(e.to_string()))?;
            files.push(path);
        }

        let mut cmd = Command::new(javac);
        cmd.arg("-d")
            .arg(&out_dir)
            .args(["-encoding", "UTF-8", "-proc:none", "--release", self.release.as_str()]);
        if !self.classpath.is_empty() {
            let joined = std::env::join_paths(&self.classpath)
                .map_err(|e| CompileError::Io(format!("Invalid classpath: {e}")))?;
            cmd.arg("-cp").arg(joined);
        }
        cmd.args(&files);

        log::debug!("Running {} on {} unit(s)", javac.display(), units.len());
        let output = cmd.output().map_err(|e| {
            CompileError::Unavailable(format!("Failed to run {}: {e}", javac.display()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut diagnostics = parse_diagnostics(&stderr);
            if diagnostics.is_empty() {
                diagnostics.push(Diagnostic {
                    line: None,
                    source_line: None,
                    message: format!(
                        "javac exited with {}: {}",
                        output.status.code().unwrap_or(-1),
                        stderr.trim()
                    ),
                });
            }
            return Err(CompileError::Diagnostics(diagnostics));
        }

        collect_classes(&out_dir)
    }
}

impl CompilerService for JavacCompiler {
    fn name(&self) -> &str {
        "javac"
    }

    fn availability(&self) -> Result<(), String> {
        let javac = self.javac()?;
        let output = Command::new(javac)
            .arg("-version")
            .output()
            .map_err(|e| format!("Failed to run {}: {e}", javac.display()))?;
        if !output.status.success() {
            return Err(format!(
                "{} -version exited with {}",
                javac.display(),
                output.status.code().unwrap_or(-1)
            ));
        }
        Ok(())
    }

    fn compile(&self, units: &[SourceUnit]) -> Result<CompiledClasses, CompileError> {
        let work = TempDir::new().map_err(|e| CompileError::Io(e.to_string()))?;
        self.run(work.path(), units)
    }
}

/// Read every `.class` under `out_dir`, keyed by fully-qualified name.
fn collect_classes(out_dir: &Path) -> Result<CompiledClasses, CompileError> {
    let mut classes = CompiledClasses::new();
    for entry in WalkDir::new(out_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CompileError::Io(e.to_string()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "class") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(out_dir) else {
            continue;
        };
        let name = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(".");
        let bytes = fs::read(path).map_err(|e| CompileError::Io(e.to_string()))?;
        classes.insert(name, bytes);
    }
    Ok(classes)
}

/// Parse javac's stderr into error diagnostics.
///
/// javac prints `File.java:LINE: error: MESSAGE`, then the offending source
/// line, then a caret marker. Warnings are dropped.
pub fn parse_diagnostics(stderr: &str) -> Vec<Diagnostic> {
    let lines: Vec<&str> = stderr.lines().collect();
    let mut diagnostics = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = RE_DIAGNOSTIC.captures(line) else {
            continue;
        };
        if &caps[3] != "error" {
            continue;
        }

        let source_line = lines
            .get(i + 1)
            .filter(|next| !RE_DIAGNOSTIC.is_match(next) && !next.trim().is_empty())
            .filter(|next| next.trim() != "^")
            .map(|next| next.to_string());

        diagnostics.push(Diagnostic {
            line: caps[2].parse().ok(),
            source_line,
            message: caps[4].to_string(),
        });
    }

    diagnostics
}
