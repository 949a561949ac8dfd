//! Discovery and invocation of the external typesetting tools.

use std::path::{Path, PathBuf};

use log::{info, warn};

/// An external LaTeX engine (e.g. `pdflatex`, `xelatex`) located on this
/// machine.
#[derive(Debug, Clone)]
pub struct LatexEngine {
    name: String,
    path: Option<PathBuf>,
}

impl LatexEngine {
    /// Locates `name` on the search path.
    pub fn detect(name: &str) -> Self {
        match which::which(name) {
            Ok(path) => {
                info!("detected {name} at {path:?}");
                Self {
                    name: name.to_string(),
                    path: Some(path),
                }
            }
            Err(_) => {
                warn!("no {name} executable found on PATH");
                Self {
                    name: name.to_string(),
                    path: None,
                }
            }
        }
    }

    /// An engine at an explicit location, for callers that manage their own
    /// tool configuration.
    pub fn at(name: &str, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            path: Some(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }

    /// The non-interactive compile command for `source`, writing all outputs
    /// into `output_dir`. `None` when the engine was not found.
    ///
    /// Paths are double-quoted so directories with spaces survive the
    /// command-line split.
    pub fn compile_command(&self, source: &Path, output_dir: &Path) -> Option<String> {
        let engine = self.path.as_ref()?;
        Some(format!(
            "\"{}\" -interaction=nonstopmode -output-directory=\"{}\" \"{}\"",
            engine.display(),
            output_dir.display(),
            source.display()
        ))
    }
}

/// Probes the search path for a Ghostscript executable, trying the platform
/// binary names in order. `None` when Ghostscript is not installed.
pub fn find_ghostscript() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &["gs", "gswin64c", "gswin32c"];
    CANDIDATES.iter().find_map(|name| which::which(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unavailable_engine_has_no_command() {
        let engine = LatexEngine {
            name: "pdflatex".into(),
            path: None,
        };
        assert!(!engine.is_available());
        assert!(engine
            .compile_command(Path::new("a.tex"), Path::new("out"))
            .is_none());
    }

    #[test]
    fn test_compile_command_quotes_paths() {
        let engine = LatexEngine::at("pdflatex", PathBuf::from("/opt/tex bin/pdflatex"));
        let command = engine
            .compile_command(
                Path::new("/work/my doc/fragment.tex"),
                Path::new("/work/my doc/build"),
            )
            .unwrap();
        assert!(command.contains("\"/opt/tex bin/pdflatex\""));
        assert!(command.contains("-interaction=nonstopmode"));
        assert!(command.contains("-output-directory=\"/work/my doc/build\""));
        assert!(command.ends_with("\"/work/my doc/fragment.tex\""));
    }

    #[test]
    fn test_find_ghostscript_does_not_panic() {
        // Whether gs is installed depends on the machine; only the probe
        // itself is under test.
        let _ = find_ghostscript();
    }
}
