//! The compile-then-harvest workflow.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use vectex_artifact::{next_artifact_slot, ArtifactSlot};
use vectex_exec::Executor;

use crate::engine::LatexEngine;

/// Everything a successful typeset run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypesetOutput {
    /// The artifact slot the PDF was harvested into.
    pub slot: ArtifactSlot,
    /// Base64 image of the produced PDF, ready for embedding in the
    /// text-based document representation.
    pub encoded_pdf: String,
    /// Combined engine output, kept for diagnostics.
    pub compile_log: String,
}

/// Compiles LaTeX fragments into versioned per-document artifacts.
pub struct Typesetter {
    engine: LatexEngine,
    executor: Executor,
}

impl Default for Typesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typesetter {
    /// A typesetter using `pdflatex` from the search path and the default
    /// executor.
    pub fn new() -> Self {
        Self {
            engine: LatexEngine::detect("pdflatex"),
            executor: Executor::new(),
        }
    }

    pub fn with_engine(mut self, engine: LatexEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// Compiles `latex_source` and harvests the produced PDF into the next
    /// free artifact slot of `document_path`.
    ///
    /// The engine runs in a scratch directory inside the artifact directory;
    /// the scratch tree is removed again on every exit path, so only the
    /// versioned PDF remains.
    pub fn typeset_fragment(
        &self,
        document_path: &Path,
        latex_source: &str,
    ) -> Result<TypesetOutput> {
        let slot = next_artifact_slot(document_path)?;
        let build_dir = slot.directory.join(format!(".build_{}", slot.index));
        vectex_fs::create_dir_recursive(&build_dir)?;

        let outcome = self.compile_into(&slot, &build_dir, latex_source);
        let _ = vectex_fs::remove_dir_recursive(&build_dir, false);
        outcome
    }

    fn compile_into(
        &self,
        slot: &ArtifactSlot,
        build_dir: &Path,
        latex_source: &str,
    ) -> Result<TypesetOutput> {
        let tex_path = build_dir.join("fragment.tex");
        vectex_fs::write_text_utf8(&tex_path, latex_source, true)?;

        let command = self
            .engine
            .compile_command(&tex_path, build_dir)
            .with_context(|| format!("no {} executable available", self.engine.name()))?;

        let run = self.executor.execute(&command, false);
        if !run.success() {
            bail!(
                "the LaTeX engine exited with status {}:\n{}",
                run.exit_status,
                run.output
            );
        }

        let pdf_path = tex_path.with_extension("pdf");
        vectex_fs::copy_file(&pdf_path, &slot.path, false)?;
        let encoded_pdf = vectex_fs::encode_file_base64(&slot.path)?;

        Ok(TypesetOutput {
            slot: slot.clone(),
            encoded_pdf,
            compile_log: run.output,
        })
    }
}
