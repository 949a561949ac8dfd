//! # vectex-core
//!
//! The compile-then-harvest workflow: claim the next artifact slot for the
//! document, run the external LaTeX engine on the fragment source, and embed
//! the produced PDF as base64 for storage inside the document.
//!
//! The leaf services ([`vectex_fs`], [`vectex_artifact`], [`vectex_exec`])
//! stay independently usable; this crate only wires them together and owns
//! the external-tool discovery.

pub mod engine;
pub mod typeset;

pub use engine::{find_ghostscript, LatexEngine};
pub use typeset::{TypesetOutput, Typesetter};
