//! # vectex-fs
//!
//! File-system services for the vectex plugin core.
//!
//! ## Overview
//!
//! This crate is the bottom layer of the vectex workspace. It provides:
//!
//! - **Path predicates** ([`predicates`]) - infallible existence/type/
//!   writability queries
//! - **File operations** ([`ops`]) - create/remove/copy/read/write with
//!   explicit overwrite and existence preconditions, every failure mapped to
//!   a typed [`FsError`]
//! - **Binary embedding codec** ([`encode`]) - base64 bridge between artifact
//!   bytes on disk and the text-based document representation
//!
//! ## Error model
//!
//! Predicates never fail: any I/O error reads as "no". Operations fail fast
//! with one [`FsError`] variant per precondition so callers can match on the
//! exact condition instead of parsing messages.
//!
//! ## Concurrency
//!
//! There is no internal locking. Two writers racing on the same path is
//! undefined behavior; callers own that coordination.

pub mod encode;
pub mod error;
pub mod ops;
pub mod predicates;


pub use encode::{decode_file_base64, encode_file_base64};
pub use error::FsError;
pub use ops::{
    absolute_path, copy_file, create_dir_recursive, find_files_matching, read_text_utf8,
    remove_dir_recursive, remove_file, write_text_utf8,
};
pub use predicates::{is_directory, is_file, is_writable};
