//! Core value types for package verification.

mod rel_path;

pub use rel_path::RelPath;
