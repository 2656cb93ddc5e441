//! Manifest location, parsing, and structural validation.

mod parser;
pub mod schema;
pub mod xml;

pub use parser::DeclaredChecksum;
pub use parser::EntryDefect;
pub use parser::FileEntry;
pub use parser::Manifest;
pub use parser::ManifestLocator;
pub use parser::locate;
pub use parser::parse;
