//! Engine module: digest provider, manifest format, and the CLI front end

pub mod arg_parser;
pub mod cli;
pub mod hashing;
pub mod manifest;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use hashing::{Accumulator, Algorithm, digest_stream, hex_equals, new_accumulator};
pub use manifest::{ManifestRecord, load_manifest, parse_manifest, parse_manifest_line};
