//! Boxiii domain core.
//!
//! Pure logic with no I/O: content attribute rules, sequence number
//! formatting, prompt construction, provider-output parsing, and duplicate
//! detection. The database, provider adapters, and HTTP layer all build on
//! these types.

pub mod card_parser;
pub mod content;
pub mod duplicate_detection;
pub mod error;
pub mod generation;
pub mod hashing;
pub mod numbering;
pub mod prompt;
pub mod schema;
pub mod search;
pub mod types;
