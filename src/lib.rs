// Lib file to expose modules for testing and external usage.
// This file serves as the root for the library crate.

/// Module containing the analysis session object.
/// This includes the `Analysis` struct tying the source buffer, the parsed
/// module, and the symbol table together for downstream consumers.
pub mod analyzer;

/// Module defining the crate error taxonomy.
pub mod error;

/// Module wrapping the Python parser front end.
/// This converts raw source text into a statement list or a syntax error.
pub mod parser;

/// Module mapping byte offsets to line numbers.
/// The parser reports node positions as byte offsets; everything we show to
/// users is line-based.
pub mod location;

/// Module containing the symbol table and the scope walker.
/// This is responsible for traversing the Python AST and collecting
/// symbol records.
pub mod symbols;

/// Module computing aggregate code metrics over the full tree.
pub mod metrics;

/// Module rendering expression subtrees back to source text.
pub mod unparse;

/// Module extracting human-readable details for a named symbol.
pub mod details;

/// Module serializing a symbol table to CSV, JSON, and XML.
pub mod export;

pub use analyzer::Analysis;
pub use error::Error;
pub use metrics::MetricSet;
pub use symbols::{SymbolKind, SymbolRecord, SymbolTable};
