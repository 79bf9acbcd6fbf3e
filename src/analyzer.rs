use crate::details;
use crate::error::Error;
use crate::export;
use crate::location::LineMap;
use crate::metrics::MetricSet;
use crate::parser;
use crate::symbols::{self, SymbolTable};
use rustpython_ast::Stmt;
use std::path::Path;

/// One analysis session: a source buffer, its parsed tree, and the symbol
/// table built from it.
///
/// A session is produced whole by [`Analysis::parse`] and never mutated:
/// reparsing new text means building a new session and dropping this one.
/// The table is an owned value handed to the exporters and the detail
/// extractor explicitly, not ambient state. A completed session is
/// read-only, so sharing it across readers is safe.
#[derive(Debug)]
pub struct Analysis {
    source: String,
    body: Vec<Stmt>,
    symbols: SymbolTable,
}

impl Analysis {
    /// Parses the given source text and builds its symbol table.
    ///
    /// Fails with [`Error::Syntax`] when the text is not valid Python;
    /// there is no partial result. `source_path` only labels parser
    /// diagnostics, the file is never read here.
    pub fn parse(source: impl Into<String>, source_path: &str) -> Result<Self, Error> {
        let source = source.into();
        let body = parser::parse_module(&source, source_path)?;
        let lines = LineMap::new(&source);
        let symbols = symbols::build_symbol_table(&body, &lines);
        Ok(Self {
            source,
            body,
            symbols,
        })
    }

    /// The source text this session was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The symbol table, in walk order.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Computes the metric set for this session's buffer and tree.
    pub fn metrics(&self) -> MetricSet {
        MetricSet::measure(&self.source, &self.body)
    }

    /// Describes the first node defining `name`, or `None` when the tree
    /// defines no such symbol.
    pub fn describe(&self, name: &str) -> Option<String> {
        details::describe_symbol(&self.body, name)
    }

    /// Exports the symbol table to a file, picking the format from the
    /// destination extension. A failed export leaves this session intact.
    pub fn export(&self, destination: &Path) -> Result<(), Error> {
        export::export_to_path(&self.symbols, destination)
    }
}
