use crate::location::LineMap;
use rustpython_ast::{Expr, Stmt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Name of the root scope, used for symbols defined at module level.
pub const GLOBAL_SCOPE: &str = "Global";

/// Classification of a symbol record.
///
/// `Function` covers both synchronous and asynchronous definitions; the
/// metrics side counts them differently, but the table does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Import,
}

impl SymbolKind {
    /// The label used in the table's "Type" column.
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Function => "Function",
            SymbolKind::Class => "Class",
            SymbolKind::Variable => "Variable",
            SymbolKind::Import => "Import",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported occurrence of a named function, class, variable, or import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// The symbol identifier. For imports this is the imported name, never
    /// the bound alias.
    pub name: String,
    /// Classification of the defining node.
    pub kind: SymbolKind,
    /// The enclosing named construct, or `"Global"` at module level. For
    /// `from`-imports the source module is appended:
    /// `"<scope> (from <module>)"`.
    pub scope: String,
    /// 1-based line where the defining statement begins.
    pub line: usize,
    /// Session-local tag distinguishing otherwise-identical records.
    /// Monotonically increasing in visit order; carries no meaning beyond
    /// uniqueness within one table and is never stable across runs.
    pub identity: u64,
}

/// The ordered collection of symbol records for one parsed module.
///
/// Insertion order is pre-order walk order and is preserved exactly by
/// iteration and by every exporter. The table is rebuilt in full on every
/// parse; there is no incremental update.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
}

impl SymbolTable {
    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SymbolRecord> {
        self.records.iter()
    }

    /// The records as a slice, in insertion order.
    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    /// First record with the given name, in insertion order.
    pub fn find(&self, name: &str) -> Option<&SymbolRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    fn record(&mut self, name: String, kind: SymbolKind, scope: &str, line: usize, identity: u64) {
        self.records.push(SymbolRecord {
            name,
            kind,
            scope: scope.to_string(),
            line,
            identity,
        });
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a SymbolRecord;
    type IntoIter = std::slice::Iter<'a, SymbolRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Builds the symbol table for a parsed module body.
///
/// The walk is pre-order over direct children: a function or class emits
/// its record and then its body is walked under a scope named after it, so
/// nested definitions land immediately after the symbol that introduces
/// their scope. Assignments emit one `Variable` record per plain-name
/// target; attribute, subscript, and unpacking targets are skipped.
/// Imports emit one record per imported name.
///
/// The traversal uses an explicit work list instead of native recursion,
/// so nesting depth is bounded by the heap rather than the call stack.
pub fn build_symbol_table(body: &[Stmt], lines: &LineMap) -> SymbolTable {
    let mut table = SymbolTable::default();
    let mut next_identity: u64 = 1;
    let mut take_identity = || {
        let id = next_identity;
        next_identity += 1;
        id
    };

    let global: Rc<str> = Rc::from(GLOBAL_SCOPE);
    // LIFO work list: pushing children in reverse keeps source order.
    let mut work: Vec<(&Stmt, Rc<str>)> = Vec::with_capacity(body.len());
    for stmt in body.iter().rev() {
        work.push((stmt, global.clone()));
    }

    while let Some((stmt, scope)) = work.pop() {
        match stmt {
            Stmt::FunctionDef(node) => {
                let line = lines.line_of(node.range.start());
                table.record(
                    node.name.to_string(),
                    SymbolKind::Function,
                    &scope,
                    line,
                    take_identity(),
                );
                let inner: Rc<str> = Rc::from(node.name.as_str());
                for s in node.body.iter().rev() {
                    work.push((s, inner.clone()));
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                let line = lines.line_of(node.range.start());
                table.record(
                    node.name.to_string(),
                    SymbolKind::Function,
                    &scope,
                    line,
                    take_identity(),
                );
                let inner: Rc<str> = Rc::from(node.name.as_str());
                for s in node.body.iter().rev() {
                    work.push((s, inner.clone()));
                }
            }
            Stmt::ClassDef(node) => {
                let line = lines.line_of(node.range.start());
                table.record(
                    node.name.to_string(),
                    SymbolKind::Class,
                    &scope,
                    line,
                    take_identity(),
                );
                let inner: Rc<str> = Rc::from(node.name.as_str());
                for s in node.body.iter().rev() {
                    work.push((s, inner.clone()));
                }
            }
            Stmt::Assign(node) => {
                let line = lines.line_of(node.range.start());
                for target in &node.targets {
                    // Only plain-name targets become Variable records.
                    if let Expr::Name(name) = target {
                        table.record(
                            name.id.to_string(),
                            SymbolKind::Variable,
                            &scope,
                            line,
                            take_identity(),
                        );
                    }
                }
            }
            Stmt::Import(node) => {
                let line = lines.line_of(node.range.start());
                for alias in &node.names {
                    // The record keeps the imported name; an `as` alias is
                    // discarded.
                    table.record(
                        alias.name.to_string(),
                        SymbolKind::Import,
                        &scope,
                        line,
                        take_identity(),
                    );
                }
            }
            Stmt::ImportFrom(node) => {
                let line = lines.line_of(node.range.start());
                let module = node.module.as_ref().map(|m| m.as_str()).unwrap_or("");
                let annotated = format!("{scope} (from {module})");
                for alias in &node.names {
                    table.record(
                        alias.name.to_string(),
                        SymbolKind::Import,
                        &annotated,
                        line,
                        take_identity(),
                    );
                }
            }
            other => queue_nested_blocks(other, &scope, &mut work),
        }
    }

    table
}

/// Pushes the statement blocks nested inside a compound statement onto the
/// work list, keeping the current scope. The blocks are queued so that they
/// pop in source order.
fn queue_nested_blocks<'a>(
    stmt: &'a Stmt,
    scope: &Rc<str>,
    work: &mut Vec<(&'a Stmt, Rc<str>)>,
) {
    let mut blocks: Vec<&'a [Stmt]> = Vec::new();
    match stmt {
        Stmt::If(node) => {
            blocks.push(&node.body);
            blocks.push(&node.orelse);
        }
        Stmt::While(node) => {
            blocks.push(&node.body);
            blocks.push(&node.orelse);
        }
        Stmt::For(node) => {
            blocks.push(&node.body);
            blocks.push(&node.orelse);
        }
        Stmt::AsyncFor(node) => {
            blocks.push(&node.body);
            blocks.push(&node.orelse);
        }
        Stmt::With(node) => blocks.push(&node.body),
        Stmt::AsyncWith(node) => blocks.push(&node.body),
        Stmt::Try(node) => {
            blocks.push(&node.body);
            for handler in &node.handlers {
                let rustpython_ast::ExceptHandler::ExceptHandler(h) = handler;
                blocks.push(&h.body);
            }
            blocks.push(&node.orelse);
            blocks.push(&node.finalbody);
        }
        Stmt::TryStar(node) => {
            blocks.push(&node.body);
            for handler in &node.handlers {
                let rustpython_ast::ExceptHandler::ExceptHandler(h) = handler;
                blocks.push(&h.body);
            }
            blocks.push(&node.orelse);
            blocks.push(&node.finalbody);
        }
        Stmt::Match(node) => {
            for case in &node.cases {
                blocks.push(&case.body);
            }
        }
        // Simple statements have no nested blocks.
        _ => {}
    }

    for block in blocks.iter().rev() {
        for s in block.iter().rev() {
            work.push((s, scope.clone()));
        }
    }
}
