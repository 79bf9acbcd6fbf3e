use crate::error::Error;
use crate::location::LineMap;
use rustpython_ast::{Mod, Stmt};
use rustpython_parser::{parse, Mode};

/// Parses Python source text into a module statement list.
///
/// Either the whole module parses and its top-level statements are
/// returned, or the parse fails and `Error::Syntax` carries the front
/// end's message together with the line and column of the offending
/// offset. There is no partial success.
pub fn parse_module(source: &str, source_path: &str) -> Result<Vec<Stmt>, Error> {
    let lines = LineMap::new(source);
    match parse(source, Mode::Module, source_path) {
        Ok(Mod::Module(module)) => Ok(module.body),
        // Mode::Module always yields Mod::Module on success.
        Ok(_) => unreachable!("module mode produced a non-module tree"),
        Err(e) => Err(Error::Syntax {
            message: e.error.to_string(),
            line: lines.line_of(e.offset),
            column: lines.column_of(e.offset),
        }),
    }
}
