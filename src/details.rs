use crate::unparse::{join_exprs, unparse_expr};
use rustpython_ast::{self as ast, Expr, Stmt};

/// Fallback text used when a definition carries no docstring.
const NO_DOCSTRING: &str = "No docstring available";

/// Looks up a symbol by name over the full tree and renders a
/// human-readable description of its defining node.
///
/// The search is pre-order depth-first and the first match wins: when a
/// nested definition shadows an outer one, the outer (earlier) node is the
/// one described. Returns `None` when nothing in the tree defines the
/// name; that is a designed "absent" result, not an error.
pub fn describe_symbol(body: &[Stmt], name: &str) -> Option<String> {
    for stmt in body {
        if let Some(details) = describe_stmt(stmt, name) {
            return Some(details);
        }
    }
    None
}

fn describe_stmt(stmt: &Stmt, name: &str) -> Option<String> {
    match stmt {
        Stmt::FunctionDef(node) => {
            if node.name.as_str() == name {
                return Some(function_details(
                    name,
                    &node.args,
                    node.returns.as_deref(),
                    &node.body,
                ));
            }
            describe_symbol(&node.body, name)
        }
        Stmt::AsyncFunctionDef(node) => {
            // Rendered with the same format as a synchronous def, matching
            // the table's classification of both as Function.
            if node.name.as_str() == name {
                return Some(function_details(
                    name,
                    &node.args,
                    node.returns.as_deref(),
                    &node.body,
                ));
            }
            describe_symbol(&node.body, name)
        }
        Stmt::ClassDef(node) => {
            if node.name.as_str() == name {
                return Some(class_details(name, &node.bases, &node.body));
            }
            describe_symbol(&node.body, name)
        }
        Stmt::Assign(node) => {
            // An assignment matches when one of its plain-name targets is
            // the queried name; the rendering then lists every target.
            let matches = node.targets.iter().any(|target| {
                matches!(target, Expr::Name(n) if n.id.as_str() == name)
            });
            if matches {
                return Some(format!("Assigned to: {}", join_exprs(&node.targets)));
            }
            None
        }
        Stmt::If(node) => describe_symbol(&node.body, name)
            .or_else(|| describe_symbol(&node.orelse, name)),
        Stmt::While(node) => describe_symbol(&node.body, name)
            .or_else(|| describe_symbol(&node.orelse, name)),
        Stmt::For(node) => describe_symbol(&node.body, name)
            .or_else(|| describe_symbol(&node.orelse, name)),
        Stmt::AsyncFor(node) => describe_symbol(&node.body, name)
            .or_else(|| describe_symbol(&node.orelse, name)),
        Stmt::With(node) => describe_symbol(&node.body, name),
        Stmt::AsyncWith(node) => describe_symbol(&node.body, name),
        Stmt::Try(node) => describe_symbol(&node.body, name)
            .or_else(|| {
                node.handlers.iter().find_map(|handler| {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    describe_symbol(&h.body, name)
                })
            })
            .or_else(|| describe_symbol(&node.orelse, name))
            .or_else(|| describe_symbol(&node.finalbody, name)),
        Stmt::TryStar(node) => describe_symbol(&node.body, name)
            .or_else(|| {
                node.handlers.iter().find_map(|handler| {
                    let ast::ExceptHandler::ExceptHandler(h) = handler;
                    describe_symbol(&h.body, name)
                })
            })
            .or_else(|| describe_symbol(&node.orelse, name))
            .or_else(|| describe_symbol(&node.finalbody, name)),
        Stmt::Match(node) => node
            .cases
            .iter()
            .find_map(|case| describe_symbol(&case.body, name)),
        _ => None,
    }
}

fn function_details(
    name: &str,
    args: &ast::Arguments,
    returns: Option<&Expr>,
    body: &[Stmt],
) -> String {
    let params: Vec<&str> = args.args.iter().map(|a| a.def.arg.as_str()).collect();
    let return_type = returns.map(unparse_expr).unwrap_or_else(|| "None".to_string());
    format!(
        "Function {}\nArguments: {}\nReturn Type: {}\nDocstring: {}",
        name,
        params.join(", "),
        return_type,
        docstring_of(body).unwrap_or(NO_DOCSTRING)
    )
}

fn class_details(name: &str, bases: &[Expr], body: &[Stmt]) -> String {
    format!(
        "Class {}\nBases: {}\nDocstring: {}",
        name,
        join_exprs(bases),
        docstring_of(body).unwrap_or(NO_DOCSTRING)
    )
}

/// The docstring of a definition body: its first statement, when that is a
/// bare string-constant expression.
fn docstring_of(body: &[Stmt]) -> Option<&str> {
    if let Some(Stmt::Expr(node)) = body.first() {
        if let Expr::Constant(constant) = &*node.value {
            if let ast::Constant::Str(s) = &constant.value {
                return Some(s);
            }
        }
    }
    None
}
