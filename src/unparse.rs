use rustpython_ast::{self as ast, BoolOp, CmpOp, Expr, Operator, UnaryOp};

/// Renders an expression subtree back to source text.
///
/// This backs the detail strings: return-type annotations, base-class
/// expressions, and assignment targets all go through here. The rendering
/// covers the expression kinds that realistically appear in those
/// positions; anything else falls back to `"..."`.
pub fn unparse_expr(expr: &Expr) -> String {
    match expr {
        Expr::Name(node) => node.id.to_string(),
        Expr::Attribute(node) => {
            format!("{}.{}", unparse_expr(&node.value), node.attr)
        }
        Expr::Subscript(node) => {
            // A tuple slice prints bare: Dict[str, int], not Dict[(str, int)].
            let slice = match &*node.slice {
                Expr::Tuple(tuple) => join_exprs(&tuple.elts),
                other => unparse_expr(other),
            };
            format!("{}[{}]", unparse_expr(&node.value), slice)
        }
        Expr::Slice(node) => {
            let lower = node.lower.as_deref().map(unparse_expr).unwrap_or_default();
            let upper = node.upper.as_deref().map(unparse_expr).unwrap_or_default();
            match &node.step {
                Some(step) => format!("{}:{}:{}", lower, upper, unparse_expr(step)),
                None => format!("{lower}:{upper}"),
            }
        }
        Expr::Call(node) => {
            let mut parts: Vec<String> = node.args.iter().map(unparse_expr).collect();
            for keyword in &node.keywords {
                match &keyword.arg {
                    Some(arg) => parts.push(format!("{}={}", arg, unparse_expr(&keyword.value))),
                    None => parts.push(format!("**{}", unparse_expr(&keyword.value))),
                }
            }
            format!("{}({})", unparse_expr(&node.func), parts.join(", "))
        }
        Expr::Constant(node) => unparse_constant(&node.value),
        Expr::Tuple(node) => format!("({})", join_exprs(&node.elts)),
        Expr::List(node) => format!("[{}]", join_exprs(&node.elts)),
        Expr::Set(node) => format!("{{{}}}", join_exprs(&node.elts)),
        Expr::Dict(node) => {
            let parts: Vec<String> = node
                .keys
                .iter()
                .zip(&node.values)
                .map(|(key, value)| match key {
                    Some(k) => format!("{}: {}", unparse_expr(k), unparse_expr(value)),
                    None => format!("**{}", unparse_expr(value)),
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Expr::Starred(node) => format!("*{}", unparse_expr(&node.value)),
        Expr::BinOp(node) => format!(
            "{} {} {}",
            unparse_expr(&node.left),
            operator_token(&node.op),
            unparse_expr(&node.right)
        ),
        Expr::UnaryOp(node) => match node.op {
            UnaryOp::Not => format!("not {}", unparse_expr(&node.operand)),
            UnaryOp::Invert => format!("~{}", unparse_expr(&node.operand)),
            UnaryOp::UAdd => format!("+{}", unparse_expr(&node.operand)),
            UnaryOp::USub => format!("-{}", unparse_expr(&node.operand)),
        },
        Expr::BoolOp(node) => {
            let joiner = match node.op {
                BoolOp::And => " and ",
                BoolOp::Or => " or ",
            };
            node.values
                .iter()
                .map(unparse_expr)
                .collect::<Vec<_>>()
                .join(joiner)
        }
        Expr::Compare(node) => {
            let mut out = unparse_expr(&node.left);
            for (op, comparator) in node.ops.iter().zip(&node.comparators) {
                out.push_str(&format!(" {} {}", compare_token(op), unparse_expr(comparator)));
            }
            out
        }
        Expr::IfExp(node) => format!(
            "{} if {} else {}",
            unparse_expr(&node.body),
            unparse_expr(&node.test),
            unparse_expr(&node.orelse)
        ),
        Expr::Lambda(node) => {
            let params: Vec<&str> = node.args.args.iter().map(|a| a.def.arg.as_str()).collect();
            if params.is_empty() {
                format!("lambda: {}", unparse_expr(&node.body))
            } else {
                format!("lambda {}: {}", params.join(", "), unparse_expr(&node.body))
            }
        }
        Expr::Await(node) => format!("await {}", unparse_expr(&node.value)),
        _ => "...".to_string(),
    }
}

/// Comma-joins a sequence of rendered expressions.
pub fn join_exprs(exprs: &[Expr]) -> String {
    exprs.iter().map(unparse_expr).collect::<Vec<_>>().join(", ")
}

fn unparse_constant(constant: &ast::Constant) -> String {
    match constant {
        ast::Constant::None => "None".to_string(),
        ast::Constant::Bool(true) => "True".to_string(),
        ast::Constant::Bool(false) => "False".to_string(),
        ast::Constant::Str(s) => format!("'{s}'"),
        ast::Constant::Bytes(bytes) => {
            format!("b'{}'", String::from_utf8_lossy(bytes))
        }
        ast::Constant::Int(i) => i.to_string(),
        // {:?} keeps the trailing .0 that {} would drop.
        ast::Constant::Float(f) => format!("{f:?}"),
        ast::Constant::Complex { real, imag } => {
            if *real == 0.0 {
                format!("{imag:?}j")
            } else {
                format!("({real:?}+{imag:?}j)")
            }
        }
        ast::Constant::Ellipsis => "...".to_string(),
        ast::Constant::Tuple(items) => {
            let parts: Vec<String> = items.iter().map(unparse_constant).collect();
            format!("({})", parts.join(", "))
        }
    }
}

fn operator_token(op: &Operator) -> &'static str {
    match op {
        Operator::Add => "+",
        Operator::Sub => "-",
        Operator::Mult => "*",
        Operator::MatMult => "@",
        Operator::Div => "/",
        Operator::Mod => "%",
        Operator::Pow => "**",
        Operator::LShift => "<<",
        Operator::RShift => ">>",
        Operator::BitOr => "|",
        Operator::BitXor => "^",
        Operator::BitAnd => "&",
        Operator::FloorDiv => "//",
    }
}

fn compare_token(op: &CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "==",
        CmpOp::NotEq => "!=",
        CmpOp::Lt => "<",
        CmpOp::LtE => "<=",
        CmpOp::Gt => ">",
        CmpOp::GtE => ">=",
        CmpOp::Is => "is",
        CmpOp::IsNot => "is not",
        CmpOp::In => "in",
        CmpOp::NotIn => "not in",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustpython_parser::{parse, Mode};

    /// Parses `text` as an expression statement and returns the expression.
    fn expr_of(text: &str) -> Expr {
        let tree = parse(text, Mode::Module, "test.py").expect("failed to parse");
        if let rustpython_ast::Mod::Module(module) = tree {
            if let rustpython_ast::Stmt::Expr(node) = module.body.into_iter().next().unwrap() {
                return *node.value;
            }
        }
        panic!("not an expression statement: {text}");
    }

    #[test]
    fn test_name_and_attribute() {
        assert_eq!(unparse_expr(&expr_of("x")), "x");
        assert_eq!(unparse_expr(&expr_of("a.b.c")), "a.b.c");
    }

    #[test]
    fn test_subscript_with_tuple_slice() {
        assert_eq!(unparse_expr(&expr_of("Dict[str, int]")), "Dict[str, int]");
        assert_eq!(unparse_expr(&expr_of("List[int]")), "List[int]");
        assert_eq!(unparse_expr(&expr_of("xs[1:2]")), "xs[1:2]");
    }

    #[test]
    fn test_call() {
        assert_eq!(unparse_expr(&expr_of("f(1, x, k=2)")), "f(1, x, k=2)");
    }

    #[test]
    fn test_constants() {
        assert_eq!(unparse_expr(&expr_of("None")), "None");
        assert_eq!(unparse_expr(&expr_of("True")), "True");
        assert_eq!(unparse_expr(&expr_of("'hi'")), "'hi'");
        assert_eq!(unparse_expr(&expr_of("1.5")), "1.5");
    }

    #[test]
    fn test_operators() {
        assert_eq!(unparse_expr(&expr_of("a + b * c")), "a + b * c");
        assert_eq!(unparse_expr(&expr_of("not a")), "not a");
        assert_eq!(unparse_expr(&expr_of("a and b and c")), "a and b and c");
        assert_eq!(unparse_expr(&expr_of("a <= b")), "a <= b");
    }

    #[test]
    fn test_containers() {
        assert_eq!(unparse_expr(&expr_of("[1, 2]")), "[1, 2]");
        assert_eq!(unparse_expr(&expr_of("(a, b)")), "(a, b)");
        assert_eq!(unparse_expr(&expr_of("{'k': v}")), "{'k': v}");
    }
}
