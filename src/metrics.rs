use crate::location;
use rustpython_ast::{Expr, Stmt};
use serde::{Deserialize, Serialize};

/// Aggregate code metrics for one parsed module.
///
/// Recomputed in full per request; nothing here is cached across edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSet {
    /// `1 +` the number of `if`/`while`/`for`/`async for` statements and
    /// boolean-operator nodes in the tree. A chained `a and b and c` is a
    /// single node and contributes 1.
    pub cyclomatic_complexity: usize,
    /// Newline-delimited lines in the loaded buffer.
    pub lines_of_code: usize,
    /// Count of synchronous `def` statements. Async definitions are
    /// excluded here even though the symbol table classifies them as
    /// functions; the asymmetry is intentional and preserved.
    pub number_of_functions: usize,
    /// Count of `class` statements.
    pub number_of_classes: usize,
    /// Count of `import`/`from ... import` statements, one per statement
    /// regardless of how many names it binds.
    pub number_of_imports: usize,
}

impl MetricSet {
    /// Computes all metrics for the given buffer and its parsed body.
    ///
    /// An empty module yields complexity 1 and all counts 0.
    pub fn measure(source: &str, body: &[Stmt]) -> Self {
        let mut counter = MetricsVisitor::default();
        for stmt in body {
            counter.visit_stmt(stmt);
        }
        MetricSet {
            cyclomatic_complexity: 1 + counter.branches,
            lines_of_code: location::lines_of_code(source),
            number_of_functions: counter.functions,
            number_of_classes: counter.classes,
            number_of_imports: counter.imports,
        }
    }

    /// The metrics as `(label, value)` pairs in display order, matching
    /// the key set of the metrics report.
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("Cyclomatic Complexity", self.cyclomatic_complexity),
            ("Lines of Code", self.lines_of_code),
            ("Number of Functions", self.number_of_functions),
            ("Number of Classes", self.number_of_classes),
            ("Number of Imports", self.number_of_imports),
        ]
    }
}

/// Counting visitor over every node of the tree, statements and
/// expressions alike.
#[derive(Default)]
struct MetricsVisitor {
    branches: usize,
    functions: usize,
    classes: usize,
    imports: usize,
}

impl MetricsVisitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => {
                self.functions += 1;
                for dec in &node.decorator_list {
                    self.visit_expr(dec);
                }
                self.visit_arguments(&node.args);
                if let Some(returns) = &node.returns {
                    self.visit_expr(returns);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                // Not counted in number_of_functions.
                for dec in &node.decorator_list {
                    self.visit_expr(dec);
                }
                self.visit_arguments(&node.args);
                if let Some(returns) = &node.returns {
                    self.visit_expr(returns);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::ClassDef(node) => {
                self.classes += 1;
                for dec in &node.decorator_list {
                    self.visit_expr(dec);
                }
                for base in &node.bases {
                    self.visit_expr(base);
                }
                for keyword in &node.keywords {
                    self.visit_expr(&keyword.value);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Import(_) | Stmt::ImportFrom(_) => {
                // One per statement, however many names it binds.
                self.imports += 1;
            }
            Stmt::If(node) => {
                self.branches += 1;
                self.visit_expr(&node.test);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                // An `elif` arrives here as a nested If in `orelse` and
                // contributes its own branch.
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::While(node) => {
                self.branches += 1;
                self.visit_expr(&node.test);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::For(node) => {
                self.branches += 1;
                self.visit_expr(&node.target);
                self.visit_expr(&node.iter);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFor(node) => {
                self.branches += 1;
                self.visit_expr(&node.target);
                self.visit_expr(&node.iter);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.visit_expr(vars);
                    }
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncWith(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.visit_expr(vars);
                    }
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Try(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for handler in &node.handlers {
                    let rustpython_ast::ExceptHandler::ExceptHandler(h) = handler;
                    if let Some(type_) = &h.type_ {
                        self.visit_expr(type_);
                    }
                    for stmt in &h.body {
                        self.visit_stmt(stmt);
                    }
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.finalbody {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::TryStar(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for handler in &node.handlers {
                    let rustpython_ast::ExceptHandler::ExceptHandler(h) = handler;
                    if let Some(type_) = &h.type_ {
                        self.visit_expr(type_);
                    }
                    for stmt in &h.body {
                        self.visit_stmt(stmt);
                    }
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.finalbody {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Match(node) => {
                self.visit_expr(&node.subject);
                for case in &node.cases {
                    if let Some(guard) = &case.guard {
                        self.visit_expr(guard);
                    }
                    for stmt in &case.body {
                        self.visit_stmt(stmt);
                    }
                }
            }
            Stmt::Assign(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
                self.visit_expr(&node.value);
            }
            Stmt::AugAssign(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.value);
            }
            Stmt::AnnAssign(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.annotation);
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Delete(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.visit_expr(exc);
                }
                if let Some(cause) = &node.cause {
                    self.visit_expr(cause);
                }
            }
            Stmt::Assert(node) => {
                self.visit_expr(&node.test);
                if let Some(msg) = &node.msg {
                    self.visit_expr(msg);
                }
            }
            Stmt::Expr(node) => {
                self.visit_expr(&node.value);
            }
            _ => {}
        }
    }

    fn visit_arguments(&mut self, args: &rustpython_ast::Arguments) {
        for arg in args.posonlyargs.iter().chain(&args.args).chain(&args.kwonlyargs) {
            if let Some(annotation) = &arg.def.annotation {
                self.visit_expr(annotation);
            }
            if let Some(default) = &arg.default {
                self.visit_expr(default);
            }
        }
        if let Some(vararg) = &args.vararg {
            if let Some(annotation) = &vararg.annotation {
                self.visit_expr(annotation);
            }
        }
        if let Some(kwarg) = &args.kwarg {
            if let Some(annotation) = &kwarg.annotation {
                self.visit_expr(annotation);
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::BoolOp(node) => {
                // One node per and/or chain, regardless of operand count.
                self.branches += 1;
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::BinOp(node) => {
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
            }
            Expr::UnaryOp(node) => {
                self.visit_expr(&node.operand);
            }
            Expr::NamedExpr(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.value);
            }
            Expr::Lambda(node) => {
                self.visit_arguments(&node.args);
                self.visit_expr(&node.body);
            }
            Expr::IfExp(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::Dict(node) => {
                for (key, value) in node.keys.iter().zip(&node.values) {
                    if let Some(k) = key {
                        self.visit_expr(k);
                    }
                    self.visit_expr(value);
                }
            }
            Expr::Set(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::ListComp(node) => {
                self.visit_expr(&node.elt);
                self.visit_comprehensions(&node.generators);
            }
            Expr::SetComp(node) => {
                self.visit_expr(&node.elt);
                self.visit_comprehensions(&node.generators);
            }
            Expr::DictComp(node) => {
                self.visit_expr(&node.key);
                self.visit_expr(&node.value);
                self.visit_comprehensions(&node.generators);
            }
            Expr::GeneratorExp(node) => {
                self.visit_expr(&node.elt);
                self.visit_comprehensions(&node.generators);
            }
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Yield(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Expr::YieldFrom(node) => self.visit_expr(&node.value),
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for comparator in &node.comparators {
                    self.visit_expr(comparator);
                }
            }
            Expr::Call(node) => {
                self.visit_expr(&node.func);
                for arg in &node.args {
                    self.visit_expr(arg);
                }
                for keyword in &node.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
            Expr::FormattedValue(node) => self.visit_expr(&node.value),
            Expr::JoinedStr(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Attribute(node) => self.visit_expr(&node.value),
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::Starred(node) => self.visit_expr(&node.value),
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.visit_expr(lower);
                }
                if let Some(upper) = &node.upper {
                    self.visit_expr(upper);
                }
                if let Some(step) = &node.step {
                    self.visit_expr(step);
                }
            }
            _ => {}
        }
    }

    fn visit_comprehensions(&mut self, generators: &[rustpython_ast::Comprehension]) {
        for gen in generators {
            self.visit_expr(&gen.target);
            self.visit_expr(&gen.iter);
            for if_expr in &gen.ifs {
                self.visit_expr(if_expr);
            }
        }
    }
}
