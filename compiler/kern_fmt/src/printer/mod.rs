//! Statement and declaration printing.

mod expr;

use kern_ir::{
    ClassId, ExprArena, ExprId, ExprRange, FunctionId, ImportId, Module, Name, StmtId, StmtKind,
    StmtRange, StringInterner,
};

use crate::Emitter;

/// Blank lines between a `def`/`class` and its neighbours at module level.
const TOP_LEVEL_BLANK_LINES: usize = 2;

/// Blank lines between a `def`/`class` and its neighbours inside a block.
const NESTED_BLANK_LINES: usize = 1;

/// Walks a tree and writes source to an [`Emitter`].
pub struct Printer<'a, E: Emitter> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    out: E,
    level: usize,
}

impl<'a, E: Emitter> Printer<'a, E> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner, out: E) -> Self {
        Printer {
            arena,
            interner,
            out,
            level: 0,
        }
    }

    pub fn finish(self) -> E {
        self.out
    }

    pub fn print_module(&mut self, module: &Module) {
        self.print_statements(module.body, TOP_LEVEL_BLANK_LINES);
    }

    pub fn print_function(&mut self, id: FunctionId) {
        let func = *self.arena.get_function(id);
        self.print_decorators(func.decorators);

        self.start_line();
        self.emit("def ");
        self.emit_name(func.name);
        self.emit("(");
        for (i, param) in self.arena.get_params(func.params).iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_name(param.name);
            match (param.annotation.is_valid(), param.default.is_valid()) {
                (true, true) => {
                    self.emit(": ");
                    self.print_expr(param.annotation);
                    self.emit(" = ");
                    self.print_expr(param.default);
                }
                (true, false) => {
                    self.emit(": ");
                    self.print_expr(param.annotation);
                }
                (false, true) => {
                    self.emit("=");
                    self.print_expr(param.default);
                }
                (false, false) => {}
            }
        }
        self.emit(")");
        if func.returns.is_valid() {
            self.emit(" -> ");
            self.print_expr(func.returns);
        }
        self.emit(":");
        self.end_line();
        self.print_suite(func.body);
    }

    fn print_class(&mut self, id: ClassId) {
        let class = *self.arena.get_class(id);
        self.print_decorators(class.decorators);

        self.start_line();
        self.emit("class ");
        self.emit_name(class.name);
        let bases = self.arena.get_expr_list(class.bases);
        if !bases.is_empty() {
            self.emit("(");
            self.print_comma_list(bases);
            self.emit(")");
        }
        self.emit(":");
        self.end_line();
        self.print_suite(class.body);
    }

    fn print_decorators(&mut self, decorators: ExprRange) {
        for &decorator in self.arena.get_expr_list(decorators) {
            self.start_line();
            self.emit("@");
            self.print_expr(decorator);
            self.end_line();
        }
    }

    /// An indented block; `pass` when empty.
    fn print_suite(&mut self, block: StmtRange) {
        self.level += 1;
        if block.is_empty() {
            self.line("pass");
        } else {
            self.print_statements(block, NESTED_BLANK_LINES);
        }
        self.level -= 1;
    }

    fn print_statements(&mut self, block: StmtRange, blank_lines: usize) {
        let mut previous_is_def = false;
        for (i, &id) in self.arena.get_stmt_list(block).iter().enumerate() {
            let is_def = matches!(
                self.arena.get_stmt(id).kind,
                StmtKind::Def(_) | StmtKind::Class(_)
            );
            if i > 0 && (is_def || previous_is_def) {
                for _ in 0..blank_lines {
                    self.out.emit_newline();
                }
            }
            self.print_stmt(id);
            previous_is_def = is_def;
        }
    }

    fn print_stmt(&mut self, id: StmtId) {
        match self.arena.get_stmt(id).kind {
            StmtKind::Def(func) => self.print_function(func),
            StmtKind::Class(class) => self.print_class(class),
            StmtKind::Import(import) => self.print_import(import),
            StmtKind::Expr(expr) => {
                self.start_line();
                self.print_bare(expr);
                self.end_line();
            }
            StmtKind::Assign { targets, value } => {
                self.start_line();
                for &target in self.arena.get_expr_list(targets) {
                    self.print_bare(target);
                    self.emit(" = ");
                }
                self.print_bare(value);
                self.end_line();
            }
            StmtKind::AugAssign { target, op, value } => {
                self.start_line();
                self.print_expr(target);
                self.emit(" ");
                self.emit(op.as_symbol());
                self.emit("= ");
                self.print_bare(value);
                self.end_line();
            }
            StmtKind::Return(value) => {
                self.start_line();
                self.emit("return");
                if value.is_valid() {
                    self.emit(" ");
                    self.print_bare(value);
                }
                self.end_line();
            }
            StmtKind::Pass => self.line("pass"),
            StmtKind::Break => self.line("break"),
            StmtKind::Continue => self.line("continue"),
            StmtKind::For { target, iter, body } => {
                self.start_line();
                self.emit("for ");
                self.print_bare(target);
                self.emit(" in ");
                self.print_bare(iter);
                self.emit(":");
                self.end_line();
                self.print_suite(body);
            }
            StmtKind::While { cond, body } => {
                self.header("while ", cond);
                self.print_suite(body);
            }
            StmtKind::With {
                context,
                target,
                body,
            } => {
                self.start_line();
                self.emit("with ");
                self.print_expr(context);
                if target.is_valid() {
                    self.emit(" as ");
                    self.print_expr(target);
                }
                self.emit(":");
                self.end_line();
                self.print_suite(body);
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => self.print_if(cond, then_body, else_body),
        }
    }

    /// `if` with an `elif` for every `else` whose only statement is an `if`.
    fn print_if(&mut self, cond: ExprId, then_body: StmtRange, else_body: StmtRange) {
        self.header("if ", cond);
        self.print_suite(then_body);

        let mut rest = else_body;
        loop {
            let stmts = self.arena.get_stmt_list(rest);
            if let [only] = stmts {
                if let StmtKind::If {
                    cond,
                    then_body,
                    else_body,
                } = self.arena.get_stmt(*only).kind
                {
                    self.header("elif ", cond);
                    self.print_suite(then_body);
                    rest = else_body;
                    continue;
                }
            }
            if !stmts.is_empty() {
                self.line("else:");
                self.print_suite(rest);
            }
            break;
        }
    }

    fn print_import(&mut self, id: ImportId) {
        let import = self.arena.get_import(id);
        self.start_line();
        if !import.from.is_empty() {
            self.emit("from ");
            self.emit_name(import.from);
            self.emit(" ");
        }
        self.emit("import ");
        for (i, item) in import.items.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_name(item.path);
            if !item.alias.is_empty() {
                self.emit(" as ");
                self.emit_name(item.alias);
            }
        }
        self.end_line();
    }

    /// `keyword cond:` on its own line.
    fn header(&mut self, keyword: &str, cond: ExprId) {
        self.start_line();
        self.emit(keyword);
        self.print_expr(cond);
        self.emit(":");
        self.end_line();
    }

    fn line(&mut self, text: &str) {
        self.start_line();
        self.emit(text);
        self.end_line();
    }

    fn start_line(&mut self) {
        self.out.emit_indent(self.level);
    }

    fn end_line(&mut self) {
        self.out.emit_newline();
    }

    fn emit(&mut self, text: &str) {
        self.out.emit(text);
    }

    fn emit_name(&mut self, name: Name) {
        self.out.emit(self.interner.lookup(name));
    }
}
