//! Expression printing.

use kern_ir::{BinaryOp, CallArgRange, ExprId, ExprKind, ExprRange};

use super::Printer;
use crate::Emitter;

/// Precedence of anything that never needs parentheses as an operand.
const ATOM: u8 = u8::MAX;

impl<E: Emitter> Printer<'_, E> {
    /// Print an expression; tuples are parenthesized.
    pub fn print_expr(&mut self, id: ExprId) {
        let expr = *self.arena.get_expr(id);
        match expr.kind {
            ExprKind::Int(value) => self.emit(&value.to_string()),
            ExprKind::Float(bits) => self.emit(&format_float(f64::from_bits(bits))),
            ExprKind::Str(text) => self.emit(&quote(self.interner.lookup(text))),
            ExprKind::Bool(true) => self.emit("True"),
            ExprKind::Bool(false) => self.emit("False"),
            ExprKind::None => self.emit("None"),
            ExprKind::Ident(name) => self.emit_name(name),
            ExprKind::Error => self.emit("<error>"),

            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let left_prec = self.precedence(left);
                let right_prec = self.precedence(right);
                // `**` groups right, comparisons do not chain, the rest
                // group left.
                let left_parens = left_prec < prec
                    || (left_prec == prec && (op == BinaryOp::Pow || op.is_comparison()));
                let right_parens =
                    right_prec < prec || (right_prec == prec && op != BinaryOp::Pow);
                self.print_operand(left, left_parens);
                self.emit(" ");
                self.emit(op.as_symbol());
                self.emit(" ");
                self.print_operand(right, right_parens);
            }

            ExprKind::Unary { op, operand } => {
                self.emit(op.as_symbol());
                let parens = self.precedence(operand) < op.precedence();
                self.print_operand(operand, parens);
            }

            ExprKind::Call { func, args } => {
                self.print_postfix_base(func);
                self.print_args(args);
            }

            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                self.print_postfix_base(receiver);
                self.emit(".");
                self.emit_name(method);
                self.print_args(args);
            }

            ExprKind::Attribute { value, attr } => {
                self.print_postfix_base(value);
                self.emit(".");
                self.emit_name(attr);
            }

            ExprKind::Subscript { value, index } => {
                self.print_postfix_base(value);
                self.emit("[");
                self.print_bare(index);
                self.emit("]");
            }

            ExprKind::List(items) => {
                self.emit("[");
                self.print_comma_list(self.arena.get_expr_list(items));
                self.emit("]");
            }

            ExprKind::Tuple(items) => {
                self.emit("(");
                self.print_tuple_items(items);
                self.emit(")");
            }

            ExprKind::Dict { keys, values } => {
                self.emit("{");
                let keys = self.arena.get_expr_list(keys);
                let values = self.arena.get_expr_list(values);
                for (i, (&key, &value)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.print_expr(key);
                    self.emit(": ");
                    self.print_expr(value);
                }
                self.emit("}");
            }

            ExprKind::ListComp {
                elt,
                target,
                iter,
                cond,
            } => {
                self.emit("[");
                self.print_expr(elt);
                self.emit(" for ");
                self.print_bare(target);
                self.emit(" in ");
                self.print_expr(iter);
                if cond.is_valid() {
                    self.emit(" if ");
                    self.print_expr(cond);
                }
                self.emit("]");
            }
        }
    }

    /// Print an expression where a bare tuple is allowed: `a, b = f()`.
    pub(super) fn print_bare(&mut self, id: ExprId) {
        match self.arena.get_expr(id).kind {
            ExprKind::Tuple(items) if !items.is_empty() => self.print_tuple_items(items),
            _ => self.print_expr(id),
        }
    }

    pub(super) fn print_comma_list(&mut self, items: &[ExprId]) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.print_expr(item);
        }
    }

    /// `a, b` or `a,` for a one-element tuple.
    fn print_tuple_items(&mut self, items: ExprRange) {
        let items = self.arena.get_expr_list(items);
        self.print_comma_list(items);
        if items.len() == 1 {
            self.emit(",");
        }
    }

    fn print_args(&mut self, args: CallArgRange) {
        self.emit("(");
        for (i, arg) in self.arena.get_call_args(args).iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            if arg.is_keyword() {
                self.emit_name(arg.name);
                self.emit("=");
            }
            self.print_expr(arg.value);
        }
        self.emit(")");
    }

    /// The part before `.`, `(` or `[`: operators need parentheses.
    fn print_postfix_base(&mut self, id: ExprId) {
        let parens = self.precedence(id) != ATOM;
        self.print_operand(id, parens);
    }

    fn print_operand(&mut self, id: ExprId, parens: bool) {
        if parens {
            self.emit("(");
            self.print_expr(id);
            self.emit(")");
        } else {
            self.print_expr(id);
        }
    }

    fn precedence(&self, id: ExprId) -> u8 {
        match self.arena.get_expr(id).kind {
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { op, .. } => op.precedence(),
            _ => ATOM,
        }
    }
}

/// Double-quoted literal with the escapes the lexer understands.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Integral floats keep a `.0` so they re-lex as floats.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "float(\"nan\")".to_owned();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("float(\"{sign}inf\")");
    }
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{text}.0")
    }
}
