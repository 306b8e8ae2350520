//! Calls, attribute access and methods on builtin containers.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

use kern_ir::{Name, Param, Span};

use super::{Flow, Interpreter};
use crate::environment::{Environment, ScopeKind};
use crate::errors::{EvalErrorKind, EvalResult};
use crate::value::{BoundMethod, ClassValue, FunctionValue, Instance};
use crate::Value;

impl Interpreter<'_> {
    pub(super) fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        keywords: Vec<(Name, Value)>,
        span: Span,
    ) -> EvalResult {
        match callee {
            Value::Function(function) => self.call_function(function, args, keywords, span),
            Value::BoundMethod(method) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(method.receiver.clone());
                full.extend(args);
                self.call_function(&method.function, full, keywords, span)
            }
            Value::Builtin(builtin) => {
                if let Some((keyword, _)) = keywords.first() {
                    return Err(EvalErrorKind::UnexpectedKeyword {
                        function: builtin.name().to_owned(),
                        keyword: self.interner.lookup(*keyword).to_owned(),
                    }
                    .at(span));
                }
                builtin.call(args).map_err(|kind| kind.at(span))
            }
            Value::Class(class) => self.instantiate(class, args, keywords, span),
            other => Err(EvalErrorKind::NotCallable {
                type_name: other.type_name(),
            }
            .at(span)),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<FunctionValue>,
        args: Vec<Value>,
        keywords: Vec<(Name, Value)>,
        span: Span,
    ) -> EvalResult {
        tracing::trace!(function = function.label, args = args.len(), "call");
        self.stats.record_call(function.name);

        let arena = self.arena;
        let def = arena.get_function(function.def);
        let frame = function.closure.child(ScopeKind::Function);
        self.bind_arguments(function, arena.get_params(def.params), args, keywords, &frame)
            .map_err(|kind| kind.at(span))?;

        self.depth
            .enter()
            .map_err(|exceeded| EvalErrorKind::RecursionLimit {
                limit: exceeded.limit,
            }
            .at(span))?;
        let enclosing_loops = std::mem::take(&mut self.loop_depth);
        let result = self.exec_block(def.body, &frame);
        self.loop_depth = enclosing_loops;
        self.depth.exit();

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Next | Flow::Break | Flow::Continue => Ok(Value::None),
        }
    }

    /// Positional arguments fill parameters left to right, keywords by
    /// name, defaults fill the rest.
    fn bind_arguments(
        &self,
        function: &FunctionValue,
        params: &[Param],
        args: Vec<Value>,
        keywords: Vec<(Name, Value)>,
        frame: &Environment,
    ) -> Result<(), EvalErrorKind> {
        if args.len() > params.len() {
            return Err(EvalErrorKind::ArityMismatch {
                function: function.label.to_owned(),
                expected: params.len().to_string(),
                got: args.len(),
            });
        }
        let mut slots: Vec<Option<Value>> = args.into_iter().map(Some).collect();
        slots.resize(params.len(), None);

        for (name, value) in keywords {
            let Some(i) = params.iter().position(|param| param.name == name) else {
                return Err(EvalErrorKind::UnexpectedKeyword {
                    function: function.label.to_owned(),
                    keyword: self.interner.lookup(name).to_owned(),
                });
            };
            if slots[i].is_some() {
                return Err(EvalErrorKind::DuplicateArgument {
                    function: function.label.to_owned(),
                    param: self.interner.lookup(name).to_owned(),
                });
            }
            slots[i] = Some(value);
        }

        for ((param, slot), default) in params.iter().zip(slots).zip(&function.defaults) {
            let value = match slot.or_else(|| default.clone()) {
                Some(value) => value,
                None => {
                    return Err(EvalErrorKind::MissingArgument {
                        function: function.label.to_owned(),
                        param: self.interner.lookup(param.name).to_owned(),
                    })
                }
            };
            frame.define(param.name, value);
        }
        Ok(())
    }

    /// `Class(args)`: a fresh instance, initialized by `__init__` if the
    /// class has one.
    fn instantiate(
        &mut self,
        class: &Rc<ClassValue>,
        args: Vec<Value>,
        keywords: Vec<(Name, Value)>,
        span: Span,
    ) -> EvalResult {
        let instance = Value::Instance(Rc::new(Instance {
            class: Rc::clone(class),
            fields: RefCell::new(FxHashMap::default()),
        }));
        if let Some(Value::Function(init)) = class.attrs.get(&self.init) {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(instance.clone());
            full.extend(args);
            self.call_function(init, full, keywords, span)?;
        } else if let Some((keyword, _)) = keywords.first() {
            return Err(EvalErrorKind::UnexpectedKeyword {
                function: class.label.to_owned(),
                keyword: self.interner.lookup(*keyword).to_owned(),
            }
            .at(span));
        } else if !args.is_empty() {
            return Err(EvalErrorKind::ArityMismatch {
                function: class.label.to_owned(),
                expected: "0".to_owned(),
                got: args.len(),
            }
            .at(span));
        }
        Ok(instance)
    }

    pub(super) fn get_attr(&mut self, value: &Value, attr: Name, span: Span) -> EvalResult {
        match value {
            Value::Instance(instance) => {
                let field = instance.fields.borrow().get(&attr).cloned();
                if let Some(field) = field {
                    return Ok(field);
                }
                match instance.class.attrs.get(&attr) {
                    Some(Value::Function(function)) => {
                        Ok(Value::BoundMethod(Rc::new(BoundMethod {
                            receiver: value.clone(),
                            function: Rc::clone(function),
                        })))
                    }
                    Some(Value::Property(getter)) => {
                        let getter = Rc::clone(getter);
                        self.call_function(&getter, vec![value.clone()], Vec::new(), span)
                    }
                    Some(other) => Ok(other.clone()),
                    None => Err(self.unknown_attribute(value, attr, span)),
                }
            }
            Value::Class(class) => class
                .attrs
                .get(&attr)
                .cloned()
                .ok_or_else(|| self.unknown_attribute(value, attr, span)),
            other => Err(self.unknown_attribute(other, attr, span)),
        }
    }

    pub(super) fn set_attr(
        &mut self,
        object: &Value,
        attr: Name,
        value: Value,
        span: Span,
    ) -> EvalResult<()> {
        match object {
            Value::Instance(instance) => {
                instance.fields.borrow_mut().insert(attr, value);
                Ok(())
            }
            other => Err(self.unknown_attribute(other, attr, span)),
        }
    }

    /// `receiver.method(args)`.
    pub(super) fn call_method(
        &mut self,
        receiver: &Value,
        method: Name,
        args: Vec<Value>,
        keywords: Vec<(Name, Value)>,
        span: Span,
    ) -> EvalResult {
        match receiver {
            Value::List(_) | Value::Dict(_) | Value::Str(_) => {
                if let Some((keyword, _)) = keywords.first() {
                    return Err(EvalErrorKind::UnexpectedKeyword {
                        function: self.interner.lookup(method).to_owned(),
                        keyword: self.interner.lookup(*keyword).to_owned(),
                    }
                    .at(span));
                }
                self.container_method(receiver, method, args)
                    .map_err(|kind| kind.at(span))
            }
            _ => {
                let callee = self.get_attr(receiver, method, span)?;
                self.call_value(&callee, args, keywords, span)
            }
        }
    }

    fn container_method(
        &self,
        receiver: &Value,
        method: Name,
        args: Vec<Value>,
    ) -> Result<Value, EvalErrorKind> {
        let name = self.interner.lookup(method);
        let arity = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(EvalErrorKind::ArityMismatch {
                    function: format!("{}.{name}", receiver.type_name()),
                    expected: expected.to_string(),
                    got: args.len(),
                })
            }
        };
        match (receiver, name) {
            (Value::List(items), "append") => {
                arity(1)?;
                items.borrow_mut().extend(args);
                Ok(Value::None)
            }
            (Value::List(items), "pop") => {
                arity(0)?;
                items
                    .borrow_mut()
                    .pop()
                    .ok_or(EvalErrorKind::IndexOutOfRange { index: -1, len: 0 })
            }
            (Value::List(items), "copy") => {
                arity(0)?;
                Ok(Value::list(items.borrow().clone()))
            }
            (Value::Dict(pairs), "get") => {
                if !(1..=2).contains(&args.len()) {
                    arity(1)?;
                }
                let found = pairs
                    .borrow()
                    .iter()
                    .find(|(key, _)| *key == args[0])
                    .map(|(_, value)| value.clone());
                Ok(found.or_else(|| args.get(1).cloned()).unwrap_or(Value::None))
            }
            (Value::Dict(pairs), "keys" | "values" | "items") => {
                arity(0)?;
                let pairs = pairs.borrow();
                let out = pairs
                    .iter()
                    .map(|(key, value)| match name {
                        "keys" => key.clone(),
                        "values" => value.clone(),
                        _ => Value::tuple(vec![key.clone(), value.clone()]),
                    })
                    .collect();
                Ok(Value::list(out))
            }
            (Value::Str(text), "upper") => {
                arity(0)?;
                Ok(Value::str(&text.to_uppercase()))
            }
            (Value::Str(text), "lower") => {
                arity(0)?;
                Ok(Value::str(&text.to_lowercase()))
            }
            (Value::Str(text), "strip") => {
                arity(0)?;
                Ok(Value::str(text.trim()))
            }
            (Value::Str(text), "startswith") => {
                arity(1)?;
                match &args[0] {
                    Value::Str(prefix) => Ok(Value::Bool(text.starts_with(&**prefix))),
                    other => Err(EvalErrorKind::BadOperand {
                        op: "startswith()",
                        operand: other.type_name(),
                    }),
                }
            }
            (Value::Str(separator), "join") => {
                arity(1)?;
                let mut parts = Vec::new();
                for item in args[0].iterate()? {
                    match item {
                        Value::Str(part) => parts.push(part),
                        other => {
                            return Err(EvalErrorKind::BadOperand {
                                op: "join()",
                                operand: other.type_name(),
                            })
                        }
                    }
                }
                Ok(Value::str(&parts.join(&**separator)))
            }
            _ => Err(EvalErrorKind::UnknownAttribute {
                type_name: receiver.type_name(),
                attr: name.to_owned(),
            }),
        }
    }

    #[cold]
    fn unknown_attribute(&self, value: &Value, attr: Name, span: Span) -> crate::EvalError {
        EvalErrorKind::UnknownAttribute {
            type_name: value.type_name(),
            attr: self.interner.lookup(attr).to_owned(),
        }
        .at(span)
    }
}
