//! The tagged value universe exchanged with the expression evaluator.
//!
//! Errors are first-class values here: a builtin that fails hands back
//! [`Value::Err`] instead of unwinding, and the evaluator treats any error
//! value as terminal for the rest of the expression.

use std::borrow::Cow;
use std::cell::RefCell;

use crate::builtins;
use crate::directive::{Content, Directive};

#[derive(Debug, Clone)]
pub enum Value<'a> {
    /// The per-expression root object.
    Content(&'a Content),
    /// A directive handle. Always a reference: successive builtin calls
    /// mutate the same instance.
    Directive(&'a RefCell<Directive>),
    Str(Cow<'a, str>),
    Int(i64),
    Bool(bool),
    Err(String),
}

impl<'a> Value<'a> {
    pub fn err(message: impl Into<String>) -> Self {
        Value::Err(message.into())
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Value::Err(_))
    }

    /// The tag name used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Content(_) => "content",
            Value::Directive(_) => "directive",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Err(_) => "err",
        }
    }

    /// Field access by name. Only the content root has fields; they yield
    /// the per-kind directive by reference.
    pub fn access(&self, name: &str) -> Value<'a> {
        match *self {
            Value::Content(content) => match content.field(name) {
                Some(cell) => Value::Directive(cell),
                None => Value::err(format!("no directive named '{name}'")),
            },
            Value::Directive(_) => Value::err("field access on directive"),
            Value::Err(ref message) => Value::Err(message.clone()),
            _ => Value::err("field access on primitive value"),
        }
    }

    /// Method call by name. Only directive handles have builtins.
    pub fn call(&self, name: &str, args: &[Value<'a>]) -> Value<'a> {
        match *self {
            Value::Directive(cell) => builtins::call(cell, name, args),
            Value::Content(_) => Value::err("method call on the content root"),
            Value::Err(ref message) => Value::Err(message.clone()),
            _ => Value::err("method call on primitive value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_on_content_yields_directive() {
        let content = Content::new();
        let root = Value::Content(&content);
        assert!(matches!(root.access("image"), Value::Directive(_)));
    }

    #[test]
    fn access_on_unknown_name_errors() {
        let content = Content::new();
        let root = Value::Content(&content);
        match root.access("figure") {
            Value::Err(m) => assert_eq!(m, "no directive named 'figure'"),
            other => panic!("expected err, got {other:?}"),
        }
    }

    #[test]
    fn access_on_directive_and_primitives_errors() {
        let content = Content::new();
        let handle = Value::Content(&content).access("link");
        match handle.access("src") {
            Value::Err(m) => assert_eq!(m, "field access on directive"),
            other => panic!("expected err, got {other:?}"),
        }
        match Value::Int(3).access("x") {
            Value::Err(m) => assert_eq!(m, "field access on primitive value"),
            other => panic!("expected err, got {other:?}"),
        }
    }

    #[test]
    fn errors_pass_through() {
        let e = Value::err("boom");
        assert!(e.access("x").is_err());
        assert!(e.call("x", &[]).is_err());
    }
}
