//! Static check of the names a template references.
//!
//! Tera fails a render on an undefined name inside `{{ }}`, but an undefined
//! name in an `{% if %}` condition is simply false. Walking the parsed
//! template once, with a fully populated view model as the reference shape,
//! catches a misspelt field in every branch whether it is taken or not.

use serde_json::{Value as JsonValue, json};
use tera::ast::{Expr, ExprVal, Forloop, FunctionCall, Node};

use crate::core::error::{Error, Result};

/// Names Tera itself puts in scope at the top level
const TERA_GLOBALS: [&str; 1] = ["__tera_context"];

/// Checks every name `ast` references against the fields of `shape`.
///
/// `shape` is a serialized view model whose arrays hold at least one element,
/// so loop variables can be checked as well. Names bound by `set`, macro
/// arguments and loops over values of unknown shape are accepted unchecked.
pub fn check_references(template: &str, ast: &[Node], shape: &JsonValue) -> Result<()> {
    let mut globals: Vec<(String, JsonValue)> = match shape {
        JsonValue::Object(fields) => fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        _ => Vec::new(),
    };
    globals.extend(TERA_GLOBALS.map(|name| (name.to_string(), JsonValue::Null)));

    let mut checker = ReferenceChecker {
        template,
        globals,
        locals: Vec::new(),
        frames: 0,
    };
    checker.nodes(ast)
}

/// Walks one template; `JsonValue::Null` marks a binding of unknown shape
struct ReferenceChecker<'a> {
    template: &'a str,
    globals: Vec<(String, JsonValue)>,
    locals: Vec<(String, JsonValue)>,
    /// Loop and macro bodies currently open
    frames: usize,
}

impl ReferenceChecker<'_> {
    fn nodes(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::VariableBlock(_, expr) => self.expr(expr)?,
                Node::Set(_, set) => {
                    self.expr(&set.value)?;
                    let binding = (set.key.clone(), JsonValue::Null);
                    if set.global || self.frames == 0 {
                        self.globals.push(binding);
                    } else {
                        self.locals.push(binding);
                    }
                }
                Node::FilterSection(_, section, _) => {
                    self.call(&section.filter)?;
                    self.nodes(&section.body)?;
                }
                Node::Block(_, block, _) => self.nodes(&block.body)?,
                Node::Forloop(_, forloop, _) => self.forloop(forloop)?,
                Node::If(branches, _) => {
                    for (_, condition, body) in &branches.conditions {
                        self.expr(condition)?;
                        self.nodes(body)?;
                    }
                    if let Some((_, body)) = &branches.otherwise {
                        self.nodes(body)?;
                    }
                }
                Node::MacroDefinition(_, definition, _) => {
                    let frame = self.locals.len();
                    for (name, default) in &definition.args {
                        if let Some(default) = default {
                            self.expr(default)?;
                        }
                        self.locals.push((name.clone(), JsonValue::Null));
                    }
                    self.frames += 1;
                    self.nodes(&definition.body)?;
                    self.frames -= 1;
                    self.locals.truncate(frame);
                }
                Node::Super
                | Node::Text(_)
                | Node::Extends(..)
                | Node::Include(..)
                | Node::ImportMacro(..)
                | Node::Raw(..)
                | Node::Break(_)
                | Node::Continue(_)
                | Node::Comment(..) => {}
            }
        }
        Ok(())
    }

    fn forloop(&mut self, forloop: &Forloop) -> Result<()> {
        self.expr(&forloop.container)?;

        // Only a plain array of known shape gives its items a shape
        let item = match (&forloop.key, &forloop.container.val) {
            (None, ExprVal::Ident(ident)) => match self.resolve(ident)? {
                Some(JsonValue::Array(items)) => items.first().cloned().unwrap_or(JsonValue::Null),
                _ => JsonValue::Null,
            },
            _ => JsonValue::Null,
        };

        let frame = self.locals.len();
        if let Some(key) = &forloop.key {
            self.locals.push((key.clone(), JsonValue::Null));
        }
        self.locals.push((forloop.value.clone(), item));
        self.locals.push((
            "loop".to_string(),
            json!({ "index": 1, "index0": 0, "first": true, "last": true }),
        ));

        self.frames += 1;
        self.nodes(&forloop.body)?;
        self.frames -= 1;
        self.locals.truncate(frame);

        if let Some(empty_body) = &forloop.empty_body {
            self.nodes(empty_body)?;
        }
        Ok(())
    }

    fn expr(&self, expr: &Expr) -> Result<()> {
        // `default` exists to cover undefined names
        if !expr.has_default_filter() {
            self.expr_val(&expr.val)?;
        }
        expr.filters.iter().try_for_each(|filter| self.call(filter))
    }

    fn expr_val(&self, val: &ExprVal) -> Result<()> {
        match val {
            ExprVal::Ident(ident) => self.resolve(ident).map(|_| ()),
            ExprVal::Math(math) => {
                self.expr(&math.lhs)?;
                self.expr(&math.rhs)
            }
            ExprVal::Logic(logic) => {
                self.expr(&logic.lhs)?;
                self.expr(&logic.rhs)
            }
            ExprVal::In(within) => {
                self.expr(&within.lhs)?;
                self.expr(&within.rhs)
            }
            ExprVal::Test(test) => {
                if !matches!(test.name.as_str(), "defined" | "undefined") {
                    self.resolve(&test.ident)?;
                }
                test.args.iter().try_for_each(|arg| self.expr(arg))
            }
            ExprVal::MacroCall(call) => call.args.values().try_for_each(|arg| self.expr(arg)),
            ExprVal::FunctionCall(call) => self.call(call),
            ExprVal::Array(items) => items.iter().try_for_each(|item| self.expr(item)),
            ExprVal::StringConcat(concat) => {
                concat.values.iter().try_for_each(|value| self.expr_val(value))
            }
            ExprVal::String(_) | ExprVal::Int(_) | ExprVal::Float(_) | ExprVal::Bool(_) => Ok(()),
        }
    }

    fn call(&self, call: &FunctionCall) -> Result<()> {
        call.args.values().try_for_each(|arg| self.expr(arg))
    }

    /// Shape `ident` points at, `None` when it can't be known statically
    fn resolve(&self, ident: &str) -> Result<Option<&JsonValue>> {
        // Subscripts are dynamic; only the dotted part before one is checked
        let dotted = ident.split('[').next().unwrap_or(ident);
        let mut segments = dotted.split('.');
        let root = segments.next().unwrap_or(dotted);

        let Some(mut shape) = self.lookup(root) else {
            return Err(self.unknown(ident));
        };
        for segment in segments {
            shape = match shape {
                JsonValue::Null => return Ok(None),
                JsonValue::Object(fields) => match fields.get(segment) {
                    Some(field) => field,
                    None => return Err(self.unknown(ident)),
                },
                JsonValue::Array(items) if segment.parse::<usize>().is_ok() => match items.first() {
                    Some(item) => item,
                    None => return Ok(None),
                },
                _ => return Err(self.unknown(ident)),
            };
        }
        Ok((!shape.is_null()).then_some(shape))
    }

    fn lookup(&self, name: &str) -> Option<&JsonValue> {
        self.locals
            .iter()
            .rev()
            .chain(self.globals.iter().rev())
            .find(|(bound, _)| bound == name)
            .map(|(_, shape)| shape)
    }

    fn unknown(&self, ident: &str) -> Error {
        Error::template(format!(
            "template '{}' references `{ident}`, which the view model does not provide",
            self.template
        ))
    }
}
