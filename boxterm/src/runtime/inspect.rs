// Renders terms in guest literal notation, used by error messages and the CLI

use crate::runtime::bitstring::Bitstring;
use crate::runtime::values::{List, Term};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IDENTIFIER_ATOM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_@]*[?!]?$").unwrap());

static MODULE_ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Elixir(\.[A-Z][a-zA-Z0-9_]*)+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectOptions {
    /// Nesting depth after which containers render as `...`.
    pub max_depth: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions { max_depth: 32 }
    }
}

pub fn inspect(term: &Term) -> String {
    inspect_with(term, &InspectOptions::default())
}

pub fn inspect_with(term: &Term, options: &InspectOptions) -> String {
    Inspector { options }.render(term, 0)
}

struct Inspector<'a> {
    options: &'a InspectOptions,
}

impl Inspector<'_> {
    fn render(&self, term: &Term, depth: usize) -> String {
        if depth > self.options.max_depth {
            return "...".to_string();
        }
        match term {
            Term::Atom(name) => inspect_atom(name),
            Term::Integer(value) => value.to_string(),
            Term::Float(value) => inspect_float(*value),
            Term::String(text) => quote_string(text),
            Term::Bitstring(bits) => inspect_bitstring(bits),
            Term::List(list) => self.render_list(list, depth),
            Term::Tuple(items) => format!("{{{}}}", self.render_all(items, depth)),
            Term::Map(map) => {
                let atom_keys = map
                    .iter()
                    .all(|(key, _)| matches!(key, Term::Atom(a) if IDENTIFIER_ATOM.is_match(a)));
                let entries = map
                    .iter()
                    .map(|(key, value)| match key {
                        Term::Atom(name) if atom_keys => {
                            format!("{}: {}", name, self.render(value, depth + 1))
                        }
                        _ => format!(
                            "{} => {}",
                            self.render(key, depth + 1),
                            self.render(value, depth + 1)
                        ),
                    })
                    .join(", ");
                format!("%{{{}}}", entries)
            }
            Term::AnonymousFunction(fun) => format!("#Function<anonymous/{}>", fun.arity),
            Term::VariablePattern(name) => name.clone(),
            Term::MatchPlaceholder => "_".to_string(),
            Term::ConsPattern(cons) => format!(
                "[{} | {}]",
                self.render(&cons.head, depth + 1),
                self.render(&cons.tail, depth + 1)
            ),
        }
    }

    fn render_all(&self, items: &[Term], depth: usize) -> String {
        items.iter().map(|item| self.render(item, depth + 1)).join(", ")
    }

    fn render_list(&self, list: &List, depth: usize) -> String {
        match list.improper_tail() {
            None => format!("[{}]", self.render_all(list.data(), depth)),
            Some(tail) => format!(
                "[{} | {}]",
                self.render_all(list.elements(), depth),
                self.render(tail, depth + 1)
            ),
        }
    }
}

fn inspect_atom(name: &str) -> String {
    if matches!(name, "true" | "false" | "nil") {
        name.to_string()
    } else if MODULE_ALIAS.is_match(name) {
        name["Elixir.".len()..].to_string()
    } else if IDENTIFIER_ATOM.is_match(name) {
        format!(":{}", name)
    } else {
        format!(":{}", quote_string(name))
    }
}

fn inspect_float(value: f64) -> String {
    let text = format!("{:?}", value);
    match text.find('e') {
        Some(pos) if !text[..pos].contains('.') => {
            format!("{}.0{}", &text[..pos], &text[pos..])
        }
        _ => text,
    }
}

fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn inspect_bitstring(bits: &Bitstring) -> String {
    if let Some(text) = bits.to_text() {
        return quote_string(&text);
    }
    let (bytes, partial) = bits.segments();
    let mut parts: Vec<String> = bytes.iter().map(u8::to_string).collect();
    if let Some((value, size)) = partial {
        parts.push(format!("{}::size({})", value, size));
    }
    format!("<<{}>>", parts.join(", "))
}
