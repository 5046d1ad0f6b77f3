//! Filter expressions for `{field:|filter|filter(args)}` specs.
//!
//! This is a fixed, closed filter set, not a template engine: an expression is
//! a `|`-separated chain of known filter names, each with optional arguments
//! written as quoted strings or integers.
//!
//! | filter              | input      | output |
//! |---------------------|------------|--------|
//! | `split([sep])`      | text       | list (whitespace split without `sep`) |
//! | `join([sep])`       | list       | text (`sep` defaults to empty) |
//! | `first`, `last`     | list/text  | text (item or character) |
//! | `upper`, `lower`, `title`, `capitalize`, `trim` | text | text |
//! | `replace(old, new)` | text       | text |
//! | `length`            | list/text  | text (item or character count) |
//! | `reverse`           | list/text  | same kind |

use crate::error::FormatError;

/// A value flowing through a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    fn kind(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::List(_) => "list",
        }
    }

    /// Final rendering; lists join like list field values.
    pub fn into_string(self) -> String {
        match self {
            FilterValue::Text(s) => s,
            FilterValue::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Str(String),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterCall {
    name: String,
    args: Vec<Arg>,
}

/// Apply the filter chain `expr` (without the leading `|`) to `input`.
pub fn apply(expr: &str, input: FilterValue) -> Result<FilterValue, FormatError> {
    parse_chain(expr)?.into_iter().try_fold(input, |value, call| call.apply(value))
}

fn parse_chain(expr: &str) -> Result<Vec<FilterCall>, FormatError> {
    let mut calls = Vec::new();
    let mut cursor = Cursor { chars: expr.chars().collect(), pos: 0 };

    loop {
        cursor.skip_ws();
        let name = cursor.ident();
        if name.is_empty() {
            return Err(FormatError::InvalidSpec(format!("|{expr}")));
        }

        cursor.skip_ws();
        let args = if cursor.eat('(') { cursor.args(&name)? } else { Vec::new() };
        calls.push(FilterCall { name, args });

        cursor.skip_ws();
        if cursor.at_end() {
            return Ok(calls);
        }
        if !cursor.eat('|') {
            return Err(FormatError::InvalidSpec(format!("|{expr}")));
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Arguments after an opening `(`, through the closing `)`.
    fn args(&mut self, filter: &str) -> Result<Vec<Arg>, FormatError> {
        let bad = |reason: &str| FormatError::FilterArgs { filter: filter.to_string(), reason: reason.to_string() };
        let mut args = Vec::new();

        self.skip_ws();
        if self.eat(')') {
            return Ok(args);
        }

        loop {
            self.skip_ws();
            let arg = match self.peek() {
                Some(quote @ ('\'' | '"')) => {
                    self.pos += 1;
                    let mut s = String::new();
                    loop {
                        match self.peek() {
                            Some(c) if c == quote => {
                                self.pos += 1;
                                break;
                            }
                            Some('\\') => {
                                self.pos += 1;
                                let escaped = self.peek().ok_or_else(|| bad("unterminated string"))?;
                                s.push(escaped);
                                self.pos += 1;
                            }
                            Some(c) => {
                                s.push(c);
                                self.pos += 1;
                            }
                            None => return Err(bad("unterminated string")),
                        }
                    }
                    Arg::Str(s)
                }
                Some(c) if c == '-' || c.is_ascii_digit() => {
                    let start = self.pos;
                    self.pos += 1;
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.pos += 1;
                    }
                    let digits: String = self.chars[start..self.pos].iter().collect();
                    Arg::Int(digits.parse().map_err(|_| bad("invalid integer"))?)
                }
                _ => return Err(bad("expected a quoted string or an integer")),
            };
            args.push(arg);

            self.skip_ws();
            if self.eat(')') {
                return Ok(args);
            }
            if !self.eat(',') {
                return Err(bad("expected `,` or `)`"));
            }
        }
    }
}

impl FilterCall {
    fn apply(&self, value: FilterValue) -> Result<FilterValue, FormatError> {
        let out = match self.name.as_str() {
            "split" => {
                let text = self.text(value)?;
                let items = match self.opt_str(0)? {
                    Some(sep) if !sep.is_empty() => text.split(sep.as_str()).map(str::to_string).collect(),
                    Some(_) => return Err(self.bad("empty separator")),
                    None => text.split_whitespace().map(str::to_string).collect(),
                };
                FilterValue::List(items)
            }
            "join" => {
                let sep = self.opt_str(0)?.unwrap_or_default();
                match value {
                    FilterValue::List(items) => FilterValue::Text(items.join(&sep)),
                    text @ FilterValue::Text(_) => text,
                }
            }
            "first" | "last" => {
                self.no_args()?;
                let pick_last = self.name == "last";
                let picked = match value {
                    FilterValue::List(items) => {
                        if pick_last { items.into_iter().last() } else { items.into_iter().next() }
                    }
                    FilterValue::Text(s) => {
                        let c = if pick_last { s.chars().last() } else { s.chars().next() };
                        c.map(String::from)
                    }
                };
                FilterValue::Text(picked.unwrap_or_default())
            }
            "upper" => FilterValue::Text(self.plain_text(value)?.to_uppercase()),
            "lower" => FilterValue::Text(self.plain_text(value)?.to_lowercase()),
            "trim" => FilterValue::Text(self.plain_text(value)?.trim().to_string()),
            "title" => FilterValue::Text(title_case(&self.plain_text(value)?)),
            "capitalize" => FilterValue::Text(capitalize(&self.plain_text(value)?)),
            "replace" => {
                let (old, new) = match self.args.as_slice() {
                    [Arg::Str(old), Arg::Str(new)] => (old, new),
                    _ => return Err(self.bad("expects two string arguments")),
                };
                FilterValue::Text(self.text(value)?.replace(old.as_str(), new))
            }
            "length" => {
                self.no_args()?;
                let n = match value {
                    FilterValue::List(items) => items.len(),
                    FilterValue::Text(s) => s.chars().count(),
                };
                FilterValue::Text(n.to_string())
            }
            "reverse" => {
                self.no_args()?;
                match value {
                    FilterValue::List(mut items) => {
                        items.reverse();
                        FilterValue::List(items)
                    }
                    FilterValue::Text(s) => FilterValue::Text(s.chars().rev().collect()),
                }
            }
            other => return Err(FormatError::UnknownFilter(other.to_string())),
        };
        Ok(out)
    }

    fn bad(&self, reason: &str) -> FormatError {
        FormatError::FilterArgs { filter: self.name.clone(), reason: reason.to_string() }
    }

    fn no_args(&self) -> Result<(), FormatError> {
        if self.args.is_empty() { Ok(()) } else { Err(self.bad("takes no arguments")) }
    }

    fn opt_str(&self, idx: usize) -> Result<Option<String>, FormatError> {
        if self.args.len() > idx + 1 {
            return Err(self.bad("too many arguments"));
        }
        match self.args.get(idx) {
            None => Ok(None),
            Some(Arg::Str(s)) => Ok(Some(s.clone())),
            Some(Arg::Int(_)) => Err(self.bad("expects a string argument")),
        }
    }

    fn text(&self, value: FilterValue) -> Result<String, FormatError> {
        match value {
            FilterValue::Text(s) => Ok(s),
            other => Err(FormatError::FilterInput { filter: self.name.clone(), kind: other.kind() }),
        }
    }

    fn plain_text(&self, value: FilterValue) -> Result<String, FormatError> {
        self.no_args()?;
        self.text(value)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FilterValue {
        FilterValue::Text(s.to_string())
    }

    fn run(expr: &str, input: &str) -> Result<String, FormatError> {
        apply(expr, text(input)).map(FilterValue::into_string)
    }

    #[test]
    fn split_then_pick() {
        assert_eq!(run("split|first", "Jane Doe Smith").unwrap(), "Jane");
        assert_eq!(run("split|last", "Jane Doe Smith").unwrap(), "Smith");
        assert_eq!(run("split('-')|last", "a-b-c").unwrap(), "c");
        assert_eq!(run("split(\", \")|join('+')", "A, B, C").unwrap(), "A+B+C");
    }

    #[test]
    fn split_without_pick_renders_as_list() {
        assert_eq!(run("split", "a b").unwrap(), "a, b");
    }

    #[test]
    fn text_filters() {
        assert_eq!(run("upper", "abc").unwrap(), "ABC");
        assert_eq!(run("lower", "ABC").unwrap(), "abc");
        assert_eq!(run("title", "hello big-world").unwrap(), "Hello Big-World");
        assert_eq!(run("capitalize", "hELLO").unwrap(), "Hello");
        assert_eq!(run(" trim ", "  x  ").unwrap(), "x");
        assert_eq!(run("replace(' ', '_')", "a b c").unwrap(), "a_b_c");
        assert_eq!(run("length", "héllo").unwrap(), "5");
        assert_eq!(run("reverse", "abc").unwrap(), "cba");
    }

    #[test]
    fn list_input() {
        let names = FilterValue::List(vec!["Ann".into(), "Bea".into()]);
        assert_eq!(apply("join(' & ')", names.clone()).unwrap().into_string(), "Ann & Bea");
        assert_eq!(apply("reverse|first", names.clone()).unwrap().into_string(), "Bea");
        assert_eq!(apply("length", names.clone()).unwrap().into_string(), "2");
        assert!(matches!(apply("upper", names), Err(FormatError::FilterInput { kind: "list", .. })));
    }

    #[test]
    fn rejects_unknown_filters_and_bad_syntax() {
        assert!(matches!(run("shout", "x"), Err(FormatError::UnknownFilter(f)) if f == "shout"));
        assert!(matches!(run("", "x"), Err(FormatError::InvalidSpec(_))));
        assert!(matches!(run("upper lower", "x"), Err(FormatError::InvalidSpec(_))));
        assert!(matches!(run("split('x", "x"), Err(FormatError::FilterArgs { .. })));
        assert!(matches!(run("replace('a')", "x"), Err(FormatError::FilterArgs { .. })));
        assert!(matches!(run("upper(1)", "x"), Err(FormatError::FilterArgs { .. })));
        assert!(matches!(run("split(3)", "x"), Err(FormatError::FilterArgs { .. })));
    }
}
