//! Format specs: the part after `:` in `{field:spec}`.
//!
//! Interpreted in priority order:
//!
//! 1. `<c><N>s` appends `N` copies of `c`, `<c><N>p` prepends them, `<c><N>i`
//!    does both. Only the prefix is matched, so `_3sx` is a decoration whose
//!    count `3s` fails to parse.
//! 2. `|expr` runs a filter chain (see `filters.rs`).
//! 3. Anything else is a standard string spec `[[fill]align][width][.precision][s]`.
//!    A bare `.<N>s` never gets here: rule 1 reads it as a `.` suffix.

use super::fields::Value;
use super::filters::{self, FilterValue};
use crate::error::FormatError;

/// Upper bound on the bytes one decoration run may produce.
const MAX_DECORATION_BYTES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoration {
    Suffix,
    Prefix,
    Wrap,
}

/// Apply `spec` to `value`, producing the rendered text.
pub(crate) fn apply(value: &Value, spec: &str) -> Result<String, FormatError> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }

    if let Some(decoration) = decoration_of(spec) {
        return decorate(&value.to_string(), spec, decoration);
    }

    if let Some(expr) = spec.strip_prefix('|') {
        let input = match value {
            Value::List(items) => FilterValue::List(items.clone()),
            other => FilterValue::Text(other.to_string()),
        };
        return filters::apply(expr, input).map(FilterValue::into_string);
    }

    match value {
        Value::List(_) => Err(FormatError::NotAllowed { option: "standard formatting", kind: value.kind() }),
        other => Ok(StandardSpec::parse(spec, other.kind())?.format(&other.to_string())),
    }
}

fn decoration_of(spec: &str) -> Option<Decoration> {
    if regex!(r"^.\d+s").is_match(spec) {
        Some(Decoration::Suffix)
    } else if regex!(r"^.\d+p").is_match(spec) {
        Some(Decoration::Prefix)
    } else if regex!(r"^.\d+i").is_match(spec) {
        Some(Decoration::Wrap)
    } else {
        None
    }
}

fn decorate(text: &str, spec: &str, decoration: Decoration) -> Result<String, FormatError> {
    let mut chars = spec.chars();
    let fill = chars.next().ok_or_else(|| FormatError::InvalidSpec(spec.to_string()))?;
    chars.next_back();
    let count_str = chars.as_str();
    let count: usize = count_str
        .parse()
        .ok()
        .filter(|&count: &usize| count.checked_mul(fill.len_utf8()).is_some_and(|bytes| bytes <= MAX_DECORATION_BYTES))
        .ok_or_else(|| FormatError::InvalidCount(count_str.to_string()))?;

    let pad: String = std::iter::repeat_n(fill, count).collect();
    Ok(match decoration {
        Decoration::Suffix => format!("{text}{pad}"),
        Decoration::Prefix => format!("{pad}{text}"),
        Decoration::Wrap => format!("{pad}{text}{pad}"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StandardSpec {
    fill: char,
    align: Align,
    width: usize,
    precision: Option<usize>,
}

impl StandardSpec {
    fn parse(spec: &str, kind: &'static str) -> Result<Self, FormatError> {
        let chars: Vec<char> = spec.chars().collect();
        let invalid = || FormatError::InvalidSpec(spec.to_string());
        let mut pos = 0;
        let mut fill = ' ';
        let mut align = Align::Left;

        let align_of = |c: char| -> Result<Option<Align>, FormatError> {
            match c {
                '<' => Ok(Some(Align::Left)),
                '>' => Ok(Some(Align::Right)),
                '^' => Ok(Some(Align::Center)),
                '=' => Err(FormatError::NotAllowed { option: "'=' alignment", kind }),
                _ => Ok(None),
            }
        };

        if chars.len() >= 2 {
            if let Some(a) = align_of(chars[1])? {
                fill = chars[0];
                align = a;
                pos = 2;
            }
        }
        if let (0, Some(&first)) = (pos, chars.first()) {
            if let Some(a) = align_of(first)? {
                align = a;
                pos = 1;
            }
        }

        match chars.get(pos) {
            Some('+' | '-' | ' ') => return Err(FormatError::NotAllowed { option: "sign", kind }),
            Some('z') => return Err(FormatError::NotAllowed { option: "'z' coercion", kind }),
            Some('#') => return Err(FormatError::NotAllowed { option: "alternate form (#)", kind }),
            Some('0') => return Err(FormatError::NotAllowed { option: "zero padding", kind }),
            _ => {}
        }

        let width = take_number(&chars, &mut pos).transpose().map_err(|_| invalid())?.unwrap_or(0);

        if let Some(',' | '_') = chars.get(pos) {
            return Err(FormatError::NotAllowed { option: "grouping", kind });
        }

        let mut precision = None;
        if chars.get(pos) == Some(&'.') {
            pos += 1;
            precision = Some(take_number(&chars, &mut pos).transpose().map_err(|_| invalid())?.ok_or_else(invalid)?);
        }

        match &chars[pos..] {
            [] | ['s'] => {}
            [code] => return Err(FormatError::UnknownCode { code: *code, kind }),
            _ => return Err(invalid()),
        }

        Ok(Self { fill, align, width, precision })
    }

    fn format(&self, text: &str) -> String {
        let body: String = match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text.to_string(),
        };
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }

        let pad = self.width - len;
        let (left, right) = match self.align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        let fill = |n| std::iter::repeat_n(self.fill, n).collect::<String>();
        format!("{}{body}{}", fill(left), fill(right))
    }
}

/// Read a run of ASCII digits at `pos`. `None` when there are none.
fn take_number(chars: &[char], pos: &mut usize) -> Option<Result<usize, std::num::ParseIntError>> {
    let start = *pos;
    while chars.get(*pos).is_some_and(char::is_ascii_digit) {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    Some(chars[start..*pos].iter().collect::<String>().parse())
}
