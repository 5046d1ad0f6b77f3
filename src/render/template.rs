//! Template parsing and rendering.

use super::context::RenderContext;
use super::fields::{Field, Value};
use super::format_spec;
use crate::config::RenderOptions;
use crate::error::RenderError;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { field: Field, spec: String },
}

/// A validated template, reusable across many contexts.
///
/// Syntax is `str.format`-like: `{field}`, `{field:spec}`, `{field!s:spec}`,
/// with `{{` and `}}` for literal braces. Every field must be on the
/// [`Field`] allow-list; that is checked here, once, rather than per render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    pub fn parse(template: &str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, c)| c) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|&(_, c)| c) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(RenderError::Syntax(format!("single `}}` at byte {offset}"))),
                '{' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((at, '{')) => {
                                return Err(RenderError::Syntax(format!("nested `{{` at byte {at} is not supported")));
                            }
                            Some((_, c)) => body.push(c),
                            None => return Err(RenderError::Syntax(format!("unterminated `{{` at byte {offset}"))),
                        }
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(placeholder(&body)?);
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { source: template.to_string(), segments })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Fields referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { field, .. } => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    /// Render against `ctx`.
    ///
    /// Absent values become the missing marker without touching the spec. A
    /// spec that fails becomes the bad-format marker, or an error when that
    /// marker is empty.
    pub fn render(&self, ctx: &RenderContext, options: &RenderOptions) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in &self.segments {
            let (field, spec) = match segment {
                Segment::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Segment::Placeholder { field, spec } => (*field, spec.as_str()),
            };

            let value = match ctx.get(field) {
                Some(value) if !value.is_absent() => value,
                _ => {
                    out.push_str(&options.missing_marker);
                    continue;
                }
            };

            let title;
            let value = match value {
                Value::Text(text) if field == Field::Name => {
                    title = Value::Text(sanitize_title(text, options.max_title_length));
                    &title
                }
                other => other,
            };

            match format_spec::apply(value, spec) {
                Ok(text) => out.push_str(&text),
                Err(source) if options.bad_format_marker.is_empty() => {
                    return Err(RenderError::Format { field: field.as_str(), source });
                }
                Err(err) => {
                    warn!(field = field.as_str(), spec, error = %err, "format spec failed; using bad-format marker");
                    out.push_str(&options.bad_format_marker);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse the inside of `{...}`: `name[!conversion][:spec]`.
fn placeholder(body: &str) -> Result<Segment, RenderError> {
    let (head, spec) = match body.split_once(':') {
        Some((head, spec)) => (head, spec),
        None => (body, ""),
    };
    let name = match head.split_once('!') {
        Some((name, "s")) => name,
        Some((_, conversion)) => {
            return Err(RenderError::Syntax(format!("conversion `!{conversion}` is not supported")));
        }
        None => head,
    };

    if name.is_empty() {
        return Err(RenderError::Syntax("positional `{}` fields are not supported".to_string()));
    }
    let field = Field::from_name(name).ok_or_else(|| RenderError::UnsupportedField { name: name.to_string() })?;
    Ok(Segment::Placeholder { field, spec: spec.to_string() })
}

/// Title-only cleanup: keep a conservative character set, collapse
/// separators to single spaces, then cap the length in characters.
fn sanitize_title(raw: &str, max_len: usize) -> String {
    let kept = regex!(r"[^a-zA-Z0-9\s\-()\[\]_.,]").replace_all(raw, "");
    let collapsed = regex!(r"[\s.\-]+").replace_all(&kept, " ");
    let trimmed = collapsed.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    trimmed.chars().take(max_len).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    fn ctx() -> RenderContext {
        RenderContext::new()
            .with(Field::Site, "BrandNew")
            .with(Field::Date, "2023-01-15")
            .with(Field::Name, "Some Title")
            .with(Field::Ext, "mp4")
            .with(Field::Trans, false)
            .with(Field::Performers, vec!["Ann".to_string(), "Bea".to_string()])
    }

    fn render(template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        CompiledTemplate::parse(template)?.render(ctx, &RenderOptions::default())
    }

    #[test]
    fn plain_substitution() {
        assert_eq!(render("{site} - {date} - {name}.{ext}", &ctx()).unwrap(), "BrandNew - 2023-01-15 - Some Title.mp4");
        assert_eq!(render("{title}.{extension}", &ctx()).unwrap(), "Some Title.mp4");
        assert_eq!(render("{performers}", &ctx()).unwrap(), "Ann, Bea");
    }

    #[test]
    fn absent_fields_use_the_missing_marker() {
        assert_eq!(render("{site}/{network}", &ctx()).unwrap(), "BrandNew/~~");
        assert_eq!(render("{trans}", &ctx()).unwrap(), "~~");
        assert_eq!(render("[{trans}]", &ctx().with(Field::Trans, true)).unwrap(), "[True]");
        // The spec is not applied to a missing value.
        assert_eq!(render("{network:_3s}", &ctx()).unwrap(), "~~");

        let quiet = RenderOptions { missing_marker: String::new(), ..RenderOptions::default() };
        let out = CompiledTemplate::parse("[{network}]").unwrap().render(&ctx(), &quiet).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn unsupported_fields_are_errors() {
        assert!(matches!(render("{nope}", &ctx()), Err(RenderError::UnsupportedField { name }) if name == "nope"));
        assert!(matches!(render("{Site}", &ctx()), Err(RenderError::UnsupportedField { .. })));
    }

    #[test]
    fn title_is_sanitized_before_formatting() {
        let ctx = ctx().with(Field::Name, "Foo/Bar:Baz");
        assert_eq!(render("{name}", &ctx).unwrap(), "FooBarBaz");

        let ctx = ctx.with(Field::Name, "a - b..c  (d) [e]");
        assert_eq!(render("{name}", &ctx).unwrap(), "a b c (d) [e]");

        // Other fields are left alone.
        let ctx = ctx.with(Field::Description, "Foo/Bar");
        assert_eq!(render("{description}", &ctx).unwrap(), "Foo/Bar");
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "word ".repeat(60);
        let out = render("{name}", &ctx().with(Field::Name, long)).unwrap();
        assert!(out.chars().count() <= 180);
        assert!(!out.ends_with(' '));

        let short = RenderOptions { max_title_length: 6, ..RenderOptions::default() };
        let out = CompiledTemplate::parse("{name}").unwrap().render(&ctx(), &short).unwrap();
        assert_eq!(out, "Some T");

        let cut_at_space = RenderOptions { max_title_length: 5, ..RenderOptions::default() };
        let out = CompiledTemplate::parse("{name}").unwrap().render(&ctx(), &cut_at_space).unwrap();
        assert_eq!(out, "Some");
    }

    #[test]
    fn decorations_filters_and_standard_specs() {
        assert_eq!(render("{site:_3s}", &ctx()).unwrap(), "BrandNew___");
        assert_eq!(render("{site:-2p}", &ctx()).unwrap(), "--BrandNew");
        assert_eq!(render("{site:*1i}", &ctx()).unwrap(), "*BrandNew*");
        assert_eq!(render("{name:|split|first}", &ctx()).unwrap(), "Some");
        assert_eq!(render("{ext:>8}", &ctx()).unwrap(), "     mp4");
        assert_eq!(render("{site:.2}", &ctx()).unwrap(), "Br");
        assert_eq!(render("{site!s:.5}", &ctx()).unwrap(), "Brand");
    }

    #[test]
    fn format_failures_use_the_bad_format_marker() {
        assert_eq!(render("{site:d}", &ctx()).unwrap(), "!!");
        assert_eq!(render("{name:|shout}", &ctx()).unwrap(), "!!");
        assert_eq!(render("{performers:>20}", &ctx()).unwrap(), "!!");
    }

    #[test]
    fn empty_bad_format_marker_propagates_the_error() {
        let strict = RenderOptions { bad_format_marker: String::new(), ..RenderOptions::default() };
        let err = CompiledTemplate::parse("{site:d}").unwrap().render(&ctx(), &strict).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Format { field: "site", source: FormatError::UnknownCode { code: 'd', .. } }
        ));
    }

    #[test]
    fn huge_decoration_counts_render_the_bad_format_marker() {
        assert_eq!(render("{site:_18446744073709551615s}", &ctx()).unwrap(), "!!");
        assert_eq!(render("{name:.99999999999999999999i}", &ctx()).unwrap(), "!!");

        let strict = RenderOptions { bad_format_marker: String::new(), ..RenderOptions::default() };
        let err = CompiledTemplate::parse("{site:_18446744073709551615s}").unwrap().render(&ctx(), &strict).unwrap_err();
        assert!(matches!(err, RenderError::Format { field: "site", source: FormatError::InvalidCount(_) }));
    }

    #[test]
    fn brace_escapes_and_syntax_errors() {
        assert_eq!(render("{{literal}} {site}", &ctx()).unwrap(), "{literal} BrandNew");
        assert!(matches!(render("a } b", &ctx()), Err(RenderError::Syntax(_))));
        assert!(matches!(render("{site", &ctx()), Err(RenderError::Syntax(_))));
        assert!(matches!(render("{}", &ctx()), Err(RenderError::Syntax(_))));
        assert!(matches!(render("{site!r}", &ctx()), Err(RenderError::Syntax(_))));
        assert!(matches!(render("{site:{ext}}", &ctx()), Err(RenderError::Syntax(_))));
    }

    #[test]
    fn compiled_template_reports_its_fields() {
        let template = CompiledTemplate::parse("{site} - {title:>3}{{x}}").unwrap();
        assert_eq!(template.fields().collect::<Vec<_>>(), vec![Field::Site, Field::Name]);
        assert_eq!(template.to_string(), "{site} - {title:>3}{{x}}");
    }
}
