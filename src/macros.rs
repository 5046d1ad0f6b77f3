/// Compile a literal pattern once, on first use, and hand out a `&'static Regex`.
///
/// The two-argument form builds the pattern case-insensitively, which keeps
/// `(?i)` out of the literals shared with the composite token pattern.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
    ($pat:literal, case_insensitive) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
            regex::RegexBuilder::new($pat).case_insensitive(true).build().unwrap()
        });
        &*RE
    }};
}
