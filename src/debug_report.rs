use scene_namer::{ExtractedRecord, ParseResultVerbose};

/// Roles in the report, each with its own SGR sequence.
#[derive(Clone, Copy)]
enum Tone {
    Header,
    Section,
    Stage,
    Hit,
    Miss,
    Label,
    Value,
    Rewrite,
}

impl Tone {
    fn sgr(self) -> &'static str {
        match self {
            Tone::Header => "1;36",
            Tone::Section => "90",
            Tone::Stage => "34",
            Tone::Hit => "32",
            Tone::Miss => "2",
            Tone::Label => "36",
            Tone::Value => "1;32",
            Tone::Rewrite => "33",
        }
    }
}

struct Palette {
    color: bool,
}

impl Palette {
    fn tone(&self, text: impl std::fmt::Display, tone: Tone) -> String {
        if self.color { format!("\x1b[{}m{text}\x1b[0m", tone.sgr()) } else { text.to_string() }
    }

    fn section(&self, title: &str) -> String {
        self.tone(format!("━━━ {title} ━━━"), Tone::Section)
    }
}

pub fn print_run(input: &str, res: &ParseResultVerbose, color: bool) {
    let palette = Palette { color };
    println!("\n{}", palette.tone(format!("⚙  Parsing: \"{input}\""), Tone::Header));

    println!("\n{}", palette.section("Stages"));
    for stage in &res.details.stages {
        println!(
            "  {} {}  {}",
            palette.tone(format!("{:<16}", stage.stage.name()), Tone::Stage),
            if stage.matched { palette.tone("✓ matched", Tone::Hit) } else { palette.tone("✗ no match", Tone::Miss) },
            palette.tone(format!("{:?}", stage.duration), Tone::Miss),
        );
    }
    match &res.details.expanded {
        Some(expanded) if expanded != input => {
            println!("  {} {}", palette.tone("expanded:", Tone::Miss), palette.tone(expanded, Tone::Rewrite));
        }
        Some(_) => {}
        None => println!("  {}", palette.tone("database id tag found; token stage skipped", Tone::Miss)),
    }

    println!("\n{}", palette.section("Record"));
    print_record(&res.record, &palette);

    println!("\n{}", palette.section("Timing"));
    println!("  Total: {}", palette.tone(format!("{:?}", res.details.total), Tone::Hit));
    println!();
}

fn print_record(record: &ExtractedRecord, palette: &Palette) {
    let code = record.external_code.as_ref().map(|c| format!("{} ({:?})", c.code(), c.kind()));
    let rows: [(&str, Option<String>); 7] = [
        ("site", record.site.clone()),
        ("date", record.date.clone()),
        ("title", record.title.clone()),
        ("trans", record.trans.then(|| "yes".to_string())),
        ("extension", Some(record.extension.clone()).filter(|ext| !ext.is_empty())),
        ("external code", code),
        ("database id", record.database_id.map(|id| id.to_string())),
    ];

    for (label, value) in rows {
        let value = match value {
            Some(value) => palette.tone(value, Tone::Value),
            None => palette.tone("-", Tone::Miss),
        };
        println!("  {} {}", palette.tone(format!("{label:<14}"), Tone::Label), value);
    }
}
