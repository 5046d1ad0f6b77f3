mod debug_report;

use scene_namer::{CompiledTemplate, ParserConfig, ParserSettings, RenderContext, default_config, parse_verbose_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let loaded;
    let config: &ParserConfig = match &cli.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|err| format!("failed to read {path}: {err}"))?;
            loaded = ParserSettings::from_toml_str(&text)?.compile()?;
            &loaded
        }
        None => default_config(),
    };

    let res = parse_verbose_with(&cli.input, config);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&res.record)?);
    }
    if let Some(template) = &cli.template {
        let template = CompiledTemplate::parse(template)?;
        let ctx = RenderContext::from_record(&res.record);
        println!("{}", template.render(&ctx, config.render_options())?);
    }
    if !cli.json && cli.template.is_none() {
        debug_report::print_run(&cli.input, &res, cli.color);
    }
    Ok(())
}

struct CliConfig {
    input: String,
    config_path: Option<String>,
    template: Option<String>,
    json: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut template: Option<String> = None;
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("scene-namer {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--config" | "-c" => {
                config_path = Some(args.next().ok_or_else(|| "error: --config expects a path".to_string())?);
            }
            "--template" | "-t" => {
                template = Some(args.next().ok_or_else(|| "error: --template expects a value".to_string())?);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--config=") => {
                config_path = Some(arg.trim_start_matches("--config=").to_string());
            }
            _ if arg.starts_with("--template=") => {
                template = Some(arg.trim_start_matches("--template=").to_string());
            }
            _ if arg.starts_with("--input=") => {
                set_input(&mut input, arg.trim_start_matches("--input=").to_string())?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, config_path, template, json, color })
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "scene-namer {version}

Extract site, date, title and codes from a media filename, and optionally
render a new name from a template.

Usage:
  scene-namer [OPTIONS] [--] <filename...>
  scene-namer [OPTIONS] --input <filename>

Options:
  -i, --input <filename>     Filename to parse. If omitted, reads remaining args
                             or stdin when no args are provided.
  -c, --config <path>        TOML parser settings. Default: built-in settings.
  -t, --template <template>  Render a name, e.g. '{{site}} - {{date}} - {{name}}.{{ext}}'.
  --json                     Print the extracted record as JSON.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging goes to stderr; set RUST_LOG (default: warn).

Exit codes:
  0  Success.
  1  Configuration or render error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
