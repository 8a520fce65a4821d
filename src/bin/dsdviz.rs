//! dsdviz CLI - analyse strand notation locally or against a running server
//!
//! Usage:
//!   dsdviz <INPUT> [--svg <file>] [--config <file>] [--verbose]
//!   dsdviz --server <URL> [--svg <file>] [--verbose]
//!
//! Example:
//!   dsdviz "a b( c ) d( e + f )" --svg out.svg
//!   dsdviz --server http://localhost:8080

use anyhow::{Context, Result};
use colored::Colorize;
use dsdviz::client::{Graphic, HttpBackend, RunClient, SubmitOutcome, View};
use dsdviz::{geometry, lex, parse, render, Config};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn print_usage() {
    eprintln!(
        r#"
{} - Parse, lay out and render domain-level strand notation

{}
    dsdviz <INPUT> [OPTIONS]
    dsdviz --server <URL> [OPTIONS]

{}
    <INPUT>    Notation to analyse, e.g. "a( b c + d )"

{}
    -s, --server <URL>      Read lines from stdin and submit each to a dsdviz server
    -o, --svg <FILE>        Write the rendered SVG to FILE
    -c, --config <FILE>     Layout/render config (offline mode only)
    -v, --verbose           Log requests and pipeline steps
    -h, --help              Print this help message

{}
    dsdviz "a b c"
    dsdviz "a( b ) c( d + )" --svg hairpin.svg
    echo "a( b + c )" | dsdviz --server http://localhost:8080
"#,
        "dsdviz".bold(),
        "USAGE:".bold(),
        "ARGS:".bold(),
        "OPTIONS:".bold(),
        "EXAMPLES:".bold(),
    );
}

struct CliArgs {
    input: Option<String>,
    server: Option<String>,
    svg_out: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        std::process::exit(if args.is_empty() { 1 } else { 0 });
    }

    let mut cli = CliArgs {
        input: None,
        server: None,
        svg_out: None,
        config: None,
        verbose: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--server" | "-s" => {
                i += 1;
                cli.server = args.get(i).cloned();
            }
            "--svg" | "-o" => {
                i += 1;
                cli.svg_out = args.get(i).map(PathBuf::from);
            }
            "--config" | "-c" => {
                i += 1;
                cli.config = args.get(i).map(PathBuf::from);
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            other => {
                if cli.input.is_none() {
                    cli.input = Some(other.to_string());
                }
            }
        }
        i += 1;
    }

    cli
}

fn print_section(title: &str, body: &str) {
    eprintln!("{}", format!("┌─ {title} ").cyan());
    for line in body.lines() {
        eprintln!("{} {}", "│".cyan(), line);
    }
    eprintln!("{}", "└──".cyan());
}

fn write_svg(path: &PathBuf, markup: &str) -> Result<()> {
    std::fs::write(path, markup)
        .with_context(|| format!("Failed to write SVG: {}", path.display()))?;
    eprintln!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

/// Run the whole pipeline in-process
fn run_offline(input: &str, args: &CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let tokens = lex::tokenise(input)?;
    let rendered: Vec<String> = tokens
        .iter()
        .map(|t| format!("{:<10} {}", t.kind.to_string(), t.value))
        .collect();
    print_section("Tokens", &rendered.join("\n"));

    let ast = parse::parse_tokens(&tokens)?;
    print_section("AST", &serde_json::to_string_pretty(&ast)?);
    print_section("Canonical", &ast.to_string());

    let shape = geometry::layout(&ast, &config.layout);
    let svg = render::render_svg(&shape, &config.render);
    match &args.svg_out {
        Some(path) => write_svg(path, &svg)?,
        None => println!("{svg}"),
    }

    Ok(())
}

/// Terminal stand-in for the demo page's view
struct TerminalView {
    input: String,
    svg_out: Option<PathBuf>,
    graphics: Vec<Graphic>,
}

impl View for TerminalView {
    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn set_tokens_text(&mut self, text: String) {
        print_section("Tokens", &text);
    }

    fn set_ast_text(&mut self, text: String) {
        print_section("AST", &text);
    }

    fn remove_graphics(&mut self, class: &str) {
        self.graphics.retain(|g| g.class != class);
    }

    fn append_graphic(&mut self, graphic: Graphic) {
        if let Some(path) = &self.svg_out {
            if let Err(e) = write_svg(path, &graphic.markup) {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
        }
        self.graphics.push(graphic);
    }
}

/// Submit each stdin line to a server, like typing into the demo page
async fn run_interactive(server: &str, args: &CliArgs) -> Result<()> {
    let backend = HttpBackend::new(server)?;
    let view = TerminalView {
        input: args.input.clone().unwrap_or_default(),
        svg_out: args.svg_out.clone(),
        graphics: Vec::new(),
    };
    let client = RunClient::new(backend, view);

    eprintln!("{} {}", "Connected to".dimmed(), server);
    client.on_load().await;

    let stdin = std::io::stdin();
    loop {
        eprint!("{} ", ">>>".blue());
        std::io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        client.view().await.input = line.trim_end_matches(['\r', '\n']).to_string();

        match client.submit_new_input().await {
            SubmitOutcome::Unchanged => eprintln!("{}", "(unchanged)".dimmed()),
            SubmitOutcome::Failed { error, .. } => {
                eprintln!("{} {}", "Error:".red().bold(), error)
            }
            _ => {}
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = match (&args.server, &args.input) {
        (Some(server), _) => run_interactive(server, &args).await,
        (None, Some(input)) => run_offline(input, &args),
        (None, None) => {
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
