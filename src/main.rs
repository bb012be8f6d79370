//! takeoffcmd CLI entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use takeoffcmd::{
    get_capabilities, parse_command, CommandContext, Config, OutputFormat, ParseResult, Transcript,
};

#[derive(Parser, Debug)]
#[command(name = "takeoffcmd", version, about = "Turn estimating sentences into takeoff actions")]
struct Cli {
    /// Config file (defaults to <config dir>/takeoffcmd/config.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this project as open
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// Project type used when generating drafts
    #[arg(long, global = true)]
    project_type: Option<String>,

    /// Output format: text or json (overrides the config file)
    #[arg(long, global = true, value_name = "FORMAT")]
    output: Option<OutputFormat>,

    /// Shorthand for --output json
    #[arg(long, global = true, conflicts_with = "output")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a single command
    Parse {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// List every rule with example phrasings
    Capabilities,
    /// Read commands from stdin, one per line
    Repl {
        /// Write the session transcript here as JSON
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.output.unwrap_or(config.output)
    };

    let mut ctx = config.context();
    if let Some(id) = cli.project_id.clone() {
        ctx.project_id = Some(id);
    }
    if let Some(project_type) = cli.project_type.clone() {
        ctx.project_type = Some(project_type);
    }
    log::debug!("Starting with context {:?}, {} output", ctx, format);

    match cli.command {
        Commands::Parse { words } => {
            let result = parse_command(&words.join(" "), &ctx);
            print_result(&result, format)?;
            Ok(if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Capabilities => {
            print_capabilities(format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Repl { transcript } => {
            repl(ctx, format, transcript, config.transcript_dir.clone())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// An explicit transcript path wins over the configured transcript directory
fn repl(
    mut ctx: CommandContext,
    format: OutputFormat,
    transcript_path: Option<PathBuf>,
    transcript_dir: Option<PathBuf>,
) -> Result<()> {
    let stdin = io::stdin();
    let mut transcript = Transcript::new();

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(directive) = line.strip_prefix(':') {
            let (name, arg) = match directive.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (directive, ""),
            };
            match name {
                "quit" | "q" | "exit" => break,
                "open" if !arg.is_empty() => {
                    ctx.project_id = Some(arg.to_string());
                    println!("opened project {arg}");
                }
                "type" if !arg.is_empty() => {
                    ctx.project_type = Some(arg.to_string());
                    println!("project type {arg}");
                }
                "close" => {
                    ctx.project_id = None;
                    ctx.project_type = None;
                    println!("closed project");
                }
                _ => eprintln!("unknown directive :{name} (try :open, :type, :close, :quit)"),
            }
            continue;
        }

        let result = parse_command(line, &ctx);
        print_result(&result, format)?;
        transcript.record(line, &ctx, &result);
    }

    transcript.end();
    let path = transcript_path.or_else(|| transcript_dir.map(|dir| transcript.path_in(&dir)));
    if let Some(path) = path {
        transcript.save(&path)?;
        eprintln!(
            "saved {} commands ({} understood) to {}",
            transcript.entries.len(),
            transcript.successes(),
            path.display()
        );
    }
    Ok(())
}

fn print_result(result: &ParseResult, format: OutputFormat) -> Result<()> {
    let mut out = io::stdout().lock();

    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        return Ok(());
    }

    for action in &result.actions {
        let params = serde_json::to_string(&action.params)?;
        writeln!(out, "{} ({:.2}) {}", action.action_type, action.confidence, params)?;
    }
    if let Some(question) = &result.missing_info {
        writeln!(out, "? {question}")?;
    }
    if let Some(error) = &result.error {
        writeln!(out, "{error}")?;
    }
    for suggestion in result.suggestions.iter().flatten() {
        writeln!(out, "  - {}: {}", suggestion.label, suggestion.command)?;
    }
    Ok(())
}

fn print_capabilities(format: OutputFormat) -> Result<()> {
    let caps = get_capabilities();
    let mut out = io::stdout().lock();

    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&caps)?)?;
        return Ok(());
    }

    for rule in &caps.rules {
        writeln!(out, "{} - {}", rule.id, rule.name)?;
        for example in &rule.examples {
            writeln!(out, "    \"{example}\"")?;
        }
    }
    Ok(())
}
