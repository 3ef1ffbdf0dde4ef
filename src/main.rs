use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use easyjs_syntax::{lexer::lexer::tokenize, parse_with_options, render_diagnostic, ParseOptions};
use log::{info, LevelFilter, Log, Metadata, Record};

/// Exit status for input that could not be parsed at all.
const EXIT_UNREADABLE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "easyjs-parse",
    version,
    about = "Parse easyjs source files into a concrete syntax tree"
)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and print its tree to stdout
    Parse {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Sexp)]
        format: Format,

        /// Refuse files larger than this many bytes
        #[arg(long)]
        max_bytes: Option<u64>,

        /// Exit with status 1 if any error diagnostic was produced
        #[arg(long)]
        deny_errors: bool,

        /// Don't warn about comments inside argument, array and object lists
        #[arg(long)]
        allow_comment_expressions: bool,
    },
    /// Print the significant tokens of a file, one per line
    Tokens { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One-line s-expression
    Sexp,
    /// Indented s-expression with source ranges
    Pretty,
    /// Tree and diagnostics as JSON
    Json,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn read_source(file: &Path, max_bytes: Option<u64>) -> Result<String, String> {
    let metadata =
        fs::metadata(file).map_err(|e| format!("cannot read {}: {}", file.display(), e))?;

    if let Some(max_bytes) = max_bytes {
        if metadata.len() > max_bytes {
            return Err(format!(
                "{} is {} bytes, larger than the limit of {}",
                file.display(),
                metadata.len(),
                max_bytes
            ));
        }
    }

    fs::read_to_string(file).map_err(|e| format!("cannot read {}: {}", file.display(), e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse {
            file,
            format,
            max_bytes,
            deny_errors,
            allow_comment_expressions,
        } => {
            let source = match read_source(&file, max_bytes) {
                Ok(source) => source,
                Err(message) => {
                    eprintln!("error: {}", message);
                    return ExitCode::from(EXIT_UNREADABLE);
                }
            };

            let options = ParseOptions {
                report_comment_expressions: !allow_comment_expressions,
            };

            let start = Instant::now();
            let result = parse_with_options(&source, &options);
            info!("Parsed {} in {:?}", file.display(), start.elapsed());

            match format {
                Format::Sexp => println!("{}", result.root.to_sexp()),
                Format::Pretty => print!("{}", result.root.to_pretty_sexp()),
                Format::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("error: cannot serialize tree: {}", e);
                        return ExitCode::from(EXIT_UNREADABLE);
                    }
                },
            }

            let file_name = file.display().to_string();
            for diagnostic in &result.diagnostics {
                eprint!("{}", render_diagnostic(diagnostic, &source, &file_name));
            }

            if deny_errors && result.has_errors() {
                return ExitCode::from(1);
            }

            ExitCode::SUCCESS
        }
        Command::Tokens { file } => {
            let source = match read_source(&file, None) {
                Ok(source) => source,
                Err(message) => {
                    eprintln!("error: {}", message);
                    return ExitCode::from(EXIT_UNREADABLE);
                }
            };

            for token in tokenize(&source).filter(|token| !token.kind.is_trivia()) {
                println!(
                    "{}:{} {}",
                    token.span.start.line,
                    token.span.start.column,
                    token.debug()
                );
            }

            ExitCode::SUCCESS
        }
    }
}
