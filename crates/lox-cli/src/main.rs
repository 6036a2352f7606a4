//! Lox scanner CLI

use clap::{ArgAction, Parser, Subcommand};
use lox_error::{DiagnosticRenderer, Diagnostics, SourceCache};
use lox_lexer::{scan_tokens, Scanner, Token};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Exit code for malformed input (sysexits `EX_DATAERR`)
const EXIT_DATA_ERROR: u8 = 65;
/// Exit code for an unreadable input file (sysexits `EX_NOINPUT`)
const EXIT_NO_INPUT: u8 = 66;
/// Exit code for a failed terminal read/write (sysexits `EX_IOERR`)
const EXIT_IO_ERROR: u8 = 74;

#[derive(Parser)]
#[command(name = "lox")]
#[command(author = "Guilherme Mendes")]
#[command(version = "0.1.0")]
#[command(about = "Lox language scanner", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Render diagnostics without ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows file tokens
    Lex {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Checks a file for scan errors
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Scans lines typed at a prompt
    Repl,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Read { .. } => EXIT_NO_INPUT,
            CliError::Io(_) => EXIT_IO_ERROR,
        }
    }
}

/// A source file together with the result of scanning it
struct ScannedFile {
    cache: SourceCache,
    file_id: u32,
    tokens: Vec<Token>,
    diagnostics: Diagnostics,
}

impl ScannedFile {
    fn load(path: &Path) -> Result<Self, CliError> {
        let source = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(path.display().to_string(), source))
    }

    fn from_source(name: String, source: String) -> Self {
        let (tokens, diagnostics) = scan_tokens(&source);

        let mut cache = SourceCache::new();
        let file_id = cache.add(name, source);

        Self {
            cache,
            file_id,
            tokens,
            diagnostics,
        }
    }

    fn render_diagnostics(&self, use_colors: bool) -> String {
        let renderer = DiagnosticRenderer::new(&self.cache, self.file_id).with_colors(use_colors);
        self.diagnostics.render(&renderer)
    }
}

/// One line of the token listing
fn format_token(token: &Token) -> String {
    let mut line = format!("{:>4}  {:<14} {}", token.line, token.kind, token.lexeme);
    if let Some(literal) = &token.literal {
        line.push(' ');
        line.push_str(&literal.to_string());
    }
    line.trim_end().to_string()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn run_lex(input: &Path, use_colors: bool) -> Result<ExitCode, CliError> {
    tracing::info!("tokenizing {}", input.display());
    let scanned = ScannedFile::load(input)?;

    let mut stdout = io::stdout().lock();
    for token in &scanned.tokens {
        writeln!(stdout, "{}", format_token(token))?;
    }
    writeln!(stdout, "\nTotal: {} tokens", scanned.tokens.len())?;

    if scanned.diagnostics.has_errors() {
        eprintln!("\n{}", scanned.render_diagnostics(use_colors));
        return Ok(ExitCode::from(EXIT_DATA_ERROR));
    }

    Ok(ExitCode::SUCCESS)
}

fn run_check(input: &Path, use_colors: bool) -> Result<ExitCode, CliError> {
    tracing::info!("checking {}", input.display());
    let scanned = ScannedFile::load(input)?;

    if scanned.diagnostics.has_errors() {
        eprintln!("{}", scanned.render_diagnostics(use_colors));
        eprintln!(
            "Found {} error(s) in {}",
            scanned.diagnostics.len(),
            input.display()
        );
        return Ok(ExitCode::from(EXIT_DATA_ERROR));
    }

    println!("  [ok] Lexer: {} tokens", scanned.tokens.len());
    Ok(ExitCode::SUCCESS)
}

/// Reads lines until end of input, printing each line's tokens.
///
/// Errors on one line are printed and forgotten; the session goes on.
fn run_prompt(input: impl BufRead, out: &mut impl Write, err: &mut impl Write) -> Result<(), CliError> {
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;

        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(&line, &mut diagnostics).scan_tokens();

        for token in &tokens {
            writeln!(out, "{}", token)?;
        }
        for diagnostic in &diagnostics {
            writeln!(err, "{}", diagnostic)?;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let use_colors = !cli.no_color;

    let result = match &cli.command {
        Commands::Lex { input } => run_lex(input, use_colors),
        Commands::Check { input } => run_check(input, use_colors),
        Commands::Repl => {
            let stdin = io::stdin();
            run_prompt(stdin.lock(), &mut io::stdout(), &mut io::stderr()).map(|()| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
