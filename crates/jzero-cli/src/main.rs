//! `j0`: the command-line front end for the jzero compiler (`spec.md`
//! §6). Drives the lexer, parser, semantic analyzer, and (once it
//! exists) code generation, and maps the first error any stage raises
//! onto a process exit code — the passes themselves stay pure with
//! respect to process state (`spec.md` §9's "Global error channel").

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};

/// The jzero compiler driver. Exactly one of `-l`/`-p`/`-c`/`-i` is
/// required; clap enforces that at parse time and exits with its usual
/// usage-error status, matching `spec.md` §6's distinguishable exit codes.
#[derive(Debug, Parser)]
#[command(name = "j0", about = "Lex, parse, and type-check VSOP source files")]
#[command(group(ArgGroup::new("mode").required(true).args(["lex", "parse", "check", "invoke"])))]
struct Cli {
    /// Lex only, printing one token per line.
    #[arg(short = 'l')]
    lex: bool,

    /// Parse only, pretty-printing the untyped tree.
    #[arg(short = 'p')]
    parse: bool,

    /// Parse and run the four semantic passes, pretty-printing the annotated tree.
    #[arg(short = 'c')]
    check: bool,

    /// Same front end as `-c`, then hand the annotated tree to code generation.
    #[arg(short = 'i')]
    invoke: bool,

    /// The source file to process.
    file: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Lex,
    Parse,
    Check,
    Invoke,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.lex {
            Mode::Lex
        } else if self.parse {
            Mode::Parse
        } else if self.check {
            Mode::Check
        } else {
            Mode::Invoke
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.file).with_context(|| format!("reading '{}'", cli.file.display()))?;
    let file_name = cli.file.to_string_lossy().into_owned();

    match cli.mode() {
        Mode::Lex => run_lex(&source),
        Mode::Parse => run_parse(&source, &file_name),
        Mode::Check => run_check(&source, &file_name).map(|_| ()),
        Mode::Invoke => run_invoke(&source, &file_name),
    }
}

fn run_lex(source: &str) -> Result<()> {
    let tokens = jzero_lexer::lex(source).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!(messages.join("\n"))
    })?;
    for token in &tokens {
        println!("{}:{}: {:?} {:?}", token.line, token.column, token.token, token.text);
    }
    Ok(())
}

fn run_parse(source: &str, file_name: &str) -> Result<()> {
    let program = jzero_parser::parse(source, file_name)?;
    println!("{}", jzero_ast::print_program(&program, false));
    Ok(())
}

fn run_check(source: &str, file_name: &str) -> Result<jzero_ast::Program> {
    let mut program = jzero_parser::parse(source, file_name)?;
    jzero_semantic::analyze(&mut program, file_name)?;
    println!("{}", jzero_ast::print_program(&program, true));
    Ok(program)
}

fn run_invoke(source: &str, file_name: &str) -> Result<()> {
    let mut program = jzero_parser::parse(source, file_name)?;
    let tables = jzero_semantic::analyze(&mut program, file_name)?;
    tracing::debug!("handing the annotated tree to code generation");
    jzero_codegen::generate(&program, &tables)?;
    Ok(())
}
