use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::parser::Parser;
use rox::runtime::{Runtime, EXIT_STATIC_ERROR, STACK_SIZE};
use rox::scanner::Scanner;

/// Exit status for a malformed command line.
const EXIT_USAGE: i32 = 64;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses a program from a file and prints its syntax tree
    Parse {
        filename: PathBuf,

        /// Print the tree as JSON instead of prefix notation
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Parses the command line, mapping usage errors to exit status 64.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

fn tokenize(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    Ok(if tokenized { 0 } else { EXIT_STATIC_ERROR })
}

fn parse(filename: &PathBuf, json: bool) -> Result<i32> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = Scanner::new(&source).scan_all();

    for e in &lex_errors {
        eprintln!("{}", e);
    }

    match Parser::new(tokens).parse() {
        Ok(statements) if lex_errors.is_empty() => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&statements).context("Failed to serialize AST")?
                );
            } else {
                for stmt in &statements {
                    println!("{}", AstPrinter::print_stmt(stmt));
                }
            }
            Ok(0)
        }
        Ok(_) => Ok(EXIT_STATIC_ERROR),
        Err(diagnostics) => {
            eprintln!("{}", diagnostics);
            Ok(EXIT_STATIC_ERROR)
        }
    }
}

fn evaluate(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut runtime = Runtime::new();

    match runtime.evaluate(&source) {
        Ok(value) => {
            println!("{}", value);
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(e.exit_code())
        }
    }
}

fn run(filename: &PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    debug!("Provided input:\n{}", source);

    let mut runtime = Runtime::new();

    match runtime.run(&source) {
        Ok(()) => {
            info!("Program executed successfully");
            Ok(0)
        }
        Err(e) => {
            debug!("Run failed: {:?}", e);
            eprintln!("{}", e);
            Ok(e.exit_code())
        }
    }
}

/// One line at a time; state persists, errors do not.
fn repl() -> Result<i32> {
    let mut runtime = Runtime::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        if line.is_empty() {
            break;
        }

        if let Err(e) = runtime.run(&line) {
            eprintln!("{}", e);
        }
    }

    Ok(0)
}

fn dispatch(command: Option<Commands>) -> Result<i32> {
    match command {
        Some(Commands::Tokenize { filename }) => tokenize(&filename),
        Some(Commands::Parse { filename, json }) => parse(&filename, json),
        Some(Commands::Evaluate { filename }) => evaluate(&filename),
        Some(Commands::Run { filename }) => run(&filename),
        Some(Commands::Repl) | None => repl(),
    }
}

fn main() -> Result<()> {
    let args: Cli = parse_cli();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    // Deeply recursive programs need far more stack than the main thread has.
    let code = thread::Builder::new()
        .name("interpreter".into())
        .stack_size(STACK_SIZE)
        .spawn(move || dispatch(args.commands))
        .context("Failed to spawn interpreter thread")?
        .join()
        .map_err(|_| anyhow!("Interpreter thread panicked"))??;

    if code != 0 {
        debug!("Exiting with code {}", code);
        std::process::exit(code);
    }

    Ok(())
}
