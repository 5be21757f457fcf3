// Boxterm command-line tool
// Inspects serialized terms, checks codec round trips and calls ported library functions

use anyhow::{bail, Context, Result};
use boxterm::runtime::inspect::inspect_with;
use boxterm::runtime::stdlib::load_stdlib;
use boxterm::{deserialize, serialize, Interpreter, ModuleRegistry, RuntimeConfig, Term};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boxterm")]
#[command(about = "Boxed term runtime tools")]
#[command(version = "0.1.0")]
struct Args {
    /// Runtime configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a serialized term in guest notation
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Decode and re-encode a serialized term and check that nothing changed
    Roundtrip {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the map-key encoding of a serialized term
    EncodeKey {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Call a ported library function; FILE holds the serialized argument list
    Call {
        module: String,
        function: String,
        #[arg(value_name = "FILE")]
        args: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RuntimeConfig::default(),
    }
    .with_env_overrides()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Inspect { file } => {
            let term = read_term(&file)?;
            println!("{}", inspect_with(&term, &config.inspect));
        }
        Command::Roundtrip { file } => {
            let term = read_term(&file)?;
            let encoded = serialize(&term)?;
            let decoded = deserialize(&encoded)?;
            if decoded != term {
                bail!("round trip changed the term: {}", inspect_with(&decoded, &config.inspect));
            }
            println!("{}", encoded);
        }
        Command::EncodeKey { file } => {
            let term = read_term(&file)?;
            println!("{}", term.encode_map_key());
        }
        Command::Call {
            module,
            function,
            args,
        } => {
            let call_args = match read_term(&args)? {
                Term::List(list) if list.is_proper() => list.data().to_vec(),
                other => bail!("arguments must be a proper list, got {}", other),
            };
            let mut registry = ModuleRegistry::new();
            load_stdlib(&mut registry);
            let interpreter = Interpreter::with_config(registry, config.clone());
            debug!("Calling {}.{}/{}", module, function, call_args.len());
            match interpreter.invoke(&module, &function, &call_args) {
                Ok(result) => println!("{}", inspect_with(&result, &config.inspect)),
                Err(err) => bail!("{}", err),
            }
        }
    }

    Ok(())
}

fn read_term(path: &Path) -> Result<Term> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    deserialize(&text).with_context(|| format!("decoding {}", path.display()))
}
