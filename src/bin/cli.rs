//! ShardKV CLI
//!
//! Command-line interface for inspecting and editing a ShardKV database.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use shardkv::util::{pipe, read_fully};
use shardkv::{Config, Json, RecoveryPolicy, Store, Text};
use tracing_subscriber::{fmt, EnvFilter};

/// ShardKV CLI
#[derive(Parser, Debug)]
#[command(name = "shardkv-cli")]
#[command(about = "CLI for the ShardKV file-per-value store")]
#[command(version)]
struct Args {
    /// Database root directory
    #[arg(short, long, default_value = "./shardkv_data")]
    data_dir: PathBuf,

    /// What to do with corrupt records found while reading
    #[arg(short, long, value_enum, default_value = "delete")]
    recovery: Recovery,

    /// fsync every written record
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Recovery {
    Delete,
    Quarantine,
    Fail,
}

impl From<Recovery> for RecoveryPolicy {
    fn from(r: Recovery) -> Self {
        match r {
            Recovery::Delete => RecoveryPolicy::Delete,
            Recovery::Quarantine => RecoveryPolicy::Quarantine,
            Recovery::Fail => RecoveryPolicy::Fail,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a value
    Put {
        group: String,
        key: String,

        /// The value; `-` or omitted reads stdin
        value: Option<String>,

        /// Validate the value as JSON and store it structured
        #[arg(long)]
        json: bool,
    },

    /// Print a value
    Get {
        group: String,
        key: String,

        /// Decode as JSON and pretty-print
        #[arg(long)]
        json: bool,
    },

    /// Print every value in a group, one per line
    List {
        group: String,

        /// Decode as JSON (compact, one per line)
        #[arg(long)]
        json: bool,
    },

    /// Delete a value
    Del { group: String, key: String },

    /// Print the record path of a key
    Path { group: String, key: String },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shardkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .recovery_policy(args.recovery.into())
        .sync_on_write(args.sync)
        .build();

    let store = match Store::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::from(1);
        }
    };

    let code = match run(&store, args.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    };

    if let Err(e) = store.close() {
        tracing::warn!("Failed to close store: {}", e);
    }
    code
}

fn run(store: &Store, command: Commands) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Commands::Put { group, key, value, json } => {
            let value = match value.as_deref() {
                None | Some("-") => read_fully(io::stdin().lock())?,
                Some(v) => v.to_string(),
            };
            let written = if json {
                let parsed: serde_json::Value = serde_json::from_str(&value)?;
                store.put(&key, &group, &parsed, &Json::<serde_json::Value>::new())?
            } else {
                store.put(&key, &group, &value, &Text)?
            };
            if !written {
                return Err(format!("failed to write {}/{}", group, key).into());
            }
        }
        Commands::Get { group, key, json } => {
            let text = if json {
                store
                    .get(&key, &group, &Json::<serde_json::Value>::new())?
                    .map(|v| serde_json::to_string_pretty(&v))
                    .transpose()?
            } else {
                store.get(&key, &group, &Text)?
            };
            match text {
                Some(text) => write_stdout(&text)?,
                None => {
                    tracing::info!("{}/{} not found", group, key);
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Commands::List { group, json } => {
            if json {
                for value in store.list(&group, &Json::<serde_json::Value>::new())? {
                    println!("{}", value);
                }
            } else {
                for value in store.list(&group, &Text)? {
                    println!("{}", value);
                }
            }
        }
        Commands::Del { group, key } => {
            let removed = store.delete(&key, &group)?;
            tracing::info!("{}/{} removed: {}", group, key, removed);
        }
        Commands::Path { group, key } => {
            println!("{}", store.record_path(&key, &group)?.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Write a value to stdout byte-for-byte
fn write_stdout(text: &str) -> io::Result<()> {
    let mut source = text.as_bytes();
    pipe(&mut source, &mut io::stdout().lock())?;
    Ok(())
}
