use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stow::ValueKind;

#[derive(Parser)]
#[command(
    name = "stow",
    about = "Stow: typed key-value storage from the shell",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend description (TOML). Overrides --backend and --root.
    ///
    /// A `credential` backend uses an in-process vault: its items are lost
    /// when the command exits.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "preferences")]
    pub backend: BackendKind,

    /// Data directory. Defaults to the per-user data directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    Preferences,
    File,
    Document,
    Memory,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the value stored under a key
    Get(KeyArgs),
    /// Store a value under a key
    Set(SetArgs),
    /// Check whether a key holds a value
    Has(KeyArgs),
    /// Remove a key and its metadata
    Rm(KeyArgs),
    /// Show a key's value with freshness and expiry metadata
    Info(KeyArgs),
    /// Run the sample profile schema and print its debug log
    Demo,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub key: String,
    pub value: String,
    /// Literal kind: string, int, float, bool, date, data, url, array, dictionary
    #[arg(long, default_value = "string")]
    pub kind: ValueKind,
    /// Expire the value this many seconds from now
    #[arg(long)]
    pub expire_in: Option<i64>,
}
