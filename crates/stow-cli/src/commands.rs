use std::path::PathBuf;

use anyhow::Context;
use chrono::Duration;
use colored::Colorize;
use stow::backends::default_data_dir;
use stow::{
    BackendConfig, Bucket, DocumentConfig, FileConfig, PreferencesConfig, SharedContainer, Timestamp,
    Value,
};

use crate::cli::*;
use crate::demo;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let backend = resolve_backend(&cli)?;
    tracing::debug!(kind = backend.kind(), "resolved backend");
    match cli.command {
        Command::Get(args) => cmd_get(&backend, args),
        Command::Set(args) => cmd_set(&backend, args),
        Command::Has(args) => cmd_has(&backend, args),
        Command::Rm(args) => cmd_rm(&backend, args),
        Command::Info(args) => cmd_info(&backend, args),
        Command::Demo => demo::run(&data_root(&cli)?),
    }
}

fn data_root(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.root {
        Some(root) => Ok(root.clone()),
        None => default_data_dir().context("no --root given and no data directory available"),
    }
}

/// `--config` wins; otherwise `--backend` laid out under the data root.
fn resolve_backend(cli: &Cli) -> anyhow::Result<BackendConfig> {
    if let Some(path) = &cli.config {
        return BackendConfig::load(path)
            .with_context(|| format!("loading backend config {}", path.display()));
    }
    if cli.backend == BackendKind::Memory {
        return Ok(BackendConfig::Memory);
    }
    let root = data_root(cli)?;
    Ok(match cli.backend {
        BackendKind::Preferences => BackendConfig::Preferences(PreferencesConfig {
            path: Some(root.join("preferences.json")),
            ..Default::default()
        }),
        BackendKind::File => BackendConfig::File(FileConfig::new(root.join("files"))),
        BackendKind::Document => {
            BackendConfig::Document(DocumentConfig::new(root.join("storage.json")))
        }
        BackendKind::Memory => BackendConfig::Memory,
    })
}

fn open(backend: &BackendConfig) -> anyhow::Result<SharedContainer> {
    backend
        .open()
        .with_context(|| format!("opening {} backend", backend.kind()))
}

fn bucket(backend: &BackendConfig, key: &str) -> anyhow::Result<Bucket<Value>> {
    Ok(Bucket::builder(key, open(backend)?).build())
}

fn cmd_get(backend: &BackendConfig, args: KeyArgs) -> anyhow::Result<()> {
    match bucket(backend, &args.key)?.read() {
        Some(value) => println!("{value}"),
        None => println!("{} {}", args.key.bold(), "is not set".dimmed()),
    }
    Ok(())
}

fn cmd_set(backend: &BackendConfig, args: SetArgs) -> anyhow::Result<()> {
    let value = Value::parse_as(args.kind, &args.value)
        .with_context(|| format!("parsing {:?} as {}", args.value, args.kind))?;
    let mut builder = Bucket::<Value>::builder(args.key.as_str(), open(backend)?);
    if let Some(secs) = args.expire_in {
        builder = builder.expire_after(Duration::seconds(secs));
    }
    let bucket = builder.build();
    bucket.set(&value);
    println!("{} {} = {}", "✓".green().bold(), args.key.bold(), value.to_string().cyan());
    if !backend.is_persistent() {
        println!(
            "  {}",
            format!("{} backend is in memory; the value is lost at exit", backend.kind()).yellow()
        );
    }
    if let Some(expires_at) = bucket.expires_at() {
        println!("  expires {}", format_instant(expires_at).yellow());
    }
    Ok(())
}

fn cmd_has(backend: &BackendConfig, args: KeyArgs) -> anyhow::Result<()> {
    let exists = bucket(backend, &args.key)?.exists();
    if exists {
        println!("{} {}", args.key.bold(), "exists".green());
    } else {
        println!("{} {}", args.key.bold(), "does not exist".red());
    }
    Ok(())
}

fn cmd_rm(backend: &BackendConfig, args: KeyArgs) -> anyhow::Result<()> {
    bucket(backend, &args.key)?.remove();
    println!("{} Removed {}", "✓".green(), args.key.bold());
    Ok(())
}

fn cmd_info(backend: &BackendConfig, args: KeyArgs) -> anyhow::Result<()> {
    let bucket = bucket(backend, &args.key)?;
    println!("{}", bucket.to_string().bold());
    println!("  backend: {}", bucket.container().name().cyan());
    let updated = bucket.updated_at().map(format_instant);
    let expires = bucket.expires_at().map(format_instant);
    println!("  updated: {}", updated.as_deref().unwrap_or("never"));
    println!("  expires: {}", expires.as_deref().unwrap_or("never"));
    Ok(())
}

fn format_instant(instant: Timestamp) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
