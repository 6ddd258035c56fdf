mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    components, convert, export, init, probe, themes, ComponentsArgs, ConvertArgs, ExportArgs,
    InitArgs, ProbeArgs, ThemesArgs,
};

/// Folio - component-aware article editor and exporter
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a folio.config.json and an example article
    Init(InitArgs),

    /// List and search the component catalog
    Components(ComponentsArgs),

    /// List themes, show tokens, validate theme files
    Themes(ThemesArgs),

    /// Show the component instance at a cursor position
    Probe(ProbeArgs),

    /// Export an article as paste-ready HTML
    Export(ExportArgs),

    /// Convert between Markdown and markup
    Convert(ConvertArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Components(args) => components(args),
            Command::Themes(args) => themes(args),
            Command::Probe(args) => probe(args, &cwd),
            Command::Export(args) => export(args, &cwd),
            Command::Convert(args) => convert(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
