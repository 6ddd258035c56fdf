//! Folio Vision CLI
//!
//! A thin glue layer for computed-snapshot export of an article body.

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_compiler_inline::{article_stylesheet, inline_computed};
use folio_theme::{ThemeCatalog, ThemeId, UserTheme};
use folio_vision::ChromeBackend;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "folio-vision")]
#[command(about = "Computed-style export through headless Chrome", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inline the computed styles of an article body
    Snapshot {
        /// Article body HTML file
        input: PathBuf,

        /// Theme id (built-in id or custom:<id>)
        #[arg(short, long, default_value = "clean")]
        theme: String,

        /// Custom theme JSON to import before resolving the theme
        #[arg(long)]
        theme_file: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
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

    match cli.command {
        Commands::Snapshot {
            input,
            theme,
            theme_file,
            output,
        } => {
            if let Err(e) = run_snapshot(input, theme, theme_file, output) {
                error!("Snapshot failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_snapshot(
    input: PathBuf,
    theme: String,
    theme_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    info!(input = %input.display(), theme = %theme, "starting computed snapshot");

    let body = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;

    let mut catalog = ThemeCatalog::new();
    if let Some(path) = theme_file {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let id = catalog.add(UserTheme::from_json(&text)?);
        info!(theme = %id, "imported custom theme");
    }

    let theme = ThemeId::parse(&theme);
    let css = article_stylesheet(&theme, &catalog);
    let mut backend = ChromeBackend::launch()?;
    let html = inline_computed(&mut backend, &body, &css, &theme)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &html).with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), bytes = html.len(), "snapshot written");
        }
        None => println!("{}", html),
    }
    Ok(())
}
