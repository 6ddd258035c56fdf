use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{EditSession, ExportMode};
use folio_theme::ThemeId;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document to export (.md, .txt, .html)
    pub file: PathBuf,

    /// Inlining mode (inline, ultra, computed); defaults to the config
    #[arg(short, long)]
    pub mode: Option<ExportMode>,

    /// Theme id (built-in id); defaults to the config
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Theme file to import and use (JSON, or CSS for any other extension)
    #[arg(long)]
    pub theme_file: Option<PathBuf>,

    /// Write the themed body without inlining
    #[arg(long, conflicts_with = "css")]
    pub body: bool,

    /// Write the stylesheet (base + theme) only
    #[arg(long)]
    pub css: bool,

    /// Write the clipboard payload (stylesheet followed by the body)
    #[arg(long, conflicts_with_all = ["body", "css"])]
    pub clipboard: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = super::open_session(cwd, &args.file, &config)?;

    if let Some(theme) = &args.theme {
        session.set_theme(ThemeId::parse(theme));
    }
    if let Some(path) = &args.theme_file {
        let id = session.import_theme(super::read_theme_file(path)?);
        info!(theme = %id, "using imported theme");
    }

    let mode = args.mode.unwrap_or(config.export_mode);
    let html = if args.css {
        session.export_css()
    } else if args.body {
        session.export_body()?
    } else if args.clipboard {
        session.export_clipboard()?
    } else {
        render(&session, mode)?
    };

    match &args.output {
        Some(path) => {
            let path = cwd.join(path);
            std::fs::write(&path, &html).with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "  {} {} → {} ({} bytes)",
                "✓".green(),
                args.file.display(),
                path.display(),
                html.len()
            );
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn render(session: &EditSession, mode: ExportMode) -> Result<String> {
    match mode {
        ExportMode::Inline | ExportMode::Ultra => Ok(session.export_inlined(mode)?),
        ExportMode::Computed => computed(session),
    }
}

#[cfg(feature = "vision")]
fn computed(session: &EditSession) -> Result<String> {
    let mut backend = folio_vision::ChromeBackend::launch()?;
    Ok(session.export_computed(&mut backend)?)
}

#[cfg(not(feature = "vision"))]
fn computed(_session: &EditSession) -> Result<String> {
    anyhow::bail!("computed export needs the `vision` feature")
}
