use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_common::RootedFileSystem;
use folio_editor::Format;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Source document (.md, .txt, .html)
    pub input: PathBuf,

    /// Destination; the extension picks Markdown or markup
    pub output: PathBuf,

    /// Run smart format on the tree before writing
    #[arg(long)]
    pub smart: bool,
}

pub fn convert(args: ConvertArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = super::open_session(cwd, &args.input, &config)?;

    if args.smart {
        if session.format() == Format::Text {
            session.switch_to_tree()?;
        }
        let report = session.smart_format()?;
        println!(
            "  {} smart format: lead {}, {} headings, {} badges, {} callouts, {} quotes, {} dividers",
            "✓".green(),
            if report.lead { "set" } else { "kept" },
            report.headings,
            report.badges,
            report.callouts,
            report.quotes,
            report.dividers
        );
    }

    let mut fs = RootedFileSystem::new(cwd);
    session
        .save(&mut fs, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!(
        "  {} {} → {}",
        "✓".green(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}
