use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use folio_editor::Format;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Surface {
    Tree,
    Text,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Document to probe (.md, .txt, .html)
    pub file: PathBuf,

    /// Tree position, or byte offset when probing the flat text
    #[arg(short, long)]
    pub offset: usize,

    /// Representation to probe (defaults to the one the file opens in)
    #[arg(short, long, value_enum)]
    pub surface: Option<Surface>,

    /// Print the instance as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn probe(args: ProbeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = super::open_session(cwd, &args.file, &config)?;

    match (args.surface, session.format()) {
        (Some(Surface::Text), Format::Tree) => session.switch_to_text(),
        (Some(Surface::Tree), Format::Text) => session.switch_to_tree()?,
        _ => {}
    }
    let format = session.format();

    let instance = session
        .select_at(args.offset)
        .cloned()
        .ok_or_else(|| anyhow!("No editable component at {} offset {}", format, args.offset))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&instance)?);
        return Ok(());
    }

    let (start, end) = instance.location.range();
    println!(
        "{} {} ({} {}..{})",
        "✓".green(),
        instance.component_id.bright_white().bold(),
        format,
        start,
        end
    );
    if let Some(selected) = session.selected_schema() {
        for field in &selected.schema.fields {
            let value = selected.values.get(&field.key).map(String::as_str).unwrap_or("");
            println!("  {:<14} {}", field.key, value.replace('\n', "⏎"));
        }
    }
    Ok(())
}
