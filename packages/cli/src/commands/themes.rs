use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_theme::{resolve, ThemeCatalog, ThemeId, TokenName};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ThemesArgs {
    /// Show the resolved tokens of one theme
    #[arg(short, long)]
    pub show: Option<String>,

    /// Print the full stylesheet (base + theme) instead of the tokens
    #[arg(long)]
    pub css: bool,

    /// Import a theme file (JSON, or CSS for any other extension) and show it
    #[arg(long)]
    pub check: Option<PathBuf>,
}

pub fn themes(args: ThemesArgs) -> Result<()> {
    let mut catalog = ThemeCatalog::new();
    let mut shown = args.show.as_deref().map(ThemeId::parse);

    if let Some(path) = &args.check {
        let theme = super::read_theme_file(path)?;
        println!(
            "{} {} imported ({} variables{})",
            "✓".green(),
            theme.name.bright_white(),
            theme.vars.len(),
            if theme.extra_css.is_some() { ", extra CSS" } else { "" }
        );
        shown = Some(catalog.add(theme));
    }

    let Some(id) = shown else {
        for (id, label) in catalog.choices() {
            println!("  {:<16} {}", id.to_string().bright_white(), label);
        }
        return Ok(());
    };

    if args.css {
        println!("{}", folio_editor::export_css(&id, &catalog));
        return Ok(());
    }

    let tokens = resolve(&id, &catalog);
    println!("{}", id.to_string().bright_white().bold());
    for token in TokenName::ALL {
        println!("  {:<28} {}", token.css_var(), tokens.get(token));
    }
    if let Some(extra) = catalog.extra_css(&id) {
        println!();
        println!("{}", extra.dimmed());
    }
    Ok(())
}
