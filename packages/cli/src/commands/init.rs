use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::ExportMode;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Theme id to export with by default
    #[arg(short, long, default_value = "clean")]
    pub theme: String,

    /// Default export mode (inline, ultra, computed)
    #[arg(short, long, default_value = "inline")]
    pub mode: ExportMode,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Folio workspace...".bright_blue().bold());

    let config = Config {
        theme: args.theme,
        export_mode: args.mode,
        saved_defaults_path: Some(".folio/defaults.json".to_string()),
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let example = cwd.join("article.md");
    if !example.exists() {
        fs::write(
            &example,
            "# My article\n\nWrite the opening paragraph here.\n\n<h2 class=\"titlebar\">First section</h2>\n\nTip: components stay editable in Markdown.\n",
        )?;
        println!("  {} Created article.md", "✓".green());
    }

    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit article.md");
    println!("  2. Run: folio export article.md -o article.html");

    Ok(())
}
