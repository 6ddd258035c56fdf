use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_components::{Category, Registry};

#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Filter by name, id or description
    #[arg(default_value = "")]
    pub query: String,

    /// Only this category (heading, card, quote, divider, separator, list, image)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Print the matching definitions as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn components(args: ComponentsArgs) -> Result<()> {
    let category = match args.category.as_deref() {
        Some(raw) => Some(Category::parse(raw).ok_or_else(|| anyhow!("Unknown category: {}", raw))?),
        None => None,
    };

    let registry = Registry::builtin();
    let found = registry.search(&args.query, category);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("{}", "⚠️  No components match".yellow());
        return Ok(());
    }

    for def in &found {
        let editable = if def.is_editable() {
            "editable".green()
        } else {
            "static".dimmed()
        };
        println!(
            "  {:<18} {:<12} {:<9} {}",
            def.id.bright_white().bold(),
            def.category.as_str(),
            editable,
            def.name
        );
        if let Some(description) = &def.description {
            println!("  {:<18} {}", "", description.dimmed());
        }
    }
    println!();
    println!("{} components", found.len());
    Ok(())
}
