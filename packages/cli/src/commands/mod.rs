pub mod components;
pub mod convert;
pub mod export;
pub mod init;
pub mod probe;
pub mod themes;

pub use components::{components, ComponentsArgs};
pub use convert::{convert, ConvertArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use probe::{probe, ProbeArgs};
pub use themes::{themes, ThemesArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use folio_common::RootedFileSystem;
use folio_editor::EditSession;
use folio_theme::UserTheme;
use std::path::Path;

/// Open `file` under `cwd` with the configured timing and saved defaults.
pub(crate) fn open_session(cwd: &Path, file: &Path, config: &Config) -> Result<EditSession> {
    let fs = RootedFileSystem::new(cwd);
    let session = EditSession::open(&fs, file, config.timing())
        .with_context(|| format!("opening {}", file.display()))?
        .with_saved_defaults(config.saved_defaults(cwd)?)
        .with_theme(config.theme_id());
    Ok(session)
}

/// Read a theme file: `.json` is a theme object, anything else is CSS named
/// after the file.
pub(crate) fn read_theme_file(path: &Path) -> Result<UserTheme> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let theme = if is_json {
        UserTheme::from_json(&text)?
    } else {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Imported theme");
        UserTheme::from_css(name, &text)?
    };
    Ok(theme)
}
