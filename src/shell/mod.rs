//! Shell integration for zam
//!
//! The snippet in `init.zsh` is embedded at compile time and appended to the
//! user's startup file by `zam init`, so the managed alias file is sourced in
//! every new shell.

use std::path::Path;

/// Startup snippet template, `{{ALIASES}}` is replaced by the alias file path
pub const ZSH_INIT_TEMPLATE: &str = include_str!("init.zsh");

/// Render the startup snippet for the given alias file
pub fn init_snippet(aliases: &Path) -> String {
    ZSH_INIT_TEMPLATE.replace("{{ALIASES}}", &aliases.display().to_string())
}

/// Ways a startup file may spell the alias file path
fn spellings(aliases: &Path, home: &Path) -> Vec<String> {
    let mut spellings = vec![aliases.display().to_string()];
    if let Ok(relative) = aliases.strip_prefix(home) {
        spellings.push(format!("~/{}", relative.display()));
        spellings.push(format!("$HOME/{}", relative.display()));
        spellings.push(format!("${{HOME}}/{}", relative.display()));
    }
    spellings
}

/// Whether an uncommented line of `startup` already sources the alias file
pub fn is_sourced(startup: &str, aliases: &Path, home: &Path) -> bool {
    let spellings = spellings(aliases, home);
    startup
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter(|line| line.contains("source ") || line.starts_with(". "))
        .any(|line| spellings.iter().any(|spelling| line.contains(spelling.as_str())))
}
