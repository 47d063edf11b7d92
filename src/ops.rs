//! Operation handlers.
//!
//! Each handler loads the current state, validates before touching anything,
//! plans its effects and applies them through [`AliasRepository::apply`].
//! Failures come back as a labeled [`ZamError`]; notices are non-fatal.

use itertools::Itertools;
use log::{debug, info};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::editor::Editor;
use crate::error::{similar_names, ErrorKind, ZamError};
use crate::fs::FileSystem;
use crate::meta::dedup_tags;
use crate::repo::{AliasRepository, Effect, RunOptions, Snapshot};
use crate::shell;

/// Prefix marking a startup-file line whose alias now lives in the managed file
pub const IMPORT_MARKER: &str = "# [zam] imported: ";

/// What a handler did (or, in a dry run, would do)
#[derive(Debug, Clone)]
pub struct Report<T> {
    pub outcome: T,
    pub notices: Vec<String>,
    pub effects: Vec<Effect>,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Replaced { previous: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated { previous: String, command: String },
    Unchanged,
}

/// Where an edited command comes from
pub enum EditSource<'a> {
    Command(String),
    Editor(&'a dyn Editor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagChange {
    Show,
    Replace(Vec<String>),
    Add(Vec<String>),
    Remove(Vec<String>),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(usize),
    NothingToImport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: Vec<String>,
    pub skipped: Vec<String>,
}

impl ImportSummary {
    pub fn outcome(&self) -> ImportOutcome {
        match self.imported.len() {
            0 => ImportOutcome::NothingToImport,
            n => ImportOutcome::Imported(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Appended,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub name: String,
    pub command: String,
    pub tags: Vec<String>,
    pub created: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Name prefixes; empty matches everything
    pub patterns: Vec<String>,
    pub tag: Option<String>,
}

pub fn validate_name(name: &str) -> Result<(), ZamError> {
    if name.is_empty() {
        return Err(ZamError::invalid("alias name", name, "name cannot be empty"));
    }
    if name.starts_with('#') || name.starts_with('-') {
        return Err(ZamError::invalid("alias name", name, "name cannot start with '#' or '-'"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| *c == '=' || *c == '\'' || *c == '"' || *c == '\\' || c.is_whitespace() || c.is_control())
    {
        return Err(ZamError::invalid("alias name", name, &format!("name cannot contain {:?}", c)));
    }
    Ok(())
}

pub fn validate_command(command: &str) -> Result<(), ZamError> {
    if command.trim().is_empty() {
        return Err(ZamError::invalid("command", command, "command cannot be empty"));
    }
    if command.contains('\n') {
        return Err(ZamError::invalid("command", command, "alias commands must fit on one line"));
    }
    Ok(())
}

fn not_found(name: &str, snapshot: &Snapshot) -> ZamError {
    ZamError::alias_not_found(name).with_suggestions(similar_names(name, snapshot.aliases.keys()))
}

fn backup_stamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// `base`, or `base-N` for the first N where no backup of any of `files` exists yet
fn free_stamp<F: FileSystem>(repo: &AliasRepository<F>, files: &[&Path], base: &str) -> String {
    let taken = |stamp: &str| {
        files
            .iter()
            .any(|file| repo.exists(&backup_path(&repo.paths().backups, file, stamp)))
    };
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|stamp| !taken(stamp))
        .unwrap_or_else(|| base.to_string())
}

/// Stamp of `file_name` when it is a backup of `file`
fn stamp_of(file_name: &str, file: &Path) -> Option<String> {
    let stem = file.file_stem()?.to_string_lossy().into_owned();
    let rest = file_name.strip_prefix(&format!("{}-", stem))?;
    let stamp = match file.extension() {
        Some(ext) => rest.strip_suffix(&format!(".{}", ext.to_string_lossy()))?,
        None => rest,
    };
    if stamp.is_empty() {
        None
    } else {
        Some(stamp.to_string())
    }
}

/// `<dir>/<stem>-<stamp>[.<ext>]`
pub fn backup_path(dir: &Path, file: &Path, stamp: &str) -> PathBuf {
    let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match file.extension() {
        Some(ext) => format!("{}-{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}-{}", stem, stamp),
    };
    dir.join(name)
}

fn warning_notices(snapshot: &Snapshot) -> Vec<String> {
    snapshot.warnings.iter().map(ToString::to_string).collect()
}

/// Effects committing `snapshot`, preserving an unreadable metadata file before it is replaced.
/// Records for names no longer in the alias set are dropped.
fn commit_effects<F: FileSystem>(repo: &AliasRepository<F>, snapshot: &mut Snapshot, force_metadata: bool) -> Vec<Effect> {
    let aliases = &snapshot.aliases;
    snapshot.metadata.retain(|name| aliases.contains_key(name));

    let mut effects = Vec::new();
    let writes_metadata = force_metadata || snapshot.metadata_changed();
    let malformed = snapshot.warnings.iter().any(|w| w.kind() == ErrorKind::MalformedMetadata);
    if writes_metadata && malformed {
        let paths = repo.paths();
        let stamp = free_stamp(repo, &[paths.metadata.as_path()], &backup_stamp());
        effects.push(Effect::Copy {
            from: paths.metadata.clone(),
            to: backup_path(&paths.backups, &paths.metadata, &stamp),
        });
    }
    effects.push(repo.plan_save(&snapshot.aliases));
    if writes_metadata {
        effects.push(repo.plan_metadata(&snapshot.metadata));
    }
    effects
}

fn finish<F: FileSystem, T>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    outcome: T,
    notices: Vec<String>,
    effects: Vec<Effect>,
) -> Result<Report<T>, ZamError> {
    let applied = repo.apply(&effects, opts)?;
    Ok(Report {
        outcome,
        notices,
        effects,
        applied,
    })
}

/// Add or overwrite an alias. Overwriting is allowed and reported as a notice.
pub fn add<F: FileSystem>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    name: &str,
    command: &str,
    tags: &[String],
) -> Result<Report<AddOutcome>, ZamError> {
    validate_name(name)?;
    validate_command(command)?;

    let mut snapshot = repo.snapshot()?;
    let mut notices = warning_notices(&snapshot);

    let outcome = match snapshot.aliases.insert(name.to_string(), command.to_string()) {
        Some(previous) => {
            notices.push(format!("alias '{}' already existed and was overwritten (was: {})", name, previous));
            AddOutcome::Replaced { previous }
        }
        None => AddOutcome::Created,
    };
    snapshot.metadata.mark_created(name);
    if !tags.is_empty() {
        snapshot.metadata.entry(name).merge_add(tags);
    }

    info!("add {} -> {}", name, command);
    let effects = commit_effects(repo, &mut snapshot, false);
    finish(repo, opts, outcome, notices, effects)
}

/// Remove an alias and its metadata
pub fn remove<F: FileSystem>(repo: &mut AliasRepository<F>, opts: RunOptions, name: &str) -> Result<Report<String>, ZamError> {
    let mut snapshot = repo.snapshot()?;
    let notices = warning_notices(&snapshot);

    let command = match snapshot.aliases.remove(name) {
        Some(command) => command,
        None => return Err(not_found(name, &snapshot)),
    };
    snapshot.metadata.remove(name);

    info!("remove {} (was {})", name, command);
    let effects = commit_effects(repo, &mut snapshot, false);
    finish(repo, opts, command, notices, effects)
}

/// Move an alias and its metadata to a new name. Never overwrites.
pub fn rename<F: FileSystem>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    old: &str,
    new: &str,
) -> Result<Report<()>, ZamError> {
    validate_name(new)?;
    let mut snapshot = repo.snapshot()?;
    let notices = warning_notices(&snapshot);

    if !snapshot.aliases.contains_key(old) {
        return Err(not_found(old, &snapshot));
    }
    if let Some(existing) = snapshot.aliases.get(new) {
        return Err(ZamError::Conflict {
            name: new.to_string(),
            existing_command: existing.clone(),
        });
    }

    if let Some(command) = snapshot.aliases.remove(old) {
        snapshot.aliases.insert(new.to_string(), command);
    }
    snapshot.metadata.rename(old, new);

    info!("rename {} -> {}", old, new);
    let effects = commit_effects(repo, &mut snapshot, false);
    finish(repo, opts, (), notices, effects)
}

/// Replace the command of an existing alias
pub fn edit<F: FileSystem>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    name: &str,
    source: EditSource<'_>,
) -> Result<Report<EditOutcome>, ZamError> {
    let mut snapshot = repo.snapshot()?;
    let notices = warning_notices(&snapshot);

    let previous = match snapshot.aliases.get(name) {
        Some(command) => command.clone(),
        None => return Err(not_found(name, &snapshot)),
    };

    let revised = match source {
        EditSource::Command(command) => Some(command),
        EditSource::Editor(editor) => editor.edit(&previous)?,
    };
    let command = match revised {
        Some(command) if command != previous => command,
        _ => {
            debug!("edit {}: no change", name);
            return Ok(Report {
                outcome: EditOutcome::Unchanged,
                notices,
                effects: Vec::new(),
                applied: false,
            });
        }
    };
    validate_command(&command)?;

    snapshot.aliases.insert(name.to_string(), command.clone());
    info!("edit {}: {} -> {}", name, previous, command);
    let effects = commit_effects(repo, &mut snapshot, false);
    finish(repo, opts, EditOutcome::Updated { previous, command }, notices, effects)
}

/// Show or change the tags of an alias; returns the resulting tags
pub fn set_tag_state<F: FileSystem>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    name: &str,
    change: TagChange,
) -> Result<Report<Vec<String>>, ZamError> {
    let mut snapshot = repo.snapshot()?;
    let notices = warning_notices(&snapshot);

    if !snapshot.aliases.contains_key(name) {
        return Err(not_found(name, &snapshot));
    }

    if change == TagChange::Show {
        return Ok(Report {
            outcome: snapshot.metadata.tags_of(name),
            notices,
            effects: Vec::new(),
            applied: false,
        });
    }

    let record = snapshot.metadata.entry(name);
    match change {
        TagChange::Replace(tags) => record.set_tags(dedup_tags(&tags)),
        TagChange::Add(tags) => record.merge_add(&tags),
        TagChange::Remove(tags) => record.merge_remove(&tags),
        TagChange::Clear | TagChange::Show => record.clear(),
    }
    let tags = record.get_tags().to_vec();
    snapshot.metadata.prune(name);

    info!("tags {}: {:?}", name, tags);
    // A tag write always rewrites the metadata so legacy records migrate
    let mut effects = commit_effects(repo, &mut snapshot, true);
    effects.retain(|effect| effect.target() != repo.paths().aliases.as_path());
    finish(repo, opts, tags, notices, effects)
}

/// Any `alias name=...` statement
fn import_candidate() -> Regex {
    Regex::new(r"^\s*alias\s+([^=\s]+)=").expect("import pattern is valid")
}

/// `alias name=<one shell word>`, optionally followed by a comment. The word is a
/// single-quoted string (with `'\''` continuations), a double-quoted string or
/// an unquoted run without whitespace.
fn import_pattern() -> Regex {
    Regex::new(
        r#"^\s*alias\s+([^=\s]+)=('[^']*'(?:\\''[^']*')*|"(?:[^"\\]|\\.)*"|[^\s'"]+)(?:\s+#.*)?\s*$"#,
    )
    .expect("import pattern is valid")
}

/// Command text of one shell word as matched by [`import_pattern`]
fn import_value(word: &str) -> String {
    match word.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => {
            let mut value = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                match (c, chars.clone().next()) {
                    ('\\', Some(next @ ('"' | '\\' | '$' | '`'))) => {
                        value.push(next);
                        chars.next();
                    }
                    _ => value.push(c),
                }
            }
            value
        }
        None => codec::unquote_value(word),
    }
}

/// Move `alias name=value` lines from a startup file into the managed set.
///
/// Names already managed are skipped and their lines left untouched. Imported
/// lines are kept in the source, prefixed with [`IMPORT_MARKER`].
pub fn import<F: FileSystem>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    source: Option<&Path>,
) -> Result<Report<ImportSummary>, ZamError> {
    let source = source.map(Path::to_path_buf).unwrap_or_else(|| repo.paths().startup.clone());
    let text = match repo.read_file(&source)? {
        Some(text) => text,
        None => {
            return Err(ZamError::NotFound {
                what: "startup file".to_string(),
                name: source.display().to_string(),
                suggestions: Vec::new(),
            })
        }
    };

    let mut snapshot = repo.snapshot()?;
    let mut notices = warning_notices(&snapshot);
    let mut summary = ImportSummary::default();
    let candidate = import_candidate();
    let pattern = import_pattern();
    let mut rewritten = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(&['\n', '\r'][..]);
        let Some(found) = candidate.captures(content) else {
            rewritten.push_str(line);
            continue;
        };
        let captures = match pattern.captures(content) {
            Some(captures) => captures,
            None => {
                notices.push(format!("skipped '{}': not a single alias definition", &found[1]));
                summary.skipped.push(found[1].to_string());
                rewritten.push_str(line);
                continue;
            }
        };
        let name = &captures[1];
        let command = import_value(&captures[2]);

        if snapshot.aliases.contains_key(name) {
            notices.push(format!("skipped '{}': already managed", name));
            summary.skipped.push(name.to_string());
            rewritten.push_str(line);
            continue;
        }
        if let Err(e) = validate_name(name).and_then(|_| validate_command(&command)) {
            notices.push(format!("skipped '{}': {}", name, e));
            summary.skipped.push(name.to_string());
            rewritten.push_str(line);
            continue;
        }

        debug!("import {} -> {}", name, command);
        snapshot.aliases.insert(name.to_string(), command);
        snapshot.metadata.mark_created(name);
        summary.imported.push(name.to_string());
        rewritten.push_str(IMPORT_MARKER);
        rewritten.push_str(line);
    }

    if summary.imported.is_empty() {
        return Ok(Report {
            outcome: summary,
            notices,
            effects: Vec::new(),
            applied: false,
        });
    }

    let stamp = free_stamp(repo, &[source.as_path()], &backup_stamp());
    let mut effects = vec![Effect::Copy {
        from: source.clone(),
        to: backup_path(&repo.paths().backups, &source, &stamp),
    }];
    effects.extend(commit_effects(repo, &mut snapshot, false));
    effects.push(Effect::Write {
        path: source,
        contents: rewritten,
    });

    info!("import: {} imported, {} skipped", summary.imported.len(), summary.skipped.len());
    finish(repo, opts, summary, notices, effects)
}

/// Managed aliases with their tags, sorted by name
pub fn list<F: FileSystem>(repo: &AliasRepository<F>, filter: &ListFilter) -> Result<Vec<AliasEntry>, ZamError> {
    let snapshot = repo.snapshot()?;
    let entries = snapshot
        .aliases
        .iter()
        .filter(|(name, _)| filter.patterns.is_empty() || filter.patterns.iter().any(|p| name.starts_with(p.as_str())))
        .filter(|(name, _)| match &filter.tag {
            Some(tag) => snapshot.metadata.has_tag(name, tag),
            None => true,
        })
        .map(|(name, command)| {
            let record = snapshot.metadata.get(name);
            AliasEntry {
                name: name.clone(),
                command: command.clone(),
                tags: record.map(|r| r.tags.clone()).unwrap_or_default(),
                created: record.and_then(|r| r.created.clone()),
            }
        })
        .collect();
    Ok(entries)
}

/// Every tag in use with the number of aliases carrying it
pub fn tags<F: FileSystem>(repo: &AliasRepository<F>) -> Result<Vec<(String, usize)>, ZamError> {
    let snapshot = repo.snapshot()?;
    let mut counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for name in snapshot.aliases.keys() {
        for tag in snapshot.metadata.tags_of(name) {
            counts.entry(tag.to_lowercase()).or_insert_with(|| (tag.clone(), 0)).1 += 1;
        }
    }
    Ok(counts.into_values().collect())
}

/// Copy the alias and metadata files into the backup directory
pub fn backup<F: FileSystem>(repo: &mut AliasRepository<F>, opts: RunOptions) -> Result<Report<Vec<PathBuf>>, ZamError> {
    let paths = repo.paths().clone();
    let stamp = free_stamp(repo, &[paths.aliases.as_path(), paths.metadata.as_path()], &backup_stamp());
    let effects: Vec<Effect> = [&paths.aliases, &paths.metadata]
        .into_iter()
        .filter(|path| repo.exists(path))
        .map(|path| Effect::Copy {
            from: path.clone(),
            to: backup_path(&paths.backups, path, &stamp),
        })
        .collect();

    if effects.is_empty() {
        return Err(ZamError::NotFound {
            what: "alias file".to_string(),
            name: paths.aliases.display().to_string(),
            suggestions: Vec::new(),
        });
    }

    let created = effects.iter().map(|effect| effect.target().to_path_buf()).collect();
    finish(repo, opts, created, Vec::new(), effects)
}

/// Backup files, newest first
pub fn list_backups<F: FileSystem>(repo: &AliasRepository<F>) -> Result<Vec<PathBuf>, ZamError> {
    let backups = repo.list_dir(&repo.paths().backups)?;
    Ok(backups
        .into_iter()
        .sorted_by(|a, b| b.file_name().cmp(&a.file_name()))
        .collect())
}

/// Restore the alias or metadata file from one of its backups.
///
/// An alias backup also brings back the metadata backup with the same stamp,
/// if there is one. The current files are backed up first. Any other file in
/// the backup directory is rejected.
pub fn restore<F: FileSystem>(
    repo: &mut AliasRepository<F>,
    opts: RunOptions,
    backup: &str,
) -> Result<Report<Vec<PathBuf>>, ZamError> {
    let paths = repo.paths().clone();
    let file_name = Path::new(backup).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let source = paths.backups.join(&file_name);

    if file_name.is_empty() || !repo.exists(&source) {
        let available: Vec<String> = list_backups(repo)?
            .iter()
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        return Err(ZamError::NotFound {
            what: "backup".to_string(),
            name: backup.to_string(),
            suggestions: similar_names(backup, available.iter()),
        });
    }

    let pairs = if let Some(stamp) = stamp_of(&file_name, &paths.aliases) {
        let mut pairs = vec![(source, paths.aliases.clone())];
        let metadata_backup = backup_path(&paths.backups, &paths.metadata, &stamp);
        if repo.exists(&metadata_backup) {
            pairs.push((metadata_backup, paths.metadata.clone()));
        }
        pairs
    } else if stamp_of(&file_name, &paths.metadata).is_some() {
        vec![(source, paths.metadata.clone())]
    } else {
        return Err(ZamError::invalid(
            "backup",
            &file_name,
            "only alias file and metadata backups can be restored",
        ));
    };

    // Must not collide with the backup being restored
    let targets: Vec<&Path> = pairs.iter().map(|(_, target)| target.as_path()).collect();
    let now = free_stamp(repo, &targets, &format!("{}-pre-restore", backup_stamp()));
    let mut effects = Vec::new();
    for (_, target) in &pairs {
        if repo.exists(target) {
            effects.push(Effect::Copy {
                from: target.clone(),
                to: backup_path(&paths.backups, target, &now),
            });
        }
    }
    for (from, to) in &pairs {
        effects.push(Effect::Copy {
            from: from.clone(),
            to: to.clone(),
        });
    }

    let restored = pairs.into_iter().map(|(_, target)| target).collect();
    finish(repo, opts, restored, Vec::new(), effects)
}

/// Append the sourcing snippet to the startup file unless it is already there
pub fn init<F: FileSystem>(repo: &mut AliasRepository<F>, opts: RunOptions) -> Result<Report<InitOutcome>, ZamError> {
    let paths = repo.paths().clone();
    let startup = repo.read_file(&paths.startup)?.unwrap_or_default();

    if shell::is_sourced(&startup, &paths.aliases, &paths.home) {
        let notice = format!("{} already sources {}", paths.startup.display(), paths.aliases.display());
        return Ok(Report {
            outcome: InitOutcome::AlreadyPresent,
            notices: vec![notice],
            effects: Vec::new(),
            applied: false,
        });
    }

    let effects = vec![Effect::Append {
        path: paths.startup.clone(),
        contents: shell::init_snippet(&paths.aliases),
    }];
    finish(repo, opts, InitOutcome::Appended, Vec::new(), effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::Paths;
    use crate::error::ErrorKind;
    use crate::fs::MemoryFs;

    fn repo_with(aliases: &str) -> AliasRepository<MemoryFs> {
        let paths = Paths::under(Path::new("/home/u"));
        let fs = MemoryFs::new().with_file(&paths.aliases, aliases);
        AliasRepository::new(fs, paths)
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("gs").is_ok());
        assert!(validate_name("git.st-2_x").is_ok());
        for bad in ["", "a=b", "a b", "it's", "#x", "-g", "a\nb"] {
            assert_eq!(validate_name(bad).unwrap_err().kind(), ErrorKind::InvalidInput, "{:?}", bad);
        }
    }

    #[test]
    fn test_validate_command() {
        assert!(validate_command("echo 'hi'").is_ok());
        assert!(validate_command("  ").is_err());
        assert!(validate_command("a\nb").is_err());
    }

    #[test]
    fn test_backup_path() {
        let dir = Path::new("/b");
        assert_eq!(
            backup_path(dir, Path::new("/home/u/.zam/aliases.zsh"), "20240101-000000"),
            PathBuf::from("/b/aliases-20240101-000000.zsh")
        );
        assert_eq!(
            backup_path(dir, Path::new("/home/u/.zshrc"), "20240101-000000"),
            PathBuf::from("/b/.zshrc-20240101-000000")
        );
    }

    #[test]
    fn test_import_pattern() {
        let pattern = import_pattern();
        let captures = pattern.captures("  alias gs='git status'").unwrap();
        assert_eq!(&captures[1], "gs");
        assert_eq!(&captures[2], "'git status'");
        assert!(pattern.captures("alias -g G='| grep'").is_none());
        assert!(pattern.captures("export FOO=bar").is_none());
    }

    #[test]
    fn test_import_pattern_takes_one_word() {
        let pattern = import_pattern();
        let captures = pattern.captures("alias ll='ls -la'   # long listing").unwrap();
        assert_eq!(&captures[2], "'ls -la'");
        let captures = pattern.captures(r"alias say='it'\''s'").unwrap();
        assert_eq!(&captures[2], r"'it'\''s'");
        let captures = pattern.captures("alias k=kubectl").unwrap();
        assert_eq!(&captures[2], "kubectl");
        assert!(pattern.captures("alias a='x' b='y'").is_none());
        assert!(pattern.captures("alias ll='ls -la' && echo hi").is_none());
        assert!(pattern.captures("alias ll='ls -la").is_none());
    }

    #[test]
    fn test_import_value() {
        assert_eq!(import_value(r"'it'\''s'"), "it's");
        assert_eq!(import_value(r#""echo \"hi\" \$HOME""#), r#"echo "hi" $HOME"#);
        assert_eq!(import_value(r#""a\nb""#), r"a\nb");
        assert_eq!(import_value("kubectl"), "kubectl");
    }

    #[test]
    fn test_tag_show_is_read_only() {
        let mut repo = repo_with("alias gs='git status'\n");
        let report = set_tag_state(&mut repo, RunOptions::default(), "gs", TagChange::Show).unwrap();
        assert!(report.outcome.is_empty());
        assert!(report.effects.is_empty());
        assert_eq!(repo.fs().mutation_count(), 0);
    }

    #[test]
    fn test_tag_change_does_not_rewrite_alias_file() {
        let mut repo = repo_with("alias gs='git status'\n");
        let report =
            set_tag_state(&mut repo, RunOptions::default(), "gs", TagChange::Add(vec!["git".to_string()])).unwrap();
        assert_eq!(report.outcome, vec!["git".to_string()]);
        assert_eq!(report.effects.len(), 1);
        assert_eq!(report.effects[0].target(), repo.paths().metadata.as_path());
    }

    #[test]
    fn test_tags_counts_case_insensitively() {
        let paths = Paths::under(Path::new("/home/u"));
        let fs = MemoryFs::new()
            .with_file(&paths.aliases, "alias a='1'\nalias b='2'\nalias c='3'\n")
            .with_file(
                &paths.metadata,
                r#"{"a": {"tags": ["Git"]}, "b": {"tag": "git"}, "c": {"tags": ["work"]}, "gone": {"tags": ["x"]}}"#,
            );
        let repo = AliasRepository::new(fs, paths);
        assert_eq!(tags(&repo).unwrap(), vec![("Git".to_string(), 2), ("work".to_string(), 1)]);
    }
}
