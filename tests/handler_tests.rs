mod common;

use common::{backups_in, disk_repo, read_file, write_file};
use eyre::Result;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use zam_lib::ops::{self, AddOutcome, EditOutcome, EditSource, ListFilter, TagChange};
use zam_lib::{ErrorKind, MetadataStore, RunOptions, ZamError};

const RUN: RunOptions = RunOptions { dry_run: false };

#[test]
fn test_add_creates_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);

    let report = ops::add(&mut repo, RUN, "gs", "git status", &["git".to_string()])?;
    assert_eq!(report.outcome, AddOutcome::Created);
    assert!(report.applied);
    assert!(report.notices.is_empty());

    let paths = repo.paths().clone();
    assert_eq!(
        read_file(&paths.aliases),
        "# Managed by Zsh Alias Manager (zam)\nalias gs='git status'\n"
    );
    let metadata = MetadataStore::from_json(&read_file(&paths.metadata))?;
    assert_eq!(metadata.tags_of("gs"), vec!["git".to_string()]);
    assert!(metadata.get("gs").and_then(|r| r.created.as_ref()).is_some());
    Ok(())
}

#[test]
fn test_add_overwrite_is_a_notice() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);

    ops::add(&mut repo, RUN, "gs", "git status", &[])?;
    let report = ops::add(&mut repo, RUN, "gs", "git status -sb", &[])?;

    assert_eq!(
        report.outcome,
        AddOutcome::Replaced {
            previous: "git status".to_string()
        }
    );
    assert_eq!(report.notices.len(), 1);
    assert!(report.notices[0].contains("git status"));
    assert_eq!(repo.load()?["gs"], "git status -sb");
    Ok(())
}

#[test]
fn test_add_rejects_bad_names() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);

    let error = ops::add(&mut repo, RUN, "a=b", "ls", &[]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidInput);
    assert!(!repo.paths().aliases.exists());
    Ok(())
}

#[test]
fn test_remove_deletes_alias_and_metadata() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "gs", "git status", &["git".to_string()])?;
    ops::add(&mut repo, RUN, "ll", "ls -la", &[])?;

    let report = ops::remove(&mut repo, RUN, "gs")?;
    assert_eq!(report.outcome, "git status");

    assert!(!repo.load()?.contains_key("gs"));
    assert!(repo.read_metadata()?.get("gs").is_none());
    assert!(repo.read_metadata()?.get("ll").is_some());
    Ok(())
}

#[test]
fn test_remove_missing_suggests_names() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "gst", "git status", &[])?;

    let error = ops::remove(&mut repo, RUN, "gs").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    match &error {
        ZamError::NotFound { suggestions, .. } => assert_eq!(suggestions, &vec!["gst".to_string()]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(error.to_string().contains("Did you mean"));
    Ok(())
}

#[test]
fn test_rename_carries_metadata() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "gs", "git status", &["git".to_string()])?;

    ops::rename(&mut repo, RUN, "gs", "gst")?;

    let aliases = repo.load()?;
    assert_eq!(aliases.get("gst").map(String::as_str), Some("git status"));
    assert!(!aliases.contains_key("gs"));
    let metadata = repo.read_metadata()?;
    assert_eq!(metadata.tags_of("gst"), vec!["git".to_string()]);
    assert!(metadata.get("gs").is_none());
    Ok(())
}

#[test]
fn test_rename_onto_existing_name_conflicts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "a", "echo a", &[])?;
    ops::add(&mut repo, RUN, "b", "echo b", &[])?;
    let before = read_file(&repo.paths().aliases);

    let error = ops::rename(&mut repo, RUN, "a", "b").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(read_file(&repo.paths().aliases), before);
    assert_eq!(repo.load()?["a"], "echo a");
    assert_eq!(repo.load()?["b"], "echo b");
    Ok(())
}

#[test]
fn test_rename_missing_is_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);

    let error = ops::rename(&mut repo, RUN, "nope", "other").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    Ok(())
}

#[test]
fn test_edit_with_command() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "ll", "ls -l", &[])?;

    let report = ops::edit(&mut repo, RUN, "ll", EditSource::Command("ls -la".to_string()))?;
    assert_eq!(
        report.outcome,
        EditOutcome::Updated {
            previous: "ls -l".to_string(),
            command: "ls -la".to_string()
        }
    );
    assert_eq!(repo.load()?["ll"], "ls -la");

    let report = ops::edit(&mut repo, RUN, "ll", EditSource::Command("ls -la".to_string()))?;
    assert_eq!(report.outcome, EditOutcome::Unchanged);
    assert!(report.effects.is_empty());
    Ok(())
}

#[test]
fn test_legacy_tag_migrates_on_tag_add() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    let paths = repo.paths().clone();
    write_file(&paths.aliases, "alias gs='git status'\n");
    write_file(&paths.metadata, r#"{"gs": {"tag": "git", "created": "2024-01-01T00:00:00.000Z"}}"#);

    let report = ops::set_tag_state(&mut repo, RUN, "gs", TagChange::Add(vec!["vcs".to_string()]))?;
    assert_eq!(report.outcome, vec!["git".to_string(), "vcs".to_string()]);

    let stored: serde_json::Value = serde_json::from_str(&read_file(&paths.metadata))?;
    assert_eq!(stored["gs"]["tags"], serde_json::json!(["git", "vcs"]));
    assert!(stored["gs"].get("tag").is_none());
    assert_eq!(stored["gs"]["created"], "2024-01-01T00:00:00.000Z");
    Ok(())
}

#[test]
fn test_tag_modes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "gs", "git status", &["Git".to_string()])?;

    let added = ops::set_tag_state(&mut repo, RUN, "gs", TagChange::Add(vec!["git".to_string(), "work".to_string()]))?;
    assert_eq!(added.outcome, vec!["Git".to_string(), "work".to_string()]);

    let removed = ops::set_tag_state(&mut repo, RUN, "gs", TagChange::Remove(vec!["GIT".to_string()]))?;
    assert_eq!(removed.outcome, vec!["work".to_string()]);

    let replaced = ops::set_tag_state(&mut repo, RUN, "gs", TagChange::Replace(vec!["a".to_string(), "A".to_string()]))?;
    assert_eq!(replaced.outcome, vec!["a".to_string()]);

    let cleared = ops::set_tag_state(&mut repo, RUN, "gs", TagChange::Clear)?;
    assert!(cleared.outcome.is_empty());
    assert!(ops::set_tag_state(&mut repo, RUN, "gs", TagChange::Show)?.outcome.is_empty());
    Ok(())
}

#[test]
fn test_list_filters_by_tag_and_prefix() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "gs", "git status", &["git".to_string()])?;
    ops::add(&mut repo, RUN, "gd", "git diff", &[])?;
    ops::add(&mut repo, RUN, "ll", "ls -la", &[])?;

    let by_tag = ops::list(
        &repo,
        &ListFilter {
            patterns: Vec::new(),
            tag: Some("GIT".to_string()),
        },
    )?;
    assert_eq!(by_tag.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["gs"]);

    let by_prefix = ops::list(
        &repo,
        &ListFilter {
            patterns: vec!["g".to_string()],
            tag: None,
        },
    )?;
    assert_eq!(by_prefix.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["gd", "gs"]);
    Ok(())
}

#[test]
fn test_external_edit_is_overwritten_by_next_save() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    let aliases_path = repo.paths().aliases.clone();
    ops::add(&mut repo, RUN, "a", "echo a", &[])?;

    // Another writer replaces the file between two handler calls
    write_file(&aliases_path, "alias x='echo x'\n");

    ops::add(&mut repo, RUN, "b", "echo b", &[])?;
    let aliases = repo.load()?;
    assert_eq!(aliases.keys().collect::<Vec<_>>(), vec!["b", "x"]);
    assert!(!read_file(&aliases_path).contains("echo a"));
    Ok(())
}

#[test]
fn test_malformed_metadata_is_backed_up_and_replaced() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    let paths = repo.paths().clone();
    write_file(&paths.metadata, "{ not json");

    let report = ops::add(&mut repo, RUN, "gs", "git status", &[])?;
    assert!(report.notices.iter().any(|n| n.contains("metadata")));

    let backups = backups_in(&paths.backups);
    assert_eq!(backups.len(), 1);
    assert_eq!(read_file(&backups[0]), "{ not json");
    assert!(MetadataStore::from_json(&read_file(&paths.metadata))?.get("gs").is_some());
    Ok(())
}

#[test]
fn test_tags_summary() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut repo = disk_repo(&temp_dir);
    ops::add(&mut repo, RUN, "gs", "git status", &["git".to_string()])?;
    ops::add(&mut repo, RUN, "gd", "git diff", &["git".to_string(), "diff".to_string()])?;

    assert_eq!(ops::tags(&repo)?, vec![("diff".to_string(), 1), ("git".to_string(), 2)]);
    Ok(())
}
