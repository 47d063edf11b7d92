mod common;

use common::{read_file, run_zam_command, temp_paths, write_file};
use tempfile::TempDir;

#[test]
fn test_add_and_ls() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let result = run_zam_command(&["add", "gs", "git status", "--tag", "git"], &temp_dir, None);
    assert!(result.success, "add failed: {}", result.stderr);
    assert!(result.stdout.contains("Added 'gs'"));

    run_zam_command(&["add", "ll", "ls -la"], &temp_dir, None);

    let result = run_zam_command(&["ls"], &temp_dir, None);
    assert!(result.success, "ls failed: {}", result.stderr);
    assert!(result.stdout.contains("gs -> git status"));
    assert!(result.stdout.contains("ll -> ls -la"));
    assert!(result.stdout.contains("count: 2"));

    let result = run_zam_command(&["ls", "--tag", "git"], &temp_dir, None);
    assert!(result.stdout.contains("count: 1"));
}

#[test]
fn test_missing_alias_exits_with_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let result = run_zam_command(&["rm", "nope"], &temp_dir, None);
    assert!(!result.success);
    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains("Error:"));
    assert!(result.stderr.contains("alias 'nope' not found"));
}

#[test]
fn test_rename_conflict_exits_with_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    run_zam_command(&["add", "a", "echo a"], &temp_dir, None);
    run_zam_command(&["add", "b", "echo b"], &temp_dir, None);

    let result = run_zam_command(&["mv", "a", "b"], &temp_dir, None);
    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains("already exists"));
}

#[test]
fn test_dry_run_previews_without_writing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let paths = temp_paths(&temp_dir);

    let result = run_zam_command(&["--dry-run", "add", "gs", "git status"], &temp_dir, None);
    assert!(result.success, "dry run failed: {}", result.stderr);
    assert!(result.stdout.contains("[dry-run] would write"));
    assert!(result.stdout.contains("alias gs='git status'"));
    assert!(!paths.aliases.exists());
    assert!(!paths.metadata.exists());
}

#[test]
fn test_tag_subcommand() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    run_zam_command(&["add", "gs", "git status"], &temp_dir, None);

    let result = run_zam_command(&["tag", "gs", "--add", "git", "vcs"], &temp_dir, None);
    assert!(result.success, "tag failed: {}", result.stderr);
    assert!(result.stdout.contains("gs: git, vcs"));

    let result = run_zam_command(&["tags"], &temp_dir, None);
    assert!(result.stdout.contains("git (1)"));
    assert!(result.stdout.contains("vcs (1)"));

    let result = run_zam_command(&["tag", "gs", "--clear"], &temp_dir, None);
    assert!(result.stdout.contains("gs: (none)"));
}

#[test]
fn test_import_and_init() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let paths = temp_paths(&temp_dir);
    write_file(&paths.startup, "alias ll='ls -la'\n");

    let result = run_zam_command(&["import"], &temp_dir, None);
    assert!(result.success, "import failed: {}", result.stderr);
    assert!(result.stdout.contains("Imported 1 aliases"));

    let result = run_zam_command(&["import"], &temp_dir, None);
    assert!(result.stdout.contains("No aliases to import"));

    let result = run_zam_command(&["init"], &temp_dir, None);
    assert!(result.success, "init failed: {}", result.stderr);
    assert!(read_file(&paths.startup).contains("source \""));
}

#[test]
fn test_config_file_moves_alias_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("zam.yml");
    write_file(&config_file, "paths:\n  aliases: ~/dotfiles/aliases.zsh\n");

    let result = run_zam_command(&["add", "gs", "git status"], &temp_dir, Some(&config_file));
    assert!(result.success, "add failed: {}", result.stderr);
    assert!(read_file(&temp_dir.path().join("dotfiles").join("aliases.zsh")).contains("alias gs='git status'"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.yml");

    let result = run_zam_command(&["ls"], &temp_dir, Some(&missing));
    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains("not found"));
}

#[test]
fn test_no_command_prints_help() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let result = run_zam_command(&[], &temp_dir, None);
    assert!(!result.success);
    assert!(result.stderr.contains("Usage"));
}

#[test]
fn test_menu_exits_cleanly_on_closed_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // stdin is not a terminal here; the prompt sees end of input
    let result = run_zam_command(&["menu"], &temp_dir, None);
    assert!(result.success, "menu failed: {}", result.stderr);
}
