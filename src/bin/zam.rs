use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use eyre::{eyre, Result, WrapErr};
use log::debug;
use std::path::PathBuf;
use std::process::exit;

use zam_lib::display::{format_alias_listing, format_report, format_tag_counts, format_tag_list};
use zam_lib::editor::ProcessEditor;
use zam_lib::interactive::{LinePrompter, Session};
use zam_lib::ops::{self, AddOutcome, EditOutcome, EditSource, ImportOutcome, InitOutcome, ListFilter, Report, TagChange};
use zam_lib::{load_config, setup_logging, AliasRepository, DiskFs, RunOptions, ZamConfig};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/git_describe.rs"));
}

#[derive(Parser)]
#[command(name = "zam", about = "Zsh Alias Manager: keep your aliases in one managed file")]
#[command(version = built_info::GIT_DESCRIBE)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Logs are written to: ~/.local/share/zam/logs/zam.log")]
struct ZamOpts {
    #[clap(long, global = true, help = "show what would change without writing anything")]
    dry_run: bool,

    #[clap(short, long, global = true, help = "path to a zam.yml config file")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[clap(name = "add", about = "add or overwrite an alias")]
    Add(AddOpts),

    #[clap(name = "rm", about = "remove an alias")]
    Remove(NameOpts),

    #[clap(name = "mv", about = "rename an alias")]
    Rename(RenameOpts),

    #[clap(name = "edit", about = "change the command of an alias")]
    Edit(EditOpts),

    #[clap(name = "ls", about = "list managed aliases")]
    List(ListOpts),

    #[clap(name = "tag", about = "show or change the tags of an alias")]
    Tag(TagOpts),

    #[clap(name = "tags", about = "list tags in use")]
    Tags,

    #[clap(name = "import", about = "import aliases from a startup file")]
    Import(ImportOpts),

    #[clap(name = "backup", about = "back up the alias and metadata files")]
    Backup,

    #[clap(name = "backups", about = "list backups, newest first")]
    Backups,

    #[clap(name = "restore", about = "restore the alias file from a backup")]
    Restore(NameOpts),

    #[clap(name = "init", about = "source the alias file from the startup file")]
    Init,

    #[clap(name = "menu", about = "interactive menu")]
    Menu,
}

#[derive(Parser)]
struct AddOpts {
    name: String,

    command: String,

    #[clap(short, long = "tag", value_name = "TAG", help = "tag to attach (repeatable)")]
    tags: Vec<String>,
}

#[derive(Parser)]
struct NameOpts {
    name: String,
}

#[derive(Parser)]
struct RenameOpts {
    old: String,

    new: String,
}

#[derive(Parser)]
struct EditOpts {
    name: String,

    #[clap(long, help = "new command; opens the editor when omitted")]
    command: Option<String>,
}

#[derive(Parser)]
struct ListOpts {
    #[clap(short, long, help = "only aliases carrying this tag")]
    tag: Option<String>,

    #[clap(help = "name prefixes to match")]
    patterns: Vec<String>,
}

#[derive(Parser)]
#[command(group(ArgGroup::new("change").args(["set", "add", "remove", "clear"]).multiple(false)))]
struct TagOpts {
    name: String,

    #[clap(long, num_args = 1.., value_name = "TAG", help = "replace all tags")]
    set: Vec<String>,

    #[clap(long, num_args = 1.., value_name = "TAG", help = "add tags")]
    add: Vec<String>,

    #[clap(long, num_args = 1.., value_name = "TAG", help = "remove tags")]
    remove: Vec<String>,

    #[clap(long, help = "remove every tag")]
    clear: bool,
}

impl TagOpts {
    fn change(&self) -> TagChange {
        if self.clear {
            TagChange::Clear
        } else if !self.set.is_empty() {
            TagChange::Replace(self.set.clone())
        } else if !self.add.is_empty() {
            TagChange::Add(self.add.clone())
        } else if !self.remove.is_empty() {
            TagChange::Remove(self.remove.clone())
        } else {
            TagChange::Show
        }
    }
}

#[derive(Parser)]
struct ImportOpts {
    #[clap(help = "startup file to import from (defaults to the configured one)")]
    file: Option<PathBuf>,
}

fn print_report<T>(report: &Report<T>, opts: RunOptions) {
    let text = format_report(report, opts);
    if !text.is_empty() {
        println!("{}", text);
    }
}

fn run(opts: &ZamOpts, config: &ZamConfig, repo: &mut AliasRepository<DiskFs>) -> Result<()> {
    let run_opts = RunOptions { dry_run: opts.dry_run };

    match &opts.command {
        Some(Command::Add(add)) => {
            let report = ops::add(repo, run_opts, &add.name, &add.command, &add.tags)?;
            print_report(&report, run_opts);
            match report.outcome {
                AddOutcome::Created => println!("Added '{}'", add.name),
                AddOutcome::Replaced { .. } => println!("Updated '{}'", add.name),
            }
        }
        Some(Command::Remove(remove)) => {
            let report = ops::remove(repo, run_opts, &remove.name)?;
            print_report(&report, run_opts);
            println!("Removed '{}' (was: {})", remove.name, report.outcome);
        }
        Some(Command::Rename(rename)) => {
            let report = ops::rename(repo, run_opts, &rename.old, &rename.new)?;
            print_report(&report, run_opts);
            println!("Renamed '{}' to '{}'", rename.old, rename.new);
        }
        Some(Command::Edit(edit)) => {
            let editor = ProcessEditor::new(&config.editor_command());
            let source = match &edit.command {
                Some(command) => EditSource::Command(command.clone()),
                None => EditSource::Editor(&editor),
            };
            let report = ops::edit(repo, run_opts, &edit.name, source)?;
            print_report(&report, run_opts);
            match report.outcome {
                EditOutcome::Updated { command, .. } => println!("Updated '{}' -> {}", edit.name, command),
                EditOutcome::Unchanged => println!("'{}' unchanged", edit.name),
            }
        }
        Some(Command::List(list)) => {
            let filter = ListFilter {
                patterns: list.patterns.clone(),
                tag: list.tag.clone(),
            };
            let entries = ops::list(repo, &filter)?;
            println!("{}", format_alias_listing(&entries));
        }
        Some(Command::Tag(tag)) => {
            let change = tag.change();
            let report = ops::set_tag_state(repo, run_opts, &tag.name, change)?;
            print_report(&report, run_opts);
            println!("{}: {}", tag.name, format_tag_list(&report.outcome));
        }
        Some(Command::Tags) => {
            println!("{}", format_tag_counts(&ops::tags(repo)?));
        }
        Some(Command::Import(import)) => {
            let report = ops::import(repo, run_opts, import.file.as_deref())?;
            print_report(&report, run_opts);
            match report.outcome.outcome() {
                ImportOutcome::Imported(count) => println!("Imported {} aliases", count),
                ImportOutcome::NothingToImport => println!("No aliases to import"),
            }
        }
        Some(Command::Backup) => {
            let report = ops::backup(repo, run_opts)?;
            print_report(&report, run_opts);
            for path in &report.outcome {
                println!("Backed up to {}", path.display());
            }
        }
        Some(Command::Backups) => {
            let backups = ops::list_backups(repo)?;
            if backups.is_empty() {
                println!("No backups found.");
            }
            for path in backups {
                if let Some(name) = path.file_name() {
                    println!("{}", name.to_string_lossy());
                }
            }
        }
        Some(Command::Restore(restore)) => {
            let report = ops::restore(repo, run_opts, &restore.name)?;
            print_report(&report, run_opts);
            for path in &report.outcome {
                println!("Restored {}", path.display());
            }
        }
        Some(Command::Init) => {
            let report = ops::init(repo, run_opts)?;
            print_report(&report, run_opts);
            if report.outcome == InitOutcome::Appended {
                println!("Added zam to {}", repo.paths().startup.display());
            }
        }
        Some(Command::Menu) => {
            let prompter = LinePrompter::new().wrap_err("failed to open the terminal")?;
            let editor = ProcessEditor::new(&config.editor_command());
            let mut session = Session::new(repo, run_opts, prompter, std::io::stdout()).with_editor(&editor);
            session.run();
        }
        None => {}
    }
    Ok(())
}

fn handle_command(opts: &ZamOpts) -> Result<()> {
    let home_dir = dirs::home_dir().ok_or_else(|| eyre!("Failed to determine home directory"))?;

    if let Err(e) = setup_logging(&home_dir) {
        eprintln!("{} Failed to set up logging: {}", "Warning:".yellow(), e);
    }

    let config = load_config(&home_dir, opts.config.as_deref())?;
    let paths = config.resolve(&home_dir);
    debug!("Resolved paths: {:?}", paths);

    let mut repo = AliasRepository::new(DiskFs, paths);
    run(opts, &config, &mut repo)
}

fn main() {
    let opts = ZamOpts::parse();

    let code = match handle_command(&opts) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            1
        }
    };

    exit(code);
}
