//! Menu-driven interactive mode.
//!
//! A small state machine: the main menu picks a [`MenuAction`], the action
//! prompts for its arguments and calls the same handlers as the CLI, then
//! control returns to the menu. Handler failures are printed and the loop
//! goes on; Ctrl-C, Ctrl-D or the exit action end the session.

use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use crate::display::{format_alias_listing, format_report, format_tag_list};
use crate::editor::Editor;
use crate::error::ZamError;
use crate::fs::FileSystem;
use crate::ops::{self, EditSource, ListFilter, TagChange};
use crate::repo::{AliasRepository, RunOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    List,
    Add,
    Edit,
    Rename,
    Remove,
    Tags,
    Import,
    Backup,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        MenuAction::List,
        MenuAction::Add,
        MenuAction::Edit,
        MenuAction::Rename,
        MenuAction::Remove,
        MenuAction::Tags,
        MenuAction::Import,
        MenuAction::Backup,
        MenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::List => "List aliases",
            MenuAction::Add => "Add alias",
            MenuAction::Edit => "Edit alias",
            MenuAction::Rename => "Rename alias",
            MenuAction::Remove => "Remove alias",
            MenuAction::Tags => "Manage tags",
            MenuAction::Import => "Import from startup file",
            MenuAction::Backup => "Back up alias files",
            MenuAction::Exit => "Exit",
        }
    }

    /// Shortcut key shown next to the label
    pub fn key(self) -> char {
        match self {
            MenuAction::List => 'l',
            MenuAction::Add => 'a',
            MenuAction::Edit => 'e',
            MenuAction::Rename => 'm',
            MenuAction::Remove => 'r',
            MenuAction::Tags => 't',
            MenuAction::Import => 'i',
            MenuAction::Backup => 'b',
            MenuAction::Exit => 'q',
        }
    }

    /// Resolve a menu choice given by number (1-based) or shortcut key
    pub fn from_choice(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(index) = input.parse::<usize>() {
            return index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::ALL.iter().copied().find(|action| action.key() == c.to_ascii_lowercase()),
            _ => None,
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Action(MenuAction),
    Exit,
}

/// What a screen asks the session to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Open(MenuAction),
    Back,
    Quit,
}

impl Screen {
    pub fn next(self, transition: Transition) -> Screen {
        match transition {
            Transition::Open(MenuAction::Exit) | Transition::Quit => Screen::Exit,
            Transition::Open(action) => Screen::Action(action),
            Transition::Back => Screen::Main,
        }
    }
}

/// Result of asking the user for a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Line(String),
    /// Ctrl-C, Ctrl-D or a closed input
    Closed,
}

pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Prompt;
}

/// Prompter reading from the terminal with line editing and history
pub struct LinePrompter {
    editor: DefaultEditor,
}

impl LinePrompter {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompter for LinePrompter {
    fn ask(&mut self, prompt: &str) -> Prompt {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Prompt::Line(line)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Prompt::Closed,
            Err(e) => {
                warn!("Reading input failed: {}", e);
                Prompt::Closed
            }
        }
    }
}

fn split_tags(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

pub struct Session<'a, F: FileSystem, P: Prompter, W: Write> {
    repo: &'a mut AliasRepository<F>,
    opts: RunOptions,
    prompter: P,
    out: W,
    editor: Option<&'a dyn Editor>,
}

impl<'a, F: FileSystem, P: Prompter, W: Write> Session<'a, F, P, W> {
    pub fn new(repo: &'a mut AliasRepository<F>, opts: RunOptions, prompter: P, out: W) -> Self {
        Self {
            repo,
            opts,
            prompter,
            out,
            editor: None,
        }
    }

    pub fn with_editor(mut self, editor: &'a dyn Editor) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn say(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn show<T>(&mut self, report: &ops::Report<T>) {
        let text = format_report(report, self.opts);
        if !text.is_empty() {
            self.say(text);
        }
    }

    /// `None` when the user closed the input
    fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.prompter.ask(prompt) {
            Prompt::Line(line) => Some(line.trim().to_string()),
            Prompt::Closed => None,
        }
    }

    /// Run until the user exits. Handler failures never end the session.
    pub fn run(&mut self) {
        let mut screen = Screen::Main;
        loop {
            debug!("interactive screen: {:?}", screen);
            let transition = match screen {
                Screen::Main => self.main_menu(),
                Screen::Action(action) => self.perform(action).unwrap_or_else(|e| {
                    self.say(format!("Error: {}", e));
                    Transition::Back
                }),
                Screen::Exit => {
                    self.say("Bye.");
                    return;
                }
            };
            screen = screen.next(transition);
        }
    }

    fn main_menu(&mut self) -> Transition {
        let mut menu = String::new();
        for (i, action) in MenuAction::ALL.iter().enumerate() {
            menu.push_str(&format!("  {}) [{}] {}\n", i + 1, action.key(), action.label()));
        }
        self.say(format!("\nZsh Alias Manager\n{}", menu.trim_end()));

        match self.ask("Choose an action: ") {
            None => Transition::Quit,
            Some(choice) => match MenuAction::from_choice(&choice) {
                Some(action) => Transition::Open(action),
                None => {
                    if !choice.is_empty() {
                        self.say(format!("Unknown choice: {}", choice));
                    }
                    Transition::Back
                }
            },
        }
    }

    fn perform(&mut self, action: MenuAction) -> Result<Transition, ZamError> {
        let opts = self.opts;
        match action {
            MenuAction::List => {
                let Some(tag) = self.ask("Filter by tag (empty for all): ") else {
                    return Ok(Transition::Quit);
                };
                let filter = ListFilter {
                    patterns: Vec::new(),
                    tag: Some(tag).filter(|t| !t.is_empty()),
                };
                let entries = ops::list(self.repo, &filter)?;
                self.say(format_alias_listing(&entries));
            }
            MenuAction::Add => {
                let Some(name) = self.ask("Alias name: ") else {
                    return Ok(Transition::Quit);
                };
                let Some(command) = self.ask("Command: ") else {
                    return Ok(Transition::Quit);
                };
                let Some(tags) = self.ask("Tags (comma separated, optional): ") else {
                    return Ok(Transition::Quit);
                };
                let report = ops::add(self.repo, opts, &name, &command, &split_tags(&tags))?;
                self.show(&report);
                self.say(format!("Saved '{}'.", name));
            }
            MenuAction::Edit => {
                let Some(name) = self.ask("Alias name: ") else {
                    return Ok(Transition::Quit);
                };
                let Some(command) = self.ask("New command (empty to open the editor): ") else {
                    return Ok(Transition::Quit);
                };
                let source = match (command.is_empty(), self.editor) {
                    (false, _) => EditSource::Command(command),
                    (true, Some(editor)) => EditSource::Editor(editor),
                    (true, None) => {
                        self.say("No editor configured, alias left unchanged.");
                        return Ok(Transition::Back);
                    }
                };
                let report = ops::edit(self.repo, opts, &name, source)?;
                self.show(&report);
                match report.outcome {
                    ops::EditOutcome::Updated { .. } => self.say(format!("Updated '{}'.", name)),
                    ops::EditOutcome::Unchanged => self.say(format!("'{}' unchanged.", name)),
                }
            }
            MenuAction::Rename => {
                let Some(old) = self.ask("Current name: ") else {
                    return Ok(Transition::Quit);
                };
                let Some(new) = self.ask("New name: ") else {
                    return Ok(Transition::Quit);
                };
                let report = ops::rename(self.repo, opts, &old, &new)?;
                self.show(&report);
                self.say(format!("Renamed '{}' to '{}'.", old, new));
            }
            MenuAction::Remove => {
                let Some(name) = self.ask("Alias name: ") else {
                    return Ok(Transition::Quit);
                };
                let Some(answer) = self.ask(&format!("Remove '{}'? [y/N] ", name)) else {
                    return Ok(Transition::Quit);
                };
                if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
                    self.say("Cancelled.");
                    return Ok(Transition::Back);
                }
                let report = ops::remove(self.repo, opts, &name)?;
                self.show(&report);
                self.say(format!("Removed '{}'.", name));
            }
            MenuAction::Tags => {
                let Some(name) = self.ask("Alias name: ") else {
                    return Ok(Transition::Quit);
                };
                let current = ops::set_tag_state(self.repo, opts, &name, TagChange::Show)?;
                self.say(format!("Current tags: {}", format_tag_list(&current.outcome)));

                let Some(mode) = self.ask("[s]et, [a]dd, [r]emove, [c]lear, or enter to keep: ") else {
                    return Ok(Transition::Quit);
                };
                let change = match mode.to_ascii_lowercase().as_str() {
                    "" => return Ok(Transition::Back),
                    "c" | "clear" => TagChange::Clear,
                    "s" | "set" | "a" | "add" | "r" | "remove" => {
                        let Some(input) = self.ask("Tags (comma separated): ") else {
                            return Ok(Transition::Quit);
                        };
                        let tags = split_tags(&input);
                        match mode.chars().next() {
                            Some('s') | Some('S') => TagChange::Replace(tags),
                            Some('a') | Some('A') => TagChange::Add(tags),
                            _ => TagChange::Remove(tags),
                        }
                    }
                    other => {
                        self.say(format!("Unknown tag mode: {}", other));
                        return Ok(Transition::Back);
                    }
                };
                let report = ops::set_tag_state(self.repo, opts, &name, change)?;
                self.show(&report);
                self.say(format!("Tags for '{}': {}", name, format_tag_list(&report.outcome)));
            }
            MenuAction::Import => {
                let Some(path) = self.ask("Startup file (empty for default): ") else {
                    return Ok(Transition::Quit);
                };
                let source = Some(path).filter(|p| !p.is_empty());
                let report = ops::import(self.repo, opts, source.as_deref().map(Path::new))?;
                self.show(&report);
                match report.outcome.outcome() {
                    ops::ImportOutcome::Imported(count) => self.say(format!("Imported {} aliases.", count)),
                    ops::ImportOutcome::NothingToImport => self.say("No aliases to import."),
                }
            }
            MenuAction::Backup => {
                let report = ops::backup(self.repo, opts)?;
                self.show(&report);
                for path in &report.outcome {
                    self.say(format!("Backed up to {}", path.display()));
                }
            }
            MenuAction::Exit => return Ok(Transition::Quit),
        }
        Ok(Transition::Back)
    }
}
