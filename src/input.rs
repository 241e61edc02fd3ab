use crate::config::Config;
use crate::core::error::AssistantError;

use console::style;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::{self, MatchingBracketValidator, Validator};
use rustyline::{CompletionType, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

pub type AssistantEditor = Editor<AssistantHelper, FileHistory>;

/// REPL-only commands, handled by the front end rather than the dispatcher.
pub const META_COMMANDS: &[&str] = &["/help", "/history", "/reload", "/quit"];

/// Candidates for the word being typed, or `None` once past the first word.
fn first_word_matches(names: &[String], line: &str, pos: usize) -> Option<Vec<Pair>> {
    let typed = &line[..pos];
    if typed.contains(char::is_whitespace) {
        return None;
    }

    let pairs = if typed.starts_with('/') {
        META_COMMANDS
            .iter()
            .filter(|m| m.starts_with(typed))
            .map(|m| Pair {
                display: m.to_string(),
                replacement: m.to_string(),
            })
            .collect()
    } else {
        let typed = typed.to_lowercase();
        names
            .iter()
            .filter(|name| name.starts_with(&typed))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    };
    Some(pairs)
}

/// Completes action names in the first word and file paths after it.
pub struct CommandCompleter {
    filename_completer: FilenameCompleter,
    names: Vec<String>,
}

impl CommandCompleter {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
            names,
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match first_word_matches(&self.names, line, pos) {
            Some(matches) => Ok((0, matches)),
            None => self.filename_completer.complete(line, pos, ctx),
        }
    }
}

pub struct AssistantHelper {
    completer: CommandCompleter,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
    validator: MatchingBracketValidator,
}

impl AssistantHelper {
    /// `names` are the built-in and plugin actions offered for completion.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            completer: CommandCompleter::new(names),
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter::new(),
            validator: MatchingBracketValidator::new(),
        }
    }
}

impl Helper for AssistantHelper {}

impl Completer for AssistantHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for AssistantHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for AssistantHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: CompletionType,
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }
}

impl Validator for AssistantHelper {
    fn validate(
        &self,
        ctx: &mut validate::ValidationContext,
    ) -> rustyline::Result<validate::ValidationResult> {
        self.validator.validate(ctx)
    }

    fn validate_while_typing(&self) -> bool {
        self.validator.validate_while_typing()
    }
}

/// Creates the line editor and loads the persisted input history.
pub fn create_editor(names: Vec<String>) -> Result<AssistantEditor, AssistantError> {
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| AssistantError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(AssistantHelper::new(names)));

    let history_path = Config::input_history_path();
    if let Err(e) = editor.load_history(&history_path) {
        tracing::debug!(path = %history_path.display(), "no input history loaded: {}", e);
    }

    Ok(editor)
}

/// Swaps in a new completion list after the plugin set changed.
pub fn refresh_completions(editor: &mut AssistantEditor, names: Vec<String>) {
    editor.set_helper(Some(AssistantHelper::new(names)));
}

/// Reads one line; `None` on Ctrl-C or Ctrl-D.
pub fn read_input(editor: &mut AssistantEditor) -> Result<Option<String>, AssistantError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "beye> ".to_string()
    } else {
        style("beye> ").bold().cyan().to_string()
    };

    match editor.readline(&prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(AssistantError::Input(format!("Input error: {}", err))),
    }
}

/// Adds a dispatched command to the recall list.
pub fn remember(editor: &mut AssistantEditor, command: &str) {
    if let Err(e) = editor.add_history_entry(command) {
        tracing::debug!("failed to add history entry: {}", e);
    }
}

pub fn save_history(editor: &mut AssistantEditor) -> Result<(), AssistantError> {
    let history_path = Config::input_history_path();

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    editor
        .save_history(&history_path)
        .map_err(|e| AssistantError::Input(format!("Failed to save history: {}", e)))
}
