use crate::cli::Args;
use crate::commands::{AssistantState, Command, CommandDispatcher};
use crate::core::error::AssistantError;
use crate::display;
use crate::input::{self, AssistantEditor};

use is_terminal::IsTerminal;
use std::io::{self, Read};

enum Meta {
    Continue,
    Quit,
}

pub struct Application {
    pub args: Args,
    pub dispatcher: CommandDispatcher,
    pub state: AssistantState,
}

impl Application {
    pub fn new(args: Args, dispatcher: CommandDispatcher, state: AssistantState) -> Self {
        Self {
            args,
            dispatcher,
            state,
        }
    }

    fn use_nlp(&self) -> bool {
        !self.args.no_nlp
    }

    pub async fn run(&mut self) -> Result<(), AssistantError> {
        let outcome = if let Some(command) = self.args.one_shot() {
            self.handle_one_shot(&command).await;
            Ok(())
        } else if !io::stdin().is_terminal() {
            self.handle_piped().await
        } else {
            self.handle_repl().await
        };

        self.state.plugins.shutdown_all();
        outcome
    }

    async fn handle_one_shot(&mut self, input: &str) {
        let use_nlp = self.use_nlp();
        let (_, result) = self.dispatcher.submit(&mut self.state, input, use_nlp).await;
        display::display_plain(&result);
    }

    async fn handle_piped(&mut self) -> Result<(), AssistantError> {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| AssistantError::Input(format!("Failed to read from stdin: {}", e)))?;

        let use_nlp = self.use_nlp();
        for line in buffer.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (command, result) = self.dispatcher.submit(&mut self.state, line, use_nlp).await;
            display::display_plain(&format!("> {}\n{}\n", command, result));
        }
        Ok(())
    }

    /// Built-in actions plus the actions of currently registered plugins.
    fn completion_names(&self) -> Vec<String> {
        let mut names = self.dispatcher.get_command_names();
        names.extend(
            self.state
                .plugins
                .command_names()
                .into_iter()
                .map(|(action, _)| action),
        );
        names.sort();
        names.dedup();
        names
    }

    fn handle_meta(&mut self, line: &str, editor: &mut AssistantEditor) -> Meta {
        match line.split_whitespace().next().unwrap_or_default() {
            "/quit" | "/exit" => return Meta::Quit,
            "/help" => display::display_meta_help(),
            "/history" => display::display_history(self.state.session.command_history()),
            "/reload" => {
                match self.state.plugins.load_all() {
                    Ok(report) => display::display_load_report(&report),
                    Err(e) => display::display_error(&format!(
                        "Failed to scan {}: {}",
                        self.state.plugins.dir().display(),
                        e
                    )),
                }
                input::refresh_completions(editor, self.completion_names());
            }
            other => display::display_error(&format!("Unknown REPL command: {}. Try /help.", other)),
        }
        Meta::Continue
    }

    async fn handle_repl(&mut self) -> Result<(), AssistantError> {
        display::display_banner(self.state.services.chat.model(), self.state.plugins.len());
        let mut editor = input::create_editor(self.completion_names())?;
        let use_nlp = self.use_nlp();

        while let Some(line) = input::read_input(&mut editor)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                input::remember(&mut editor, line);
                match self.handle_meta(line, &mut editor) {
                    Meta::Quit => break,
                    Meta::Continue => continue,
                }
            }

            let (command, result) = self.dispatcher.submit(&mut self.state, line, use_nlp).await;
            input::remember(&mut editor, &command);
            display::display_result(&command, &result);

            if Command::parse(&command).action.ends_with("_plugin") {
                input::refresh_completions(&mut editor, self.completion_names());
            }
        }

        input::save_history(&mut editor)
    }
}
