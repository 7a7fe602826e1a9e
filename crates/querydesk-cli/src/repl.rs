use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use querydesk_application::{ChatUseCase, LoginGate, RejectReason, SubmitOutcome};
use querydesk_core::visualization::AxisSelection;

use crate::commands::{COMMAND_NAMES, Command};
use crate::render::{TextChartRenderer, print_message};

const CHART_WIDTH: usize = 40;

/// rustyline helper: slash-command completion, hints and password masking.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
    masking: bool,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.iter().map(|c| c.to_string()).collect(),
            masking: false,
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') && !self.masking {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

enum LoginStep {
    Continue,
    Exit,
}

/// Interactive front end over a [`ChatUseCase`].
pub struct Repl {
    editor: Editor<CliHelper, DefaultHistory>,
    usecase: ChatUseCase,
    gate: LoginGate,
    renderer: TextChartRenderer,
}

impl Repl {
    pub fn new(usecase: ChatUseCase, gate: LoginGate) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CliHelper::new()));
        Ok(Self {
            editor,
            usecase,
            gate,
            renderer: if colored::control::SHOULD_COLORIZE.should_colorize() {
                TextChartRenderer::new(CHART_WIDTH)
            } else {
                TextChartRenderer::plain(CHART_WIDTH)
            },
        })
    }

    pub async fn run(mut self) -> Result<()> {
        println!("{}", "=== 🗄️ QueryDesk ===".bright_magenta().bold());

        loop {
            if !self.gate.is_logged_in() {
                match self.login().await? {
                    LoginStep::Continue => continue,
                    LoginStep::Exit => break,
                }
            }

            let prompt = self.prompt().await;
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line.as_str());

                    match Command::parse(&line) {
                        Ok(Command::Quit) => {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                        Ok(command) => self.execute(command).await,
                        Err(e) => eprintln!("{}", e.to_string().red()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "CTRL-D detected. Exiting...".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    break;
                }
            }
        }

        Ok(())
    }

    async fn login(&mut self) -> Result<LoginStep> {
        println!("{}", "Please enter your details".bright_black());

        let Some(username) = self.read_field("Username: ", false)? else {
            return Ok(LoginStep::Exit);
        };
        let Some(password) = self.read_field("Password: ", true)? else {
            return Ok(LoginStep::Exit);
        };

        match self.gate.login(&username, &password).await {
            Ok(()) => {
                println!("{}", format!("Welcome back, {}!", username).bright_green());
                println!("{}", "Type a question, or /help for commands.".bright_black());
                self.show_active().await;
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
        Ok(LoginStep::Continue)
    }

    /// Reads one login field; `None` when the user gives up with CTRL-C/CTRL-D.
    fn read_field(&mut self, prompt: &str, masked: bool) -> Result<Option<String>> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = masked;
        }
        let line = self.editor.readline(prompt);
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = false;
        }

        match line {
            Ok(value) => Ok(Some(value)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn prompt(&self) -> String {
        let session = self.usecase.session();
        let store = session.lock().await;
        let index = store.active_index();
        let title = store.display_title(index).unwrap_or_default();
        format!("[{}] {}> ", index + 1, title)
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Ask(question) => self.ask(&question).await,
            Command::New => {
                let index = self.usecase.new_thread().await;
                println!("{}", format!("Started thread #{}", index + 1).bright_green());
            }
            Command::Threads => self.print_threads().await,
            Command::Switch(index) => {
                if self.usecase.switch_thread(index).await {
                    self.show_active().await;
                } else {
                    eprintln!("{}", format!("No thread #{}", index + 1).red());
                }
            }
            Command::Show => self.show_active().await,
            Command::Delete(index) => self.request_delete(index).await,
            Command::Confirm => self.confirm_delete().await,
            Command::Cancel => {
                if self.usecase.pending_delete().await.is_some() {
                    self.usecase.cancel_delete().await;
                    println!("{}", "Deletion cancelled.".bright_black());
                }
            }
            Command::Axis {
                message,
                axis,
                column,
            } => {
                let selection = self
                    .usecase
                    .select_axis(message, axis, column.clone())
                    .await;
                match selection {
                    AxisSelection::Applied => self.show_message(message).await,
                    AxisSelection::MessageNotFound => eprintln!(
                        "{}",
                        format!("Message #{} is not a query result.", message + 1).red()
                    ),
                    AxisSelection::NotEligible => eprintln!(
                        "{}",
                        format!("Message #{} has no chart.", message + 1).red()
                    ),
                    AxisSelection::OutsideDomain => eprintln!(
                        "{}",
                        format!(
                            "'{}' is not a column of message #{}.",
                            column.unwrap_or_default(),
                            message + 1
                        )
                        .red()
                    ),
                }
            }
            Command::Export(message) => match self.usecase.export(message).await {
                Ok(path) => println!("{}", format!("Saved {}", path.display()).bright_green()),
                Err(e) => eprintln!("{}", format!("{:#}", e).red()),
            },
            Command::Logout => {
                self.gate.logout();
                println!("{}", "Logged out.".bright_black());
            }
            Command::Help => print_help(),
            Command::Quit => {}
        }
    }

    async fn ask(&self, question: &str) {
        println!("{}", "Thinking...".bright_black().italic());

        match self.usecase.ask(question).await {
            SubmitOutcome::Rejected(RejectReason::Empty) => {}
            SubmitOutcome::Rejected(RejectReason::Busy) => {
                eprintln!("{}", "Still waiting for the previous answer.".yellow());
            }
            SubmitOutcome::Answered { thread_id } | SubmitOutcome::Failed { thread_id, .. } => {
                let session = self.usecase.session();
                let store = session.lock().await;
                let latest = store
                    .index_of(&thread_id)
                    .and_then(|index| store.thread(index))
                    .and_then(|thread| thread.messages.len().checked_sub(1).map(|p| (p, thread)));
                if let Some((position, thread)) = latest {
                    print_message(position, &thread.messages[position], &self.renderer);
                }
            }
            SubmitOutcome::Discarded { .. } => {
                eprintln!(
                    "{}",
                    "The thread was deleted before the answer arrived.".yellow()
                );
            }
        }
    }

    async fn print_threads(&self) {
        let session = self.usecase.session();
        let store = session.lock().await;
        for index in 0..store.len() {
            let title = store.display_title(index).unwrap_or_default();
            if index == store.active_index() {
                println!("{}", format!("* {}. {}", index + 1, title).bright_cyan());
            } else {
                println!("  {}. {}", index + 1, title);
            }
        }
    }

    async fn show_active(&self) {
        let session = self.usecase.session();
        let store = session.lock().await;
        let index = store.active_index();
        let title = store.display_title(index).unwrap_or_default();
        println!("{}", format!("── {} ──", title).bright_magenta());
        for (position, message) in store.active_thread().messages.iter().enumerate() {
            print_message(position, message, &self.renderer);
        }
    }

    async fn show_message(&self, position: usize) {
        let session = self.usecase.session();
        let store = session.lock().await;
        if let Some(message) = store.active_thread().messages.get(position) {
            print_message(position, message, &self.renderer);
        }
    }

    async fn request_delete(&self, index: usize) {
        if !self.usecase.request_delete(index).await {
            eprintln!("{}", format!("No thread #{}", index + 1).red());
            return;
        }
        let title = {
            let session = self.usecase.session();
            let store = session.lock().await;
            store.display_title(index).unwrap_or_default()
        };
        println!(
            "{}",
            format!(
                "Delete \"{}\"? This cannot be undone. (/yes or /no)",
                title
            )
            .bright_yellow()
        );
    }

    async fn confirm_delete(&self) {
        if self.usecase.pending_delete().await.is_none() {
            println!("{}", "Nothing to confirm.".bright_black());
            return;
        }
        if self.usecase.confirm_delete().await {
            println!("{}", "Thread deleted.".bright_green());
            self.print_threads().await;
        } else {
            eprintln!(
                "{}",
                "The last remaining thread cannot be deleted.".yellow()
            );
        }
    }
}

fn print_help() {
    let lines = [
        ("<question>", "ask the backend (mention \"bar chart\", \"pie chart\"... to get a chart)"),
        ("/new", "start a new thread"),
        ("/threads", "list threads"),
        ("/switch N", "switch to thread N"),
        ("/show", "reprint the active thread"),
        ("/delete N", "delete thread N (asks for confirmation)"),
        ("/yes, /no", "confirm or cancel a pending deletion"),
        ("/axis M x|y [COL]", "set or clear a chart axis of message M"),
        ("/export M", "save the result of message M as query_results.xlsx"),
        ("/logout", "log out"),
        ("/quit", "exit"),
    ];
    for (command, description) in lines {
        println!("  {} {}", format!("{:<18}", command).bright_cyan(), description);
    }
}
