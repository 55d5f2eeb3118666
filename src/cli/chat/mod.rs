pub mod prompt;
pub mod transcript;

use std::io::Write;
use std::process::ExitCode;

use color_print::cwriteln;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use eyre::Result;
use prompt::PROMPT;
use rustyline::error::ReadlineError;
use tracing::{error, info};
use transcript::{render, Transcript};

use crate::bot::{ConversationSession, Submission, CLEAR_ACKNOWLEDGEMENT};
use crate::error::BotError;

const WELCOME_TEXT: &str = "
============================================================
Welcome to Professional AI Banking Assistant
============================================================

I'm here to help with banking inquiries, account information,
and general banking guidance. For security reasons, I cannot
access your account or handle sensitive financial data.

Type 'exit' to quit, 'clear' to start a new conversation,
or /help for more commands.
============================================================
";

const HELP_TEXT: &str = "
Banking Assistant

clear          Clear the conversation history
/clear         Clear the conversation history and the screen
/history       Show the conversation as the model sees it
/transcript    Show everything displayed in this chat, errors included
/status        Show whether the assistant is ready and which model it uses
/help          Show this help dialogue
/quit, exit    Quit the application

Never share account numbers, PINs, OTPs or passwords.
";

const SETUP_HINT: &str = "
Make sure MISTRAL_API_KEY is set in the environment or a .env file,
or that a secrets.toml file contains:

    MISTRAL_API_KEY = \"your_api_key_here\"
";

const GOODBYE_TEXT: &str = "Thank you for using Banking Assistant. Goodbye!";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    NotReady,
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Completed => ExitCode::SUCCESS,
            RunOutcome::NotReady => ExitCode::FAILURE,
        }
    }
}

/// Terminal chat over one [`ConversationSession`].
pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    session: Option<ConversationSession>,
    init_error: Option<String>,
    transcript: Transcript,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: Option<String>,
        interactive: bool,
        session: Result<ConversationSession, BotError>,
    ) -> Self {
        let (session, init_error) = match session {
            Ok(session) => (Some(session), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            output,
            input,
            interactive,
            session,
            init_error,
            transcript: Transcript::new(),
        }
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        Ok(self.run_to_outcome().await?.into())
    }

    async fn run_to_outcome(&mut self) -> Result<RunOutcome> {
        if self.interactive {
            self.print_welcome()?;
            self.print_status()?;
        }

        if self.session.is_none() {
            if !self.interactive {
                self.print_status()?;
            }
            writeln!(self.output, "{}", SETUP_HINT)?;
            return Ok(RunOutcome::NotReady);
        }

        // Handle non-interactive mode (single query)
        if let Some(input) = self.input.take() {
            self.handle_input(&input).await?;
            return Ok(RunOutcome::Completed);
        }

        if self.interactive {
            self.run_interactive().await?;
        }

        Ok(RunOutcome::Completed)
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", WELCOME_TEXT)?;
        Ok(())
    }

    fn print_status(&mut self) -> Result<()> {
        match (&self.session, &self.init_error) {
            (Some(session), _) => {
                cwriteln!(
                    self.output,
                    "Bot Status: <green>✓ Ready</> (model: {})\n",
                    session.model()
                )?;
            }
            (None, reason) => {
                cwriteln!(self.output, "Bot Status: <red>✗ Failed to initialize</>")?;
                if let Some(reason) = reason {
                    writeln!(self.output, "Error: {}", reason)?;
                }
            }
        }
        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line.as_str());

                    match self.handle_input(&line).await {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => writeln!(self.output, "Error: {}", e)?,
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    writeln!(self.output, "\nChat interrupted. Goodbye!")?;
                    break;
                }
                Err(e) => {
                    error!("readline failed: {}", e);
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<Flow> {
        let command = input.trim();
        match command {
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            "/quit" => {
                writeln!(self.output, "\n{}", GOODBYE_TEXT)?;
                return Ok(Flow::Quit);
            }
            "/clear" => {
                self.clear_conversation(true)?;
            }
            "/history" => {
                let history = self
                    .session
                    .as_ref()
                    .map(ConversationSession::history)
                    .unwrap_or_default();
                writeln!(self.output, "{}", render(&history))?;
            }
            "/transcript" => {
                writeln!(self.output, "{}", render(self.transcript.entries()))?;
            }
            "/status" => {
                self.print_status()?;
            }
            _ if command.eq_ignore_ascii_case("exit") => {
                writeln!(self.output, "\n{}", GOODBYE_TEXT)?;
                return Ok(Flow::Quit);
            }
            _ => match Submission::parse(input) {
                Submission::Empty => {}
                Submission::Clear => self.clear_conversation(false)?,
                Submission::Message(text) => self.process_chat_input(text).await?,
            },
        }

        Ok(Flow::Continue)
    }

    /// Explicit clear: resets the session and the local transcript. The
    /// acknowledgement is only printed, never stored.
    fn clear_conversation(&mut self, wipe_screen: bool) -> Result<()> {
        if let Some(session) = self.session.as_mut() {
            session.clear();
        }
        self.transcript.clear();

        if wipe_screen && self.interactive {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        info!("conversation cleared");
        writeln!(self.output, "{}\n", CLEAR_ACKNOWLEDGEMENT)?;
        Ok(())
    }

    async fn process_chat_input(&mut self, text: &str) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            writeln!(self.output, "Bot not initialized")?;
            return Ok(());
        };

        self.transcript.push_user(text);

        match session.send(text).await {
            Ok(reply) => {
                cwriteln!(self.output, "\n<cyan,bold>Bot:</> {}\n", reply)?;
                self.transcript.push_assistant(&reply);
            }
            Err(e) => {
                let error_text = format!("❌ Error: {}", e);
                cwriteln!(self.output, "\n<red>{}</>\n", error_text)?;
                self.transcript.push_assistant(&error_text);
            }
        }

        Ok(())
    }
}
