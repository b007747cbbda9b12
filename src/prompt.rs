//! Interactive Prompts
//!
//! The lifecycle controller asks questions through [`Interaction`] so it never
//! touches the terminal directly. [`TerminalPrompter`] is the `dialoguer`
//! implementation; prompts are drawn on stderr.

use dialoguer::{Confirm, Input, Password};

use crate::config::Profile;
use crate::credential::Credential;
use crate::error::Result;
use crate::output::{Message, Tone};

/// Candidate profile and password collected for a configure run
#[derive(Debug, Clone)]
pub struct Candidate {
    pub profile: Profile,
    pub password: Credential,
}

/// Questions the lifecycle controller may ask
pub trait Interaction {
    /// Yes/no question; the safe answer is "no"
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Collect host, port, user and password
    fn candidate(&mut self) -> Result<Candidate>;

    /// Name of the database to create
    fn database_name(&mut self) -> Result<String>;

    /// Progress note before a slow step
    fn notice(&mut self, _message: &str) {}
}

/// `dialoguer`-backed prompter
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
    show_notices: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with "yes" without prompting
    #[must_use]
    pub const fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Print progress notes to stderr
    #[must_use]
    pub const fn show_notices(mut self, show_notices: bool) -> Self {
        self.show_notices = show_notices;
        self
    }
}

/// Reject blank text input with `message`
fn required(message: &'static str) -> impl Fn(&String) -> std::result::Result<(), &'static str> {
    move |input: &String| {
        if input.trim().is_empty() {
            Err(message)
        } else {
            Ok(())
        }
    }
}

impl Interaction for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()?)
    }

    fn candidate(&mut self) -> Result<Candidate> {
        let host: String = Input::new()
            .with_prompt("Enter database host")
            .validate_with(required("Host is required"))
            .interact_text()?;

        let port: u16 = Input::new()
            .with_prompt("Enter database port")
            .default(Profile::DEFAULT_PORT)
            .validate_with(|input: &u16| -> std::result::Result<(), &str> {
                if *input == 0 {
                    Err("Port must be between 1 and 65535")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let user: String = Input::new()
            .with_prompt("Enter database user")
            .default(Profile::DEFAULT_USER.to_string())
            .validate_with(required("User is required"))
            .interact_text()?;

        let password = Password::new()
            .with_prompt("Enter database password")
            .allow_empty_password(true)
            .interact()?;

        Ok(Candidate {
            profile: Profile::new(host.trim(), port, user.trim()),
            password: Credential::new(password),
        })
    }

    fn database_name(&mut self) -> Result<String> {
        let name: String = Input::new()
            .with_prompt("Enter the database name")
            .validate_with(required("Database name is required"))
            .interact_text()?;
        Ok(name.trim().to_string())
    }

    fn notice(&mut self, message: &str) {
        if self.show_notices {
            eprintln!("{}", Message::new(Tone::Info, [message]).render());
        }
    }
}
