//! Operator confirmation before any mutation.

use crate::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};

/// The only answer that confirms an apply.
pub const CONFIRM_WORD: &str = "yes";

/// Prompt shown before applying.
pub const APPLY_PROMPT: &str = "Apply these changes? Type 'yes' to confirm";

/// Source of the yes/no decision gating the apply stage.
pub trait ConfirmCallback {
    fn confirm(&mut self, prompt: &str) -> Result<bool, Error>;
}

/// Whether an operator answer confirms. Only the exact word counts.
pub fn is_confirmation(answer: &str) -> bool {
    answer == CONFIRM_WORD
}

/// Asks on the terminal and requires the operator to type the word.
///
/// When stdin is not a terminal a single line is read from it instead, so
/// the answer can be piped in.
pub struct TypedConfirm;

impl ConfirmCallback for TypedConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, Error> {
        println!();
        let answer = if io::stdin().is_terminal() {
            dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?
        } else {
            print!("{prompt}: ");
            io::stdout()
                .flush()
                .map_err(|e| Error::io("failed to write prompt", e))?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map_err(read_error)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        };
        Ok(is_confirmation(&answer))
    }
}

/// Confirms without asking (`--yes`).
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, Error> {
        Ok(true)
    }
}

fn prompt_error(err: dialoguer::Error) -> Error {
    let dialoguer::Error::IO(err) = err;
    read_error(err)
}

fn read_error(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::Interrupted {
        Error::Interrupted
    } else {
        Error::io("failed to read confirmation", err)
    }
}
