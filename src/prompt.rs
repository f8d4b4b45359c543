//! Terminal confirmation prompts.

use dialoguer::Confirm;

use crate::error::{InstallError, Result};

/// Ask a yes/no question on the terminal, defaulting to "no".
///
/// In non-interactive mode the prompt is skipped entirely and treated as
/// declined, so unattended runs never block on input. The blocking terminal
/// read runs off the runtime thread, so the interrupt listener stays
/// pollable while a prompt is open.
pub async fn confirm(prompt: &str, non_interactive: bool) -> Result<bool> {
    if non_interactive {
        return Ok(false);
    }
    let question = prompt.to_string();
    let answer = tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
    })
    .await
    .map_err(|e| InstallError::io(format!("Confirmation prompt failed: {}", e)))?;
    answer.map_err(prompt_error)
}

/// A Ctrl-C during the terminal read surfaces as an interrupted I/O error:
/// that is the user requesting an orderly stop, not an I/O failure.
fn prompt_error(err: dialoguer::Error) -> InstallError {
    match &err {
        dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted => {
            InstallError::halted("interrupted by user")
        }
        _ => InstallError::io(format!("Failed to read confirmation: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{confirm, prompt_error};
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn non_interactive_mode_declines_without_prompting() {
        let answer = confirm("Continue?", true)
            .await
            .expect("no terminal interaction");
        assert!(!answer);
    }

    #[test]
    fn an_interrupted_read_is_an_orderly_halt() {
        let interrupted = io::Error::new(io::ErrorKind::Interrupted, "read interrupted");
        let err = prompt_error(dialoguer::Error::IO(interrupted));
        assert_eq!(err.kind(), ErrorKind::Halted);
        assert_eq!(err.to_string(), "interrupted by user");
    }

    #[test]
    fn other_read_failures_stay_fatal() {
        let lost = io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone");
        let err = prompt_error(dialoguer::Error::IO(lost));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("Failed to read confirmation"));
    }
}
