//! Terminal outcome of an install run.

use crate::error::Result;

/// Terminal state of the whole install sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every step ran; the instance is configured.
    Completed,
    /// The user declined an advisory prompt or interrupted the run.
    HaltedByUser(String),
    /// A required step failed.
    FailedFatally(String),
}

impl InstallOutcome {
    /// Classify the result of the step pipeline.
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(e) if e.is_halt() => Self::HaltedByUser(e.to_string()),
            Err(e) => Self::FailedFatally(e.to_string()),
        }
    }

    /// Process exit code. A halt is an orderly stop, not a failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed | Self::HaltedByUser(_) => 0,
            Self::FailedFatally(_) => 1,
        }
    }

    /// Print the terminal line for non-success outcomes.
    pub fn report(&self) {
        match self {
            Self::Completed => {}
            Self::HaltedByUser(reason) => println!("\n\nInstall halted because: {}.\n", reason),
            Self::FailedFatally(reason) => println!("\n\nFatal error, exiting: {}.\n", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InstallOutcome;
    use crate::error::InstallError;

    #[test]
    fn a_declined_prompt_is_an_orderly_halt() {
        let outcome =
            InstallOutcome::from_result(Err(InstallError::halted("Python version is < 3.8")));
        assert_eq!(
            outcome,
            InstallOutcome::HaltedByUser("Python version is < 3.8".to_string())
        );
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn a_failed_command_is_fatal() {
        let outcome =
            InstallOutcome::from_result(Err(InstallError::command("pip3 install", 4)));
        assert_eq!(
            outcome,
            InstallOutcome::FailedFatally("'pip3 install' returned error code 4".to_string())
        );
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn success_exits_zero() {
        let outcome = InstallOutcome::from_result(Ok(()));
        assert_eq!(outcome, InstallOutcome::Completed);
        assert_eq!(outcome.exit_code(), 0);
    }
}
