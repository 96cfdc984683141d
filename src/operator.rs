//! Waiting for the operator to change the network identity after a rate limit

use std::io::{self, BufRead, Write};

/// Failure to wait for the operator
#[derive(Debug, thiserror::Error)]
pub enum RemediationError {
    /// No more input
    #[error("operator input closed while waiting for the network identity change")]
    Closed,
    /// Terminal failure
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The suspension point after the remote side refused more attempts.
///
/// Returns when it is worth retrying the same point.
pub trait Remediation {
    /// Block until the network identity is changed.
    ///
    /// # Errors
    /// The signal can never arrive.
    fn await_rotation(&mut self) -> Result<(), RemediationError>;
}

/// Ask the operator on the terminal and wait for Enter
#[derive(Debug)]
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on the process terminal
    pub fn new() -> Self {
        Self::with_io(io::stdin().lock(), io::stderr())
    }
}

impl Default for StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    /// Prompt on the given streams
    pub const fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Remediation for StdinPrompt<R, W> {
    fn await_rotation(&mut self) -> Result<(), RemediationError> {
        writeln!(
            self.output,
            "Attempts limit reached. Switch to another network (e.g. VPN server) and press Enter to continue..."
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RemediationError::Closed);
        }
        Ok(())
    }
}
