use std::ffi::OsString;

use thiserror::Error;

/// Failures that can occur while launching the assistant process.
///
/// A non-zero exit status or output on stderr is not an error; only the
/// inability to run the program at all is.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("executable {program:?} was not found on PATH")]
    ExecutableNotFound { program: OsString },

    #[error("failed to launch {program:?}")]
    ProcessLaunch {
        program: OsString,
        #[source]
        source: std::io::Error,
    },
}

pub trait AiBackend {
    fn invoke(&self, prompt: &str) -> Result<String, RunnerError>;
}
