use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Error,
}

/// How a command finished, with an optional summary line for the user.
#[derive(Debug)]
pub struct Exit {
    status: Status,
    message: Option<String>,
}

impl Exit {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            message: None,
        }
    }

    #[must_use]
    pub fn error() -> Self {
        Self {
            status: Status::Error,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Print the summary (to stderr on failure) and produce the process
    /// exit code.
    pub fn report(self, quiet: bool) -> ExitCode {
        if let Some(message) = self.message.filter(|_| !quiet) {
            match self.status {
                Status::Success => println!("{message}"),
                Status::Error => eprintln!("{message}"),
            }
        }
        match self.status {
            Status::Success => ExitCode::SUCCESS,
            Status::Error => ExitCode::FAILURE,
        }
    }
}
