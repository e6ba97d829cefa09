use thiserror::Error;

/// Errors surfaced by the deposit callback to its host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The argument list is shorter than the positional layout.
    #[error("expected at least {expected} arguments, got {got}")]
    MissingArguments {
        /// Minimum number of positional arguments.
        expected: usize,
        /// Number of arguments received.
        got: usize,
    },

    /// The deposit request failed upstream.
    #[error("Failed To deposit")]
    Upstream {
        /// Transport or status detail, kept out of the display message.
        reason: String,
    },

    /// The mint amount is zero or undefined.
    #[error("Invalid Mint Amount")]
    InvalidMintAmount,
}

impl CallbackError {
    /// Creates an upstream error with the provided detail.
    pub fn upstream<R: Into<String>>(reason: R) -> Self {
        Self::Upstream {
            reason: reason.into(),
        }
    }
}

#[test]
fn display_messages_are_stable() {
    assert_eq!(
        CallbackError::upstream("status 500").to_string(),
        "Failed To deposit"
    );
    assert_eq!(
        CallbackError::InvalidMintAmount.to_string(),
        "Invalid Mint Amount"
    );
    assert_eq!(
        CallbackError::MissingArguments {
            expected: 4,
            got: 1
        }
        .to_string(),
        "expected at least 4 arguments, got 1"
    );
}
