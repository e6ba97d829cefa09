use serde::{Deserialize, Serialize};

use crate::CallbackError;

/// Positional arguments of a deposit invocation.
///
/// Values are opaque; none of them affect the callback output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositArgs {
    /// Chain identifier.
    pub chain_id: String,
    /// Address of the deposited token.
    pub input_token: String,
    /// Deposited amount, as provided by the caller.
    pub input_token_amount: String,
    /// Identifier of the output CTF position.
    pub output_ctf: String,
}

impl DepositArgs {
    /// Number of positional arguments consumed.
    pub const LEN: usize = 4;

    /// Reads the arguments from an ordered list.
    ///
    /// Elements past [`Self::LEN`] are ignored.
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Result<Self, CallbackError> {
        match args {
            [chain_id, input_token, input_token_amount, output_ctf, ..] => Ok(Self {
                chain_id: chain_id.as_ref().into(),
                input_token: input_token.as_ref().into(),
                input_token_amount: input_token_amount.as_ref().into(),
                output_ctf: output_ctf.as_ref().into(),
            }),
            _ => Err(CallbackError::MissingArguments {
                expected: Self::LEN,
                got: args.len(),
            }),
        }
    }
}

#[test]
fn reads_positional_layout() {
    let args = DepositArgs::from_positional(&["1", "0xA0b", "1000", "0xCTF", "extra"]).unwrap();

    assert_eq!(args.chain_id, "1");
    assert_eq!(args.input_token, "0xA0b");
    assert_eq!(args.input_token_amount, "1000");
    assert_eq!(args.output_ctf, "0xCTF");
}

#[test]
fn rejects_short_list() {
    let err = DepositArgs::from_positional(&["1", "0xA0b", "1000"]).unwrap_err();

    assert_eq!(
        err,
        CallbackError::MissingArguments {
            expected: 4,
            got: 3
        }
    );
}
