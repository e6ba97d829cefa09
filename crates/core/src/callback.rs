use crate::{
    validate_mint_amount, CallbackError, DepositArgs, HttpClient, HttpRequest, MintAmountSource,
    Uint256,
};

/// The deposit callback entry point.
///
/// Every invocation submits a single `POST` to the deposit endpoint and reports the mint amount
/// as an encoded uint256.
#[derive(Debug, Clone)]
pub struct DepositCallback<C> {
    client: C,
    endpoint: String,
    mint: MintAmountSource,
}

impl<C> DepositCallback<C> {
    /// Default deposit endpoint.
    pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

    /// Creates a callback with the default endpoint and the fixed mint amount.
    pub fn new(client: C) -> Self {
        Self {
            client,
            endpoint: Self::DEFAULT_ENDPOINT.into(),
            mint: MintAmountSource::default(),
        }
    }

    /// Replaces the deposit endpoint.
    pub fn with_endpoint<E: AsRef<str>>(mut self, endpoint: E) -> Self {
        self.endpoint = endpoint.as_ref().into();
        self
    }

    /// Replaces the mint amount source.
    pub fn with_mint_source(mut self, mint: MintAmountSource) -> Self {
        self.mint = mint;
        self
    }

    /// Returns the deposit endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the mint amount source.
    pub fn mint_source(&self) -> &MintAmountSource {
        &self.mint
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient> DepositCallback<C> {
    /// Runs the callback against the positional argument list.
    ///
    /// Expects at least chain id, input token, input token amount and output CTF, in that order.
    pub async fn execute<S: AsRef<str>>(&self, args: &[S]) -> Result<Uint256, CallbackError> {
        let args = DepositArgs::from_positional(args)?;

        tracing::debug!(
            "deposit on chain `{}` of `{}` {} into `{}`...",
            args.chain_id,
            args.input_token_amount,
            args.input_token,
            args.output_ctf
        );

        let request = HttpRequest::post(&self.endpoint);
        let response = self.client.execute(&request).await.map_err(|e| {
            tracing::warn!("deposit request could not be sent: {e}");
            CallbackError::upstream(e.to_string())
        })?;

        if response.error {
            let reason = response
                .message
                .unwrap_or_else(|| String::from("upstream reported an error"));

            tracing::warn!("deposit request failed: {reason}");

            return Err(CallbackError::Upstream { reason });
        }

        let amount = validate_mint_amount(self.mint.resolve(&response.data))?;

        tracing::debug!("mint amount resolved to {amount}");

        Ok(Uint256::encode(amount))
    }
}
