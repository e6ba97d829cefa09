mod cli;
mod config;

use std::time::Duration;

pub use cli::*;
pub use config::*;
use ctf_deposit::{DepositCallback, HttpClient, MintAmountSource, ReqwestClient};
use serde_json::{json, Value};

/// Local host of the deposit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub endpoint: String,
    pub timeout: Duration,
    pub mint: MintAmountSource,
}

impl Default for App {
    fn default() -> Self {
        Self {
            endpoint: DepositCallback::<ReqwestClient>::DEFAULT_ENDPOINT.into(),
            timeout: ReqwestClient::DEFAULT_TIMEOUT,
            mint: MintAmountSource::default(),
        }
    }
}

impl TryFrom<Config> for App {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            mint: config.mint_source()?,
            timeout: config.timeout()?,
            endpoint: config.endpoint,
        })
    }
}

impl App {
    pub fn with_endpoint<V: AsRef<str>>(mut self, endpoint: V) -> Self {
        self.endpoint = endpoint.as_ref().into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mint_source(mut self, mint: MintAmountSource) -> Self {
        self.mint = mint;
        self
    }

    /// Runs the callback once over HTTP.
    pub async fn deposit<S: AsRef<str>>(&self, args: &[S]) -> anyhow::Result<Value> {
        self.deposit_with(ReqwestClient::new(self.timeout), args)
            .await
    }

    /// Runs the callback once with the provided client.
    ///
    /// Returns the decimal mint amount with its uint256 encoding.
    pub async fn deposit_with<C, S>(&self, client: C, args: &[S]) -> anyhow::Result<Value>
    where
        C: HttpClient,
        S: AsRef<str>,
    {
        let ret = DepositCallback::new(client)
            .with_endpoint(&self.endpoint)
            .with_mint_source(self.mint.clone())
            .execute(args)
            .await?;

        Ok(json!({
            "mint_amount": ret.to_u256().to_string(),
            "result": ret.to_hex(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use ctf_deposit::{mocks::MockHttpClient, CallbackError, U256};

    use super::*;

    const ARGS: [&str; 4] = ["1", "0xA0b8", "1000000000000000000", "0xc7f0"];

    #[tokio::test]
    async fn deposit_reports_amount_and_encoding() {
        let client = MockHttpClient::default();
        let ret = App::default()
            .with_endpoint("http://127.0.0.1:8080/posts")
            .deposit_with(&client, &ARGS)
            .await
            .unwrap();

        assert_eq!(
            ret,
            json!({
                "mint_amount": "100000000000000000000",
                "result": "0x0000000000000000000000000000000000000000000000056bc75e2d63100000",
            })
        );
        assert_eq!(client.requests()[0].url, "http://127.0.0.1:8080/posts");
    }

    #[tokio::test]
    async fn deposit_surfaces_callback_errors() {
        let err = App::default()
            .deposit_with(MockHttpClient::failing(), &ARGS)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CallbackError>(),
            Some(CallbackError::Upstream { .. })
        ));
    }

    #[tokio::test]
    async fn config_drives_mint_source() {
        let config = Config {
            mint_amount: MintAmountConfig::Fixed {
                amount: "7".into(),
            },
            ..Default::default()
        };

        let ret = App::try_from(config)
            .unwrap()
            .deposit_with(MockHttpClient::default(), &ARGS)
            .await
            .unwrap();

        assert_eq!(ret["mint_amount"], U256::from(7u64).to_string());
    }
}
