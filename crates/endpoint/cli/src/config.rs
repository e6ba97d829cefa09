use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use ctf_deposit::{default_mint_amount, DepositCallback, MintAmountSource, ReqwestClient, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub mint_amount: MintAmountConfig,
}

/// Mint amount source, as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum MintAmountConfig {
    /// A decimal constant.
    Fixed { amount: String },
    /// A field of the deposit response body.
    Response { field: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DepositCallback::<ReqwestClient>::DEFAULT_ENDPOINT.into(),
            timeout_secs: ReqwestClient::DEFAULT_TIMEOUT.as_secs(),
            mint_amount: MintAmountConfig::default(),
        }
    }
}

impl Default for MintAmountConfig {
    fn default() -> Self {
        Self::Fixed {
            amount: default_mint_amount().to_string(),
        }
    }
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<(PathBuf, Self)> {
        let toml_str = fs::read_to_string(path.as_ref())?;

        Ok((path.as_ref().to_path_buf(), toml::from_str(&toml_str)?))
    }

    pub fn timeout(&self) -> anyhow::Result<Duration> {
        anyhow::ensure!(self.timeout_secs > 0, "the request timeout must be at least 1 second");

        Ok(Duration::from_secs(self.timeout_secs))
    }

    pub fn mint_source(&self) -> anyhow::Result<MintAmountSource> {
        match &self.mint_amount {
            MintAmountConfig::Fixed { amount } => U256::from_dec_str(amount.trim())
                .map(MintAmountSource::Fixed)
                .map_err(|e| anyhow::anyhow!("invalid fixed mint amount `{amount}`: {e:?}")),

            MintAmountConfig::Response { field } => {
                Ok(MintAmountSource::ResponseField(field.clone()))
            }
        }
    }
}

#[test]
fn defaults_match_callback() {
    let config = Config::default();

    assert_eq!(config.endpoint, "https://jsonplaceholder.typicode.com/posts");
    assert_eq!(config.timeout().unwrap(), Duration::from_secs(5));
    assert_eq!(config.mint_source().unwrap(), MintAmountSource::default());
}

#[test]
fn parses_partial_toml() {
    let config: Config = toml::from_str(
        r#"
        timeout_secs = 10

        [mint_amount]
        source = "response"
        field = "mint_amount"
        "#,
    )
    .unwrap();

    assert_eq!(config.endpoint, Config::default().endpoint);
    assert_eq!(config.timeout_secs, 10);
    assert_eq!(
        config.mint_source().unwrap(),
        MintAmountSource::ResponseField("mint_amount".into())
    );
}

#[test]
fn rejects_invalid_fixed_amount() {
    let config = Config {
        mint_amount: MintAmountConfig::Fixed {
            amount: "one hundred".into(),
        },
        ..Default::default()
    };

    assert!(config.mint_source().is_err());
}

#[test]
fn rejects_zero_timeout() {
    let config: Config = toml::from_str("timeout_secs = 0").unwrap();

    assert!(config.timeout().is_err());
    assert!(crate::App::try_from(config).is_err());
}
