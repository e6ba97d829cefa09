use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of a TOML configuration file. Fallback to built-in defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Overrides the deposit endpoint.
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Overrides the request timeout, in seconds.
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Chain id, input token, input token amount and output CTF, in that order.
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

#[test]
fn parses_positional_arguments() {
    let cli = Cli::try_parse_from([
        "ctf-deposit",
        "-e",
        "http://127.0.0.1:8080",
        "1",
        "0xA0b8",
        "1000",
        "0xc7f0",
    ])
    .unwrap();

    assert_eq!(cli.endpoint.as_deref(), Some("http://127.0.0.1:8080"));
    assert_eq!(cli.timeout, None);
    assert!(cli.config.is_none());
    assert_eq!(cli.args, ["1", "0xA0b8", "1000", "0xc7f0"]);
}

#[test]
fn rejects_zero_timeout() {
    assert!(Cli::try_parse_from(["ctf-deposit", "--timeout", "0", "1", "2", "3", "4"]).is_err());

    let cli = Cli::try_parse_from(["ctf-deposit", "--timeout", "1", "1", "2", "3", "4"]).unwrap();

    assert_eq!(cli.timeout, Some(1));
}
