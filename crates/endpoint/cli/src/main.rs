use std::{io, time::Duration};

use clap::Parser as _;
use ctf_deposit_cli::{App, Cli, Config};
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        config,
        endpoint,
        timeout,
        args,
    } = Cli::parse();

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let config = match config {
        Some(path) => {
            let (path, config) = Config::from_path(path)?;

            tracing::info!("config file loaded from `{}`...", path.display());

            config
        }
        None => Config::default(),
    };

    let mut app = App::try_from(config)?;

    if let Some(endpoint) = endpoint {
        app = app.with_endpoint(endpoint);
    }

    if let Some(timeout) = timeout {
        app = app.with_timeout(Duration::from_secs(timeout));
    }

    tracing::info!("depositing through `{}`...", app.endpoint);

    let response = app.deposit(args.as_slice()).await?;

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
