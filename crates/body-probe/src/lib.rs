use std::sync::Arc;

use anyhow::Result;

mod cmd;
mod common;
mod init;

pub mod config;
pub mod listener;
pub mod pattern;
pub mod request;

pub use config::Config;
pub use pattern::ReqPattern;

pub async fn run() -> Result<()> {
    let mut args = init::cmd::init()?;

    let config = match args.config.take() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .apply_cli(args);
    log::debug!("effective config: {config:?}");

    run_patterns(config).await
}

/// Drive all six request patterns against a freshly bound dump listener,
/// printing what each one put on the wire.
pub async fn run_patterns(config: Config) -> Result<()> {
    let listener = Arc::new(listener::bind(&config).await?);
    let base_url = format!("http://{}", listener.local_addr()?);
    log::info!("dump listener bound on {base_url}");

    for pattern in ReqPattern::ALL {
        println!("Request pattern: {pattern}");
        println!();

        // The listener never answers, so a request that made it onto the
        // wire only finishes once the capture side has read its fill and
        // hung up.
        let capture = tokio::spawn({
            let listener = Arc::clone(&listener);
            let limit = config.dump_limit;
            async move { listener::capture(&listener, limit).await }
        });

        // A build failure happens before anything connects, leaving the
        // capture task stuck in accept(). Take it down and bail.
        if let Err(err) = request::send(*pattern, &config.file, &base_url).await {
            capture.abort();
            return Err(err);
        }

        println!("{}", String::from_utf8_lossy(&capture.await??));
        println!();
        println!("------");
        println!();
    }

    Ok(())
}
