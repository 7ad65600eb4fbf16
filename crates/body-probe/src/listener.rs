use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use tokio::{io::AsyncReadExt, net::TcpListener};

use crate::config::Config;

/// How long the capture loop waits for more bytes before deciding the peer
/// has sent everything and is now waiting for a response we never give.
const IDLE_TIMEOUT: Duration = Duration::from_millis(500);

pub async fn bind(config: &Config) -> Result<TcpListener> {
    let addr = SocketAddr::from_str(&format!("{}:{}", config.ip, config.port))
        .context("invalid listener address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    Ok(listener)
}

/// Accept one connection, read up to `limit` bytes from it, then drop it
/// without ever answering. Returns whatever arrived.
pub async fn capture(listener: &TcpListener, limit: usize) -> Result<Vec<u8>> {
    let (mut stream, peer) = listener.accept().await.context("accept failed")?;
    log::debug!("client {peer} connected");

    let mut dump = Vec::with_capacity(limit);
    let mut buf = vec![0u8; 2048];
    while dump.len() < limit {
        match tokio::time::timeout(IDLE_TIMEOUT, stream.read(&mut buf)).await {
            // Peer went quiet without closing: the request fit under the
            // limit and the client is blocked on a response.
            Err(_) => break,
            Ok(Ok(0)) => {
                log::debug!("client {peer} closed while sending");
                break;
            }
            Ok(Ok(n)) => {
                let take = n.min(limit - dump.len());
                dump.extend_from_slice(&buf[..take]);
            }
            Ok(Err(err)) => {
                log::warn!("failed to read from {peer}: {err}");
                break;
            }
        }
    }

    log::debug!("captured {} bytes from {peer}", dump.len());
    Ok(dump)
}

#[cfg(test)]
mod tests {
    use tokio::{io::AsyncWriteExt, net::TcpStream};

    use super::*;

    #[tokio::test]
    async fn capture_truncates_at_the_limit() {
        let listener = bind(&Config::default()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(&[b'a'; 300]).await.unwrap();
            // Hold the socket open like a client awaiting a response.
            let mut sink = [0u8; 1];
            let _ = stream.read(&mut sink).await;
        });

        let dump = capture(&listener, 256).await.unwrap();
        assert_eq!(dump, vec![b'a'; 256]);
        client.await.unwrap();
    }

    #[tokio::test]
    async fn capture_returns_short_input_after_idle() {
        let listener = bind(&Config::default()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"tiny").await.unwrap();
            let mut sink = [0u8; 1];
            let _ = stream.read(&mut sink).await;
        });

        let dump = capture(&listener, 1024).await.unwrap();
        assert_eq!(dump, b"tiny");
        client.await.unwrap();
    }
}
