use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{
    Body, Client, Request,
    header::{CONTENT_LENGTH, TRANSFER_ENCODING},
    multipart::{Form, Part},
};
use tokio::fs::File;

use crate::pattern::ReqPattern;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack added to the declared size by the wrong-Content-Length pattern, so
/// the dump shows framing that promises more bytes than the body has.
const WRONG_LEN_SLACK: u64 = 512;

/// Build and fire one request at the dump listener. The listener reads its
/// fill and hangs up without answering, so the transport reporting a dead
/// connection is the normal outcome and only gets logged. Errors raised
/// before the request hits the wire still bubble up.
pub async fn send(pattern: ReqPattern, filename: &str, base_url: &str) -> Result<()> {
    let client = Client::builder().timeout(SEND_TIMEOUT).build()?;

    let req = build(&client, pattern, filename, base_url).await?;
    if let Err(err) = client.execute(req).await {
        log::debug!("transport error (dump listener hung up): {err}");
    }
    Ok(())
}

pub async fn build(
    client: &Client,
    pattern: ReqPattern,
    filename: &str,
    base_url: &str,
) -> Result<Request> {
    let size = if pattern.needs_len() {
        tokio::fs::metadata(filename)
            .await
            .with_context(|| format!("failed to stat {filename}"))?
            .len()
    } else {
        0
    };

    match pattern {
        ReqPattern::SizedStream => sized_stream(client, base_url, filename, size).await,
        ReqPattern::PlainStream => plain_stream(client, base_url, filename).await,
        ReqPattern::WrongLen => wrong_len(client, base_url, filename, size).await,
        ReqPattern::Buffered => buffered(client, base_url, filename).await,
        ReqPattern::ExplicitChunked => explicit_chunked(client, base_url, filename).await,
        ReqPattern::Multipart => multipart(client, base_url, filename).await,
    }
}

async fn open(filename: &str) -> Result<File> {
    File::open(filename)
        .await
        .with_context(|| format!("failed to open {filename}"))
}

async fn read_all(filename: &str) -> Result<Vec<u8>> {
    tokio::fs::read(filename)
        .await
        .with_context(|| format!("failed to read {filename}"))
}

/// Single-part PUT, streaming the file with its exact size declared, so the
/// client frames the body with Content-Length instead of chunking it.
async fn sized_stream(client: &Client, url: &str, filename: &str, size: u64) -> Result<Request> {
    let file = open(filename).await?;
    let req = client
        .put(url)
        .header(CONTENT_LENGTH, size)
        .body(Body::from(file))
        .build()?;
    Ok(req)
}

/// Single-part PUT, streaming the file with no declared size. The client has
/// to fall back to Transfer-Encoding: chunked.
async fn plain_stream(client: &Client, url: &str, filename: &str) -> Result<Request> {
    let file = open(filename).await?;
    let req = client.put(url).body(Body::from(file)).build()?;
    Ok(req)
}

/// Single-part PUT, streaming the file but declaring an inflated size via a
/// directly-set Content-Length header. The header is taken as authoritative
/// framing, so the wire shows a promise the body cannot keep.
async fn wrong_len(client: &Client, url: &str, filename: &str, size: u64) -> Result<Request> {
    let file = open(filename).await?;
    let req = client
        .put(url)
        .header(CONTENT_LENGTH, size + WRONG_LEN_SLACK)
        .body(Body::from(file))
        .build()?;
    Ok(req)
}

/// Single-part PUT with the file buffered in memory first. The size is known,
/// so the client sets Content-Length on its own.
async fn buffered(client: &Client, url: &str, filename: &str) -> Result<Request> {
    let buf = read_all(filename).await?;
    let req = client.put(url).body(buf).build()?;
    Ok(req)
}

/// Single-part PUT, buffered, but with Transfer-Encoding: chunked set
/// explicitly so the known size gets ignored in favor of chunked framing.
async fn explicit_chunked(client: &Client, url: &str, filename: &str) -> Result<Request> {
    let buf = read_all(filename).await?;
    let req = client
        .put(url)
        .header(TRANSFER_ENCODING, "chunked")
        .body(buf)
        .build()?;
    Ok(req)
}

/// Multipart POST: the file becomes one fully buffered form part named
/// "file", carrying the original filename, so the form's total size is known
/// and the client can set Content-Length for the whole body.
async fn multipart(client: &Client, url: &str, filename: &str) -> Result<Request> {
    let buf = read_all(filename).await?;
    let part = Part::bytes(buf)
        .file_name(filename.to_string())
        .mime_str("application/octet-stream")?;
    let form = Form::new().part("file", part);

    let req = client.post(url).multipart(form).build()?;
    Ok(req)
}
