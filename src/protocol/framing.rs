//! Length-prefixed framing of the SimSpark network protocol.
//!
//! Each frame is a 32 bit unsigned length in network byte order followed by
//! that many bytes of UTF-8 text: `[u32 length][payload bytes]`. Both the
//! agent port and the monitor port use the same framing.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::{AgentError, Result};

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest payload a header can announce. Anything above reads as negative,
/// which the peer takes for a shutdown.
pub const MAX_PAYLOAD_LEN: usize = i32::MAX as usize;

/// Length prefix for a payload of `len` bytes.
pub fn length_header(len: usize) -> io::Result<[u8; HEADER_LEN]> {
    match i32::try_from(len) {
        Ok(len) => Ok(len.to_be_bytes()),
        Err(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{len} byte payload exceeds the {MAX_PAYLOAD_LEN} byte frame limit"),
        )),
    }
}

/// Encodes `text` as one frame.
///
/// The content is not validated; only its length is checked.
pub fn encode(text: &str) -> io::Result<Vec<u8>> {
    let body = text.as_bytes();
    let header = length_header(body.len())?;
    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(body);
    Ok(frame)
}

/// Interprets a length header, rejecting values that are negative when read
/// as signed (the server signals shutdown this way).
pub fn payload_len(header: [u8; HEADER_LEN]) -> Result<usize> {
    let signed = i32::from_be_bytes(header);
    if signed < 0 {
        return Err(AgentError::ServerDown { header: signed });
    }
    Ok(signed as usize)
}

/// Writes one frame and flushes the stream.
pub async fn write_frame<W>(stream: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&encode(text)?).await?;
    stream.flush().await?;
    trace!("Sent frame ({} bytes): {}", text.len(), text);
    Ok(())
}

/// Reads the oldest pending frame from the stream.
///
/// Blocks until the full header and the full payload have arrived; short
/// reads from the transport are accumulated. Nothing past the header is
/// consumed when the header is negative.
pub async fn read_frame<R>(stream: &mut R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header).await.map_err(|e| {
        AgentError::connection_io(
            "Error when reading from socket. Has the server been shut down?",
            e,
        )
    })?;
    let len = payload_len(header)?;

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await.map_err(|e| {
        AgentError::connection_io(
            format!("Server closed the connection inside a {len} byte frame"),
            e,
        )
    })?;

    let text = String::from_utf8(payload).map_err(|source| AgentError::InvalidPayload { source })?;
    trace!("Received frame ({} bytes)", len);
    Ok(text)
}
