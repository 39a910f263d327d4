//! Newline-delimited JSON framing.
//!
//! One UTF-8 JSON object per line, one line per envelope. The request/reply
//! discipline allows at most one outstanding request per connection, so no
//! message ids or length prefixes are needed.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Error, Result};

/// Write one envelope followed by a newline, then flush.
pub async fn write_envelope<W, T>(writer: &mut W, envelope: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let mut line = serde_json::to_vec(envelope)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one raw line. `Ok(None)` signals clean end-of-stream.
pub async fn read_line<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Read one envelope of the expected shape.
pub async fn read_envelope<R, T>(reader: &mut R) -> Result<T>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    match read_line(reader).await? {
        Some(line) => Ok(serde_json::from_str(&line)?),
        None => Err(Error::ConnectionClosed),
    }
}
