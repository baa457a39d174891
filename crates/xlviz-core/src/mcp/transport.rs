//! Newline-delimited JSON transport
//!
//! Each message occupies exactly one line. Generic over the reader and
//! writer so the server can run on stdin/stdout or on in-memory pipes.

use super::error::McpError;
use super::protocol::McpResponse;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Line transport over an async reader/writer pair
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    line_buffer: String,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a transport from a reader/writer pair
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line_buffer: String::new(),
        }
    }

    /// Read the next non-empty line; `None` at end of input
    pub async fn receive_line(&mut self) -> Result<Option<String>, McpError> {
        loop {
            self.line_buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.line_buffer).await?;
            if bytes_read == 0 {
                return Ok(None);
            }

            let line = self.line_buffer.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }

    /// Write a response as a single line and flush
    pub async fn send(&mut self, response: &McpResponse) -> Result<(), McpError> {
        let json = serde_json::to_string(response)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_skips_blank_lines() {
        let input: &[u8] = b"\n  \n{\"a\":1}\n";
        let mut output = Vec::new();
        let mut transport = LineTransport::new(BufReader::new(input), &mut output);

        assert_eq!(
            transport.receive_line().await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(transport.receive_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_send_writes_one_line() {
        let mut output = Vec::new();
        {
            let input: &[u8] = b"";
            let mut transport = LineTransport::new(BufReader::new(input), &mut output);
            transport
                .send(&McpResponse::success(7i64, serde_json::json!({})))
                .await
                .unwrap();
        }
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
    }
}
