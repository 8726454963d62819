use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::Endpoint;

/// Serve frames over the process's stdin/stdout, one JSON object per line.
/// Must be called inside a tokio runtime.
pub fn stdio() -> Endpoint {
    line_delimited(tokio::io::stdin(), tokio::io::stdout())
}

/// Frame transport over any byte stream pair, one frame per line. Blank
/// lines are skipped. The reader task ends at EOF, which closes the
/// endpoint's `incoming` queue.
pub fn line_delimited<R, W>(reader: R, writer: W) -> Endpoint
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (in_tx, in_rx) = mpsc::unbounded_channel::<String>();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if in_tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("frame reader reached end of input");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "frame reader failed");
                    break;
                }
            }
        }
    });

    tokio::spawn(async move {
        let mut writer = writer;
        while let Some(frame) = out_rx.recv().await {
            let written = async {
                writer.write_all(frame.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await
            }
            .await;
            if let Err(e) = written {
                warn!(error = %e, "frame writer failed");
                break;
            }
        }
    });

    Endpoint::new(out_tx, in_rx)
}
