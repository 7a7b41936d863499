use crate::api;
use crate::protocol::{parse_line, Response};
use sorter_core::Sorter;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Reads one JSON request per line and writes one JSON response per line.
/// Requests run concurrently, so responses may arrive out of order; match
/// them by `id`. Returns when the input closes and every reply is written.
pub async fn serve<R, W>(sorter: Arc<Sorter>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::channel::<Response>(64);

    let read = async move {
        let mut lines = reader.lines();
        let mut accepted = 0u64;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            accepted += 1;
            let (id, parsed) = parse_line(&line);
            let tx = tx.clone();
            match parsed {
                Ok(req) => {
                    let sorter = Arc::clone(&sorter);
                    tokio::spawn(async move {
                        let mut resp = api::handle(&sorter, req).await;
                        resp.id = id;
                        let _ = tx.send(resp).await;
                    });
                }
                Err(message) => {
                    warn!(%message, "rejected request line");
                    let mut resp = Response::failure(400, "bad_request", message);
                    resp.id = id;
                    let _ = tx.send(resp).await;
                }
            }
        }
        info!(requests = accepted, "input closed");
        anyhow::Ok(())
    };

    let write = async {
        while let Some(resp) = rx.recv().await {
            let mut line = serde_json::to_vec(&resp)?;
            line.push(b'\n');
            writer.write_all(&line).await?;
            writer.flush().await?;
        }
        anyhow::Ok(())
    };

    let (read_result, write_result) = tokio::join!(read, write);
    read_result?;
    write_result
}
