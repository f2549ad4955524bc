// WebSocket client for the backend's test-session channel.

use futures_util::stream::Stream;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::protocol::ClientMessage;

/// Events emitted by the socket client to the application layer.
#[derive(Debug, PartialEq)]
pub enum WsEvent {
    /// The socket handshake with the backend completed.
    Connected { url: String },
    /// The socket closed or failed.
    Disconnected,
    /// A text message was received from the server (raw JSON string).
    Message(String),
}

/// Connect to `url` and pump the socket until it closes.
///
/// Incoming text frames are forwarded through `tx` as [`WsEvent::Message`];
/// messages arriving on `outgoing` are serialized and written to the socket.
/// There is no reconnect: a closed socket, or a handshake that never
/// completes, emits [`WsEvent::Disconnected`] and the function returns.
pub async fn run(
    url: &str,
    tx: mpsc::Sender<WsEvent>,
    outgoing: mpsc::Receiver<ClientMessage>,
) -> anyhow::Result<()> {
    let ws_stream = match tokio_tungstenite::connect_async(url).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            let _ = tx.send(WsEvent::Disconnected).await;
            return Err(anyhow::Error::new(e).context(format!("failed to connect to {url}")));
        }
    };
    info!("WebSocket connected to {url}");

    if tx
        .send(WsEvent::Connected {
            url: url.to_string(),
        })
        .await
        .is_err()
    {
        return Ok(());
    }

    let (write, read) = ws_stream.split();
    let writer = tokio::spawn(async move {
        if let Err(e) = forward_outgoing(write, outgoing).await {
            warn!("WebSocket write failed: {e}");
        }
    });

    let _ = process_message_stream(read, &tx, url).await;
    writer.abort();

    let _ = tx.send(WsEvent::Disconnected).await;
    info!("WebSocket to {url} closed");
    Ok(())
}

/// Serialize each [`ClientMessage`] from `rx` and write it to `sink` as a
/// text frame. Returns when `rx` closes or a write fails.
pub async fn forward_outgoing<S>(
    mut sink: S,
    mut rx: mpsc::Receiver<ClientMessage>,
) -> anyhow::Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    while let Some(msg) = rx.recv().await {
        let json = serde_json::to_string(&msg)?;
        debug!("sending socket message: {json}");
        sink.send(Message::Text(json.into())).await?;
    }
    Ok(())
}

/// Process raw WebSocket [`Message`] items from any [`Stream`], forwarding
/// text payloads through `tx`. Returns `Err(())` if the channel is closed
/// (receiver dropped), signalling the caller to stop.
pub async fn process_message_stream<St>(
    mut stream: St,
    tx: &mpsc::Sender<WsEvent>,
    url: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if tx.send(WsEvent::Message(text.to_string())).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Server {url} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {url}: {e}");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(())
}
