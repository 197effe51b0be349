//! WebSocket transport implementation using `tokio-tungstenite`.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Opens a WebSocket connection to the given `ws://` URL.
pub async fn connect(url: &str) -> Result<WsConnection, TransportError> {
    let (ws, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(TransportError::ConnectFailed)?;
    tracing::debug!(url, "WebSocket connection established");
    Ok(WsConnection { ws })
}

/// A live client-side WebSocket connection.
pub struct WsConnection {
    ws: WsStream,
}

impl WsConnection {
    /// Splits the connection into independent halves, so one task can
    /// write while another blocks on reads.
    pub fn split(self) -> (WsSink, WsSource) {
        let (sink, stream) = self.ws.split();
        (WsSink { sink }, WsSource { stream })
    }
}

/// The outbound half: sends text frames and closes the socket.
pub struct WsSink {
    sink: SplitSink<WsStream, Message>,
}

impl WsSink {
    /// Sends one text frame to the server.
    pub async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(TransportError::SendFailed)
    }

    /// Starts the closing handshake.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.sink.close().await.map_err(TransportError::SendFailed)
    }
}

/// The inbound half: yields text payloads in transport order.
pub struct WsSource {
    stream: SplitStream<WsStream>,
}

impl WsSource {
    /// Receives the next text payload.
    ///
    /// Returns `Ok(None)` when the peer closes cleanly. Binary frames are
    /// accepted when they hold valid UTF-8; ping/pong frames are skipped.
    pub async fn next_text(
        &mut self,
    ) -> Result<Option<String>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    match String::from_utf8(data.to_vec()) {
                        Ok(text) => return Ok(Some(text)),
                        Err(_) => {
                            tracing::debug!(
                                "skipping non-UTF-8 binary frame"
                            );
                            continue;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(e));
                }
            }
        }
    }
}
