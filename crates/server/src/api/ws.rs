//! WebSocket discovery sessions.
//!
//! Each connection owns one `DiscoverySession`. The client sends keystrokes,
//! the server answers with the rendered page after every state change.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use moviescout_core::{render_page, DiscoverySession, PageView};

use crate::metrics::{WS_MESSAGES, WS_SESSIONS_ACTIVE, WS_SESSIONS_TOTAL};
use crate::state::AppState;

/// Message sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The search box changed.
    Input { term: String },
}

/// Message sent to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full page after a state change.
    Page(PageView),
    /// The last client message could not be understood.
    Error { message: String },
}

impl ServerMessage {
    fn kind(&self) -> &'static str {
        match self {
            Self::Page(_) => "page",
            Self::Error { .. } => "error",
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    WS_SESSIONS_TOTAL.inc();
    WS_SESSIONS_ACTIVE.inc();
    info!("WebSocket client connected");

    let outgoing = sender.with(|text: String| async move {
        Ok::<_, axum::Error>(Message::Text(text.into()))
    });
    let incoming = receiver.filter_map(|result| async move {
        match result {
            Ok(Message::Text(text)) => Some(Frame::Text(text.as_str().to_string())),
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                Some(Frame::Close)
            }
            // Pong is handled automatically by axum
            Ok(_) => None,
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                Some(Frame::Close)
            }
        }
    });

    run_session(&state, Box::pin(incoming), Box::pin(outgoing)).await;

    WS_SESSIONS_ACTIVE.dec();
    info!("WebSocket client disconnected");
}

/// One inbound frame, reduced to what the session cares about.
#[derive(Debug)]
pub enum Frame {
    Text(String),
    Close,
}

/// Drive a discovery session until the client goes away.
///
/// The initial page is sent straight away; after that one page goes out per
/// state change. Dropping the session at the end cancels any pending
/// debounce, while fetches already started finish in the background.
pub async fn run_session<I, O>(state: &AppState, mut incoming: I, mut outgoing: O)
where
    I: Stream<Item = Frame> + Unpin,
    O: Sink<String> + Unpin,
    O::Error: Display,
{
    let session = DiscoverySession::start(
        state.catalog(),
        state.trending(),
        state.session_options(),
    );
    let render_options = state.render_options();
    let mut updates = session.subscribe();

    let initial = ServerMessage::Page(render_page(&session.snapshot(), &render_options));
    if !send(&mut outgoing, &initial).await {
        return;
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = render_page(&updates.borrow_and_update(), &render_options);
                if !send(&mut outgoing, &ServerMessage::Page(view)).await {
                    break;
                }
            }
            frame = incoming.next() => {
                match frame {
                    Some(Frame::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Input { term }) => {
                            WS_MESSAGES.with_label_values(&["in", "input"]).inc();
                            session.input(&term);
                        }
                        Err(e) => {
                            debug!("Ignoring malformed client message: {}", e);
                            let reply = ServerMessage::Error {
                                message: format!("Invalid message: {}", e),
                            };
                            if !send(&mut outgoing, &reply).await {
                                break;
                            }
                        }
                    },
                    Some(Frame::Close) | None => break,
                }
            }
        }
    }
}

/// Serialize and send; false once the client is gone.
async fn send<O>(outgoing: &mut O, msg: &ServerMessage) -> bool
where
    O: Sink<String> + Unpin,
    O::Error: Display,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize ServerMessage: {}", e);
            return true;
        }
    };

    match outgoing.send(json).await {
        Ok(()) => {
            WS_MESSAGES.with_label_values(&["out", msg.kind()]).inc();
            true
        }
        Err(e) => {
            debug!("WebSocket send failed, client disconnected: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use moviescout_core::testing::{fixtures, MockMovieCatalog, MockResponse, MockTrendingStore};
    use moviescout_core::{Config, MovieQuery, SectionView};
    use std::time::Duration;

    struct Client {
        input: mpsc::UnboundedSender<Frame>,
        output: mpsc::UnboundedReceiver<String>,
    }

    impl Client {
        fn type_term(&self, term: &str) {
            let msg = serde_json::json!({ "type": "input", "term": term }).to_string();
            self.input.unbounded_send(Frame::Text(msg)).unwrap();
        }

        /// Next page whose view satisfies `pred`.
        async fn page_where(&mut self, pred: impl Fn(&PageView) -> bool) -> PageView {
            loop {
                let text = self.output.next().await.expect("session ended");
                if let ServerMessage::Page(view) = serde_json::from_str(&text).unwrap() {
                    if pred(&view) {
                        return view;
                    }
                }
            }
        }
    }

    fn connect(state: Arc<AppState>) -> (Client, tokio::task::JoinHandle<()>) {
        let (input_tx, input_rx) = mpsc::unbounded();
        let (output_tx, output_rx) = mpsc::unbounded();
        let task = tokio::spawn(async move {
            run_session(&state, input_rx, output_tx).await;
        });
        (
            Client {
                input: input_tx,
                output: output_rx,
            },
            task,
        )
    }

    fn settled(view: &PageView) -> bool {
        !view.movies.is_loading() && !view.trending.is_loading()
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_renders_mount_then_search() {
        let catalog = Arc::new(MockMovieCatalog::new());
        catalog
            .set_response(MovieQuery::Discover, MockResponse::Movies(fixtures::movies(3)))
            .await;
        catalog
            .set_response(
                MovieQuery::from_term("bat"),
                MockResponse::Movies(vec![fixtures::movie(268, "Batman")]),
            )
            .await;
        let trending = Arc::new(MockTrendingStore::new());
        let state = Arc::new(AppState::new(Config::default(), catalog.clone(), trending));

        let (mut client, task) = connect(state);

        let mounted = client
            .page_where(|v| settled(v) && v.movies.items().is_some())
            .await;
        assert_eq!(mounted.movies.items().unwrap().len(), 3);
        assert!(matches!(mounted.trending, SectionView::Empty { .. }));

        client.type_term("b");
        client.type_term("ba");
        client.type_term("bat");
        let echoed = client.page_where(|v| v.search_term == "bat").await;
        assert_eq!(echoed.search_term, "bat");

        tokio::time::sleep(Duration::from_millis(600)).await;
        let searched = client
            .page_where(|v| {
                settled(v) && v.movies.items().map(|m| m.len() == 1).unwrap_or(false)
            })
            .await;
        assert_eq!(searched.movies.items().unwrap()[0].title, "Batman");
        assert_eq!(
            catalog.recorded_queries().await,
            vec![MovieQuery::Discover, MovieQuery::Search("bat".to_string())]
        );

        drop(client);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_message_gets_error_reply() {
        let state = Arc::new(AppState::new(
            Config::default(),
            Arc::new(MockMovieCatalog::new()),
            Arc::new(MockTrendingStore::new()),
        ));
        let (mut client, task) = connect(state);

        client
            .input
            .unbounded_send(Frame::Text("{\"type\":\"shout\"}".to_string()))
            .unwrap();

        loop {
            let text = client.output.next().await.unwrap();
            if let ServerMessage::Error { message } = serde_json::from_str(&text).unwrap() {
                assert!(message.starts_with("Invalid message"));
                break;
            }
        }

        client.input.unbounded_send(Frame::Close).unwrap();
        task.await.unwrap();
    }
}
