//! Per-connection WebSocket handler.
//!
//! Keeps framing and heartbeats at the edge: the session registers itself
//! with the connection registry, forwards pushed events as JSON text frames,
//! and answers pings. The contract pings every 5s and considers a connection
//! idle after 10s without client traffic; tests shorten both intervals.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::{ConnectionRegistry, PushEvent};
use crate::domain::UserId;

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

enum SessionEnd {
    ClientClosed,
    StreamClosed,
    HeartbeatTimeout,
    RegistryDropped,
    Protocol(ProtocolError),
    Network(Closed),
}

/// Drive one connection until either side closes it.
pub(super) async fn run(
    registry: Arc<dyn ConnectionRegistry>,
    user: UserId,
    mut session: Session,
    mut stream: MessageStream,
) {
    let (sender, mut events) = mpsc::unbounded_channel::<PushEvent>();
    let connection = registry.register(user, sender);

    let mut last_heartbeat = Instant::now();
    let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

    let end = loop {
        let result = tokio::select! {
            _ = heartbeat.tick() => {
                heartbeat_tick(&mut session, last_heartbeat).await
            }
            event = events.recv() => {
                match event {
                    Some(event) => forward_event(&mut session, event).await,
                    None => Err(SessionEnd::RegistryDropped),
                }
            }
            message = stream.recv() => {
                handle_stream_message(&mut session, &mut last_heartbeat, message).await
            }
        };
        if let Err(end) = result {
            break end;
        }
    };

    registry.unregister(connection);
    log_shutdown(user, &end);
    let _ = session.close(None).await;
}

async fn heartbeat_tick(session: &mut Session, last_heartbeat: Instant) -> Result<(), SessionEnd> {
    if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionEnd::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionEnd::Network)
}

async fn forward_event(session: &mut Session, event: PushEvent) -> Result<(), SessionEnd> {
    match serde_json::to_string(&event) {
        Ok(body) => session.text(body).await.map_err(SessionEnd::Network),
        Err(err) => {
            warn!(error = %err, "push event failed to serialize");
            Ok(())
        }
    }
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionEnd> {
    let Some(message) = message else {
        return Err(SessionEnd::StreamClosed);
    };
    match message {
        Ok(Message::Ping(payload)) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionEnd::Network)
        }
        Ok(Message::Close(_)) => Err(SessionEnd::ClientClosed),
        // The push channel is one-way; any other client frame just proves
        // liveness.
        Ok(_) => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
        Err(err) => Err(SessionEnd::Protocol(err)),
    }
}

fn log_shutdown(user: UserId, end: &SessionEnd) {
    match end {
        SessionEnd::HeartbeatTimeout => {
            warn!(user = %user, "websocket heartbeat timeout; closing connection");
        }
        SessionEnd::Protocol(err) => {
            warn!(user = %user, error = %err, "websocket protocol error");
        }
        SessionEnd::Network(err) => {
            warn!(user = %user, error = %err, "websocket send failed; closing connection");
        }
        SessionEnd::RegistryDropped | SessionEnd::ClientClosed | SessionEnd::StreamClosed => {
            debug!(user = %user, "websocket connection closed");
        }
    }
}
