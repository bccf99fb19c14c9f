use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use ui::views::DashboardSelection;

use crate::{
    error::ApiError,
    state::{AppState, DashboardEvent, SelectionQuery},
};

pub async fn dashboard_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Response, ApiError> {
    let selection = query.selection()?;
    Ok(ws.on_upgrade(move |socket| stream_dashboard(socket, state, selection)))
}

/// Sends the full dashboard once, then one re-rendered panel per feed tick.
/// Text frames from the client replace the viewer's selection.
async fn stream_dashboard(mut socket: WebSocket, state: AppState, mut selection: DashboardSelection) {
    let mut ticks = state.store().subscribe_ticks();

    let connected = DashboardEvent::Connected {
        dashboard: Box::new(state.render_dashboard(selection)),
    };
    if send_event(&mut socket, &connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => match parse_selection(&text) {
                        Ok(next) => selection = next,
                        Err(error) => {
                            if send_event(&mut socket, &DashboardEvent::Error { error }).await.is_err() {
                                return;
                            }
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(error = %err, "dashboard socket closed with error");
                        return;
                    }
                }
            }
            tick = ticks.recv() => {
                match tick {
                    Ok(tick) => {
                        let event = state.slice_event(tick, selection);
                        if send_event(&mut socket, &event).await.is_err() {
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "dashboard socket lagged behind feed ticks");
                        continue;
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }
    }
}

fn parse_selection(text: &str) -> Result<DashboardSelection, String> {
    let query: SelectionQuery = serde_json::from_str(text).map_err(|err| err.to_string())?;
    query.selection().map_err(|err| err.to_string())
}

async fn send_event(socket: &mut WebSocket, event: &DashboardEvent) -> Result<(), ()> {
    let payload = serde_json::to_string(event).map_err(|_| ())?;
    socket.send(Message::Text(payload)).await.map_err(|_| ())
}
