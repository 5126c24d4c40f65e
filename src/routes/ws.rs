//! WebSocket handler: layout editor session.
//!
//! DESIGN
//! ======
//! Each connection owns one `LayoutStore` and enters a `select!` loop:
//! - Incoming client frames → parse + dispatch by syscall prefix
//! - Layout document changes from the store subscription → adopt and push
//!
//! Handler functions mutate the session's store and return an `Outcome`.
//! The dispatch layer turns outcomes into reply frames. Persistence is the
//! store's concern: mutations spawn their own writes and handlers never wait
//! on them.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade (admins only) → subscribe → fetch layout
//! 2. Send `session:connected` with the store snapshot
//! 3. Client sends frames → dispatch → handler returns Outcome
//! 4. Remote layout writes → `layout:changed` request frame
//! 5. Close → drop the store and its subscription

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::auth::AdminUser;
use crate::frame::{Data, Frame, Status};
use crate::layout::preview::render_preview;
use crate::layout::{ComponentDescriptor, LayoutStore, PreviewClick, PreviewMode, Settings, panel};
use crate::state::AppState;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. The dispatch layer owns replies.
enum Outcome {
    /// Send done + the full store snapshot to the sender.
    Snapshot,
    /// Send done + data to the sender.
    Reply(Data),
}

// =============================================================================
// UPGRADE
// =============================================================================

/// `GET /api/layout/ws`: editor session, admin only.
pub async fn handle_ws(State(state): State<AppState>, admin: AdminUser, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state, admin.email))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, email: String) {
    let session_id = Uuid::new_v4();
    let mut store = LayoutStore::new(state.docs.clone());

    // Subscribe before the first read so no write slips between them.
    let mut changes = store.subscribe();
    store.fetch_layout().await;

    let welcome = Frame::request("session:connected", snapshot_data(&store)).with_data("session_id", session_id.to_string());
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    info!(%session_id, %email, "ws: editor connected");

    'session: loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        for frame in process_inbound_text(&mut store, &email, &text).await {
                            if send_frame(&mut socket, &frame).await.is_err() {
                                break 'session;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            change = changes.next() => {
                let Some(value) = change else {
                    warn!(%session_id, "ws: document store closed; ending session");
                    break;
                };
                if let Some(frame) = process_remote_change(&mut store, value)
                    && send_frame(&mut socket, &frame).await.is_err()
                {
                    break;
                }
            }
        }
    }

    info!(%session_id, "ws: editor disconnected");
}

/// Adopt a pushed layout and build the notification for the client, if the
/// local layout actually changed.
fn process_remote_change(store: &mut LayoutStore, value: Option<serde_json::Value>) -> Option<Frame> {
    store.apply_remote_value(value).then(|| Frame::request("layout:changed", snapshot_data(store)))
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the sender.
///
/// Kept apart from the socket so tests can drive a session end to end.
async fn process_inbound_text(store: &mut LayoutStore, email: &str, text: &str) -> Vec<Frame> {
    let mut req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new()).with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    req.from = Some(email.to_owned());
    if req.status != Status::Request {
        return vec![req.error("only request frames are accepted")];
    }
    debug!(id = %req.id, syscall = %req.syscall, "ws: recv frame");

    let result = match req.prefix() {
        "layout" => handle_layout(store, &req).await,
        "panel" => handle_panel(store, &req),
        prefix => Err(req.error(format!("unknown prefix: {prefix}"))),
    };

    match result {
        Ok(Outcome::Snapshot) => vec![req.done_with(snapshot_data(store))],
        Ok(Outcome::Reply(data)) => vec![req.done_with(data)],
        Err(err_frame) => vec![err_frame],
    }
}

// =============================================================================
// LAYOUT HANDLERS
// =============================================================================

async fn handle_layout(store: &mut LayoutStore, req: &Frame) -> Result<Outcome, Frame> {
    match req.op() {
        "fetch" => {
            store.fetch_layout().await;
            Ok(Outcome::Snapshot)
        }
        "select" => {
            let selected = match req.data.get("component_id").and_then(|v| v.as_str()) {
                None => None,
                Some(id) => Some(find_component(store, req, id)?),
            };
            store.set_selected_component(selected.as_ref());
            Ok(Outcome::Snapshot)
        }
        "click" => {
            let target = req.data.get("component_id").and_then(|v| v.as_str());
            store.handle_preview_click(PreviewClick::from_target(target));
            Ok(Outcome::Snapshot)
        }
        "mode" => {
            let raw = str_field(req, "mode")?;
            let Some(mode) = PreviewMode::parse(raw) else {
                return Err(req.error(format!("unknown preview mode: {raw}")));
            };
            store.set_preview_mode(mode);
            Ok(Outcome::Snapshot)
        }
        "update" => {
            let id = str_field(req, "component_id")?;
            let Some(serde_json::Value::Object(settings)) = req.data.get("settings") else {
                return Err(req.error("settings object required"));
            };
            require_written(req, store.update_component(id, settings.clone()))
        }
        "order" => {
            let Some(raw) = req.data.get("components") else {
                return Err(req.error("components required"));
            };
            let components = serde_json::from_value::<Vec<ComponentDescriptor>>(raw.clone())
                .map_err(|e| req.error(format!("invalid components: {e}")))?;
            require_written(req, store.update_component_order(components))
        }
        "toggle" => {
            let id = str_field(req, "component_id")?;
            require_written(req, store.toggle_component_visibility(id))
        }
        "theme" => {
            let key = str_field(req, "key")?;
            let value = str_field(req, "value")?;
            let mut written = None;
            panel::dispatch_theme_edit(key, value, |k, v| written = store.update_theme(k, v))
                .map_err(|e| req.error_from(&e))?;
            require_written(req, written)
        }
        "preview" => {
            let Some(layout) = store.layout() else {
                return Err(req.error("layout not loaded"));
            };
            let selected = store.selected_component().map(|c| c.id.as_str());
            let html = render_preview(layout, store.preview_mode(), selected);
            Ok(Outcome::Reply(Data::from([("html".to_owned(), serde_json::Value::String(html))])))
        }
        op => Err(req.error(format!("unknown layout op: {op}"))),
    }
}

// =============================================================================
// PANEL HANDLERS
// =============================================================================

fn handle_panel(store: &mut LayoutStore, req: &Frame) -> Result<Outcome, Frame> {
    match req.op() {
        "view" => {
            let Some(layout) = store.layout() else {
                return Err(req.error("layout not loaded"));
            };
            let view = panel::view(layout, store.selected_component());
            let html = panel::render_html(&view);
            let mut data = Data::new();
            data.insert("panel".into(), serde_json::to_value(&view).unwrap_or_default());
            data.insert("html".into(), serde_json::Value::String(html));
            Ok(Outcome::Reply(data))
        }
        "edit" => {
            let Some(component) = store.selected_component().cloned() else {
                return Err(req.error("no component selected"));
            };
            let key = str_field(req, "key")?;
            let value = req.data.get("value").cloned().unwrap_or(serde_json::Value::Null);

            let mut written = None;
            panel::dispatch_edit(&component, key, value, |id, settings: Settings| {
                written = store.update_component(id, settings);
            })
            .map_err(|e| req.error_from(&e))?;
            require_written(req, written)
        }
        op => Err(req.error(format!("unknown panel op: {op}"))),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn str_field<'a>(req: &'a Frame, key: &str) -> Result<&'a str, Frame> {
    req.data
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| req.error(format!("{key} required")))
}

fn find_component(store: &LayoutStore, req: &Frame, id: &str) -> Result<ComponentDescriptor, Frame> {
    store
        .layout()
        .and_then(|layout| layout.component(id))
        .cloned()
        .ok_or_else(|| req.error(format!("unknown component: {id}")))
}

/// A mutation that returned no write handle changed nothing.
fn require_written(req: &Frame, written: Option<tokio::task::JoinHandle<()>>) -> Result<Outcome, Frame> {
    match written {
        Some(_) => Ok(Outcome::Snapshot),
        None => Err(req.error("layout unchanged: not loaded, unknown component or invalid order")),
    }
}

fn snapshot_data(store: &LayoutStore) -> Data {
    match serde_json::to_value(store.snapshot()) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
        _ => Data::new(),
    }
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == Status::Error {
        let message = frame.data.get("message").and_then(|v| v.as_str()).unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, message, "ws: send frame status=Error");
    } else {
        debug!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
