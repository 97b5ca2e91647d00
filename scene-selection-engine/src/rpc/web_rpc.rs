use crate::store::actions::{ViewerAction, ViewerStore};
use crate::store::state::{DialogType, HighlightFilterState, ProjectStateChanged, UiStateChanged};
use crate::tools::selection::highlight::{SelectableMetadata, SelectableQuery};
use crate::tools::selection::info::SelectionInfo;
use crate::tools::tool_manager::{ClearToolEvent, ToolSelectionEvent, ToolSelectionSource, ToolType};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication with the embedding page.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued since the last send.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    /// Responses queued since the last send.
    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Selected object as reported to the frontend details panel.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SelectedObject {
    pub entity: u64,
    pub name: String,
    pub category: String,
}

/// Selection as reported by `get_selection` and `selection_changed`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SelectionSummary {
    pub entities: Vec<u64>,
    pub current_index: usize,
    pub current: Option<SelectedObject>,
}

impl SelectionSummary {
    /// `describe` resolves a hit entity to its selectable owner.
    pub fn new(
        info: &SelectionInfo,
        describe: impl Fn(Entity) -> Option<(Entity, SelectableMetadata)>,
    ) -> Self {
        let current = info
            .current_selected()
            .and_then(describe)
            .map(|(entity, metadata)| SelectedObject {
                entity: entity.to_bits(),
                name: metadata.name,
                category: metadata.category,
            });
        Self {
            entities: info.selected_entities().iter().map(|e| e.to_bits()).collect(),
            current_index: info.current_index(),
            current,
        }
    }
}

/// Everything a batch of RPC requests asks the rest of the app to do.
#[derive(Debug, Default)]
pub struct RpcEffects {
    pub tool_events: Vec<ToolSelectionEvent>,
    pub clear_events: Vec<ClearToolEvent>,
    pub actions: Vec<ViewerAction>,
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_observer(notify_tool_state_changed)
            .add_observer(notify_selection_changed)
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Ownership moves to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw RPC message from the frontend.
#[derive(Event, Debug, Clone)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    store: Res<ViewerStore>,
    selectables: SelectableQuery,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut clear_events: EventWriter<ClearToolEvent>,
    mut actions: EventWriter<ViewerAction>,
) {
    let mut effects = RpcEffects::default();
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                let selection = || {
                    SelectionSummary::new(&store.project().selection_info, |entity| {
                        describe_selectable(&selectables, entity)
                    })
                };
                if let Some(response) = handle_rpc_request(&request, selection, &mut effects) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
            }
        }
    }

    tool_events.write_batch(effects.tool_events);
    clear_events.write_batch(effects.clear_events);
    actions.write_batch(effects.actions);
}

fn describe_selectable(
    selectables: &SelectableQuery,
    entity: Entity,
) -> Option<(Entity, SelectableMetadata)> {
    selectables
        .describe(entity)
        .map(|(owner, metadata)| (owner, metadata.clone()))
}

/// Handle individual RPC request and generate response based on method.
/// `selection` is only evaluated by `get_selection`.
pub fn handle_rpc_request(
    request: &RpcRequest,
    selection: impl FnOnce() -> SelectionSummary,
    effects: &mut RpcEffects,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "tool_selection" => handle_tool_selection(&request.params, effects),
        "clear_tool" => {
            effects.clear_events.push(ClearToolEvent {
                source: ToolSelectionSource::Rpc,
            });
            Ok(serde_json::json!({ "success": true }))
        }
        "open_dialog" => handle_open_dialog(&request.params, effects),
        "close_dialog" => {
            effects.actions.push(ViewerAction::CloseSubDialog);
            Ok(serde_json::json!({ "success": true }))
        }
        "set_highlight_filter" => handle_set_highlight_filter(&request.params, effects),
        "clear_selection" => {
            effects
                .actions
                .push(ViewerAction::SelectObjects(SelectionInfo::default()));
            Ok(serde_json::json!({ "success": true }))
        }
        "get_selection" => serde_json::to_value(selection())
            .map_err(|e| RpcError::internal_error(&format!("Failed to encode selection: {e}"))),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({ "method": request.method })),
            })
        }
    };

    // Notifications (no id) get no response.
    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_tool_selection(
    params: &serde_json::Value,
    effects: &mut RpcEffects,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ToolSelectionParams {
        tool: String,
    }

    let tool_params = serde_json::from_value::<ToolSelectionParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'tool' parameter"))?;

    let tool_type = ToolType::from_string(&tool_params.tool)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown tool: {}", tool_params.tool)))?;

    effects.tool_events.push(ToolSelectionEvent {
        tool_type,
        source: ToolSelectionSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "active_tool": tool_type.as_str()
    }))
}

fn handle_open_dialog(
    params: &serde_json::Value,
    effects: &mut RpcEffects,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct OpenDialogParams {
        dialog: String,
    }

    let dialog_params = serde_json::from_value::<OpenDialogParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'dialog' parameter"))?;

    let dialog = DialogType::from_string(&dialog_params.dialog).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown dialog: {}", dialog_params.dialog))
    })?;

    effects.actions.push(ViewerAction::OpenSubDialog(dialog));
    Ok(serde_json::json!({
        "success": true,
        "dialog": dialog.as_str()
    }))
}

fn handle_set_highlight_filter(
    params: &serde_json::Value,
    effects: &mut RpcEffects,
) -> Result<serde_json::Value, RpcError> {
    let filter = if params.is_null() {
        HighlightFilterState::default()
    } else {
        serde_json::from_value::<HighlightFilterState>(params.clone()).map_err(|_| {
            RpcError::invalid_params("Expected optional 'filter_key' and 'group_key' strings")
        })?
    };

    let active = filter.is_active();
    effects.actions.push(ViewerAction::SetHighlightFilter(filter));
    Ok(serde_json::json!({
        "success": true,
        "active": active
    }))
}

fn notify_tool_state_changed(
    trigger: Trigger<UiStateChanged>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let UiStateChanged(state) = trigger.event();
    let active_tool = state.tool_state.active_tool();
    rpc_interface.send_notification(
        "tool_state_changed",
        serde_json::json!({
            "tool": active_tool.map(|tool| tool.as_str()),
            "active": active_tool.is_some(),
            "dialog": state.active_sub_dialog.as_str()
        }),
    );
}

fn notify_selection_changed(
    trigger: Trigger<ProjectStateChanged>,
    mut last_sent: Local<SelectionInfo>,
    selectables: SelectableQuery,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let ProjectStateChanged(state) = trigger.event();
    if *last_sent == state.selection_info {
        return;
    }
    *last_sent = state.selection_info.clone();

    let summary = SelectionSummary::new(&state.selection_info, |entity| {
        describe_selectable(&selectables, entity)
    });
    match serde_json::to_value(&summary) {
        Ok(params) => rpc_interface.send_notification("selection_changed", params),
        Err(e) => error!("Failed to encode selection summary: {}", e),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Responses after notifications to keep ordering.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
