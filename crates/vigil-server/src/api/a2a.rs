//! A2A protocol endpoints
//!
//! One JSON-RPC endpoint at `/` carries the protocol methods, the agent
//! card is served from `/.well-known/agent.json`, and `message/stream`
//! responses go out as SSE frames.

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::{IntoResponse, Response, Sse},
    routing::{get, post},
};
use axum::response::sse::{Event, KeepAlive};
use futures::Stream;
use futures_util::StreamExt;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use vigil_a2a::{
    AgentCapabilities, AgentCard, AgentSkill, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    Message, MessageSendParams, Task, TaskIdParams,
};

use crate::auth::{AuthGate, m2m_auth};
use crate::events::{EventQueue, TaskEvent};
use crate::executor::{AgentExecutor, RequestContext};
use crate::tasks::TaskStore;

/// Shared state for the A2A endpoints.
#[derive(Clone)]
pub struct A2aState {
    pub card: AgentCard,
    pub tasks: Arc<dyn TaskStore>,
    pub executor: Arc<dyn AgentExecutor>,
}

/// Build the agent card advertised to orchestrators.
pub fn crime_agent_card(public_url: &str) -> AgentCard {
    let skills = vec![
        AgentSkill {
            id: "crime_emergency_response".to_string(),
            name: "Crime Emergency Response".to_string(),
            description:
                "Handle active crime emergencies such as robbery, assault, or burglary in progress"
                    .to_string(),
            tags: vec![
                "crime".to_string(),
                "emergency".to_string(),
                "safety".to_string(),
                "response".to_string(),
            ],
            examples: vec![
                "Guidance during an armed robbery".to_string(),
                "Steps to stay safe during an assault".to_string(),
                "Burglary in progress response".to_string(),
            ],
        },
        AgentSkill {
            id: "crime_complaint_intake".to_string(),
            name: "Crime Complaint Intake".to_string(),
            description:
                "Take in and process user complaints such as theft, vandalism, fraud, or disturbances"
                    .to_string(),
            tags: vec![
                "complaint".to_string(),
                "report".to_string(),
                "documentation".to_string(),
                "resolution".to_string(),
            ],
            examples: vec![
                "Report a stolen bicycle".to_string(),
                "File a noise complaint against neighbors".to_string(),
                "Log a vandalism complaint for broken windows".to_string(),
            ],
        },
    ];

    AgentCard {
        name: "crime_agent".to_string(),
        description:
            "Specialized crime response and complaint-handling agent, covering emergencies, general complaints (e.g., theft, noise, vandalism), and prevention guidance."
                .to_string(),
        url: public_url.to_string(),
        version: "1.0.0".to_string(),
        default_input_modes: vec!["text".to_string()],
        default_output_modes: vec!["text".to_string()],
        capabilities: AgentCapabilities {
            streaming: true,
            ..Default::default()
        },
        skills,
    }
}

/// Handler for the agent discovery document
pub async fn agent_card(State(state): State<A2aState>) -> impl IntoResponse {
    Json(state.card.clone())
}

/// Handler for the health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn rpc_success(id: Value, result: Value) -> Response {
    Json(JsonRpcResponse::success(id, result)).into_response()
}

fn rpc_error(id: Value, error: JsonRpcError) -> Response {
    Json(JsonRpcResponse::error(id, error)).into_response()
}

/// Handler for the JSON-RPC endpoint
pub async fn rpc_handler(State(state): State<A2aState>, body: String) -> Response {
    let raw: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            info!("Rejecting unparseable request body: {}", e);
            return rpc_error(Value::Null, JsonRpcError::parse_error());
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
        Ok(request) => request,
        Err(e) => {
            info!("Rejecting malformed request envelope: {}", e);
            let id = raw.get("id").cloned().unwrap_or(Value::Null);
            return rpc_error(id, JsonRpcError::invalid_request());
        }
    };

    if !request.is_valid() {
        return rpc_error(request.id, JsonRpcError::invalid_request());
    }

    info!("Handling request method: {}", request.method);
    match request.method.as_str() {
        "message/send" => send_message(state, request.id, request.params).await,
        "message/stream" => stream_message(state, request.id, request.params).await,
        "tasks/get" => get_task(state, request.id, request.params).await,
        "tasks/cancel" => cancel_task(state, request.id, request.params).await,
        method => rpc_error(request.id, JsonRpcError::method_not_found(method)),
    }
}

/// Look up the task a message refers to, if it names one.
async fn resolve_task(state: &A2aState, message: &Message) -> Result<Option<Task>, JsonRpcError> {
    let Some(task_id) = &message.task_id else {
        return Ok(None);
    };
    match state.tasks.get(task_id).await {
        Ok(Some(task)) => Ok(Some(task)),
        Ok(None) => Err(JsonRpcError::task_not_found()),
        Err(e) => Err(JsonRpcError::internal_error(e.to_string())),
    }
}

async fn send_message(state: A2aState, rpc_id: Value, params: Value) -> Response {
    let params: MessageSendParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => return rpc_error(rpc_id, JsonRpcError::invalid_params(e.to_string())),
    };

    let task = match resolve_task(&state, &params.message).await {
        Ok(task) => task,
        Err(error) => return rpc_error(rpc_id, error),
    };
    let mut task_id = task.as_ref().map(|t| t.id.clone());

    let (queue, mut receiver) = EventQueue::new();
    let context = RequestContext {
        message: params.message,
        task,
    };
    let executor = state.executor.clone();
    let handle = tokio::spawn(async move { executor.execute(context, queue).await });

    // Drain the queue so the executor never blocks, remembering the
    // task id if execution created a fresh task.
    while let Some(event) = receiver.recv().await {
        if let TaskEvent::Task(task) = event {
            task_id = Some(task.id.clone());
        }
    }

    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
        Err(e) => return rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
    }

    let Some(task_id) = task_id else {
        return rpc_error(
            rpc_id,
            JsonRpcError::internal_error("execution produced no task"),
        );
    };

    match state.tasks.get(&task_id).await {
        Ok(Some(task)) => match serde_json::to_value(&task) {
            Ok(value) => rpc_success(rpc_id, value),
            Err(e) => rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
        },
        Ok(None) => rpc_error(rpc_id, JsonRpcError::task_not_found()),
        Err(e) => rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
    }
}

/// Forward task events to the SSE stream as JSON-RPC result frames.
fn sse_event_stream(
    mut receiver: UnboundedReceiver<TaskEvent>,
    rpc_id: Value,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let (sender, event_receiver) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(task_event) = receiver.recv().await {
            let payload = match &task_event {
                TaskEvent::Task(task) => serde_json::to_value(task),
                TaskEvent::StatusUpdate(update) => serde_json::to_value(update),
            };
            let response = match payload {
                Ok(value) => JsonRpcResponse::success(rpc_id.clone(), value),
                Err(e) => {
                    JsonRpcResponse::error(rpc_id.clone(), JsonRpcError::internal_error(e.to_string()))
                }
            };
            let event = match serde_json::to_string(&response) {
                Ok(json) => Event::default().data(json),
                Err(e) => {
                    error!("Failed to serialize stream event: {}", e);
                    continue;
                }
            };
            if sender.send(event).is_err() {
                break; // Receiver dropped
            }
        }
    });

    let event_stream = tokio_stream::wrappers::UnboundedReceiverStream::new(event_receiver);
    event_stream.map(Ok)
}

async fn stream_message(state: A2aState, rpc_id: Value, params: Value) -> Response {
    let params: MessageSendParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => return rpc_error(rpc_id, JsonRpcError::invalid_params(e.to_string())),
    };

    let task = match resolve_task(&state, &params.message).await {
        Ok(task) => task,
        Err(error) => return rpc_error(rpc_id, error),
    };

    let (queue, receiver) = EventQueue::new();
    let context = RequestContext {
        message: params.message,
        task,
    };
    let executor = state.executor.clone();
    tokio::spawn(async move {
        if let Err(e) = executor.execute(context, queue).await {
            error!("Streaming execution failed: {}", e);
        }
    });

    Sse::new(sse_event_stream(receiver, rpc_id))
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive-text"),
        )
        .into_response()
}

async fn get_task(state: A2aState, rpc_id: Value, params: Value) -> Response {
    let params: TaskIdParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => return rpc_error(rpc_id, JsonRpcError::invalid_params(e.to_string())),
    };

    match state.tasks.get(&params.id).await {
        Ok(Some(task)) => match serde_json::to_value(&task) {
            Ok(value) => rpc_success(rpc_id, value),
            Err(e) => rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
        },
        Ok(None) => rpc_error(rpc_id, JsonRpcError::task_not_found()),
        Err(e) => rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
    }
}

async fn cancel_task(state: A2aState, rpc_id: Value, params: Value) -> Response {
    let params: TaskIdParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => return rpc_error(rpc_id, JsonRpcError::invalid_params(e.to_string())),
    };

    let task = match state.tasks.get(&params.id).await {
        Ok(Some(task)) => task,
        Ok(None) => return rpc_error(rpc_id, JsonRpcError::task_not_found()),
        Err(e) => return rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
    };

    match state.executor.cancel(&params.id).await {
        Ok(()) => match serde_json::to_value(&task) {
            Ok(value) => rpc_success(rpc_id, value),
            Err(e) => rpc_error(rpc_id, JsonRpcError::internal_error(e.to_string())),
        },
        Err(e) => {
            info!("Cancel rejected for task {}: {}", params.id, e);
            rpc_error(rpc_id, JsonRpcError::unsupported_operation())
        }
    }
}

pub fn a2a_routes(state: A2aState, gate: AuthGate) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .route("/.well-known/agent.json", get(agent_card))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, m2m_auth))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CrimeAgentExecutor;
    use crate::tasks::InMemoryTaskStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedSender;
    use tower::ServiceExt;
    use vigil_agent::{AgentInvoker, AgentUpdate};

    struct ScriptedInvoker {
        updates: Vec<AgentUpdate>,
        error: Option<String>,
    }

    #[async_trait]
    impl AgentInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            _query: &str,
            _context_id: &str,
            updates: UnboundedSender<AgentUpdate>,
        ) -> anyhow::Result<()> {
            for update in &self.updates {
                let _ = updates.send(update.clone());
            }
            match &self.error {
                Some(message) => Err(anyhow::anyhow!("{}", message)),
                None => Ok(()),
            }
        }
    }

    fn completing_state() -> A2aState {
        scripted_state(
            vec![
                AgentUpdate::Working {
                    message: "Crime Agent is assessing the emergency...".to_string(),
                },
                AgentUpdate::Completed {
                    content: "stay inside, the cops are on their way".to_string(),
                },
            ],
            None,
        )
    }

    fn scripted_state(updates: Vec<AgentUpdate>, error: Option<String>) -> A2aState {
        let store = Arc::new(InMemoryTaskStore::new());
        let executor = Arc::new(CrimeAgentExecutor::new(
            Arc::new(ScriptedInvoker { updates, error }),
            store.clone(),
        ));
        A2aState {
            card: crime_agent_card("http://localhost:8003/"),
            tasks: store,
            executor,
        }
    }

    fn test_router(state: A2aState) -> Router {
        Router::new()
            .route("/", post(rpc_handler))
            .route("/.well-known/agent.json", get(agent_card))
            .route("/health", get(health_check))
            .with_state(state)
    }

    async fn post_rpc(router: Router, body: Value) -> Value {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn send_envelope(id: Value, text: &str) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [{"kind": "text", "text": text}],
                    "messageId": "msg-1",
                    "contextId": "ctx-1",
                    "metadata": {"user_id": "u-42"}
                }
            }
        })
    }

    #[tokio::test]
    async fn test_agent_card_endpoint() {
        let router = test_router(completing_state());
        let request = Request::builder()
            .method("GET")
            .uri("/.well-known/agent.json")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let card: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(card["name"], json!("crime_agent"));
        assert_eq!(card["version"], json!("1.0.0"));
        assert_eq!(card["capabilities"]["streaming"], json!(true));
        assert_eq!(card["defaultInputModes"], json!(["text"]));
        assert_eq!(card["skills"][0]["id"], json!("crime_emergency_response"));
        assert_eq!(card["skills"][1]["id"], json!("crime_complaint_intake"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = test_router(completing_state());
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let health: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health["status"], json!("ok"));
    }

    #[tokio::test]
    async fn test_message_send_completes_task() {
        let router = test_router(completing_state());
        let response = post_rpc(router, send_envelope(json!(1), "someone broke in")).await;

        assert_eq!(response["jsonrpc"], json!("2.0"));
        assert_eq!(response["id"], json!(1));
        let task = &response["result"];
        assert_eq!(task["kind"], json!("task"));
        assert_eq!(task["contextId"], json!("ctx-1"));
        assert_eq!(task["status"]["state"], json!("completed"));
        let history = task["history"].as_array().unwrap();
        let last = history.last().unwrap();
        assert_eq!(
            last["parts"][0]["text"],
            json!("stay inside, the cops are on their way")
        );
    }

    #[tokio::test]
    async fn test_message_send_failure_returns_internal_error() {
        let state = scripted_state(vec![], Some("model unavailable".to_string()));
        let router = test_router(state);
        let response = post_rpc(router, send_envelope(json!(2), "help")).await;

        assert_eq!(response["error"]["code"], json!(-32603));
        assert!(
            response["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Crime emergency error")
        );
    }

    #[tokio::test]
    async fn test_message_send_invalid_params() {
        let router = test_router(completing_state());
        let response = post_rpc(
            router,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "message/send",
                "params": {}
            }),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let router = test_router(completing_state());
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("this is not json"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], json!(-32700));
        assert_eq!(value["id"], json!(null));
    }

    #[tokio::test]
    async fn test_non_envelope_body() {
        let router = test_router(completing_state());
        let response = post_rpc(router, json!({"id": 9, "foo": "bar"})).await;

        assert_eq!(response["error"]["code"], json!(-32600));
        assert_eq!(response["id"], json!(9));
    }

    #[tokio::test]
    async fn test_wrong_protocol_version() {
        let router = test_router(completing_state());
        let response = post_rpc(
            router,
            json!({"jsonrpc": "1.0", "id": 4, "method": "message/send", "params": {}}),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32600));
    }

    #[tokio::test]
    async fn test_method_not_found() {
        let router = test_router(completing_state());
        let response = post_rpc(
            router,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tasks/list", "params": {}}),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32601));
        assert!(
            response["error"]["message"]
                .as_str()
                .unwrap()
                .contains("tasks/list")
        );
    }

    #[tokio::test]
    async fn test_tasks_get_unknown_task() {
        let router = test_router(completing_state());
        let response = post_rpc(
            router,
            json!({"jsonrpc": "2.0", "id": 6, "method": "tasks/get", "params": {"id": "missing"}}),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32001));
        assert_eq!(response["error"]["message"], json!("Task not found"));
    }

    #[tokio::test]
    async fn test_tasks_get_returns_stored_task() {
        let state = completing_state();
        let router = test_router(state.clone());

        let send_response = post_rpc(router.clone(), send_envelope(json!(7), "help")).await;
        let task_id = send_response["result"]["id"].as_str().unwrap().to_string();

        let response = post_rpc(
            router,
            json!({"jsonrpc": "2.0", "id": 8, "method": "tasks/get", "params": {"id": task_id}}),
        )
        .await;

        assert_eq!(response["result"]["id"], json!(task_id));
        assert_eq!(response["result"]["status"]["state"], json!("completed"));
    }

    #[tokio::test]
    async fn test_tasks_cancel_unsupported() {
        let state = completing_state();
        let router = test_router(state.clone());

        let send_response = post_rpc(router.clone(), send_envelope(json!(10), "help")).await;
        let task_id = send_response["result"]["id"].as_str().unwrap().to_string();

        let response = post_rpc(
            router,
            json!({"jsonrpc": "2.0", "id": 11, "method": "tasks/cancel", "params": {"id": task_id}}),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32004));
        assert_eq!(
            response["error"]["message"],
            json!("This operation is not supported")
        );
    }

    #[tokio::test]
    async fn test_tasks_cancel_unknown_task() {
        let router = test_router(completing_state());
        let response = post_rpc(
            router,
            json!({"jsonrpc": "2.0", "id": 12, "method": "tasks/cancel", "params": {"id": "missing"}}),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32001));
    }

    #[tokio::test]
    async fn test_message_stream_emits_events() {
        let router = test_router(completing_state());
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": 13,
            "method": "message/stream",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [{"kind": "text", "text": "someone broke in"}],
                    "messageId": "msg-1",
                    "contextId": "ctx-1"
                }
            }
        });

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(envelope.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("data:"));
        assert!(body.contains("\"kind\":\"task\""));
        assert!(body.contains("status-update"));
        assert!(body.contains("completed"));
        assert!(body.contains("\"final\":true"));
    }

    #[tokio::test]
    async fn test_message_send_with_unknown_task_reference() {
        let router = test_router(completing_state());
        let response = post_rpc(
            router,
            json!({
                "jsonrpc": "2.0",
                "id": 14,
                "method": "message/send",
                "params": {
                    "message": {
                        "role": "user",
                        "parts": [{"kind": "text", "text": "follow up"}],
                        "messageId": "msg-2",
                        "taskId": "no-such-task"
                    }
                }
            }),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32001));
    }
}
