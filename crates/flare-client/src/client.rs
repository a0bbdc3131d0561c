//! Client orchestration for the event-assembly pipeline

use std::collections::HashMap;
use std::sync::Arc;

use flare_core::{
    Breadcrumb, Event, EventId, EventPayload, ExceptionInfo, Level, RequestInfo, Scope,
    SeverityCode,
};
use tracing::debug;
use url::Url;

use crate::breadcrumbs::BreadcrumbRecorder;
use crate::interfaces::{
    ExceptionInterface, MessageInterface, RequestInterface, SanitizeData, EXCEPTION_PRIORITY,
    MESSAGE_PRIORITY, REQUEST_PRIORITY, SANITIZE_PRIORITY,
};
use crate::middleware::{Middleware, MiddlewareContext, MiddlewareStack, Next};
use crate::options::ClientOptions;
use crate::severity::SeverityTranslator;
use crate::transaction::TransactionStack;
use crate::transport::Transport;

/// Top-level coordinator: assembles events and hands them to the transport
///
/// A client is scoped to one logical unit of work (one inbound request or
/// one command invocation). Concurrent units each get their own client, or
/// external synchronization around it.
pub struct Client {
    options: Arc<ClientOptions>,
    transport: Arc<dyn Transport>,
    middleware: MiddlewareStack,
    transactions: TransactionStack,
    severity: SeverityTranslator,
    recorder: BreadcrumbRecorder,
    request: Option<RequestInfo>,
}

impl Client {
    /// Client for a plain process context; middleware never sees a request
    pub fn new(options: ClientOptions, transport: Arc<dyn Transport>) -> Self {
        Self::build(options, transport, None)
    }

    /// Client serving one inbound request
    ///
    /// Stores the read-only snapshot for middleware and seeds the
    /// transaction stack from the request path.
    pub fn for_request(
        options: ClientOptions,
        transport: Arc<dyn Transport>,
        request: RequestInfo,
    ) -> Self {
        let mut client = Self::build(options, transport, Some(request));
        if let Some(name) = client.request.as_ref().and_then(request_transaction_name) {
            client.transactions.push(name);
        }
        client
    }

    fn build(
        options: ClientOptions,
        transport: Arc<dyn Transport>,
        request: Option<RequestInfo>,
    ) -> Self {
        let options = Arc::new(options);
        let mut middleware = MiddlewareStack::new();
        middleware.add(Arc::new(MessageInterface), MESSAGE_PRIORITY);
        middleware.add(Arc::new(RequestInterface), REQUEST_PRIORITY);
        middleware.add(Arc::new(ExceptionInterface), EXCEPTION_PRIORITY);
        middleware.add(Arc::new(SanitizeData), SANITIZE_PRIORITY);

        Client {
            recorder: BreadcrumbRecorder::new(options.clone()),
            options,
            transport,
            middleware,
            transactions: TransactionStack::new(),
            severity: SeverityTranslator::new(),
            request,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Register an enrichment step; higher priorities run earlier
    pub fn add_middleware(&mut self, step: Arc<dyn Middleware>, priority: i32) {
        self.middleware.add(step, priority);
    }

    /// Register a closure as an enrichment step, returning its handle
    pub fn add_middleware_fn<F>(&mut self, priority: i32, f: F) -> Arc<dyn Middleware>
    where
        F: for<'a> Fn(Event, &MiddlewareContext<'a>, Next<'a>) -> Option<Event>
            + Send
            + Sync
            + 'static,
    {
        self.middleware.add_fn(priority, f)
    }

    pub fn remove_middleware(&mut self, step: &Arc<dyn Middleware>) {
        self.middleware.remove(step);
    }

    pub fn push_transaction(&mut self, name: impl Into<String>) {
        self.transactions.push(name);
    }

    pub fn pop_transaction(&mut self) -> Option<String> {
        self.transactions.pop()
    }

    /// Replace the severity override map wholesale
    pub fn register_severity_map(&mut self, map: HashMap<SeverityCode, Level>) {
        self.severity.register_severity_map(map);
    }

    /// Record a breadcrumb onto `scope` through the configured gate
    pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb, scope: Option<&mut Scope>) {
        self.recorder.record(breadcrumb, scope);
    }

    /// Capture a plain message
    pub fn capture_message(
        &self,
        message: impl Into<String>,
        scope: Option<&Scope>,
    ) -> Option<EventId> {
        self.capture_event(EventPayload::from_message(message), scope)
    }

    /// Capture an exception
    pub fn capture_exception(
        &self,
        exception: ExceptionInfo,
        scope: Option<&Scope>,
    ) -> Option<EventId> {
        self.capture_event(EventPayload::from_exception(exception), scope)
    }

    /// Capture a caller-built payload
    ///
    /// Returns the transport's acknowledgment, or `None` when the pipeline
    /// dropped the event or the transport did not accept it.
    pub fn capture_event(&self, payload: EventPayload, scope: Option<&Scope>) -> Option<EventId> {
        let event = self.prepare_event(payload, scope)?;
        let event_id = event.event_id;
        match self.transport.send(event) {
            Some(id) => Some(id),
            None => {
                debug!(event_id = %event_id, "transport did not accept event");
                None
            }
        }
    }

    /// Assemble a finished event, or `None` if the pipeline dropped it
    ///
    /// A dropped event is a deliberate, silent no-op, not an error.
    pub fn prepare_event(&self, payload: EventPayload, scope: Option<&Scope>) -> Option<Event> {
        // 1. Skeleton event
        let mut event = Event::new();

        // 2. Static identity from configuration
        event.server_name = self.options.server_name.clone();
        event.release = self.options.release.clone();
        event.environment = self.options.environment.clone();

        // 3. Explicit transaction wins over the stack top
        event.transaction = payload
            .transaction
            .clone()
            .or_else(|| self.transactions.peek().map(str::to_string));

        // 4. Logger
        if payload.logger.is_some() {
            event.logger = payload.logger.clone();
        }

        // 5. Level: explicit, else translated from the exception's severity code
        event.level = payload
            .level
            .or_else(|| {
                payload
                    .exception
                    .as_ref()
                    .and_then(|exception| exception.severity)
                    .map(|code| self.severity.translate(code))
            })
            .unwrap_or_default();

        // Caller-supplied context travels on the event so the chain sees it
        event.tags.extend(payload.tags.clone());
        for (key, value) in &payload.extra {
            event.extra.insert(key.clone(), self.render_extra(value));
        }

        // 6. Enrichment chain; the request snapshot is only present when the
        // client serves a request
        let event = self.middleware.execute_stack(
            event,
            self.request.as_ref(),
            payload.exception.as_ref(),
            &payload,
        )?;

        // 7. Ambient scope
        let event = match scope {
            Some(scope) => scope.apply_to_event(event),
            None => event,
        };

        Some(event)
    }

    fn render_extra(&self, value: &serde_json::Value) -> serde_json::Value {
        if self.options.serialize_all_objects || !value.is_object() && !value.is_array() {
            value.clone()
        } else {
            serde_json::Value::String(value.to_string())
        }
    }
}

fn request_transaction_name(request: &RequestInfo) -> Option<String> {
    match Url::parse(&request.url) {
        Ok(url) => Some(url.path().to_string()),
        Err(_) if request.url.starts_with('/') => Some(request.url.clone()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    fn client() -> (Client, Arc<MemoryTransport>) {
        let transport = MemoryTransport::new();
        let client = Client::new(ClientOptions::default(), transport.clone());
        (client, transport)
    }

    #[test]
    fn test_prepare_event_stamps_static_identity() {
        let options = ClientOptions {
            server_name: Some("web-1".to_string()),
            release: Some("1.4.2".to_string()),
            environment: Some("production".to_string()),
            ..Default::default()
        };
        let client = Client::new(options, MemoryTransport::new());

        let event = client
            .prepare_event(EventPayload::from_message("disk full"), None)
            .expect("event assembled");
        assert_eq!(event.server_name.as_deref(), Some("web-1"));
        assert_eq!(event.release.as_deref(), Some("1.4.2"));
        assert_eq!(event.environment.as_deref(), Some("production"));
        assert_eq!(event.message.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_explicit_transaction_wins_over_stack() {
        let (mut client, _) = client();
        client.push_transaction("checkout");

        let payload = EventPayload {
            transaction: Some("payment".to_string()),
            ..EventPayload::from_message("declined")
        };
        let event = client.prepare_event(payload, None).expect("event assembled");
        assert_eq!(event.transaction.as_deref(), Some("payment"));
    }

    #[test]
    fn test_transaction_falls_back_to_stack_top() {
        let (mut client, _) = client();
        client.push_transaction("index");
        client.push_transaction("checkout");

        let event = client
            .prepare_event(EventPayload::from_message("declined"), None)
            .expect("event assembled");
        assert_eq!(event.transaction.as_deref(), Some("checkout"));
    }

    #[test]
    fn test_transaction_absent_when_stack_empty() {
        let (client, _) = client();
        let event = client
            .prepare_event(EventPayload::from_message("disk full"), None)
            .expect("event assembled");
        assert!(event.transaction.is_none());
    }

    #[test]
    fn test_logger_copied_from_payload() {
        let (client, _) = client();
        let payload = EventPayload {
            logger: Some("app.billing".to_string()),
            ..EventPayload::from_message("declined")
        };
        let event = client.prepare_event(payload, None).expect("event assembled");
        assert_eq!(event.logger.as_deref(), Some("app.billing"));
    }

    #[test]
    fn test_exception_severity_drives_level() {
        let (client, _) = client();
        let exception = ExceptionInfo::new("E_USER_WARNING")
            .with_severity(SeverityCode::UserWarning);
        let event = client
            .prepare_event(EventPayload::from_exception(exception), None)
            .expect("event assembled");
        assert_eq!(event.level, Level::Warning);
        assert_eq!(event.exceptions.len(), 1);
    }

    #[test]
    fn test_explicit_level_wins_over_severity_translation() {
        let (client, _) = client();
        let payload = EventPayload {
            level: Some(Level::Debug),
            ..EventPayload::from_exception(
                ExceptionInfo::new("E_PARSE").with_severity(SeverityCode::Parse),
            )
        };
        let event = client.prepare_event(payload, None).expect("event assembled");
        assert_eq!(event.level, Level::Debug);
    }

    #[test]
    fn test_registered_severity_map_overrides_translation() {
        let (mut client, _) = client();
        client.register_severity_map(HashMap::from([(SeverityCode::Parse, Level::Info)]));
        let exception = ExceptionInfo::new("E_PARSE").with_severity(SeverityCode::Parse);
        let event = client
            .prepare_event(EventPayload::from_exception(exception), None)
            .expect("event assembled");
        assert_eq!(event.level, Level::Info);
    }

    #[test]
    fn test_middleware_veto_drops_event_silently() {
        let (mut client, transport) = client();
        client.add_middleware_fn(50, |_event, _ctx, _next| None);

        assert!(client.capture_message("dropped", None).is_none());
        assert!(transport.events().is_empty());
    }

    #[test]
    fn test_scope_merged_after_middleware() {
        let (client, _) = client();
        let mut scope = Scope::new();
        scope.set_tag("env", "staging");
        scope.add_breadcrumb(Breadcrumb::new("auth", "login ok"), 10);

        let event = client
            .prepare_event(EventPayload::from_message("disk full"), Some(&scope))
            .expect("event assembled");
        assert_eq!(event.tags.get("env").map(String::as_str), Some("staging"));
        assert_eq!(event.breadcrumbs.len(), 1);
    }

    #[test]
    fn test_capture_returns_transport_acknowledgment() {
        let (client, transport) = client();
        let event_id = client
            .capture_message("disk full", None)
            .expect("transport accepted the event");
        assert_eq!(transport.events()[0].event_id, event_id);
    }

    #[test]
    fn test_structured_extra_flattened_by_default() {
        let (client, _) = client();
        let payload = EventPayload {
            extra: [
                ("detail".to_string(), serde_json::json!({"code": 7})),
                ("attempt".to_string(), serde_json::json!(2)),
            ]
            .into(),
            ..EventPayload::from_message("declined")
        };
        let event = client.prepare_event(payload, None).expect("event assembled");
        assert_eq!(event.extra["detail"], serde_json::json!(r#"{"code":7}"#));
        assert_eq!(event.extra["attempt"], serde_json::json!(2));
    }

    #[test]
    fn test_structured_extra_kept_when_serialize_all_objects() {
        let options = ClientOptions {
            serialize_all_objects: true,
            ..Default::default()
        };
        let client = Client::new(options, MemoryTransport::new());
        let payload = EventPayload {
            extra: [("detail".to_string(), serde_json::json!({"code": 7}))].into(),
            ..EventPayload::from_message("declined")
        };
        let event = client.prepare_event(payload, None).expect("event assembled");
        assert_eq!(event.extra["detail"]["code"], serde_json::json!(7));
    }

    #[test]
    fn test_request_client_seeds_transaction_and_snapshot() {
        let transport = MemoryTransport::new();
        let request = RequestInfo::new("GET", "https://shop.example/checkout?step=2");
        let client = Client::for_request(ClientOptions::default(), transport, request);

        let event = client
            .prepare_event(EventPayload::from_message("declined"), None)
            .expect("event assembled");
        assert_eq!(event.transaction.as_deref(), Some("/checkout"));
        assert_eq!(
            event.request.expect("request attached").method,
            "GET"
        );
    }

    #[test]
    fn test_plain_client_passes_no_request_to_middleware() {
        let (mut client, _) = client();
        client.add_middleware_fn(50, |mut event, ctx, next| {
            event.tags.insert(
                "saw_request".to_string(),
                ctx.request.is_some().to_string(),
            );
            next.run(event)
        });

        let event = client
            .prepare_event(EventPayload::from_message("disk full"), None)
            .expect("event assembled");
        assert_eq!(
            event.tags.get("saw_request").map(String::as_str),
            Some("false")
        );
        assert!(event.request.is_none());
    }

    #[test]
    fn test_pop_transaction_restores_previous_name() {
        let (mut client, _) = client();
        client.push_transaction("index");
        client.push_transaction("checkout");
        assert_eq!(client.pop_transaction().as_deref(), Some("checkout"));

        let event = client
            .prepare_event(EventPayload::from_message("declined"), None)
            .expect("event assembled");
        assert_eq!(event.transaction.as_deref(), Some("index"));
    }
}
