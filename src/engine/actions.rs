//! Action dispatch
//!
//! Action strings are parsed into an [`ActionDescriptor`] and routed to the
//! [`ActionHandler`] registered for their kind. Kinds without a handler go
//! to the fallback handler, so an unknown action is never an error.

use crate::error::ActionError;
use std::collections::HashMap;
use std::fmt;

/// Parsed form of an action string
///
/// `alert('High Temp')` has kind `alert` and argument `High Temp`;
/// a bare token such as `restart_pump` has no argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Lowercased action kind used for handler lookup
    pub kind: String,
    /// Unquoted call argument, if any
    pub argument: Option<String>,
    /// Action string as written
    pub raw: String,
}

impl ActionDescriptor {
    /// Parse an action string
    pub fn parse(action: &str) -> Self {
        let raw = action.trim();
        let kind_len = raw
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-' || c == '.'))
            .unwrap_or(raw.len());
        let (kind, rest) = raw.split_at(kind_len);
        let rest = rest.trim();

        let argument = if rest.is_empty() {
            None
        } else if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            let inner = unquote(inner.trim());
            (!inner.is_empty()).then(|| inner.to_string())
        } else {
            Some(rest.to_string())
        };

        Self {
            kind: kind.to_ascii_lowercase(),
            argument,
            raw: raw.to_string(),
        }
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn unquote(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

/// Handler performing the side effect for one action kind
pub trait ActionHandler: Send + Sync {
    /// Action kind this handler is registered for
    fn kind(&self) -> &str;

    /// Perform the action
    fn execute(&self, action: &ActionDescriptor) -> Result<(), ActionError>;
}

/// Level rule actions are logged at; visible under the default `warn` filter
pub const ACTION_LOG_LEVEL: log::Level = log::Level::Warn;

/// Emits an alert-tagged log record
#[derive(Debug, Default)]
pub struct AlertAction;

impl ActionHandler for AlertAction {
    fn kind(&self) -> &str {
        "alert"
    }

    fn execute(&self, action: &ActionDescriptor) -> Result<(), ActionError> {
        log::log!(ACTION_LOG_LEVEL, "[ALERT]: {}", action.raw);
        Ok(())
    }
}

/// Generic handler: emits an execution-tagged log record
#[derive(Debug, Default)]
pub struct LogAction;

impl ActionHandler for LogAction {
    fn kind(&self) -> &str {
        "log"
    }

    fn execute(&self, action: &ActionDescriptor) -> Result<(), ActionError> {
        log::log!(ACTION_LOG_LEVEL, "[ACTION EXECUTED]: {}", action.raw);
        Ok(())
    }
}

/// Routes actions to their registered handlers
pub struct ActionDispatcher {
    handlers: HashMap<String, Box<dyn ActionHandler>>,
    fallback: Box<dyn ActionHandler>,
}

impl ActionDispatcher {
    /// Create a dispatcher with only a fallback handler
    pub fn new(fallback: Box<dyn ActionHandler>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// Register a handler for its kind, returning any handler it replaces
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) -> Option<Box<dyn ActionHandler>> {
        let kind = handler.kind().to_ascii_lowercase();
        self.handlers.insert(kind, handler)
    }

    /// Builder: register a handler
    pub fn with_handler(mut self, handler: Box<dyn ActionHandler>) -> Self {
        self.register(handler);
        self
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Execute an action string
    ///
    /// Handler failures are logged and swallowed.
    pub fn dispatch(&self, action: &str) {
        let descriptor = ActionDescriptor::parse(action);
        let handler = self
            .handlers
            .get(&descriptor.kind)
            .unwrap_or(&self.fallback);

        if let Err(e) = handler.execute(&descriptor) {
            log::warn!("Action '{}' via {} failed: {}", descriptor, handler.kind(), e);
        }
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(Box::new(LogAction)).with_handler(Box::new(AlertAction))
    }
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("kinds", &self.kinds())
            .field("fallback", &self.fallback.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingHandler;

    #[test]
    fn test_parse_call_with_quoted_argument() {
        let action = ActionDescriptor::parse("alert('High Temp')");
        assert_eq!(action.kind, "alert");
        assert_eq!(action.argument.as_deref(), Some("High Temp"));
        assert_eq!(action.raw, "alert('High Temp')");
    }

    #[test]
    fn test_parse_bare_token() {
        let action = ActionDescriptor::parse("  restart_pump ");
        assert_eq!(action.kind, "restart_pump");
        assert_eq!(action.argument, None);
        assert_eq!(action.raw, "restart_pump");
    }

    #[test]
    fn test_parse_odd_shapes() {
        let action = ActionDescriptor::parse(r#"Webhook("https://example.test/hook")"#);
        assert_eq!(action.kind, "webhook");
        assert_eq!(action.argument.as_deref(), Some("https://example.test/hook"));

        let action = ActionDescriptor::parse("notify ops team");
        assert_eq!(action.kind, "notify");
        assert_eq!(action.argument.as_deref(), Some("ops team"));

        let action = ActionDescriptor::parse("alert()");
        assert_eq!(action.argument, None);

        let action = ActionDescriptor::parse("!!!");
        assert_eq!(action.kind, "");
    }

    #[test]
    fn test_dispatch_routes_by_kind() {
        let alerts = RecordingHandler::new("alert");
        let fallback = RecordingHandler::new("generic");
        let dispatcher =
            ActionDispatcher::new(Box::new(fallback.clone())).with_handler(Box::new(alerts.clone()));

        dispatcher.dispatch("alert('High Temp')");
        dispatcher.dispatch("restart_pump");

        assert_eq!(alerts.calls(), vec!["alert('High Temp')"]);
        assert_eq!(fallback.calls(), vec!["restart_pump"]);
    }

    #[test]
    fn test_register_new_kind() {
        let webhook = RecordingHandler::new("webhook");
        let fallback = RecordingHandler::new("generic");
        let mut dispatcher = ActionDispatcher::new(Box::new(fallback.clone()));

        assert!(dispatcher.register(Box::new(webhook.clone())).is_none());
        dispatcher.dispatch("webhook('https://example.test')");

        assert_eq!(webhook.calls().len(), 1);
        assert!(fallback.calls().is_empty());
    }

    #[test]
    fn test_actions_visible_by_default() {
        assert!(ACTION_LOG_LEVEL <= log::Level::Warn);
        assert!(LogAction.execute(&ActionDescriptor::parse("restart_pump")).is_ok());
        assert!(AlertAction.execute(&ActionDescriptor::parse("alert('x')")).is_ok());
    }

    #[test]
    fn test_failing_handler_does_not_panic() {
        let failing = RecordingHandler::failing("alert");
        let dispatcher = ActionDispatcher::new(Box::new(LogAction)).with_handler(Box::new(failing.clone()));
        dispatcher.dispatch("alert('boom')");
        assert_eq!(failing.calls().len(), 1);
    }

    #[test]
    fn test_default_dispatcher_kinds() {
        let dispatcher = ActionDispatcher::default();
        assert_eq!(dispatcher.kinds(), vec!["alert"]);
        dispatcher.dispatch("alert('High Temp')");
        dispatcher.dispatch("anything else");
    }
}
