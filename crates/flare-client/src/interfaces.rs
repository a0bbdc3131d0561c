//! Default enrichment steps installed by the client
//!
//! Priorities leave room for user steps: anything registered at the default
//! priority 0 runs after the interface steps and before the sanitizer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use flare_core::Event;

use crate::middleware::{Middleware, MiddlewareContext, Next};

pub const MESSAGE_PRIORITY: i32 = 120;
pub const REQUEST_PRIORITY: i32 = 110;
pub const EXCEPTION_PRIORITY: i32 = 100;
pub const SANITIZE_PRIORITY: i32 = -100;

/// Copies the payload message onto the event
pub struct MessageInterface;

impl Middleware for MessageInterface {
    fn process(
        &self,
        mut event: Event,
        ctx: &MiddlewareContext<'_>,
        next: Next<'_>,
    ) -> Option<Event> {
        if let Some(message) = &ctx.payload.message {
            event.message = Some(message.clone());
        }
        next.run(event)
    }
}

/// Attaches the ambient request snapshot when one is present
pub struct RequestInterface;

impl Middleware for RequestInterface {
    fn process(
        &self,
        mut event: Event,
        ctx: &MiddlewareContext<'_>,
        next: Next<'_>,
    ) -> Option<Event> {
        if let Some(request) = ctx.request {
            event.request = Some(request.clone());
        }
        next.run(event)
    }
}

/// Appends the payload exception to the event's exception list
pub struct ExceptionInterface;

impl Middleware for ExceptionInterface {
    fn process(
        &self,
        mut event: Event,
        ctx: &MiddlewareContext<'_>,
        next: Next<'_>,
    ) -> Option<Event> {
        if let Some(exception) = ctx.exception {
            event.exceptions.push(exception.clone());
        }
        next.run(event)
    }
}

static SECRET_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|passwd|secret|token|api_?key|authorization|credentials|card)")
        .expect("secret key pattern is valid")
});

// 13-16 digit runs with optional separators, the shape of payment card numbers
static CARD_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d[ -]?){13,16}\b").expect("card number pattern is valid"));

const MASK: &str = "********";

/// Scrubs secret-looking values from the event before it leaves the process
///
/// Runs at the lowest non-terminal priority so it sees the fully enriched
/// event: message text, `extra` values (recursively), and request headers.
pub struct SanitizeData;

impl SanitizeData {
    fn sanitize_text(text: &str) -> String {
        CARD_NUMBER_PATTERN.replace_all(text, MASK).into_owned()
    }

    fn sanitize_value(value: &mut Value) {
        match value {
            Value::String(text) => {
                if CARD_NUMBER_PATTERN.is_match(text) {
                    *text = Self::sanitize_text(text);
                }
            }
            Value::Array(items) => {
                for item in items {
                    Self::sanitize_value(item);
                }
            }
            Value::Object(map) => {
                for (key, item) in map.iter_mut() {
                    if SECRET_KEY_PATTERN.is_match(key) {
                        *item = Value::String(MASK.to_string());
                    } else {
                        Self::sanitize_value(item);
                    }
                }
            }
            _ => {}
        }
    }
}

impl Middleware for SanitizeData {
    fn process(
        &self,
        mut event: Event,
        _ctx: &MiddlewareContext<'_>,
        next: Next<'_>,
    ) -> Option<Event> {
        if let Some(message) = event.message.take() {
            event.message = Some(Self::sanitize_text(&message));
        }

        let secret_keys: Vec<String> = event
            .extra
            .keys()
            .filter(|key| SECRET_KEY_PATTERN.is_match(key))
            .cloned()
            .collect();
        for key in secret_keys {
            event.extra.insert(key, Value::String(MASK.to_string()));
        }
        for value in event.extra.values_mut() {
            Self::sanitize_value(value);
        }

        if let Some(request) = event.request.as_mut() {
            for (name, value) in request.headers.iter_mut() {
                if SECRET_KEY_PATTERN.is_match(name) {
                    *value = MASK.to_string();
                }
            }
        }

        next.run(event)
    }
}
