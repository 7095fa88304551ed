//! Propagated, read-only execution context.
//!
//! A [`Context`] is an immutable bag of typed values that callers thread
//! through their request handling. Values are keyed by their Rust type, so
//! a lookup can never observe a value of the wrong type. Adding a value
//! returns a new context; the original is untouched and remains valid in
//! whatever tasks still hold it.
//!
//! The logging facade reads exactly one key, [`TraceId`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Entries = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Immutable, cheaply clonable key/value carrier.
#[derive(Clone, Default)]
pub struct Context {
    entries: Arc<Entries>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this context carrying `value`, replacing any
    /// previous value of the same type.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Look up the value stored for type `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Shorthand for `with_value(TraceId::new(id))`.
    pub fn with_trace_id(&self, id: impl Into<String>) -> Self {
        self.with_value(TraceId::new(id))
    }

    /// The trace identifier, if one was attached.
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.get::<TraceId>()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("trace_id", &self.trace_id())
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Identifier correlating every record of one logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TraceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TraceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Extract the trace identifier from `ctx`, or the empty string when none
/// is attached. Never fails.
pub fn trace_id_from_context(ctx: &Context) -> String {
    ctx.trace_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct TenantId(u32);

    #[test]
    fn test_empty_context_has_no_trace_id() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert!(ctx.trace_id().is_none());
        assert_eq!(trace_id_from_context(&ctx), "");
    }

    #[test]
    fn test_trace_id_round_trip() {
        let ctx = Context::new().with_trace_id("abc-123");
        assert_eq!(trace_id_from_context(&ctx), "abc-123");
        assert_eq!(ctx.trace_id().map(TraceId::as_str), Some("abc-123"));
    }

    #[test]
    fn test_with_value_does_not_mutate_parent() {
        let parent = Context::new().with_trace_id("a");
        let child = parent.with_trace_id("b");
        assert_eq!(trace_id_from_context(&parent), "a");
        assert_eq!(trace_id_from_context(&child), "b");
        assert_eq!(child.len(), 1);
    }

    #[test]
    fn test_unrelated_values_are_ignored() {
        // A plain String is a different key than TraceId.
        let ctx = Context::new()
            .with_value(TenantId(9))
            .with_value("not-a-trace".to_string());
        assert_eq!(ctx.get::<TenantId>(), Some(&TenantId(9)));
        assert_eq!(trace_id_from_context(&ctx), "");
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }

    #[test]
    fn test_trace_id_conversions() {
        assert_eq!(TraceId::from("x").to_string(), "x");
        assert_eq!(TraceId::from("y".to_string()), TraceId::new("y"));
    }
}
