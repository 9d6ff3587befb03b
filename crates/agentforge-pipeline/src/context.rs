//! The request context threaded through every step of a pipeline run.
//!
//! Generalized from the teacher's `WorkflowEngine` execution record
//! (`kotoba-workflow-core::engine::WorkflowExecution`), which carried a
//! single mutable `result`/`error` slot through an execution's lifetime.
//! Here the slot is split in two: `input` (the caller-supplied proto,
//! immutable for the life of the request) and `new_state` (the
//! in-progress resource state steps build up and eventually persist).

use std::collections::HashMap;

/// Threaded through a [`crate::Pipeline`] run. `In` is the caller's input
/// proto (e.g. a create/update request body); `New` is the resource state
/// steps construct and mutate on the way to persistence.
///
/// `new_state` starts as `None` and is populated by a builder step
/// (`BuildNewStateStep`/`BuildUpdateStateStep`) partway through the
/// pipeline; later steps read and mutate it through [`RequestContext::new_state_mut`].
pub struct RequestContext<In, New> {
    pub input: In,
    pub new_state: Option<New>,
    /// Caller identity, used for audit `created_by`/`updated_by` fields.
    pub principal: String,
    /// Side channel for values one step produces and a later step consumes
    /// (resolved slug, resolved resource id, loaded existing record, etc.)
    /// without widening the `In`/`New` type parameters for every pipeline.
    metadata: HashMap<String, serde_json::Value>,
}

impl<In, New> RequestContext<In, New> {
    /// For pipelines whose `In` and `New` differ (delete/get, keyed by an
    /// id or reference rather than the resource itself): `new_state`
    /// starts empty and is populated later by a load step.
    pub fn new(input: In, principal: impl Into<String>) -> Self {
        Self {
            input,
            new_state: None,
            principal: principal.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn new_state_ref(&self) -> Option<&New> {
        self.new_state.as_ref()
    }

    pub fn new_state_mut(&mut self) -> Option<&mut New> {
        self.new_state.as_mut()
    }

    pub fn set_new_state(&mut self, state: New) {
        self.new_state = Some(state);
    }

    pub fn take_new_state(&mut self) -> Option<New> {
        self.new_state.take()
    }

    pub fn put_metadata(&mut self, key: &str, value: impl serde::Serialize) {
        let encoded = serde_json::to_value(value).expect("metadata value must serialize");
        self.metadata.insert(key.to_string(), encoded);
    }

    pub fn get_metadata<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.metadata
            .get(key)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }
}

impl<T: Clone> RequestContext<T, T> {
    /// For pipelines where the caller submits the resource itself
    /// (create/update/apply): on construction, `new_state` is automatically
    /// initialised with a deep clone of `input`, so steps downstream can
    /// mutate `new_state` while `input` keeps the caller's original.
    pub fn new_with_input(input: T, principal: impl Into<String>) -> Self {
        Self {
            new_state: Some(input.clone()),
            input,
            principal: principal.into(),
            metadata: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
    struct Dummy {
        value: i32,
    }

    #[test]
    fn new_state_starts_empty_and_round_trips() {
        let mut ctx: RequestContext<(), Dummy> = RequestContext::new((), "sys");
        assert!(ctx.new_state_ref().is_none());
        ctx.set_new_state(Dummy { value: 1 });
        assert_eq!(ctx.new_state_ref(), Some(&Dummy { value: 1 }));
    }

    #[test]
    fn new_with_input_deep_clones_into_new_state() {
        let input = Dummy { value: 7 };
        let mut ctx: RequestContext<Dummy, Dummy> = RequestContext::new_with_input(input, "sys");
        assert_eq!(ctx.new_state_ref(), Some(&Dummy { value: 7 }));

        // Mutating new_state must not affect the original input.
        ctx.new_state_mut().unwrap().value = 99;
        assert_eq!(ctx.input.value, 7);
    }

    #[test]
    fn metadata_round_trips_typed_values() {
        let mut ctx: RequestContext<(), ()> = RequestContext::new((), "sys");
        ctx.put_metadata("slug", "my-skill");
        assert_eq!(ctx.get_metadata::<String>("slug"), Some("my-skill".to_string()));
        assert!(!ctx.has_metadata("missing"));
    }
}
