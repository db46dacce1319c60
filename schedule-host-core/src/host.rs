//! The request-level flow: store access plus rendering.
//!
//! Callers hand in already-parsed values (record name, payload bytes, output
//! format, options) and get back either a complete document or an [`Access`]
//! outcome to translate for their client.

use crate::error::{HostError, HostResult};
use crate::render::{OutputFormat, RenderOptions, Rendered, render};
use crate::schedule::Schedule;
use crate::store::{Access, Store, validate_name};

pub struct ScheduleHost<'a> {
    store: &'a Store,
    defaults: RenderOptions,
}

impl<'a> ScheduleHost<'a> {
    pub fn new(store: &'a Store, defaults: RenderOptions) -> Self {
        ScheduleHost { store, defaults }
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    /// Rendering options used when a request brings none of its own.
    pub fn defaults(&self) -> &RenderOptions {
        &self.defaults
    }

    /// Store a JSON payload under `name`.
    ///
    /// An existing record is only replaced when the active credential can open it.
    pub fn publish(&self, name: &str, payload: &[u8]) -> HostResult<Access<()>> {
        validate_name(name)?;

        if serde_json::from_slice::<serde_json::Value>(payload).is_err() {
            return Err(HostError::Validation("payload is not valid JSON".into()));
        }

        if self.store.exists(name)? && !self.store.load(name)?.is_granted() {
            tracing::warn!(record = name, "refusing to overwrite a record we cannot open");
            return Ok(Access::Unauthenticated);
        }

        self.store.save(name, payload)?;
        Ok(Access::Granted(()))
    }

    /// Load `name` and render it with the host defaults.
    pub fn fetch(&self, name: &str, format: OutputFormat) -> HostResult<Access<Rendered>> {
        self.fetch_with(name, format, &self.defaults)
    }

    /// Load `name` and render it with explicit options.
    pub fn fetch_with(
        &self,
        name: &str,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> HostResult<Access<Rendered>> {
        let plaintext = match self.store.load(name)? {
            Access::Granted(plaintext) => plaintext,
            Access::Unauthenticated => return Ok(Access::Unauthenticated),
            Access::NotFound => return Ok(Access::NotFound),
        };

        let schedule = Schedule::from_json(&plaintext)?;
        let rendered = render(&schedule, format, options)?;

        tracing::debug!(
            record = name,
            %format,
            bytes = rendered.body.len(),
            "rendered record"
        );
        Ok(Access::Granted(rendered))
    }

    /// Delete `name` if the active credential can open it.
    pub fn remove(&self, name: &str) -> HostResult<Access<bool>> {
        match self.store.load(name)? {
            Access::Granted(_) => Ok(Access::Granted(self.store.delete(name)?)),
            other => Ok(other.map(|_| false)),
        }
    }

    pub fn names(&self) -> HostResult<Vec<String>> {
        self.store.names()
    }
}
