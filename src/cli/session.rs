//! Interactive editing session
//!
//! One JSON request per input line, one JSON response per output line.
//! Requests are tagged by `op`:
//!
//! ```text
//! {"op":"get"}                                   whole schema
//! {"op":"get","path":["address","city"]}         one property
//! {"op":"add","path":[],"property":{...}}
//! {"op":"edit","path":["age"],"updates":{"name":"years"}}
//! {"op":"delete","path":["age"]}
//! {"op":"export","sorted":true}
//! {"op":"form"}
//! {"op":"validate","data":{...}}
//! {"op":"append_item","data":{...},"path":"tags"}
//! {"op":"remove_item","data":{...},"path":"tags","index":0}
//! {"op":"metrics"}
//! ```
//!
//! A failing request produces an error response; the session continues.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::form::{self, FormError};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{
    export_json, normalize_property, PropertyUpdate, SchemaError, SchemaPath, SchemaProperty,
    SchemaValidator,
};
use crate::store::{SchemaStore, Subscription};

use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{error_response, ok_response, read_requests, write_line};

/// A decoded session request
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Get {
        #[serde(default)]
        path: SchemaPath,
    },
    Add {
        #[serde(default)]
        path: SchemaPath,
        property: Value,
    },
    Edit {
        path: SchemaPath,
        updates: PropertyUpdate,
    },
    Delete {
        path: SchemaPath,
    },
    Export {
        #[serde(default)]
        sorted: Option<bool>,
    },
    Form,
    Validate {
        data: Value,
    },
    AppendItem {
        data: Value,
        path: String,
    },
    RemoveItem {
        data: Value,
        path: String,
        index: usize,
    },
    Metrics,
}

/// Request failure, rendered as an error response
#[derive(Debug)]
enum Failure {
    Schema(SchemaError),
    Form(FormError),
    Request(CliError),
}

impl Failure {
    fn code(&self) -> &'static str {
        match self {
            Failure::Schema(e) => e.code().code(),
            Failure::Form(e) => e.code(),
            Failure::Request(e) => e.code_str(),
        }
    }

    fn message(&self) -> String {
        match self {
            Failure::Schema(e) => e.message().to_string(),
            Failure::Form(e) => e.to_string(),
            Failure::Request(e) => e.message().to_string(),
        }
    }
}

impl From<SchemaError> for Failure {
    fn from(e: SchemaError) -> Self {
        Failure::Schema(e)
    }
}

impl From<FormError> for Failure {
    fn from(e: FormError) -> Self {
        Failure::Form(e)
    }
}

/// Editing session over one store
pub struct Session {
    store: Arc<SchemaStore>,
    sorted_output: bool,
    revision: Arc<AtomicU64>,
    subscription: Subscription,
}

impl Session {
    /// Starts a session and subscribes to the store's changes
    pub fn new(store: Arc<SchemaStore>, sorted_output: bool) -> Self {
        let revision = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&revision);
        // The catch-up call counts as revision 1.
        let subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        Self {
            store,
            sorted_output,
            revision,
            subscription,
        }
    }

    /// Returns the number of tree snapshots observed so far
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Returns the underlying store
    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// Handles one raw request and returns the response
    pub fn handle(&self, request: Value) -> Value {
        let result = serde_json::from_value::<Request>(request)
            .map_err(|e| Failure::Request(CliError::bad_request(format!("Invalid request: {}", e))))
            .and_then(|request| self.dispatch(request));

        match result {
            Ok(data) => ok_response(data),
            Err(failure) => {
                let code = failure.code();
                log_event_with_fields(Event::RequestFailed, &[("code", code)]);
                error_response(code, &failure.message())
            }
        }
    }

    /// Reads requests from `input` until EOF, writing one response per request.
    ///
    /// Returns the number of requests handled. Only I/O failures end the
    /// session early.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> CliResult<u64> {
        let store_id = self.store.id().to_string();
        log_event_with_fields(Event::SessionBegin, &[("store", store_id.as_str())]);

        let mut handled = 0u64;
        for request in read_requests(input) {
            let response = match request {
                Ok(request) => self.handle(request),
                Err(e) if e.code() == &CliErrorCode::BadRequest => {
                    log_event_with_fields(Event::RequestFailed, &[("code", e.code_str())]);
                    error_response(e.code_str(), e.message())
                }
                Err(e) => return Err(e),
            };
            write_line(out, &response)?;
            handled += 1;
        }

        let count = handled.to_string();
        log_event_with_fields(
            Event::SessionEnd,
            &[("requests", count.as_str()), ("store", store_id.as_str())],
        );
        Ok(handled)
    }

    fn dispatch(&self, request: Request) -> Result<Value, Failure> {
        match request {
            Request::Get { path } if path.is_root() => to_value(&self.store.get_schema()),
            Request::Get { path } => {
                let segment = path
                    .steps()
                    .last()
                    .map(|step| step.as_key().to_string())
                    .unwrap_or_default();
                let property = self
                    .store
                    .get_property(&path)
                    .ok_or_else(|| SchemaError::not_found(&path, &segment))?;
                to_value(&property)
            }
            Request::Add { path, mut property } => {
                normalize_property(&mut property);
                let property: SchemaProperty = serde_json::from_value(property)
                    .map_err(|e| SchemaError::invalid_property(&path, e.to_string()))?;
                self.store.add_property(&path, property)?;
                Ok(self.revision_data())
            }
            Request::Edit { path, updates } => {
                self.store.edit_property(&path, updates)?;
                Ok(self.revision_data())
            }
            Request::Delete { path } => {
                self.store.delete_property(&path)?;
                Ok(self.revision_data())
            }
            Request::Export { sorted } => {
                let sorted = sorted.unwrap_or(self.sorted_output);
                let text = export_json(&self.store.get_schema(), sorted)?;
                Ok(Value::String(text))
            }
            Request::Form => {
                let schema = self.store.get_schema();
                Ok(json!({
                    "fields": form::build_form(&schema),
                    "initial_data": form::initial_data(&schema),
                }))
            }
            Request::Validate { data } => {
                let schema = self.store.get_schema();
                SchemaValidator::new(&schema).validate(&data)?;
                Ok(json!({"valid": true}))
            }
            Request::AppendItem { mut data, path } => {
                let len = form::append_item(&self.store.get_schema(), &mut data, &path)?;
                Ok(json!({"data": data, "len": len}))
            }
            Request::RemoveItem {
                mut data,
                path,
                index,
            } => {
                let removed = form::remove_item(&self.store.get_schema(), &mut data, &path, index)?;
                Ok(json!({"data": data, "removed": removed}))
            }
            Request::Metrics => Ok(json!({
                "metrics": self.store.metrics(),
                "listeners": self.store.listener_count(),
                "revision": self.revision(),
            })),
        }
    }

    fn revision_data(&self) -> Value {
        json!({"revision": self.revision()})
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, Failure> {
    serde_json::to_value(value)
        .map_err(|e| Failure::Request(CliError::io_error(format!("JSON error: {}", e))))
}
