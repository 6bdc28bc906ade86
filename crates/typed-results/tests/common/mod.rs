// Shared recording collaborators for the integration tests.
#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use typed_results::axum::async_trait;
use typed_results::{Logger, LoggerFactory, ResponseChannel, StatusCode};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Log {
        category: &'static str,
        message: String,
    },
    Status(u16),
    Body {
        json: String,
        content_type: &'static str,
    },
}

pub type Events = Arc<Mutex<Vec<Event>>>;

pub fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn snapshot(events: &Events) -> Vec<Event> {
    events.lock().unwrap().clone()
}

/// Channel that records every call into a shared event log.
pub struct RecordingChannel {
    events: Events,
}

impl RecordingChannel {
    pub fn new(events: &Events) -> Self {
        Self {
            events: events.clone(),
        }
    }
}

#[async_trait]
impl ResponseChannel for RecordingChannel {
    fn set_status_code(&mut self, status: StatusCode) {
        self.events.lock().unwrap().push(Event::Status(status.as_u16()));
    }

    async fn write_serialized<T>(
        &mut self,
        value: &T,
        content_type: &'static str,
    ) -> typed_results::Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.events
            .lock()
            .unwrap()
            .push(Event::Body { json, content_type });
        Ok(())
    }
}

/// Logger factory writing into the same event log as the channel.
pub struct RecordingLoggers {
    events: Events,
}

impl RecordingLoggers {
    pub fn new(events: &Events) -> Self {
        Self {
            events: events.clone(),
        }
    }
}

struct RecordingLogger {
    category: &'static str,
    events: Events,
}

impl Logger for RecordingLogger {
    fn info(&self, message: fmt::Arguments<'_>) {
        self.events.lock().unwrap().push(Event::Log {
            category: self.category,
            message: message.to_string(),
        });
    }
}

impl LoggerFactory for RecordingLoggers {
    fn create_logger(&self, category: &'static str) -> Box<dyn Logger> {
        Box::new(RecordingLogger {
            category,
            events: self.events.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl ErrorInfo {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// A payload whose serialization always fails.
#[derive(Debug)]
pub struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("refusing to serialize"))
    }
}
