// crates/typed-results/src/metadata.rs - description-time endpoint metadata
//
// Nothing in here touches a request. Results describe themselves into an
// `EndpointMetadataContext` during registration; the registry is frozen into
// an `EndpointRegistry` before traffic is served and only read afterwards.
use std::any::TypeId;
use std::fmt;

use axum::http::{Method, StatusCode};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Identity of a payload type as seen by description tooling.
#[derive(Clone, Copy)]
pub struct PayloadType {
    id: TypeId,
    name: &'static str,
}

impl PayloadType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for PayloadType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// One possible response of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMetadataEntry {
    pub payload_type: PayloadType,
    pub status_code: StatusCode,
    pub content_type: &'static str,
}

impl EndpointMetadataEntry {
    pub fn new(payload_type: PayloadType, status_code: StatusCode, content_type: &'static str) -> Self {
        Self {
            payload_type,
            status_code,
            content_type,
        }
    }
}

impl Serialize for EndpointMetadataEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EndpointMetadataEntry", 3)?;
        state.serialize_field("payload_type", &self.payload_type)?;
        state.serialize_field("status_code", &self.status_code.as_u16())?;
        state.serialize_field("content_type", self.content_type)?;
        state.end()
    }
}

/// Append-only collection results describe themselves into.
#[derive(Debug, Default)]
pub struct EndpointMetadataContext {
    entries: Vec<EndpointMetadataEntry>,
}

impl EndpointMetadataContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: EndpointMetadataEntry) {
        self.entries.push(entry);
    }

    /// Record that the endpoint may respond with `payload_type` at `status_code`.
    pub fn populate(
        &mut self,
        payload_type: PayloadType,
        status_code: StatusCode,
        content_type: &'static str,
    ) {
        self.add(EndpointMetadataEntry::new(payload_type, status_code, content_type));
    }

    pub fn entries(&self) -> &[EndpointMetadataEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<EndpointMetadataEntry> {
        self.entries
    }
}

/// Type-level description of the responses a result type can produce.
///
/// Implementors never need an instance: tooling calls
/// `R::populate_metadata` with nothing but the type.
pub trait DescribeResponse {
    fn populate_metadata(ctx: &mut EndpointMetadataContext);
}

/// Collect the metadata a result type declares.
pub fn describe<R: DescribeResponse>() -> Vec<EndpointMetadataEntry> {
    let mut ctx = EndpointMetadataContext::new();
    R::populate_metadata(&mut ctx);
    ctx.into_entries()
}

/// All declared responses of one route.
#[derive(Debug, Clone)]
pub struct EndpointDescription {
    pub method: Method,
    pub path: String,
    pub responses: Vec<EndpointMetadataEntry>,
}

impl Serialize for EndpointDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EndpointDescription", 3)?;
        state.serialize_field("method", self.method.as_str())?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("responses", &self.responses)?;
        state.end()
    }
}

/// Registration-phase registry. Consumed by [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    endpoints: Vec<EndpointDescription>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the responses `R` declares to the endpoint at `method path`.
    pub fn describe<R: DescribeResponse>(&mut self, method: Method, path: &str) -> &mut Self {
        let mut ctx = EndpointMetadataContext::new();
        R::populate_metadata(&mut ctx);
        self.endpoint_mut(method, path)
            .responses
            .extend(ctx.into_entries());
        self
    }

    pub fn add(&mut self, method: Method, path: &str, entry: EndpointMetadataEntry) -> &mut Self {
        self.endpoint_mut(method, path).responses.push(entry);
        self
    }

    pub fn build(self) -> EndpointRegistry {
        EndpointRegistry {
            endpoints: self.endpoints,
        }
    }

    fn endpoint_mut(&mut self, method: Method, path: &str) -> &mut EndpointDescription {
        let index = match self
            .endpoints
            .iter()
            .position(|e| e.method == method && e.path == path)
        {
            Some(index) => index,
            None => {
                self.endpoints.push(EndpointDescription {
                    method,
                    path: path.to_string(),
                    responses: Vec::new(),
                });
                self.endpoints.len() - 1
            }
        };
        &mut self.endpoints[index]
    }
}

/// Frozen registry, read-only while serving.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct EndpointRegistry {
    endpoints: Vec<EndpointDescription>,
}

impl EndpointRegistry {
    pub fn endpoints(&self) -> &[EndpointDescription] {
        &self.endpoints
    }

    pub fn get(&self, method: &Method, path: &str) -> Option<&EndpointDescription> {
        self.endpoints
            .iter()
            .find(|e| e.method == *method && e.path == path)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
