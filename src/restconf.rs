//! RESTCONF (RFC 8040) session against `ietf-netconf-monitoring`.
//!
//! Lists schemas from the `netconf-state/schemas` container and retrieves
//! source text through the `get-schema` operation (RFC 6022).

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::SessionError;
use crate::session::SchemaSession;
use crate::types::CatalogEntry;

/// Default timeout for HTTP requests (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const YANG_DATA_JSON: &str = "application/yang-data+json";
const SCHEMAS_PATH: &str = "data/ietf-netconf-monitoring:netconf-state/schemas";
const GET_SCHEMA_PATH: &str = "operations/ietf-netconf-monitoring:get-schema";

#[derive(Deserialize)]
struct SchemasReply {
    #[serde(rename = "ietf-netconf-monitoring:schemas", alias = "schemas")]
    schemas: SchemaList,
}

#[derive(Deserialize)]
struct SchemaList {
    #[serde(default)]
    schema: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct GetSchemaReply {
    #[serde(rename = "ietf-netconf-monitoring:output", alias = "output")]
    output: GetSchemaOutput,
}

#[derive(Deserialize)]
struct GetSchemaOutput {
    data: String,
}

#[derive(Deserialize)]
struct ErrorsReply {
    #[serde(rename = "ietf-restconf:errors", alias = "errors")]
    errors: ErrorList,
}

#[derive(Deserialize)]
struct ErrorList {
    #[serde(default)]
    error: Vec<RestconfError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RestconfError {
    error_tag: String,
    #[serde(default)]
    error_message: Option<String>,
}

/// Blocking RESTCONF client for one device.
///
/// ```no_run
/// use std::time::Duration;
/// use yang_fetch::{resolve, RestconfSession};
///
/// let mut session = RestconfSession::new("https://router.example.net/restconf")
///     .credentials("admin", Some("secret"))
///     .timeout(Duration::from_secs(30));
/// let resolution = resolve(&mut session, "openconfig-interfaces")?;
/// println!("{} modules", resolution.total_attempts);
/// # Ok::<(), yang_fetch::ResolveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RestconfSession {
    root: String,
    timeout: Duration,
    credentials: Option<(String, Option<String>)>,
    client: Option<Client>,
}

impl RestconfSession {
    /// Session for the RESTCONF root resource, e.g. `https://host/restconf`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials: None,
            client: None,
        }
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = None;
        self
    }

    /// HTTP basic credentials.
    pub fn credentials(mut self, user: impl Into<String>, password: Option<&str>) -> Self {
        self.credentials = Some((user.into(), password.map(str::to_string)));
        self
    }

    fn client(&mut self) -> Result<Client, SessionError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| classify(e, self.timeout))?;
        self.client = Some(client.clone());
        Ok(client)
    }

    fn request(&mut self, method: Method, path: &str) -> Result<RequestBuilder, SessionError> {
        let url = format!("{}/{}", self.root, path);
        let mut request = self
            .client()?
            .request(method, url)
            .header(ACCEPT, YANG_DATA_JSON);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_ref());
        }
        Ok(request)
    }

    fn exchange<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SessionError> {
        let response = request.send().map_err(|e| classify(e, self.timeout))?;
        let status = response.status();
        let body = response.text().map_err(|e| classify(e, self.timeout))?;

        if !status.is_success() {
            return Err(device_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| SessionError::InvalidReply(e.to_string()))
    }
}

impl SchemaSession for RestconfSession {
    fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError> {
        let request = self.request(Method::GET, SCHEMAS_PATH)?;
        let reply: SchemasReply = self.exchange(request)?;
        debug!(count = reply.schemas.schema.len(), "listed schemas");
        Ok(reply.schemas.schema)
    }

    fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError> {
        let input = json!({
            "ietf-netconf-monitoring:input": { "identifier": identifier }
        });
        let request = self
            .request(Method::POST, GET_SCHEMA_PATH)?
            .header(CONTENT_TYPE, YANG_DATA_JSON)
            .body(input.to_string());
        let reply: GetSchemaReply = self.exchange(request)?;
        Ok(reply.output.data)
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> SessionError {
    if error.is_timeout() {
        SessionError::Timeout(timeout)
    } else {
        SessionError::Transport(error.to_string())
    }
}

/// Decode an `ietf-restconf:errors` body, falling back to the HTTP status.
fn device_error(status: StatusCode, body: &str) -> SessionError {
    let first = serde_json::from_str::<ErrorsReply>(body)
        .ok()
        .and_then(|reply| reply.errors.error.into_iter().next());

    match first {
        Some(error) => SessionError::Rpc {
            message: error
                .error_message
                .unwrap_or_else(|| status.to_string()),
            tag: error.error_tag,
        },
        None => SessionError::Rpc {
            tag: status.as_u16().to_string(),
            message: status.to_string(),
        },
    }
}
