//! Authenticated HTTP client

use super::payload::{Download, FilePart, disposition_file_name};
use crate::auth::Session;
use crate::config::ClientConfig;
use crate::error::{TallyError, TallyResult, extract_detail};
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Transport for every backend call.
///
/// Holds the shared [`Session`] handle instead of mutating default headers:
/// the `Authorization` header is derived from the session each time a request
/// is built, so a logout is observed by every call issued after it.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for `config.base_url` bound to `session`
    pub fn new(config: &ClientConfig, session: Session) -> TallyResult<Self> {
        config.validate()?;

        let mut builder = Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| {
            TallyError::config_with_context(
                format!("Failed to create HTTP client: {}", e),
                "Building transport",
            )
        })?;

        debug!(base_url = %config.base_url(), "created api client");

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            session,
        })
    }

    /// Session handle this client reads credentials from
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request, attaching the bearer header if a session exists
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.get() {
            Some(token) => builder.header(AUTHORIZATION, token.header_value()),
            None => builder,
        }
    }

    /// GET a JSON resource
    #[instrument(skip(self, query), level = "debug")]
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> TallyResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        decode(response).await
    }

    /// POST a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> TallyResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    /// POST with query parameters and no body
    #[instrument(skip(self, query), level = "debug")]
    pub async fn post_query<T>(&self, path: &str, query: &[(&str, String)]) -> TallyResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).query(query)).await?;
        decode(response).await
    }

    /// PATCH a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> TallyResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PATCH, path).json(body)).await?;
        decode(response).await
    }

    /// POST a single file as `multipart/form-data` under the `file` field
    #[instrument(skip(self, file), fields(file = %file.file_name, size = file.bytes.len()), level = "debug")]
    pub async fn post_multipart<T>(&self, path: &str, file: FilePart) -> TallyResult<T>
    where
        T: DeserializeOwned,
    {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|e| TallyError::validation_field(e.to_string(), "file"))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(self.request(Method::POST, path).multipart(form))
            .await?;
        decode(response).await
    }

    /// GET a binary payload (file downloads)
    #[instrument(skip(self, query), level = "debug")]
    pub async fn get_binary(&self, path: &str, query: &[(&str, String)]) -> TallyResult<Download> {
        let response = self.send(self.request(Method::GET, path).query(query)).await?;

        let content_type = header_str(&response, CONTENT_TYPE);
        let suggested_name =
            header_str(&response, CONTENT_DISPOSITION).and_then(|v| disposition_file_name(&v));

        let bytes = response.bytes().await?.to_vec();
        Ok(Download {
            bytes,
            content_type,
            suggested_name,
        })
    }

    /// Send a request and turn non-success statuses into `TallyError::Server`
    async fn send(&self, builder: RequestBuilder) -> TallyResult<Response> {
        let response = builder.send().await.map_err(|e| {
            let url = e.url().map(|u| u.to_string()).unwrap_or_default();
            warn!(url = %url, error = %e, "request failed without a response");
            TallyError::network_with_url(e.to_string(), url)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        debug!(status = status.as_u16(), url = %url, detail = ?detail, "request rejected");
        Err(TallyError::server_with_url(status.as_u16(), detail, url))
    }
}

fn header_str(response: &Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn decode<T: DeserializeOwned>(response: Response) -> TallyResult<T> {
    let url = response.url().to_string();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        TallyError::json_with_context(
            format!("Failed to parse response: {}", e),
            format!("Decoding body from {}", url),
        )
    })
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}
