use crate::client::SynoError::*;
use crate::entities::{
    AuthData, FileInfoList, FileList, Folders, Info, Payload, Shares, SynologyResponse,
    UploadResult, error_description,
};
use crate::request::{
    self, ApiRequest, ContentKind, CreateFolderOptions, DownloadMode, Fields, ListOptions,
    PathList, ShareListOptions, UploadOptions,
};
use anyhow::{Context, Result};
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Part;
use reqwest::{Client, Response, StatusCode, multipart};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use std::env;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

const WEBAPI_PATH: &str = "/webapi/";
const AUTH_API: &str = "SYNO.API.Auth";
const AUTH_VERSION: u32 = 6;
const SESSION_NAME: &str = "FileStation";

/// File Station API version used when none is configured
pub const DEFAULT_VERSION: u32 = 1;
/// Overall request timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Connect timeout used when none is configured
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;

/// Custom error types for the [`SynoFS`] client
#[derive(Error, Debug)]
pub enum SynoError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Synology API error: code={code}, message={message}")]
    Api { code: i32, message: String },

    #[error("Network request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Connection timeout after {elapsed_ms} ms")]
    ConnectionTimeout { elapsed_ms: u128 },

    /// `status` is `None` when no response was received
    #[error("Connection error: {reason}")]
    Connection { status: Option<u16>, reason: String },

    #[error("Environment variable error: {0}")]
    Environment(#[from] env::VarError),

    #[error("JSON serialization/deserialization error: {0}")]
    InvalidResponse(String),

    #[error("Invalid input parameter: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// What the caller expects back from a call that may return raw content
#[derive(Debug, Clone, Copy)]
enum ResponseKind {
    /// An envelope when the content type is textual, raw otherwise
    Textual,
    /// An envelope when the content type is JSON, raw otherwise
    Binary,
}

impl ResponseKind {
    fn parses(self, content_type: &str) -> bool {
        match self {
            ResponseKind::Textual => ["plain", "text", "json"]
                .iter()
                .any(|kind| content_type.contains(kind)),
            ResponseKind::Binary => content_type.contains("json"),
        }
    }
}

/// Connection and session settings of a [`SynoFS`] client
#[derive(Clone)]
pub struct Config {
    /// Scheme, host and port, e.g. `https://nas.local:5001`
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// File Station API version
    pub version: u32,
    pub timeout: Duration,
    /// Also the threshold above which a failed call counts as a timeout
    pub connect_timeout: Duration,
    pub verify_ssl: bool,
    /// Existing session to reuse instead of logging in
    pub sid: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("sid", &self.sid.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Config {
    /// Checks that the configuration can be used to reach and log into a NAS
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Base URL is empty or doesn't start with "http://" or "https://"
    /// - Username or password is empty and no session ID is preset
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Configuration("Host URL cannot be empty".into()).into());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Configuration(format!(
                "Host URL must start with http:// or https://, got: {}",
                self.base_url
            ))
            .into());
        }

        if self.sid.is_none() {
            if self.username.is_empty() {
                return Err(Configuration("Username cannot be empty".into()).into());
            }

            if self.password.is_empty() {
                return Err(Configuration("Password cannot be empty".into()).into());
            }
        }

        Ok(())
    }
}

/// Synology File Station client
pub struct SynoFS {
    config: Config,
    client: Client,
    sid: RwLock<Option<String>>,
}

impl SynoFS {
    /// Creates a new `SynoFS` client from the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created
    pub fn new(mut config: Config) -> Result<Self> {
        config.validate()?;

        // Remove trailing slash from host if present
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Self::create_client(&config)?;
        let sid = RwLock::new(config.sid.clone());

        Ok(Self {
            config,
            client,
            sid,
        })
    }

    /// Creates a configured HTTP client
    fn create_client(config: &Config) -> Result<Client> {
        Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(Network)
            .context("Failed to create HTTP client")
    }

    /// Creates a new `SynoFS` client with a builder pattern
    #[must_use]
    pub fn builder() -> SynoFSBuilder {
        SynoFSBuilder::default()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a session ID is held
    pub async fn is_authorized(&self) -> bool {
        self.sid.read().await.is_some()
    }

    /// Authorizes the client by getting a session ID
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - Authentication fails
    /// - Response cannot be parsed
    pub async fn authorize(&self) -> Result<()> {
        let request = ApiRequest::external(AUTH_API, AUTH_VERSION, "login")
            .param("account", &self.config.username)
            .param("passwd", &self.config.password)
            .param("session", SESSION_NAME)
            .param("format", "sid");

        let response = self
            .execute(request, None)
            .await
            .context("Failed to authorize")?;
        let response = read_envelope::<AuthData>(response)
            .await
            .context("Failed to authorize")?;

        if response.success {
            match response.data {
                Some(data) => {
                    *self.sid.write().await = Some(data.sid);
                    debug!("Authorized as {}", self.config.username);
                    Ok(())
                }
                None => Err(InvalidResponse("No data received".into()).into()),
            }
        } else if let Some(error) = response.error {
            Err(Auth(format!("Login failed with code {}", error.code)).into())
        } else {
            Err(Auth("Failed to authenticate".into()).into())
        }
    }

    /// Ends the current session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Session ID is not available
    /// - Network request fails
    /// - API returns an error response
    pub async fn logout(&self) -> Result<()> {
        let sid = self.session().await?;
        let request =
            ApiRequest::external(AUTH_API, AUTH_VERSION, "logout").param("session", SESSION_NAME);

        self.request_empty(request, sid)
            .await
            .context("Failed to log out")?;

        *self.sid.write().await = None;
        Ok(())
    }

    /// Gets File Station information (hostname, manager rights, capabilities)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    /// - Response cannot be parsed
    pub async fn get_info(&self) -> Result<Info> {
        let sid = self.session().await?;
        self.request_data(request::info(), sid)
            .await
            .context("Failed to get File Station info")
    }

    /// Lists shared folders
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    /// - Response cannot be parsed
    pub async fn get_shares(&self, options: &ShareListOptions) -> Result<Shares> {
        let sid = self.session().await?;
        self.request_data(request::list_shares(options), sid)
            .await
            .context("Failed to get shares")
    }

    /// Gets information about one or more files or folders
    ///
    /// Fields `getinfo` doesn't support are dropped from `fields`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Paths are empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    /// - Response cannot be parsed
    pub async fn get_file_info(
        &self,
        paths: impl Into<PathList>,
        fields: &Fields,
    ) -> Result<FileInfoList> {
        let paths = non_empty(paths.into())?;
        let sid = self.session().await?;
        self.request_data(request::file_info(&paths, fields), sid)
            .await
            .context("Failed to get file info")
    }

    /// Lists the content of a folder
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Folder path is empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    /// - Response cannot be parsed
    pub async fn get_list(&self, options: &ListOptions) -> Result<FileList> {
        if options.folder_path.is_empty() {
            return Err(InvalidInput("Folder path cannot be empty".into()).into());
        }

        let sid = self.session().await?;
        self.request_data(request::list(options), sid)
            .await
            .with_context(|| format!("Failed to list {}", options.folder_path))
    }

    /// Lists the entries of a folder matching a glob pattern
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_list()`]
    pub async fn search(&self, pattern: &str, options: &ListOptions) -> Result<FileList> {
        if options.folder_path.is_empty() {
            return Err(InvalidInput("Folder path cannot be empty".into()).into());
        }

        let sid = self.session().await?;
        self.request_data(request::search(pattern, options), sid)
            .await
            .with_context(|| format!("Failed to search {} for {pattern}", options.folder_path))
    }

    /// Downloads one or more files
    ///
    /// File content comes back as [`Payload::Raw`]; a JSON body is treated as
    /// an API response.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Paths are empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    pub async fn download(
        &self,
        paths: impl Into<PathList>,
        mode: DownloadMode,
    ) -> Result<Payload<Value>> {
        let paths = non_empty(paths.into())?;
        let sid = self.session().await?;
        let response = self
            .execute(request::download(&paths, mode), Some(sid))
            .await
            .context("Failed to download")?;

        read_payload(response, ResponseKind::Binary)
            .await
            .context("Failed to download")
    }

    /// Creates a folder
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent path or name is empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    /// - Response cannot be parsed
    pub async fn create_folder(&self, options: &CreateFolderOptions) -> Result<Folders> {
        if options.folder_path.is_empty() {
            return Err(InvalidInput("Folder path cannot be empty".into()).into());
        }

        if options.name.is_empty() {
            return Err(InvalidInput("Folder name cannot be empty".into()).into());
        }

        let sid = self.session().await?;
        self.request_data(request::create_folder(options), sid)
            .await
            .with_context(|| {
                format!(
                    "Failed to create folder {} in {}",
                    options.name, options.folder_path
                )
            })
    }

    /// Deletes files or folders; folders need `recursive`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Paths are empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    pub async fn delete(&self, paths: impl Into<PathList>, recursive: bool) -> Result<()> {
        let paths = non_empty(paths.into())?;
        let sid = self.session().await?;
        self.request_empty(request::delete(&paths, recursive), sid)
            .await
            .context("Failed to delete")
    }

    /// Uploads a file with multipart/form-data
    ///
    /// A textual response is parsed as an API response, anything else comes
    /// back unchanged as [`Payload::Raw`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Destination path or file name is empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - The server doesn't answer with HTTP 200, as
    ///   [`SynoError::ConnectionTimeout`] when the call took at least the
    ///   connect timeout and [`SynoError::Connection`] otherwise
    /// - API returns an error response
    pub async fn upload(&self, options: &UploadOptions) -> Result<Payload<UploadResult>> {
        if options.path.is_empty() {
            return Err(InvalidInput("Destination path cannot be empty".into()).into());
        }

        if options.file_name.is_empty() {
            return Err(InvalidInput("File name cannot be empty".into()).into());
        }

        let sid = self.session().await?;

        debug!(
            "Uploading file. Name: {}, Size: {} bytes, Destination: {}",
            options.file_name,
            options.content.len(),
            options.path
        );

        let response = self
            .execute(request::upload(options), Some(sid))
            .await
            .context("Failed to send file upload request")?;

        read_payload(response, ResponseKind::Textual)
            .await
            .context("Failed to upload file")
    }

    /// Returns the session ID or fails if the client isn't authorized
    async fn session(&self) -> Result<String> {
        match self.sid.read().await.as_ref() {
            Some(sid) => Ok(sid.clone()),
            None => Err(Auth(
                "No session ID available. Make sure to call authorize() first".into(),
            )
            .into()),
        }
    }

    /// Makes an API request whose envelope must carry data
    async fn request_data<D>(&self, request: ApiRequest, sid: String) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let response = self.execute(request, Some(sid)).await?;
        let response = read_envelope::<D>(response).await?;

        match into_data(response)? {
            Some(data) => Ok(data),
            None => Err(InvalidResponse("No data received".into()).into()),
        }
    }

    /// Makes an API request whose envelope data is irrelevant
    async fn request_empty(&self, request: ApiRequest, sid: String) -> Result<()> {
        let response = self.execute(request, Some(sid)).await?;
        let response = read_envelope::<IgnoredAny>(response).await?;
        into_data(response)?;
        Ok(())
    }

    /// Sends a request as form or multipart POST and checks the HTTP status
    async fn execute(&self, request: ApiRequest, sid: Option<String>) -> Result<Response> {
        let url = format!("{}{}{}", self.config.base_url, WEBAPI_PATH, request.path);
        let version = request.version.unwrap_or(self.config.version).to_string();

        debug!(
            "Making API request to: {} (api={}, method={}) with {} parameters",
            url,
            request.api,
            request.method,
            request.params.len()
        );

        let builder = match request.content {
            ContentKind::Form => {
                let mut params: Vec<(&str, &str)> = vec![
                    ("api", request.api.as_str()),
                    ("version", version.as_str()),
                    ("method", request.method),
                ];
                params.extend(
                    request
                        .params
                        .iter()
                        .map(|(key, value)| (*key, value.as_str())),
                );
                if let Some(sid) = &sid {
                    params.push(("_sid", sid.as_str()));
                }

                self.client.post(&url).form(&params)
            }
            ContentKind::Multipart(file) => {
                let form = request
                    .params
                    .iter()
                    .fold(multipart::Form::new(), |form, (key, value)| {
                        form.text(*key, value.clone())
                    })
                    .text("api", request.api.clone())
                    .text("version", version.clone())
                    .text("method", request.method);

                // The file part has to come last
                let file_part = Part::bytes(file.content)
                    .file_name(file.file_name)
                    .mime_str("application/octet-stream")
                    .context("Failed to create file part")?;
                let form = form.part("file", file_part);

                let builder = self.client.post(&url).multipart(form);
                match &sid {
                    Some(sid) => builder.query(&[("_sid", sid)]),
                    None => builder,
                }
            }
        };

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                let elapsed = started.elapsed();
                // The URL may carry the session ID
                let error = error.without_url();
                debug!("API request failed after {elapsed:?}: {error}");
                if error.is_timeout() || elapsed >= self.config.connect_timeout {
                    return Err(ConnectionTimeout {
                        elapsed_ms: elapsed.as_millis(),
                    }
                    .into());
                }
                return Err(Connection {
                    status: None,
                    reason: error.to_string(),
                }
                .into());
            }
        };

        let status = response.status();
        debug!("API request status: {status}");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let elapsed = started.elapsed();
            debug!("API request result: {body}");

            if elapsed >= self.config.connect_timeout {
                return Err(ConnectionTimeout {
                    elapsed_ms: elapsed.as_millis(),
                }
                .into());
            }
            return Err(Connection {
                status: Some(status.as_u16()),
                reason: format!("HTTP status {status}"),
            }
            .into());
        }

        Ok(response)
    }
}

fn non_empty(paths: PathList) -> Result<PathList> {
    if paths.is_empty() || paths.paths().iter().any(String::is_empty) {
        return Err(InvalidInput("Paths cannot be empty".into()).into());
    }
    Ok(paths)
}

fn into_data<D>(response: SynologyResponse<D>) -> Result<Option<D>, SynoError> {
    if response.success {
        Ok(response.data)
    } else if let Some(error) = response.error {
        Err(Api {
            code: error.code,
            message: error_description(error.code).into(),
        })
    } else {
        Err(InvalidResponse("Request failed, unknown error".into()))
    }
}

async fn read_envelope<D>(response: Response) -> Result<SynologyResponse<D>>
where
    D: DeserializeOwned,
{
    let body = response
        .bytes()
        .await
        .map_err(|error| Network(error.without_url()))?;
    serde_json::from_slice(&body)
        .map_err(|error| InvalidResponse(error.to_string()))
        .context("Failed to parse API response")
}

async fn read_payload<D>(response: Response, kind: ResponseKind) -> Result<Payload<D>>
where
    D: DeserializeOwned + Default,
{
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    debug!("API response content type: {content_type}");

    let body = response
        .bytes()
        .await
        .map_err(|error| Network(error.without_url()))?;

    if !kind.parses(&content_type) {
        return Ok(Payload::Raw(body.to_vec()));
    }

    let response = serde_json::from_slice::<SynologyResponse<D>>(&body)
        .map_err(|error| InvalidResponse(error.to_string()))
        .context("Failed to parse API response")?;

    Ok(Payload::Parsed(into_data(response)?.unwrap_or_default()))
}

/// Builder for [`SynoFS`] client
#[derive(Default)]
pub struct SynoFSBuilder {
    url: Option<String>,
    address: Option<String>,
    port: Option<u16>,
    protocol: Option<String>,
    username: Option<String>,
    password: Option<String>,
    version: Option<u32>,
    timeout: Option<u64>,
    connect_timeout: Option<u64>,
    verify_ssl: Option<bool>,
    sid: Option<String>,
}

impl SynoFSBuilder {
    /// Starts a builder from `SYNOLOGY_URL`, `SYNOLOGY_USERNAME`,
    /// `SYNOLOGY_PASSWORD` and the optional `SYNOLOGY_VERIFY_SSL`
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing
    pub fn from_env() -> Result<Self> {
        let url = env::var("SYNOLOGY_URL").map_err(Environment)?;
        let username = env::var("SYNOLOGY_USERNAME").map_err(Environment)?;
        let password = env::var("SYNOLOGY_PASSWORD").map_err(Environment)?;

        let mut builder = Self::default()
            .url(url)
            .username(username)
            .password(password);
        if let Ok(verify_ssl) = env::var("SYNOLOGY_VERIFY_SSL") {
            builder = builder.verify_ssl(matches!(
                verify_ssl.to_lowercase().as_str(),
                "1" | "true" | "yes"
            ));
        }

        Ok(builder)
    }

    /// Sets the full host URL, e.g. `https://nas.local:5001`
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the host name or IP, used when no URL is given
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the port, defaults to 5000 for http and 5001 for https
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the protocol, `http` (default) or `https`
    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Sets the username
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the File Station API version
    #[must_use]
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the request timeout in milliseconds
    #[must_use]
    pub fn timeout(mut self, timeout_millis: u64) -> Self {
        self.timeout = Some(timeout_millis);
        self
    }

    /// Sets the connect timeout in milliseconds
    #[must_use]
    pub fn connect_timeout(mut self, timeout_millis: u64) -> Self {
        self.connect_timeout = Some(timeout_millis);
        self
    }

    /// Enables or disables SSL certificate verification
    #[must_use]
    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = Some(verify_ssl);
        self
    }

    /// Reuses an existing session instead of logging in
    #[must_use]
    pub fn sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    /// Resolves the settings into a [`Config`] without validating it
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither a URL nor an address is provided
    /// - Protocol is neither `http` nor `https`
    /// - Credentials are missing and no session ID is set
    pub fn build_config(self) -> Result<Config> {
        let base_url = match (self.url, self.address) {
            (Some(url), _) => url,
            (None, Some(address)) => {
                let protocol = self.protocol.unwrap_or_else(|| String::from("http"));
                let default_port = match protocol.as_str() {
                    "http" => 5000,
                    "https" => 5001,
                    _ => {
                        return Err(Configuration(format!(
                            "Protocol must be http or https, got: {protocol}"
                        ))
                        .into());
                    }
                };
                let port = self.port.unwrap_or(default_port);
                format!("{protocol}://{address}:{port}")
            }
            (None, None) => {
                return Err(Configuration("Host URL or address is required".into()).into());
            }
        };

        let (username, password) = match (self.username, self.password) {
            (Some(username), Some(password)) => (username, password),
            (username, password) if self.sid.is_some() => {
                (username.unwrap_or_default(), password.unwrap_or_default())
            }
            (None, _) => return Err(Configuration("Username is required".into()).into()),
            (_, None) => return Err(Configuration("Password is required".into()).into()),
        };

        Ok(Config {
            base_url,
            username,
            password,
            version: self.version.unwrap_or(DEFAULT_VERSION),
            timeout: Duration::from_millis(self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS)),
            connect_timeout: Duration::from_millis(
                self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            ),
            verify_ssl: self.verify_ssl.unwrap_or(false),
            sid: self.sid,
        })
    }

    /// Builds the [`SynoFS`] client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields (host, username, password) are not provided
    /// - Host URL doesn't start with "http://" or "https://"
    /// - Any field contains invalid data
    pub fn build(self) -> Result<SynoFS> {
        let config = self.build_config()?;
        SynoFS::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_kind_content_types() {
        assert!(ResponseKind::Textual.parses("text/plain; charset=UTF-8"));
        assert!(ResponseKind::Textual.parses("application/json"));
        assert!(!ResponseKind::Textual.parses("application/octet-stream"));
        assert!(!ResponseKind::Textual.parses(""));
        assert!(ResponseKind::Binary.parses("application/json; charset=utf-8"));
        assert!(!ResponseKind::Binary.parses("text/plain"));
    }

    #[test]
    fn test_build_config_from_address() {
        let config = SynoFS::builder()
            .address("nas.local")
            .protocol("https")
            .username("bob")
            .password("secret")
            .build_config()
            .unwrap();
        assert_eq!(config.base_url, "https://nas.local:5001");
        assert_eq!(config.version, DEFAULT_VERSION);
        assert_eq!(config.connect_timeout, Duration::from_millis(2_000));
        assert!(!config.verify_ssl);
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_build_config_errors() {
        let error = SynoFS::builder()
            .username("bob")
            .password("secret")
            .build_config()
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SynoError>(),
            Some(Configuration(_))
        ));

        let error = SynoFS::builder()
            .address("nas.local")
            .protocol("ftp")
            .username("bob")
            .password("secret")
            .build_config()
            .unwrap_err();
        assert!(error.to_string().contains("Protocol must be http or https"));

        let error = SynoFS::builder()
            .url("nas.local")
            .username("bob")
            .password("secret")
            .build()
            .err()
            .unwrap();
        assert!(error.to_string().contains("must start with http"));
    }

    #[test]
    fn test_preset_session_needs_no_credentials() {
        let synofs = SynoFS::builder()
            .url("http://nas.local:5000/")
            .sid("abc")
            .build()
            .unwrap();
        assert_eq!(synofs.config().base_url, "http://nas.local:5000");
    }

    #[test]
    fn test_into_data_maps_error_code() {
        let response: SynologyResponse<()> =
            serde_json::from_str(r#"{"success":false,"error":{"code":408}}"#).unwrap();
        match into_data(response) {
            Err(Api { code, message }) => {
                assert_eq!(code, 408);
                assert_eq!(message, "No such file or directory");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
