//! Stateless client for the CloudHealth `/aws_accounts` resource.
//!
//! # Design
//! `CloudHealthClient` holds only the API key, the parsed base URL and a
//! transport; nothing changes between calls. Each CRUD operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`. The operation methods
//! (`get_aws_account` and friends) glue the two halves together through the
//! configured `Transport`.

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{AwsAccount, AwsAccounts};

const RESOURCE: &str = "aws_accounts";
const JSON: &str = "application/json";

/// Blocking client for CloudHealth AWS accounts.
///
/// Cloning is cheap and clones share the underlying transport.
#[derive(Clone)]
pub struct CloudHealthClient<T = UreqTransport> {
    api_key: String,
    base_url: Url,
    transport: T,
}

impl CloudHealthClient {
    /// Client that talks HTTP through `ureq`.
    ///
    /// Fails if `base_url` is not an absolute URL that can carry a path.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ApiError> {
        Self::with_transport(api_key, base_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_key, &config.base_url)
    }
}

impl<T: Transport> CloudHealthClient<T> {
    pub fn with_transport(api_key: &str, base_url: &str, transport: T) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a resource path".to_string()));
        }
        parsed.set_fragment(None);

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: parsed,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// First page of accounts, `per_page` at a time.
    pub fn list_aws_accounts(&self, per_page: u32) -> Result<Vec<AwsAccount>, ApiError> {
        self.list_aws_accounts_page(1, per_page)
    }

    pub fn list_aws_accounts_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AwsAccount>, ApiError> {
        let response = self.send(self.build_list_aws_accounts(page, per_page))?;
        self.parse_list_aws_accounts(response)
    }

    pub fn get_aws_account(&self, id: u64) -> Result<AwsAccount, ApiError> {
        let response = self.send(self.build_get_aws_account(id))?;
        self.parse_get_aws_account(response)
    }

    /// Register `account`; the returned copy carries the server-assigned id.
    pub fn create_aws_account(&self, account: &AwsAccount) -> Result<AwsAccount, ApiError> {
        let response = self.send(self.build_create_aws_account(account)?)?;
        self.parse_create_aws_account(response)
    }

    /// Update the account identified by `account.id`.
    pub fn update_aws_account(&self, account: &AwsAccount) -> Result<AwsAccount, ApiError> {
        let response = self.send(self.build_update_aws_account(account)?)?;
        self.parse_update_aws_account(response)
    }

    pub fn delete_aws_account(&self, id: u64) -> Result<(), ApiError> {
        let response = self.send(self.build_delete_aws_account(id))?;
        self.parse_delete_aws_account(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = request.url.path(), "sending cloudhealth request");
        let response = self.transport.execute(&request)?;
        debug!(
            method = %request.method,
            path = request.url.path(),
            status = response.status,
            "received cloudhealth response"
        );
        Ok(response)
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    /// `page` is 1-based. A `per_page` of zero leaves the page size to the
    /// server.
    pub fn build_list_aws_accounts(&self, page: u32, per_page: u32) -> HttpRequest {
        let mut url = self.endpoint(None);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.max(1).to_string());
            if per_page > 0 {
                query.append_pair("per_page", &per_page.to_string());
            }
        }
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_get_aws_account(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, self.endpoint(Some(id)), None)
    }

    pub fn build_create_aws_account(&self, account: &AwsAccount) -> Result<HttpRequest, ApiError> {
        if account.name.trim().is_empty() {
            return Err(ApiError::MissingName);
        }
        let body = encode(account)?;
        Ok(self.request(HttpMethod::Post, self.endpoint(None), Some(body)))
    }

    pub fn build_update_aws_account(&self, account: &AwsAccount) -> Result<HttpRequest, ApiError> {
        if account.id == 0 {
            return Err(ApiError::UnassignedId);
        }
        let body = encode(account)?;
        Ok(self.request(HttpMethod::Put, self.endpoint(Some(account.id)), Some(body)))
    }

    pub fn build_delete_aws_account(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.endpoint(Some(id)), None)
    }

    /// Collection URL, or the member URL when `id` is given, with the API key
    /// attached.
    fn endpoint(&self, id: Option<u64>) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base URLs are rejected at construction.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(RESOURCE);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        url
    }

    fn request(&self, method: HttpMethod, url: Url, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), JSON.to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), JSON.to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    pub fn parse_list_aws_accounts(&self, response: HttpResponse) -> Result<Vec<AwsAccount>, ApiError> {
        check_status(&response, &[200])?;
        let page: AwsAccounts = decode(&response.body)?;
        Ok(page.aws_accounts)
    }

    pub fn parse_get_aws_account(&self, response: HttpResponse) -> Result<AwsAccount, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_create_aws_account(&self, response: HttpResponse) -> Result<AwsAccount, ApiError> {
        check_status(&response, &[201])?;
        decode(&response.body)
    }

    pub fn parse_update_aws_account(&self, response: HttpResponse) -> Result<AwsAccount, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_delete_aws_account(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }
}

impl<T> fmt::Debug for CloudHealthClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut base_url = self.base_url.clone();
        base_url.set_query(None);
        f.debug_struct("CloudHealthClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        422 => Err(ApiError::Conflict {
            body: response.body.clone(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

fn encode(account: &AwsAccount) -> Result<String, ApiError> {
    serde_json::to_string(account).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode<D: DeserializeOwned>(body: &str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
