//! Synchronous client for the CloudHealth AWS accounts API.
//!
//! # Overview
//! Lists, fetches, creates, updates and deletes the AWS accounts registered
//! with CloudHealth. Requests are built as plain data (`HttpRequest`), sent
//! through a `Transport` (blocking `ureq` by default) and the plain-data
//! `HttpResponse` is parsed into typed records or an `ApiError`.
//!
//! ```no_run
//! use cloudhealth_core::{AwsAccount, ClientConfig, CloudHealthClient};
//!
//! # fn main() -> Result<(), cloudhealth_core::ApiError> {
//! let client = CloudHealthClient::from_config(&ClientConfig::from_env()?)?;
//! let created = client.create_aws_account(&AwsAccount::named("staging"))?;
//! for account in client.list_aws_accounts(30)? {
//!     println!("{} {}", account.id, account.name);
//! }
//! client.delete_aws_account(created.id)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `CloudHealthClient` is stateless: API key, base URL and transport only.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and hosts can do
//!   their own I/O.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::CloudHealthClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{
    AwsAccount, AwsAccountAuthentication, AwsAccountBilling, AwsAccountCloudwatch, AwsAccountFeed,
    AwsAccountTag, AwsAccounts,
};
