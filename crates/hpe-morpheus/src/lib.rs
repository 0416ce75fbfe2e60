//! Morpheus sub-provider for the HPE provider
//!
//! This crate implements the `SubProvider` trait for the Morpheus
//! cloud-management platform: users and roles as resources, groups, clouds
//! and environments as data sources.
//!
//! # Client lifecycle
//!
//! The `morpheus { ... }` block is parsed once into a [`SubModel`] and
//! turned into a [`ClientFactory`]. The factory composes its transport
//! stack on first use:
//!
//! ```text
//! TraceTransport (MORPHEUS_API_HTTPTRACE set)
//!   └─ CredsTransport | TokenTransport
//!        └─ HttpTransport (reqwest, 15s timeout)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hpe_morpheus::{ClientFactory, SubModel};
//!
//! let factory = ClientFactory::new(
//!     SubModel::new("https://morpheus.example.com").with_password("admin", "secret"),
//! );
//!
//! // The first request acquires a token
//! let client = factory.new_client().await?;
//! let groups = client.list_groups(Some("production")).await?;
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod clientfactory;
pub mod configure;
pub mod datasources;
pub mod error;
pub mod model;
pub mod resources;
pub mod subprovider;
pub mod trace;
pub mod transport;

#[cfg(test)]
mod testing;

/// Block name and `ProviderData` key
pub const SUB_PROVIDER_NAME: &str = "morpheus";

pub use auth::{CredsTransport, TokenTransport};
pub use client::MorpheusClient;
pub use clientfactory::{ClientFactory, ClientFactoryBuilder};
pub use configure::MorpheusConfigure;
pub use error::{MorpheusError, Result};
pub use model::{Credentials, SubModel};
pub use subprovider::MorpheusSubProvider;
pub use trace::{HTTP_TRACE_ENV, TraceTransport};
pub use transport::{ClientConfig, HttpTransport, Transport};
