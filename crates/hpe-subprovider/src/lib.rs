//! HPE provider framework contract
//!
//! This crate models the host side of the plugin protocol: schemas,
//! diagnostics, the typed provider-data map and the traits every
//! sub-provider, resource and data source implements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  hpe-provider                    │
//! │      (composer + in-process host harness)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                hpe-subprovider                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait SubProvider / Resource / DataSource│   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │    Schema    │  │ ProviderData │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │ hpe-morpheus  │
//! │ sub-provider  │
//! └───────────────┘
//! ```

pub mod config;
pub mod configure;
pub mod diagnostics;
pub mod error;
pub mod provider_data;
pub mod resource;
pub mod schema;
pub mod subprovider;

// Re-exports
pub use config::{BlockAccessor, decode};
pub use configure::ConfigureClient;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use provider_data::{ProviderData, ProviderDataEntry};
pub use resource::{DataSource, DataSourceFactory, Resource, ResourceFactory, ResourceResponse};
pub use schema::{Attribute, AttributeType, Block, Schema, Validator};
pub use subprovider::SubProvider;
