//! HPE provider
//!
//! Composes sub-providers into the `hpe` provider and exposes an
//! in-process host harness that drives it the way the plugin host would.
//!
//! ```text
//! ProviderServer ──configure──▶ HpeProvider ──▶ SubProvider (morpheus, ...)
//!       │                                             │
//!       └──create/read/...──▶ Resource / DataSource ◀─┘
//! ```

pub mod provider;
pub mod server;

#[cfg(test)]
mod testing;

pub use provider::{HpeProvider, TYPE_NAME};
pub use server::{ProviderSchema, ProviderServer};
