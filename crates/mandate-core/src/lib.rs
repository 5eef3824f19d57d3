//! # mandate-core
//!
//! The trust core of MANDATE: trait seams for the external collaborators,
//! the ability registry, the proxy table, and the atomic order gateway.
//!
//! This crate provides:
//! - The collaborator traits (`StateStore`, `Clock`, `LedgerAdapter`,
//!   `ClaimEncoder`, `SignatureRecovery`, `ClaimRegistry`, `EffectWriter`)
//! - The `AbilityRegistry` and `ProxyTable`
//! - The `Gateway` dispatcher that wires them together in the correct
//!   trust order
//! - TOML gateway configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mandate_core::{Gateway, proxy::ProxyTable, config::GatewayConfig};
//! ```

pub mod config;
pub mod gateway;
pub mod proxy;
pub mod registry;
pub mod traits;

pub use gateway::Gateway;
pub use proxy::{ProxyEntry, ProxyTable};
pub use registry::AbilityRegistry;
