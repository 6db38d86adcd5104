//! Request-side authorization boundary.
//!
//! Handlers resolve the caller's membership elsewhere, then use this crate
//! to turn it into an ability and to guard each mutation or read.

pub mod authz;
pub mod bootstrap;
pub mod config;
pub mod context;

pub use authz::{AuthzError, ensure_can};
pub use config::{Config, ConfigError};
pub use context::{MembershipContext, TenantContext};
