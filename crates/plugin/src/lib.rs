//! # Plugin Surface
//!
//! This crate defines the host-facing surface a provider plugin conforms to:
//! the dynamic configuration value model, attribute schema declaration and
//! validation, structured diagnostics, and the provider/ephemeral-resource
//! lifecycle traits.
//!
//! The host's wire protocol is deliberately out of scope — a host drives the
//! traits in this crate however it transports configuration and results.

mod diagnostics;
mod path;
mod resource;
mod schema;
mod validator;
mod value;

pub use self::diagnostics::*;
pub use self::path::*;
pub use self::resource::*;
pub use self::schema::*;
pub use self::validator::*;
pub use self::value::*;
