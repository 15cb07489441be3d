//! # azidentity provider
//!
//! A provider plugin for authenticating with resources supporting Entra ID
//! authentication. Configuration selects an ordered chain of credential
//! sources; a single ephemeral resource fetches short-lived access tokens
//! from that chain on every read.
//!
//! Supported credential types, tried in the user's order (the default chain
//! is `environment_credential`, `azure_pipelines_credential`,
//! `workload_identity_credential`, `managed_identity_credential`,
//! `azure_cli_credential`):
//!
//! - `environment_credential` — service principal from `AZURE_TENANT_ID`,
//!   `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`
//! - `azure_pipelines_credential` — Azure Pipelines workload federation
//! - `workload_identity_credential`
//! - `managed_identity_credential`
//! - `azure_cli_credential` — developer tools (`az`, `azd`)
//! - `client_secret_credential`
//! - `client_certificate_credential`
//!
//! Token issuance, retries and caching are delegated to the identity SDK;
//! this crate only translates configuration into SDK credential constructors
//! and surfaces failures as host diagnostics.

mod chain;
mod cloud;
mod credentials;
mod env;
mod models;
mod provider;
mod token;

pub use self::chain::{ChainError, ChainedTokenCredential};
pub use self::cloud::{Cloud, select_cloud};
pub use self::credentials::{CREDENTIAL_TYPES, DEFAULT_CREDENTIAL_TYPES, setup_credential_chain};
pub use self::env::Env;
pub use self::provider::AzIdentityProvider;
pub use self::token::TokenEphemeralResource;
