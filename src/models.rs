//! Credential parameter blocks and their parsing rules.
//!
//! Each block declares a table of `(field, environment-variable list,
//! missing-value policy)` tuples. Parsing is one shared routine over the
//! table: a user-supplied value wins (including an explicit empty string),
//! otherwise the first environment variable present is used, otherwise the
//! per-field policy decides whether to stay silent, warn, or fail.

use plugin::{AttributePath, Diagnostic, Diagnostics, Value};

use crate::env::Env;

/// What happens when neither configuration nor environment supplies a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Silently absent; the SDK applies its own defaulting.
    Allow,
    /// Non-fatal warning.
    Warn,
    /// Fatal error.
    Error,
}

/// One row of a parameter block's parsing table.
pub struct FieldSpec {
    pub name: &'static str,
    pub env_vars: &'static [&'static str],
    pub missing: MissingPolicy,
}

impl FieldSpec {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            env_vars: &[],
            missing: MissingPolicy::Allow,
        }
    }

    const fn env(mut self, vars: &'static [&'static str]) -> Self {
        self.env_vars = vars;
        self
    }

    const fn missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = policy;
        self
    }
}

/// Resolves one field per its table row.
fn parse_field(
    value: &Value, spec: &FieldSpec, env: &Env, block_path: &AttributePath,
    diags: &mut Diagnostics,
) -> String {
    if let Some(s) = value.as_str() {
        return s.to_string();
    }
    if let Some(s) = env.first_of(spec.env_vars) {
        return s;
    }
    let path = block_path.clone().attribute(spec.name);
    match spec.missing {
        MissingPolicy::Allow => {}
        MissingPolicy::Warn => diags.push(Diagnostic::attribute_warning(
            path,
            "Missing value",
            "could not get a value from configuration or environment",
        )),
        MissingPolicy::Error => diags.push(Diagnostic::attribute_error(
            path,
            "Missing value",
            "could not get a value from configuration or environment",
        )),
    }
    String::new()
}

/// Resolves a whole block against its table. The block value may be null or
/// unknown; environment fallback still applies per field, matching the
/// behavior for a present block with null fields.
fn parse_fields<const N: usize>(
    block: &Value, specs: &[FieldSpec; N], env: &Env, path: &AttributePath,
    diags: &mut Diagnostics,
) -> [String; N] {
    specs.each_ref().map(|spec| parse_field(block.attr(spec.name), spec, env, path, diags))
}

#[derive(Debug)]
pub struct AzurePipelinesSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub service_connection_id: String,
    pub system_access_token: String,
}

impl AzurePipelinesSettings {
    const FIELDS: [FieldSpec; 4] = [
        FieldSpec::new("tenant_id").env(&["ARM_TENANT_ID", "AZURE_TENANT_ID"]),
        FieldSpec::new("client_id")
            .env(&["ARM_CLIENT_ID", "AZURE_CLIENT_ID"])
            .missing(MissingPolicy::Warn),
        FieldSpec::new("service_connection_id")
            .env(&["ARM_OIDC_AZURE_SERVICE_CONNECTION_ID", "AZURESUBSCRIPTION_SERVICE_CONNECTION_ID"])
            .missing(MissingPolicy::Warn),
        FieldSpec::new("system_access_token")
            .env(&["ARM_OIDC_REQUEST_TOKEN", "SYSTEM_ACCESSTOKEN"])
            .missing(MissingPolicy::Warn),
    ];

    pub fn parse(block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        let [tenant_id, client_id, service_connection_id, system_access_token] =
            parse_fields(block, &Self::FIELDS, env, path, diags);
        Self {
            tenant_id,
            client_id,
            service_connection_id,
            system_access_token,
        }
    }
}

#[derive(Debug)]
pub struct ClientSecretSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientSecretSettings {
    // No environment fallback: the `environment` credential type already
    // covers service principals configured through the environment.
    const FIELDS: [FieldSpec; 3] = [
        FieldSpec::new("tenant_id"),
        FieldSpec::new("client_id"),
        FieldSpec::new("client_secret"),
    ];

    pub fn parse(block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        let [tenant_id, client_id, client_secret] =
            parse_fields(block, &Self::FIELDS, env, path, diags);
        Self {
            tenant_id,
            client_id,
            client_secret,
        }
    }
}

#[derive(Debug)]
pub struct ClientCertificateSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub certificate_path: String,
    pub certificate_password: String,
}

impl ClientCertificateSettings {
    const FIELDS: [FieldSpec; 4] = [
        FieldSpec::new("tenant_id"),
        FieldSpec::new("client_id"),
        FieldSpec::new("certificate_path"),
        FieldSpec::new("certificate_password"),
    ];

    pub fn parse(block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        let [tenant_id, client_id, certificate_path, certificate_password] =
            parse_fields(block, &Self::FIELDS, env, path, diags);
        Self {
            tenant_id,
            client_id,
            certificate_path,
            certificate_password,
        }
    }
}

#[derive(Debug)]
pub struct ManagedIdentitySettings {
    pub client_id: String,
}

impl ManagedIdentitySettings {
    const FIELDS: [FieldSpec; 1] = [FieldSpec::new("client_id")];

    pub fn parse(block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        let [client_id] = parse_fields(block, &Self::FIELDS, env, path, diags);
        Self { client_id }
    }
}

#[derive(Debug)]
pub struct WorkloadIdentitySettings {
    pub tenant_id: String,
    pub client_id: String,
}

impl WorkloadIdentitySettings {
    // Defaults resolved by the SDK (AZURE_CLIENT_ID, AZURE_TENANT_ID).
    const FIELDS: [FieldSpec; 2] = [FieldSpec::new("tenant_id"), FieldSpec::new("client_id")];

    pub fn parse(block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        let [tenant_id, client_id] = parse_fields(block, &Self::FIELDS, env, path, diags);
        Self {
            tenant_id,
            client_id,
        }
    }
}

/// Service principal resolved purely from the environment, standing in for
/// the `EnvironmentCredential` other Azure SDKs provide.
#[derive(Debug)]
pub struct EnvironmentSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl EnvironmentSettings {
    const FIELDS: [FieldSpec; 3] = [
        FieldSpec::new("tenant_id").env(&["AZURE_TENANT_ID"]),
        FieldSpec::new("client_id").env(&["AZURE_CLIENT_ID"]),
        FieldSpec::new("client_secret").env(&["AZURE_CLIENT_SECRET"]),
    ];

    pub fn parse(env: &Env, path: &AttributePath, diags: &mut Diagnostics) -> Self {
        let [tenant_id, client_id, client_secret] =
            parse_fields(&Value::Null, &Self::FIELDS, env, path, diags);
        Self {
            tenant_id,
            client_id,
            client_secret,
        }
    }

    /// True when every variable the credential needs is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.tenant_id.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
