use plugin::{AttributePath, Diagnostic};

/// Cloud environment a token request is issued against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cloud {
    #[default]
    Public,
    Government,
    China,
}

impl Cloud {
    /// The Entra ID authority host for this cloud.
    #[must_use]
    pub const fn authority_host(self) -> &'static str {
        match self {
            Self::Public => "https://login.microsoftonline.com",
            Self::Government => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Public => "AzurePublic",
            Self::Government => "AzureGovernment",
            Self::China => "AzureChina",
        }
    }
}

/// Maps a configured cloud name to its configuration.
///
/// Empty or unset input selects the public cloud. An unrecognized name also
/// falls back to the public cloud, with a single non-fatal warning.
pub fn select_cloud(name: &str) -> (Cloud, Option<Diagnostic>) {
    match name {
        "" | "AzurePublic" => (Cloud::Public, None),
        "AzureGovernment" => (Cloud::Government, None),
        "AzureChina" => (Cloud::China, None),
        other => (
            Cloud::Public,
            Some(Diagnostic::attribute_warning(
                AttributePath::root("cloud"),
                "Invalid cloud value",
                format!("the provided cloud value '{other}' is not recognized; falling back to AzurePublic"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_names_map_without_warning() {
        for (name, want) in [
            ("", Cloud::Public),
            ("AzurePublic", Cloud::Public),
            ("AzureGovernment", Cloud::Government),
            ("AzureChina", Cloud::China),
        ] {
            let (cloud, warning) = select_cloud(name);
            assert_eq!(cloud, want);
            assert!(warning.is_none(), "unexpected warning for '{name}'");
        }
    }

    #[test]
    fn each_cloud_has_a_distinct_authority_host() {
        assert_eq!(Cloud::Public.authority_host(), "https://login.microsoftonline.com");
        assert_eq!(Cloud::Government.authority_host(), "https://login.microsoftonline.us");
        assert_eq!(Cloud::China.authority_host(), "https://login.chinacloudapi.cn");
    }

    #[test]
    fn unrecognized_name_warns_once_and_defaults() {
        let (cloud, warning) = select_cloud("AzureGermany");
        assert_eq!(cloud, Cloud::Public);
        let warning = warning.expect("warning");
        assert_eq!(warning.severity, plugin::Severity::Warning);
        assert_eq!(warning.path.as_ref().unwrap().to_string(), "cloud");
    }
}
