use std::fmt::{self, Debug};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use azure_core::credentials::{AccessToken, TokenCredential, TokenRequestOptions};
use azure_core::error::ErrorKind;
use thiserror::Error;

use crate::cloud::Cloud;

/// Index value meaning no source has produced a token yet.
const NO_WINNER: usize = usize::MAX;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Every requested credential failed to construct (or none were
    /// requested), so there is nothing to ask for a token.
    #[error("credential chain requires at least one usable credential source")]
    Empty,
}

/// An ordered sequence of token sources tried until one succeeds.
///
/// Built once during provider configuration and shared read-only across
/// ephemeral opens. The first source to produce a token is remembered and
/// asked directly on subsequent requests, so concurrent opens race only on a
/// relaxed atomic index.
pub struct ChainedTokenCredential {
    cloud: Cloud,
    sources: Vec<(String, Arc<dyn TokenCredential>)>,
    winner: AtomicUsize,
}

impl ChainedTokenCredential {
    /// Builds a chain from named sources, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Empty`] when no sources are supplied.
    pub fn new(
        cloud: Cloud, sources: Vec<(String, Arc<dyn TokenCredential>)>,
    ) -> Result<Self, ChainError> {
        if sources.is_empty() {
            return Err(ChainError::Empty);
        }
        Ok(Self {
            cloud,
            sources,
            winner: AtomicUsize::new(NO_WINNER),
        })
    }

    #[must_use]
    pub const fn cloud(&self) -> Cloud {
        self.cloud
    }

    /// Source names in chain order.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }
}

impl Debug for ChainedTokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedTokenCredential")
            .field("cloud", &self.cloud.name())
            .field("sources", &self.sources.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenCredential for ChainedTokenCredential {
    async fn get_token(
        &self, scopes: &[&str], options: Option<TokenRequestOptions<'_>>,
    ) -> azure_core::Result<AccessToken> {
        let winner = self.winner.load(Ordering::Relaxed);
        if winner != NO_WINNER {
            if let Some((name, source)) = self.sources.get(winner) {
                tracing::debug!("using previously successful credential: {name}");
                return source.get_token(scopes, options).await;
            }
        }

        let mut errors = Vec::new();
        for (index, (name, source)) in self.sources.iter().enumerate() {
            match source.get_token(scopes, options.clone()).await {
                Ok(token) => {
                    tracing::debug!("acquired token from credential: {name}");
                    self.winner.store(index, Ordering::Relaxed);
                    return Ok(token);
                }
                Err(error) => {
                    tracing::debug!("credential {name} failed: {error}");
                    errors.push((name.as_str(), error));
                }
            }
        }

        Err(azure_core::Error::with_message_fn(ErrorKind::Credential, || {
            format!("no credential in the chain provided a token:\n{}", format_errors(&errors))
        }))
    }
}

fn format_errors(errors: &[(&str, azure_core::Error)]) -> String {
    errors
        .iter()
        .map(|(name, error)| format!("{name}: {error}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use azure_core::credentials::Secret;
    use time::OffsetDateTime;

    use super::*;

    /// Always produces the same token.
    #[derive(Debug)]
    pub struct StaticCredential(pub &'static str);

    #[async_trait]
    impl TokenCredential for StaticCredential {
        async fn get_token(
            &self, _scopes: &[&str], _options: Option<TokenRequestOptions<'_>>,
        ) -> azure_core::Result<AccessToken> {
            Ok(AccessToken::new(
                Secret::new(self.0.to_string()),
                OffsetDateTime::now_utc() + time::Duration::hours(1),
            ))
        }
    }

    /// Always fails.
    #[derive(Debug)]
    pub struct FailingCredential;

    #[async_trait]
    impl TokenCredential for FailingCredential {
        async fn get_token(
            &self, _scopes: &[&str], _options: Option<TokenRequestOptions<'_>>,
        ) -> azure_core::Result<AccessToken> {
            Err(azure_core::Error::with_message_fn(ErrorKind::Credential, || {
                "credential unavailable".to_string()
            }))
        }
    }

    /// One observed token request.
    #[derive(Debug)]
    pub struct RecordedRequest {
        pub scopes: Vec<String>,
        pub claims: Option<String>,
        pub enable_cae: bool,
    }

    /// Produces a token and records each request it receives.
    #[derive(Debug, Default)]
    pub struct RecordingCredential {
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    #[async_trait]
    impl TokenCredential for RecordingCredential {
        async fn get_token(
            &self, scopes: &[&str], options: Option<TokenRequestOptions<'_>>,
        ) -> azure_core::Result<AccessToken> {
            let (claims, enable_cae) = match &options {
                Some(options) => (options.claims.map(ToString::to_string), options.enable_cae),
                None => (None, false),
            };
            self.requests.lock().expect("requests lock").push(RecordedRequest {
                scopes: scopes.iter().map(ToString::to_string).collect(),
                claims,
                enable_cae,
            });
            Ok(AccessToken::new(
                Secret::new("recorded-token".to_string()),
                OffsetDateTime::now_utc() + time::Duration::hours(1),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FailingCredential, StaticCredential};
    use super::*;

    fn chain(sources: Vec<(String, Arc<dyn TokenCredential>)>) -> ChainedTokenCredential {
        ChainedTokenCredential::new(Cloud::Public, sources).expect("chain")
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert!(matches!(
            ChainedTokenCredential::new(Cloud::Public, Vec::new()),
            Err(ChainError::Empty)
        ));
    }

    #[tokio::test]
    async fn first_successful_source_wins() {
        let chain = chain(vec![
            ("first".to_string(), Arc::new(FailingCredential) as Arc<dyn TokenCredential>),
            ("second".to_string(), Arc::new(StaticCredential("second-token"))),
            ("third".to_string(), Arc::new(StaticCredential("third-token"))),
        ]);

        let token = chain.get_token(&["https://example/.default"], None).await.expect("token");
        assert_eq!(token.token.secret(), "second-token");

        // the winning source is remembered
        assert_eq!(chain.winner.load(Ordering::Relaxed), 1);
        let token = chain.get_token(&["https://example/.default"], None).await.expect("token");
        assert_eq!(token.token.secret(), "second-token");
    }

    #[tokio::test]
    async fn all_failures_aggregate_into_one_error() {
        let chain = chain(vec![
            ("first".to_string(), Arc::new(FailingCredential) as Arc<dyn TokenCredential>),
            ("second".to_string(), Arc::new(FailingCredential)),
        ]);

        let error = chain
            .get_token(&["https://example/.default"], None)
            .await
            .expect_err("all sources fail");
        let message = error.to_string();
        assert!(message.contains("first:"), "{message}");
        assert!(message.contains("second:"), "{message}");
    }

    #[test]
    fn source_order_is_preserved() {
        let chain = chain(vec![
            ("a".to_string(), Arc::new(FailingCredential) as Arc<dyn TokenCredential>),
            ("b".to_string(), Arc::new(FailingCredential)),
            ("c".to_string(), Arc::new(StaticCredential("t"))),
        ]);
        assert_eq!(chain.source_names().collect::<Vec<_>>(), ["a", "b", "c"]);
    }
}
