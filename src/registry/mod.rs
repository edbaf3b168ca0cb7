//! Provider registry and prefix-based model resolution.
//!
//! Model names are routed on their prefix: `"ollama/gpt-oss:20b"` resolves
//! the provider registered for `ollama` and asks it for `gpt-oss:20b`.
//! Names without a slash (and names carrying the configured default prefix)
//! go to the default provider. Prefixes with no explicit registration fall
//! back to a lazily constructed provider from the configured factory,
//! cached per prefix for the registry's lifetime.
//!
//! A registry is built once at configuration time and passed by reference;
//! there is no process-global instance, so tests construct isolated
//! registries per case.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::GatewayError;
use crate::provider::{Model, Provider, SharedProvider};

/// Factory for providers of prefixes that have no explicit registration.
pub trait FallbackProviderFactory: Send + Sync {
    /// Create a provider for `prefix`, or `None` when the prefix is unknown
    /// to this factory.
    fn create(&self, prefix: &str) -> Result<Option<SharedProvider>, GatewayError>;
}

/// Prefix-routing provider registry.
pub struct ProviderRegistry {
    default_provider: SharedProvider,
    default_prefix: String,
    providers: HashMap<String, SharedProvider>,
    fallback_factory: Option<Arc<dyn FallbackProviderFactory>>,
    // Grows on demand, never evicted. Concurrent get-or-create may race two
    // constructions of the same (stateless) provider; the first insert wins
    // and the cache converges to a single instance per prefix.
    fallback_cache: RwLock<HashMap<String, SharedProvider>>,
}

impl ProviderRegistry {
    /// Start building a registry around its default provider.
    pub fn builder(default_provider: SharedProvider) -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new(default_provider)
    }

    /// Resolve `model_name` to a model adapter.
    ///
    /// The name is split on its first `/`. No slash means no prefix: the
    /// whole string is the model name and the default provider serves it.
    pub async fn resolve(
        &self,
        model_name: Option<&str>,
    ) -> Result<Arc<dyn Model>, GatewayError> {
        let (prefix, name) = split_model_name(model_name);
        let provider = self.provider_for_prefix(prefix)?;
        provider.get_model(name).await
    }

    /// Resolve the provider responsible for `prefix`.
    pub fn provider_for_prefix(
        &self,
        prefix: Option<&str>,
    ) -> Result<SharedProvider, GatewayError> {
        let prefix = match prefix {
            None => return Ok(self.default_provider.clone()),
            Some(p) if p == self.default_prefix => return Ok(self.default_provider.clone()),
            Some(p) => p,
        };

        if let Some(provider) = self.providers.get(prefix) {
            return Ok(provider.clone());
        }

        self.fallback_provider(prefix)
    }

    /// Number of cached fallback providers (diagnostics and tests).
    pub fn fallback_cache_len(&self) -> usize {
        self.fallback_cache
            .read()
            .map(|cache| cache.len())
            .unwrap_or(0)
    }

    fn fallback_provider(&self, prefix: &str) -> Result<SharedProvider, GatewayError> {
        if let Ok(cache) = self.fallback_cache.read()
            && let Some(provider) = cache.get(prefix)
        {
            return Ok(provider.clone());
        }

        let factory = self.fallback_factory.as_ref().ok_or_else(|| {
            GatewayError::ConfigurationError(format!("Unknown provider prefix: {prefix}"))
        })?;

        let provider = factory.create(prefix)?.ok_or_else(|| {
            GatewayError::ConfigurationError(format!("Unknown provider prefix: {prefix}"))
        })?;

        let mut cache = self.fallback_cache.write().map_err(|_| {
            GatewayError::InternalError("Fallback provider cache is poisoned".to_string())
        })?;
        // A concurrent resolution may have inserted first; keep that one so
        // later calls always observe the same instance.
        let entry = cache.entry(prefix.to_string()).or_insert(provider);
        Ok(entry.clone())
    }
}

/// Split a model name on its first `/` into prefix and actual name.
fn split_model_name(model_name: Option<&str>) -> (Option<&str>, Option<&str>) {
    match model_name {
        None => (None, None),
        Some(name) => match name.split_once('/') {
            Some((prefix, rest)) => (Some(prefix), Some(rest)),
            None => (None, Some(name)),
        },
    }
}

/// Builder for [`ProviderRegistry`].
pub struct ProviderRegistryBuilder {
    default_provider: SharedProvider,
    default_prefix: Option<String>,
    providers: HashMap<String, SharedProvider>,
    fallback_factory: Option<Arc<dyn FallbackProviderFactory>>,
}

impl ProviderRegistryBuilder {
    fn new(default_provider: SharedProvider) -> Self {
        Self {
            default_provider,
            default_prefix: None,
            providers: HashMap::new(),
            fallback_factory: None,
        }
    }

    /// Override the prefix routed to the default provider. Defaults to the
    /// default provider's own id.
    pub fn default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = Some(prefix.into());
        self
    }

    /// Register a provider under an explicit prefix.
    pub fn register(mut self, prefix: impl Into<String>, provider: SharedProvider) -> Self {
        self.providers.insert(prefix.into(), provider);
        self
    }

    /// Install the factory used for prefixes with no explicit registration.
    pub fn fallback_factory(mut self, factory: Arc<dyn FallbackProviderFactory>) -> Self {
        self.fallback_factory = Some(factory);
        self
    }

    /// Finish building the registry.
    pub fn build(self) -> ProviderRegistry {
        let default_prefix = self
            .default_prefix
            .unwrap_or_else(|| self.default_provider.provider_id().to_string());
        ProviderRegistry {
            default_provider: self.default_provider,
            default_prefix,
            providers: self.providers,
            fallback_factory: self.fallback_factory,
            fallback_cache: RwLock::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::types::{EventStream, ModelRequest, ModelResponse, Usage};

    struct StubModel {
        provider: &'static str,
        name: String,
    }

    #[async_trait]
    impl Model for StubModel {
        async fn get_response(
            &self,
            _request: &ModelRequest,
        ) -> Result<ModelResponse, GatewayError> {
            Ok(ModelResponse {
                output: vec![],
                usage: Usage::default(),
                response_id: format!("chatcmpl-{}", self.provider),
            })
        }

        async fn get_streamed_response(
            &self,
            _request: &ModelRequest,
        ) -> Result<EventStream, GatewayError> {
            Ok(Box::pin(futures::stream::empty()))
        }

        fn model_name(&self) -> &str {
            &self.name
        }
    }

    struct StubProvider {
        id: &'static str,
    }

    #[async_trait]
    impl Provider for StubProvider {
        async fn get_model(&self, name: Option<&str>) -> Result<Arc<dyn Model>, GatewayError> {
            Ok(Arc::new(StubModel {
                provider: self.id,
                name: name.unwrap_or_default().to_string(),
            }))
        }

        fn provider_id(&self) -> &str {
            self.id
        }
    }

    struct CountingFactory {
        created: AtomicUsize,
        known_prefix: &'static str,
    }

    impl FallbackProviderFactory for CountingFactory {
        fn create(&self, prefix: &str) -> Result<Option<SharedProvider>, GatewayError> {
            if prefix != self.known_prefix {
                return Ok(None);
            }
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Arc::new(StubProvider { id: "fallback" })))
        }
    }

    fn registry_with_factory() -> (ProviderRegistry, Arc<CountingFactory>) {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
            known_prefix: "remote",
        });
        let registry = ProviderRegistry::builder(Arc::new(StubProvider { id: "default" }))
            .fallback_factory(factory.clone())
            .build();
        (registry, factory)
    }

    #[tokio::test]
    async fn name_without_slash_uses_the_default_provider() {
        let (registry, factory) = registry_with_factory();
        let model = registry.resolve(Some("gpt-oss:20b")).await.unwrap();
        assert_eq!(model.model_name(), "gpt-oss:20b");
        assert_eq!(factory.created.load(Ordering::SeqCst), 0);
        assert_eq!(registry.fallback_cache_len(), 0);
    }

    #[tokio::test]
    async fn missing_name_uses_the_default_provider() {
        let (registry, _) = registry_with_factory();
        let model = registry.resolve(None).await.unwrap();
        assert_eq!(model.model_name(), "");
    }

    #[tokio::test]
    async fn default_prefix_routes_to_the_default_provider() {
        let (registry, factory) = registry_with_factory();
        let model = registry.resolve(Some("default/some-model")).await.unwrap();
        assert_eq!(model.model_name(), "some-model");
        assert_eq!(factory.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn explicit_registration_wins_over_fallback() {
        let factory = Arc::new(CountingFactory {
            created: AtomicUsize::new(0),
            known_prefix: "remote",
        });
        let registry = ProviderRegistry::builder(Arc::new(StubProvider { id: "default" }))
            .register("remote", Arc::new(StubProvider { id: "explicit" }))
            .fallback_factory(factory.clone())
            .build();

        registry.resolve(Some("remote/m")).await.unwrap();
        assert_eq!(factory.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fallback_providers_are_cached_per_prefix() {
        let (registry, factory) = registry_with_factory();

        let first = registry.provider_for_prefix(Some("remote")).unwrap();
        let second = registry.provider_for_prefix(Some("remote")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.created.load(Ordering::SeqCst), 1);
        assert_eq!(registry.fallback_cache_len(), 1);
    }

    #[tokio::test]
    async fn unknown_prefix_without_factory_is_a_configuration_error() {
        let registry =
            ProviderRegistry::builder(Arc::new(StubProvider { id: "default" })).build();
        let err = registry.resolve(Some("mystery/m")).await.err().unwrap();
        assert!(matches!(err, GatewayError::ConfigurationError(_)), "{err}");
    }

    #[tokio::test]
    async fn prefix_unknown_to_the_factory_is_a_configuration_error() {
        let (registry, _) = registry_with_factory();
        let err = registry.resolve(Some("mystery/m")).await.err().unwrap();
        assert!(matches!(err, GatewayError::ConfigurationError(_)), "{err}");
    }

    #[test]
    fn model_names_split_on_the_first_slash() {
        assert_eq!(split_model_name(None), (None, None));
        assert_eq!(split_model_name(Some("m")), (None, Some("m")));
        assert_eq!(split_model_name(Some("p/m")), (Some("p"), Some("m")));
        assert_eq!(
            split_model_name(Some("p/org/model:tag")),
            (Some("p"), Some("org/model:tag"))
        );
    }
}
