use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::CompletionError;
use crate::llm::{AnthropicClient, AnthropicConfig, OllamaClient, OllamaConfig};

/// System prompt used when a caller does not supply one
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an assistant that specializes in processing meeting documents.";

/// Opaque text-completion capability consumed by every stage
///
/// Each call is an isolated request with no conversation history. A failure
/// is always an `Err`; an empty completion is a valid `Ok("")`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CompletionError>;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Box<T> {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CompletionError> {
        (**self).generate(prompt, system_prompt).await
    }
}

/// Build a completion service from runtime settings
pub fn build_provider(settings: &Settings) -> Result<Box<dyn CompletionService>, CompletionError> {
    match settings.llm.provider.as_str() {
        "anthropic" => {
            let config = AnthropicConfig::from_settings(&settings.llm)?;
            Ok(Box::new(AnthropicClient::new(config)?))
        }
        "ollama" => {
            let config = OllamaConfig::from_settings(&settings.llm);
            Ok(Box::new(OllamaClient::new(config)?))
        }
        other => Err(CompletionError::NotConfigured(format!(
            "unsupported provider '{}' (supported: anthropic, ollama)",
            other
        ))),
    }
}

type Factory =
    Box<dyn Fn() -> Result<Box<dyn CompletionService>, CompletionError> + Send + Sync>;

/// Completion service that builds its inner service on first use
///
/// Initialization happens at most once even under concurrent callers. A
/// failed initialization is not cached; the next call tries again.
pub struct LazyCompletion {
    cell: OnceCell<Box<dyn CompletionService>>,
    factory: Factory,
}

impl LazyCompletion {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn CompletionService>, CompletionError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Lazily build the provider described by `settings`
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(move || build_provider(&settings))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    async fn inner(&self) -> Result<&dyn CompletionService, CompletionError> {
        let service = self
            .cell
            .get_or_try_init(|| async {
                info!("Initializing completion service");
                (self.factory)()
            })
            .await?;
        Ok(&**service)
    }
}

#[async_trait]
impl CompletionService for LazyCompletion {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CompletionError> {
        self.inner().await?.generate(prompt, system_prompt).await
    }
}

/// Send a short greeting and require a non-empty answer
pub async fn check_connection(service: &dyn CompletionService) -> Result<(), CompletionError> {
    let reply = service
        .generate("Hello. Please reply with a short greeting.", None)
        .await?;

    if reply.trim().is_empty() {
        return Err(CompletionError::Unavailable(
            "model returned an empty reply".to_string(),
        ));
    }

    let preview: String = reply.chars().take(50).collect();
    debug!("Connection check reply: {}", preview);
    Ok(())
}
