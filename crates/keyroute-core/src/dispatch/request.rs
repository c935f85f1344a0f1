//! Generation requests

/// Which models a request should try
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum ModelSelection {
    /// The process-wide default list
    #[default]
    Default,
    Single(String),
    /// Explicit ordered list; an empty list means the default list
    List(Vec<String>),
}

/// A prompt plus the models to try it with.
///
/// The prompt is an opaque payload produced by the caller's prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    models: ModelSelection,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            models: ModelSelection::Default,
        }
    }

    /// Try a single model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.models = ModelSelection::Single(model.into());
        self
    }

    /// Try an explicit ordered list of models
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = ModelSelection::List(models.into_iter().map(Into::into).collect());
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Ordered model names, resolving the default list where needed
    pub fn resolve_models(&self, defaults: &[String]) -> Vec<String> {
        match &self.models {
            ModelSelection::Single(model) => vec![model.clone()],
            ModelSelection::List(models) if !models.is_empty() => models.clone(),
            ModelSelection::List(_) | ModelSelection::Default => defaults.to_vec(),
        }
    }
}
