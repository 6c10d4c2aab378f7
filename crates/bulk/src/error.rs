use thiserror::Error;

/// Failure that aborts a whole bulk request before any item is processed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Plugin settings could not be read.
    #[error("plugin not loaded: {0}")]
    PluginNotLoaded(String),

    #[error("Plugin setting ALLOW_CREATE is disabled")]
    CreationDisabled,

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("items must be a non-empty list")]
    ItemsRequired,
}

impl BatchError {
    /// Stable machine-readable code, as reported in `{"error": code}`.
    pub fn code(&self) -> &'static str {
        match self {
            BatchError::MethodNotAllowed => "method_not_allowed",
            BatchError::PluginNotLoaded(_) => "plugin_not_loaded",
            BatchError::CreationDisabled => "creation_disabled",
            BatchError::InvalidJson(_) => "invalid_json",
            BatchError::ItemsRequired => "items_required",
        }
    }

    /// Human-readable detail that is safe to return to the caller.
    pub fn detail(&self) -> Option<String> {
        match self {
            BatchError::CreationDisabled => Some(self.to_string()),
            _ => None,
        }
    }
}
