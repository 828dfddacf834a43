/// Errors raised while turning raw check input into a [`CheckConfig`].
///
/// The message is the exact text reported back to the operator.
///
/// [`CheckConfig`]: crate::config::CheckConfig
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),
}

impl CoreError {
    /// Build a validation error carrying `message` verbatim.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
