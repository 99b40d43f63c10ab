pub type ExhibitResult<T> = Result<T, ExhibitError>;

#[derive(thiserror::Error, Debug)]
pub enum ExhibitError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("storyboard error: {0}")]
    Storyboard(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("timeline error: {0}")]
    Timeline(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExhibitError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storyboard(msg: impl Into<String>) -> Self {
        Self::Storyboard(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }
}
