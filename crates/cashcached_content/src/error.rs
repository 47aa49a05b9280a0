use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid FAQ catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("FAQ catalog is empty")]
    Empty,

    #[error("FAQ catalog has too many entries ({count}, max {max})")]
    TooManyEntries { count: usize, max: usize },

    #[error("FAQ entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("duplicate FAQ key `{0}`")]
    DuplicateKey(String),
}
