use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown bucket: {name}")]
pub struct ParseBucketError {
    name: String,
}

impl ParseBucketError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("no feed sources configured")]
    NoSources,
}
