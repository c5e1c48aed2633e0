pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read bubble config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bubble config YAML: {message}")]
    InvalidConfigYaml { message: String },

    #[error("Invalid bubble config JSON: {message}")]
    InvalidConfigJson { message: String },

    #[error("Bubble config root must be a mapping, found {found}")]
    ConfigRootNotMapping { found: &'static str },
}
