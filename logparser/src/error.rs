use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Invalid phrase template '{template}': {reason}")]
    InvalidPhrase { template: String, reason: String },

    #[error("Phrase table error: {0}")]
    PhraseTable(#[from] serde_yaml::Error),
}
