use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailschedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mail transport error: {0}")]
    Mail(String),
}

pub type Result<T> = std::result::Result<T, MailschedError>;
