#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read template file: {0}")]
    FileRead(std::io::Error),
    #[error("template has no code: {0}")]
    MissingTemplateCode(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
