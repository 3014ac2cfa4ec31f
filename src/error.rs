use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenealogyError {
    pub code: ErrorCode,
    pub message: String,
}

impl GenealogyError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Backend, message)
    }
}

impl std::fmt::Display for GenealogyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for GenealogyError {}
