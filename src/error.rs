//! Process-level error for the `vma` binary.
//!
//! Library components return their own typed errors (`ValidationError`,
//! `RequestError`, `SubmitError`). `AppError` is what reaches `main`, where it
//! is printed and mapped to an exit code:
//!
//! - `2`: usage, configuration, or invalid parameter input
//! - `4`: backend or terminal failure

use crate::client::RequestError;
use crate::domain::UnknownField;
use crate::session::SubmitError;
use crate::validate::ValidationError;

pub const EXIT_USAGE: u8 = 2;
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::usage(format!("Invalid parameter: {err}"))
    }
}

impl From<UnknownField> for AppError {
    fn from(err: UnknownField) -> Self {
        Self::usage(err.to_string())
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        Self::runtime(format!("Prediction backend error: {err}"))
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        Self::runtime(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;

    #[test]
    fn validation_errors_map_to_usage_exit_code() {
        let err: AppError = crate::validate::validate(Field::Ac, "9").unwrap_err().into();
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert!(err.to_string().contains("AC"));
    }

    #[test]
    fn request_errors_map_to_runtime_exit_code() {
        let err: AppError = RequestError::ServerError { status: 500 }.into();
        assert_eq!(err.exit_code(), EXIT_RUNTIME);
        assert!(err.to_string().contains("500"));
    }
}
