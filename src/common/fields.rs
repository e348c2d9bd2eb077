use validator::{ValidateLength, ValidationError, ValidationErrors};

use crate::common::error::AppError;

/// Extrai um campo obrigatório do payload. Texto vazio conta como ausente.
pub(crate) fn require_text(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field)),
    }
}

pub(crate) fn require<T>(field: &'static str, value: Option<T>) -> Result<T, AppError> {
    value.ok_or(AppError::MissingField(field))
}

/// Mesmo erro de validação que o `#[validate(length(max))]` dos payloads produz.
pub(crate) fn check_max_len(field: &'static str, value: &str, max: u64) -> Result<(), AppError> {
    if value.validate_length(None, Some(max), None) {
        return Ok(());
    }

    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new("length")
            .with_message(format!("{field} deve ter no máximo {max} caracteres.").into()),
    );
    Err(AppError::ValidationError(errors))
}
