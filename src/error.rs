// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::auth::AuthError;

/// A rejected field of a request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub errors: Vec<FieldMessage>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldMessage>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// Business rule violation (e.g. deleting a category that has products).
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "data_integrity", message)
    }

    /// Malformed or invalid request input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_failed", message)
    }

    /// Single-field validation failure.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::validation("Validation failed");
        err.errors.push(FieldMessage {
            field: field.into(),
            message: message.into(),
        });
        err
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

/// Flatten `errors` into field messages; nested structs use dotted paths
/// such as `address.zip_code`.
fn collect_field_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldMessage>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| FieldMessage {
                    field: path.clone(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_messages(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_messages(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_messages("", &errors, &mut fields);
        // HashMap order is unstable; keep responses deterministic.
        fields.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));

        let mut err = Self::validation("Validation failed");
        err.errors = fields;
        err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error_code = self.code, "{}", self.message);
        }
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}
