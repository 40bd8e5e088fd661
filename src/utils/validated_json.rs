// src/utils/validated_json.rs

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::{error::AppError, utils::schema::FieldRule};

/// A request body with an object schema and `validator` rules.
pub trait Schema: DeserializeOwned + Validate {
    fn rules() -> &'static [FieldRule];
}

/// Runs the schema check, typed deserialization and `validator` rules in that order.
///
/// Schema violations are reported together; `validator` rules only run once the
/// shape is right.
pub fn parse<T: Schema>(value: Value) -> Result<T, AppError> {
    let errors = crate::utils::schema::check(&value, T::rules());
    if !errors.is_empty() {
        tracing::warn!(?errors, "Schema validation failed");
        return Err(AppError::Validation(errors));
    }

    let payload: T = serde_json::from_value(value)?;

    if let Err(validation_errors) = payload.validate() {
        let errors = flatten(&validation_errors);
        tracing::warn!(?errors, "Field validation failed");
        return Err(AppError::Validation(errors));
    }

    Ok(payload)
}

/// Turns `ValidationErrors` into sorted `field: message` lines.
fn flatten(errors: &ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("'{}' {}", field, message)
            })
        })
        .collect();
    lines.sort();
    lines
}

/// JSON body extractor that rejects with `AppError` before the handler runs.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: Schema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                AppError::BadRequest(rejection.body_text())
            })?;

        parse(value).map(ValidatedJson)
    }
}
