//! Axum extractor for validated JSON bodies

use crate::core::error::{PizzeriaError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has been deserialized and validated
///
/// Accepts `application/json` and any `+json` media type, including
/// `application/merge-patch+json`.
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_topping(
///     ValidJson(dto): ValidJson<ToppingDto>,
/// ) -> PizzeriaResult<Json<ToppingDto>> {
///     // dto already satisfies its validation rules
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = PizzeriaError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|e| {
            PizzeriaError::Validation(ValidationError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        payload.validate()?;
        Ok(ValidJson(payload))
    }
}
