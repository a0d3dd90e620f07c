//! Validated form extraction.

use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequest, Request},
    Form,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A urlencoded form extractor that validates the request body.
///
/// The body is deserialized with axum's `Form` and then checked with the
/// `validator` crate. Failures produce a 422 with field-level details.
///
/// # Example
///
/// ```ignore
/// use filekeep::web::dto::{CredentialsForm, ValidatedForm};
///
/// async fn login(ValidatedForm(form): ValidatedForm<CredentialsForm>) {
///     // form is already validated
/// }
/// ```
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid form: {}", e)))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedForm(value))
    }
}
