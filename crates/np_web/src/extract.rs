use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use np_core::Error;
use serde::de::DeserializeOwned;
use crate::ApiError;

/// JSON request body that does not insist on a `Content-Type` header.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Validation(format!("Invalid JSON body: {}", e)))?;
        Ok(Self(value))
    }
}
