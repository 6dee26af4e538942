//! Extractors that report malformed input with the JSON error body instead of
//! axum's plain-text rejections.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, OriginalUri, Path, Query, Request};
use axum::http::{request::Parts, Extensions, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

fn request_path(uri: &Uri, extensions: &Extensions) -> String {
    extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(u)| u.path().to_owned())
        .unwrap_or_else(|| uri.path().to_owned())
}

fn rejected<R>(rejection: R, path: String) -> ApiError
where
    R: IntoResponse + std::fmt::Display,
{
    let message = rejection.to_string();
    let status = rejection.into_response().status();
    ApiError::new(status, message, path)
}

/// `axum::extract::Path` with `ApiError` rejections.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection, request_path(&parts.uri, &parts.extensions))),
        }
    }
}

/// `axum::extract::Query` with `ApiError` rejections.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection, request_path(&parts.uri, &parts.extensions))),
        }
    }
}

/// `axum::Json` with `ApiError` rejections.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = request_path(req.uri(), req.extensions());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection, path)),
        }
    }
}
