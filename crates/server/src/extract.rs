use crate::error::ServerError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections come back as [`ServerError`] bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);
