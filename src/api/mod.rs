//! REST API module.
//!
//! Handlers for the game client's `/api/saves` and `/api/scores` resources.

mod saves;
mod scores;

pub use saves::*;
pub use scores::*;

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// JSON body extractor whose rejections are reported as [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections are reported as [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
