//! REST endpoint handlers organized by resource.

pub mod alerts;
pub mod elements;
pub mod metrics;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(elements::routes())
        .merge(metrics::routes())
        .merge(alerts::routes())
}
