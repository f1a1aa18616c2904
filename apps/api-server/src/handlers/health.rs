//! Readiness endpoint.

use actix_web::{HttpResponse, web};
use microblog_shared::ErrorResponse;

use crate::state::AppState;

/// Report whether the post store can serve requests.
///
/// GET /maintenance/ping
pub async fn ping(state: web::Data<AppState>) -> HttpResponse {
    if state.manager.is_ready().await {
        HttpResponse::Ok().finish()
    } else {
        tracing::warn!("Readiness check failed");
        HttpResponse::ServiceUnavailable().json(ErrorResponse::unavailable())
    }
}
