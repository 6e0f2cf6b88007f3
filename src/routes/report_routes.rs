use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Extension, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::query_dto::PunchReportQuery;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new().route("/punches", get(punch_report))
}

/// Informe de fichajes como documento HTML descargable
async fn punch_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<PunchReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ReportController::new(state.store.clone());
    let html = controller.punches(&user, query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"informe-fichajes.html\""),
        ],
        html,
    ))
}
