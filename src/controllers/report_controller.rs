use crate::dto::query_dto::PunchReportQuery;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::Store;
use crate::services::authorization_service::Capability;
use crate::services::report_service::ReportService;
use crate::utils::errors::AppError;

pub struct ReportController {
    service: ReportService,
}

impl ReportController {
    pub fn new(store: Store) -> Self {
        Self {
            service: ReportService::new(store),
        }
    }

    /// Informe HTML; sin `view_reports` solo el de uno mismo
    pub async fn punches(&self, user: &AuthenticatedUser, query: PunchReportQuery) -> Result<String, AppError> {
        let user_id = match query.user_id {
            Some(user_id) => {
                user.require_self_or(user_id, Capability::ViewReports)?;
                Some(user_id)
            }
            None if user.can(Capability::ViewReports) => None,
            None => Some(user.user_id),
        };

        self.service.punch_report(user_id, query.from, query.to).await
    }
}
