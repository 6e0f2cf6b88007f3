//! Servicio de vacaciones
//!
//! Una solicitud nace pendiente y solo desde ahí se aprueba o rechaza.
//! Un usuario no puede tener dos solicitudes no rechazadas que se solapen.

use uuid::Uuid;

use crate::models::vacation::{
    CreateVacationRequest, NewVacationRequest, VacationPatch, VacationRequest, VacationStatus,
};
use crate::repositories::{FieldValue, Store};
use crate::utils::errors::{forbidden_error, AppError, AppResult};
use crate::utils::validation::validate_date_range;

pub struct VacationService {
    store: Store,
}

impl VacationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Solicitudes de un usuario o de toda la plantilla, por fecha de inicio
    pub async fn list(&self, user_id: Option<Uuid>) -> AppResult<Vec<VacationRequest>> {
        let mut requests = match user_id {
            Some(user_id) => {
                self.store
                    .vacations
                    .find_by("user_id", FieldValue::Uuid(user_id))
                    .await?
            }
            None => self.store.vacations.get_all().await?,
        };
        requests.sort_by_key(|request| request.start_date);
        Ok(requests)
    }

    pub async fn request(&self, user_id: Uuid, request: CreateVacationRequest) -> AppResult<VacationRequest> {
        validate_date_range(request.start_date, request.end_date)?;

        let clash = self
            .list(Some(user_id))
            .await?
            .into_iter()
            .find(|existing| {
                existing.status != VacationStatus::Rejected
                    && existing.overlaps(request.start_date, request.end_date)
            });

        if let Some(existing) = clash {
            return Err(AppError::Conflict(format!(
                "Las fechas se solapan con otra solicitud ({} a {})",
                existing.start_date, existing.end_date
            )));
        }

        let created = self
            .store
            .vacations
            .create(NewVacationRequest {
                user_id,
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason.map(|reason| reason.trim().to_string()),
            })
            .await?;

        tracing::info!(
            "🏖️ Vacaciones solicitadas por {}: {} a {} ({} días)",
            user_id,
            created.start_date,
            created.end_date,
            created.days()
        );
        Ok(created)
    }

    async fn decide(&self, id: Uuid, approver_id: Uuid, status: VacationStatus) -> AppResult<VacationRequest> {
        let request = self.store.vacations.get_by_id(id).await?;
        if request.status != VacationStatus::Pending {
            return Err(AppError::Conflict(format!(
                "La solicitud {} ya no está pendiente",
                id
            )));
        }

        let updated = self
            .store
            .vacations
            .update(
                id,
                VacationPatch {
                    status: Some(status),
                    approver_id: Some(approver_id),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!("✅ Solicitud {} marcada como {:?} por {}", id, status, approver_id);
        Ok(updated)
    }

    pub async fn approve(&self, id: Uuid, approver_id: Uuid) -> AppResult<VacationRequest> {
        self.decide(id, approver_id, VacationStatus::Approved).await
    }

    pub async fn reject(&self, id: Uuid, approver_id: Uuid) -> AppResult<VacationRequest> {
        self.decide(id, approver_id, VacationStatus::Rejected).await
    }

    /// El dueño borra sus solicitudes pendientes; quien aprueba, cualquiera
    pub async fn delete(&self, id: Uuid, user_id: Uuid, can_approve: bool) -> AppResult<()> {
        let request = self.store.vacations.get_by_id(id).await?;

        if !can_approve {
            if request.user_id != user_id {
                return Err(forbidden_error(
                    "delete vacation request",
                    "solo el solicitante puede borrarla",
                ));
            }
            if request.status != VacationStatus::Pending {
                return Err(AppError::Conflict(
                    "Solo se pueden borrar solicitudes pendientes".to_string(),
                ));
            }
        }

        self.store.vacations.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn create(start: NaiveDate, end: NaiveDate) -> CreateVacationRequest {
        CreateVacationRequest {
            start_date: start,
            end_date: end,
            reason: Some("Verano".to_string()),
        }
    }

    #[tokio::test]
    async fn test_request_then_approve() {
        let service = VacationService::new(Store::in_memory());
        let user = Uuid::new_v4();
        let approver = Uuid::new_v4();

        let request = service.request(user, create(date(8, 1), date(8, 15))).await.unwrap();
        assert_eq!(request.status, VacationStatus::Pending);
        assert_eq!(request.days(), 15);

        let approved = service.approve(request.id, approver).await.unwrap();
        assert_eq!(approved.status, VacationStatus::Approved);
        assert_eq!(approved.approver_id, Some(approver));

        // Ya no está pendiente
        assert!(matches!(
            service.reject(request.id, approver).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_overlapping_requests() {
        let service = VacationService::new(Store::in_memory());
        let user = Uuid::new_v4();

        let first = service.request(user, create(date(8, 1), date(8, 15))).await.unwrap();
        assert!(matches!(
            service.request(user, create(date(8, 15), date(8, 20))).await,
            Err(AppError::Conflict(_))
        ));

        // Otro usuario no choca
        service
            .request(Uuid::new_v4(), create(date(8, 10), date(8, 12)))
            .await
            .unwrap();

        // Una solicitud rechazada deja libres sus fechas
        service.reject(first.id, Uuid::new_v4()).await.unwrap();
        service.request(user, create(date(8, 15), date(8, 20))).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_range() {
        let service = VacationService::new(Store::in_memory());
        assert!(matches!(
            service.request(Uuid::new_v4(), create(date(8, 10), date(8, 1))).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let service = VacationService::new(Store::in_memory());
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let pending = service.request(owner, create(date(9, 1), date(9, 2))).await.unwrap();
        assert!(matches!(
            service.delete(pending.id, stranger, false).await,
            Err(AppError::Forbidden(_))
        ));
        service.delete(pending.id, owner, false).await.unwrap();

        let approved = service.request(owner, create(date(9, 5), date(9, 6))).await.unwrap();
        service.approve(approved.id, stranger).await.unwrap();
        assert!(matches!(
            service.delete(approved.id, owner, false).await,
            Err(AppError::Conflict(_))
        ));
        service.delete(approved.id, stranger, true).await.unwrap();
        assert!(service.list(Some(owner)).await.unwrap().is_empty());
    }
}
