//! Servicio de fichajes
//!
//! Fichaje de presencia (entrada/salida general) y consultas de fichajes.
//! Un usuario no puede tener dos entradas de presencia abiertas a la vez.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::punch::{NewPunch, Punch, PunchFilters, PunchKind, UpdatePunchRequest};
use crate::repositories::{FieldValue, Store};
use crate::services::time_tracking::{self, PunchState};
use crate::utils::errors::{AppError, AppResult};

/// Estado de presencia de un usuario
#[derive(Debug, Clone, Serialize)]
pub struct PresenceStatus {
    pub user_id: Uuid,
    pub clocked_in: bool,
    pub open_since: Option<DateTime<Utc>>,
    pub today_hours: f64,
    pub last_punch: Option<Punch>,
}

pub struct PunchService {
    store: Store,
}

impl PunchService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Fichajes de un usuario en un flujo: presencia (`None`) o un parte concreto
    pub async fn user_stream(&self, user_id: Uuid, work_order_id: Option<Uuid>) -> AppResult<Vec<Punch>> {
        let punches = self
            .store
            .punches
            .find_by("user_id", FieldValue::Uuid(user_id))
            .await?;

        Ok(punches
            .into_iter()
            .filter(|punch| punch.work_order_id == work_order_id)
            .collect())
    }

    /// Estado abierto/cerrado del usuario en un flujo
    pub async fn stream_state(&self, user_id: Uuid, work_order_id: Option<Uuid>) -> AppResult<PunchState> {
        let punches = self.user_stream(user_id, work_order_id).await?;
        Ok(time_tracking::open_state_by_user(&punches)
            .remove(&user_id)
            .unwrap_or(PunchState::Idle))
    }

    /// Registrar un fichaje en el flujo indicado, respetando el estado actual
    pub async fn punch(
        &self,
        user_id: Uuid,
        work_order_id: Option<Uuid>,
        kind: PunchKind,
        at: DateTime<Utc>,
    ) -> AppResult<Punch> {
        let state = self.stream_state(user_id, work_order_id).await?;

        match (state, kind) {
            (PunchState::ClockedIn(since), PunchKind::Entrance) => {
                return Err(AppError::Conflict(format!(
                    "Ya existe una entrada abierta desde {}",
                    since.to_rfc3339()
                )));
            }
            (PunchState::Idle, PunchKind::Exit) => {
                return Err(AppError::Conflict(
                    "No hay ninguna entrada abierta que cerrar".to_string(),
                ));
            }
            _ => {}
        }

        let punch = self
            .store
            .punches
            .create(NewPunch {
                user_id,
                work_order_id,
                kind,
                punched_at: at,
            })
            .await?;

        tracing::info!(
            "⏱️ Fichaje {} de {} ({})",
            kind.as_str(),
            user_id,
            work_order_id.map_or_else(|| "presencia".to_string(), |id| format!("parte {}", id))
        );
        Ok(punch)
    }

    pub async fn clock_in(&self, user_id: Uuid) -> AppResult<Punch> {
        self.punch(user_id, None, PunchKind::Entrance, Utc::now()).await
    }

    pub async fn clock_out(&self, user_id: Uuid) -> AppResult<Punch> {
        self.punch(user_id, None, PunchKind::Exit, Utc::now()).await
    }

    /// Estado de presencia y horas de presencia acumuladas hoy
    pub async fn presence_status(&self, user_id: Uuid) -> AppResult<PresenceStatus> {
        let presence = self.user_stream(user_id, None).await?;
        let state = time_tracking::open_state_by_user(&presence)
            .remove(&user_id)
            .unwrap_or(PunchState::Idle);

        let today = Utc::now().date_naive();
        let todays: Vec<Punch> = presence
            .iter()
            .filter(|punch| punch.punched_at.date_naive() == today)
            .cloned()
            .collect();

        let last_punch = presence.iter().max_by_key(|punch| punch.punched_at).cloned();

        Ok(PresenceStatus {
            user_id,
            clocked_in: state.is_open(),
            open_since: match state {
                PunchState::ClockedIn(since) => Some(since),
                PunchState::Idle => None,
            },
            today_hours: time_tracking::worked_hours(&todays),
            last_punch,
        })
    }

    pub async fn punches_for_work_order(&self, work_order_id: Uuid) -> AppResult<Vec<Punch>> {
        self.store
            .punches
            .find_by("work_order_id", FieldValue::Uuid(work_order_id))
            .await
    }

    /// Listado filtrado, ordenado cronológicamente
    pub async fn list(&self, filters: &PunchFilters) -> AppResult<Vec<Punch>> {
        let candidates = match (filters.user_id, filters.work_order_id) {
            (Some(user_id), _) => self.store.punches.find_by("user_id", user_id.into()).await?,
            (None, Some(order_id)) => self.punches_for_work_order(order_id).await?,
            (None, None) => self.store.punches.get_all().await?,
        };

        let mut punches: Vec<Punch> = candidates
            .into_iter()
            .filter(|punch| filters.matches(punch))
            .collect();
        punches.sort_by_key(|punch| punch.punched_at);
        Ok(punches)
    }

    /// Corrección manual: alta de un fichaje arbitrario
    pub async fn create_manual(&self, new: NewPunch) -> AppResult<Punch> {
        self.store.users.get_by_id(new.user_id).await?;
        if let Some(order_id) = new.work_order_id {
            self.store.work_orders.get_by_id(order_id).await?;
        }
        let punch = self.store.punches.create(new).await?;
        tracing::info!("✏️ Fichaje manual {} creado para {}", punch.id, punch.user_id);
        Ok(punch)
    }

    pub async fn update_manual(&self, id: Uuid, request: UpdatePunchRequest) -> AppResult<Punch> {
        if let Some(order_id) = request.work_order_id {
            self.store.work_orders.get_by_id(order_id).await?;
        }
        self.store.punches.update(id, request).await
    }

    pub async fn delete_manual(&self, id: Uuid) -> AppResult<()> {
        self.store.punches.delete(id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Punch> {
        self.store.punches.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &Store) -> Uuid {
        use crate::models::{auth::UserRole, user::NewUser};
        store
            .users
            .create(NewUser {
                email: "tecnico@taller.es".to_string(),
                name: "Técnico".to_string(),
                role: UserRole::Technician,
                active: true,
                password_hash: "x".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_clock_in_twice_is_conflict() {
        let store = Store::in_memory();
        let user = seed_user(&store).await;
        let service = PunchService::new(store.clone());

        service.clock_in(user).await.unwrap();
        assert!(matches!(service.clock_in(user).await, Err(AppError::Conflict(_))));
        assert_eq!(store.punches.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clock_out_without_entrance_is_conflict() {
        let store = Store::in_memory();
        let user = seed_user(&store).await;
        let service = PunchService::new(store);

        assert!(matches!(service.clock_out(user).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_presence_status_follows_punches() {
        let store = Store::in_memory();
        let user = seed_user(&store).await;
        let service = PunchService::new(store);

        let status = service.presence_status(user).await.unwrap();
        assert!(!status.clocked_in);
        assert!(status.last_punch.is_none());

        let entrance = service.clock_in(user).await.unwrap();
        let status = service.presence_status(user).await.unwrap();
        assert!(status.clocked_in);
        assert_eq!(status.open_since, Some(entrance.punched_at));

        service.clock_out(user).await.unwrap();
        let status = service.presence_status(user).await.unwrap();
        assert!(!status.clocked_in);
        assert!(status.today_hours >= 0.0);
    }

    #[tokio::test]
    async fn test_presence_and_work_order_streams_are_independent() {
        let store = Store::in_memory();
        let user = seed_user(&store).await;
        let service = PunchService::new(store);
        let order = Uuid::new_v4();

        service.clock_in(user).await.unwrap();
        // Una entrada en un parte no choca con la presencia abierta
        service
            .punch(user, Some(order), PunchKind::Entrance, Utc::now())
            .await
            .unwrap();

        assert!(service.stream_state(user, None).await.unwrap().is_open());
        assert!(service.stream_state(user, Some(order)).await.unwrap().is_open());
    }

    #[tokio::test]
    async fn test_manual_punch_requires_existing_user() {
        let service = PunchService::new(Store::in_memory());
        let result = service
            .create_manual(NewPunch {
                user_id: Uuid::new_v4(),
                work_order_id: None,
                kind: PunchKind::Entrance,
                punched_at: Utc::now(),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
