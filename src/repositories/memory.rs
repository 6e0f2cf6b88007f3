//! Repositorio en memoria
//!
//! Guarda los registros en un `Vec` protegido por un `RwLock`: un único
//! escritor a la vez, sin persistencia entre reinicios.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FieldValue, Record, Repository};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct MemoryRepository<E: Record> {
    rows: RwLock<Vec<E>>,
}

impl<E: Record> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Comprueba las claves únicas de `candidate` contra el resto de filas
    fn check_unique(rows: &[E], candidate: &E) -> AppResult<()> {
        for (field, value) in candidate.unique_keys() {
            let taken = rows
                .iter()
                .filter(|row| row.id() != candidate.id())
                .any(|row| {
                    row.unique_keys()
                        .iter()
                        .any(|(f, v)| *f == field && v.eq_ignore_ascii_case(&value))
                });
            if taken {
                return Err(conflict_error(E::RESOURCE, field, &value));
            }
        }
        Ok(())
    }
}

impl<E: Record> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Record> Repository<E> for MemoryRepository<E> {
    async fn get_all(&self) -> AppResult<Vec<E>> {
        Ok(self.rows.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<E> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or_else(|| not_found_error(E::RESOURCE, &id.to_string()))
    }

    async fn create(&self, new: E::New) -> AppResult<E> {
        let record = E::build(new, Uuid::new_v4(), Utc::now());

        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, &record)?;
        rows.push(record.clone());

        tracing::debug!("💾 {} creado en memoria: {}", E::RESOURCE, record.id());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: E::Patch) -> AppResult<E> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| not_found_error(E::RESOURCE, &id.to_string()))?;

        // Se fusiona sobre una copia para no dejar la fila a medias si hay conflicto
        let mut updated = rows[index].clone();
        updated.apply(patch, Utc::now());
        Self::check_unique(&rows, &updated)?;
        rows[index] = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| not_found_error(E::RESOURCE, &id.to_string()))?;
        rows.remove(index);
        Ok(())
    }

    async fn find_by(&self, column: &'static str, value: FieldValue) -> AppResult<Vec<E>> {
        if !E::FILTERABLE.contains(&column) {
            return Err(AppError::Internal(format!(
                "Column '{}' is not filterable on {}",
                column,
                E::TABLE
            )));
        }

        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.field(column).as_ref() == Some(&value))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use crate::models::client::{Client, CreateClientRequest, UpdateClientRequest};
    use crate::models::user::{NewUser, User};

    fn new_client(name: &str, tax_id: &str) -> CreateClientRequest {
        CreateClientRequest {
            name: name.to_string(),
            tax_id: tax_id.to_string(),
            phone: Some("600123123".to_string()),
            email: None,
            address: None,
            primary_contact: None,
            notes: None,
            active: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let repo = MemoryRepository::<Client>::new();
        let created = repo.create(new_client("Talleres Norte", "B12345678")).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Talleres Norte");
        assert_eq!(fetched.tax_id, "B12345678");
        assert_eq!(fetched.phone.as_deref(), Some("600123123"));
        assert!(fetched.active);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let repo = MemoryRepository::<Client>::new();
        let created = repo.create(new_client("Talleres Norte", "B12345678")).await.unwrap();

        let patch = UpdateClientRequest {
            notes: Some("Paga a 30 días".to_string()),
            ..Default::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.phone, created.phone);
        assert_eq!(updated.notes.as_deref(), Some("Paga a 30 días"));
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_store_untouched() {
        let repo = MemoryRepository::<Client>::new();
        repo.create(new_client("Talleres Norte", "B12345678")).await.unwrap();

        let result = repo.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_id_is_not_found() {
        let repo = MemoryRepository::<Client>::new();
        let result = repo.get_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = MemoryRepository::<User>::new();
        let new_user = |email: &str| NewUser {
            email: email.to_string(),
            name: "Ana".to_string(),
            role: UserRole::Technician,
            active: true,
            password_hash: "hash".to_string(),
        };

        repo.create(new_user("ana@taller.es")).await.unwrap();
        let result = repo.create(new_user("ANA@taller.es")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_into_duplicate_keeps_original_row() {
        let repo = MemoryRepository::<Client>::new();
        repo.create(new_client("Uno", "B11111111")).await.unwrap();
        let second = repo.create(new_client("Dos", "B22222222")).await.unwrap();

        let patch = UpdateClientRequest {
            name: Some("Dos renombrado".to_string()),
            tax_id: Some("B11111111".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(second.id, patch).await,
            Err(AppError::Conflict(_))
        ));

        let unchanged = repo.get_by_id(second.id).await.unwrap();
        assert_eq!(unchanged.name, "Dos");
        assert_eq!(unchanged.tax_id, "B22222222");
    }

    #[tokio::test]
    async fn test_find_by_filterable_column() {
        let repo = MemoryRepository::<Client>::new();
        repo.create(new_client("Uno", "B11111111")).await.unwrap();
        repo.create(new_client("Dos", "B22222222")).await.unwrap();

        let found = repo.find_by("tax_id", "B22222222".into()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dos");

        assert!(repo.find_by("notes", "x".into()).await.is_err());
    }
}
