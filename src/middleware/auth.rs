//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::auth::UserRole,
    services::authorization_service::{role_can, Capability},
    state::AppState,
    utils::{
        errors::{forbidden_error, AppError, AppResult},
        jwt::{extract_token_from_header, verify_token, JwtConfig},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn can(&self, capability: Capability) -> bool {
        role_can(self.role, capability)
    }

    /// Exigir una capacidad; 403 si el rol no la tiene
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            tracing::warn!(
                "🚫 {} ({}) sin permiso {}",
                self.email,
                self.role,
                capability.as_str()
            );
            Err(forbidden_error(
                capability.as_str(),
                "el rol del usuario no tiene este permiso",
            ))
        }
    }

    /// El propio usuario o alguien con la capacidad indicada
    pub fn require_self_or(&self, owner_id: Uuid, capability: Capability) -> AppResult<()> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            self.require(capability)
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &JwtConfig::from(state.config.as_ref()))?;

    // El usuario debe seguir existiendo y estar activo
    let user = state
        .store
        .users
        .get_by_id(claims.user_id()?)
        .await
        .map_err(|error| match error {
            AppError::NotFound(_) => AppError::Unauthorized("Usuario no encontrado".to_string()),
            other => other,
        })?;

    if !user.active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "user@taller.es".to_string(),
            name: "Usuario".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_capability() {
        assert!(user(UserRole::Admin).require(Capability::ManageUsers).is_ok());
        assert!(matches!(
            user(UserRole::Technician).require(Capability::ManageClients),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_require_self_or() {
        let technician = user(UserRole::Technician);
        assert!(technician
            .require_self_or(technician.user_id, Capability::ApproveVacations)
            .is_ok());
        assert!(technician
            .require_self_or(Uuid::new_v4(), Capability::ApproveVacations)
            .is_err());
        assert!(user(UserRole::ShopManager)
            .require_self_or(Uuid::new_v4(), Capability::ApproveVacations)
            .is_ok());
    }
}
