//! Servicio de autenticación
//!
//! Login con email y contraseña (bcrypt) y emisión del token de sesión.

use bcrypt::{hash, verify, DEFAULT_COST};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::{LoginRequest, LoginResponse, UserInfo, UserRole};
use crate::models::user::{NewUser, User};
use crate::repositories::{FieldValue, Store};
use crate::services::authorization_service::permissions_for_role;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

/// Email tal y como se guarda y se busca
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Cifrar una contraseña con el coste por defecto de bcrypt
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(format!("Error cifrando contraseña: {}", e)))
}

pub fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        permissions: permissions_for_role(user.role),
    }
}

pub struct AuthService {
    store: Store,
}

impl AuthService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .store
            .users
            .find_by("email", FieldValue::Text(normalize_email(email)))
            .await?
            .into_iter()
            .next())
    }

    /// Autentica un usuario y emite su token
    pub async fn login(&self, request: &LoginRequest, jwt_config: &JwtConfig) -> AppResult<LoginResponse> {
        let invalid = || AppError::Unauthorized("Credenciales inválidas".to_string());

        let user = self.find_by_email(&request.email).await?.ok_or_else(invalid)?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))?;
        if !valid {
            tracing::warn!("🔒 Contraseña incorrecta para {}", user.email);
            return Err(invalid());
        }

        if !user.active {
            tracing::warn!("🔒 Intento de login de usuario inactivo: {}", user.email);
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }

        let (token, expires_at) = generate_token(user.id, &user.email, user.role, jwt_config)?;
        tracing::info!("🔑 Login correcto: {} ({})", user.email, user.role);

        Ok(LoginResponse {
            token,
            user_info: user_info(&user),
            expires_at,
        })
    }

    pub async fn me(&self, user_id: Uuid) -> AppResult<UserInfo> {
        let user = self.store.users.get_by_id(user_id).await?;
        Ok(user_info(&user))
    }

    /// Crea el administrador inicial si la tabla de usuarios está vacía.
    /// Devuelve `true` si lo ha creado.
    pub async fn bootstrap_admin(&self, config: &EnvironmentConfig) -> AppResult<bool> {
        let (Some(email), Some(password)) = (
            config.bootstrap_admin_email.as_deref(),
            config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(false);
        };

        if !self.store.users.get_all().await?.is_empty() {
            tracing::debug!("Ya existen usuarios: no se crea el administrador inicial");
            return Ok(false);
        }

        let admin = self
            .store
            .users
            .create(NewUser {
                email: normalize_email(email),
                name: "Administrador".to_string(),
                role: UserRole::Admin,
                active: true,
                password_hash: hash_password(password)?,
            })
            .await?;

        tracing::info!("👤 Administrador inicial creado: {}", admin.email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    async fn seed(store: &Store, active: bool) {
        store
            .users
            .create(NewUser {
                email: "jefe@taller.es".to_string(),
                name: "Jefe".to_string(),
                role: UserRole::ShopManager,
                active,
                password_hash: hash("secreto123", 4).unwrap(),
            })
            .await
            .unwrap();
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            email: " Jefe@Taller.es ".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_ok() {
        let store = Store::in_memory();
        seed(&store, true).await;

        let response = AuthService::new(store)
            .login(&login("secreto123"), &jwt_config())
            .await
            .unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user_info.role, UserRole::ShopManager);
        assert!(response.user_info.permissions.contains(&"approve_vacations".to_string()));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password_and_inactive() {
        let store = Store::in_memory();
        seed(&store, true).await;
        let service = AuthService::new(store);
        assert!(matches!(
            service.login(&login("otra-clave"), &jwt_config()).await,
            Err(AppError::Unauthorized(_))
        ));

        let store = Store::in_memory();
        seed(&store, false).await;
        assert!(matches!(
            AuthService::new(store).login(&login("secreto123"), &jwt_config()).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_when_empty() {
        let config = EnvironmentConfig {
            bootstrap_admin_email: Some("Admin@Taller.es".to_string()),
            bootstrap_admin_password: Some("cambiar-ya".to_string()),
            ..EnvironmentConfig::default()
        };

        let store = Store::in_memory();
        let service = AuthService::new(store.clone());
        assert!(service.bootstrap_admin(&config).await.unwrap());
        assert!(!service.bootstrap_admin(&config).await.unwrap());

        let users = store.users.get_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "admin@taller.es");
        assert_eq!(users[0].role, UserRole::Admin);

        let without = AuthService::new(Store::in_memory());
        assert!(!without.bootstrap_admin(&EnvironmentConfig::default()).await.unwrap());
    }
}
