use axum::{extract::State, Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    jwt::{create_access_token, AccessToken},
    middleware::AuthUser,
    password::{hash_password, is_strong, verify_password},
};
use crate::db;
use crate::dto::{LoginRequest, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserProfile};
use crate::AppState;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<AccessToken>> {
    body.validate()?;
    if !is_strong(&body.password) {
        return Err(AppError::Validation(
            "Password must contain uppercase, lowercase, and number".into(),
        ));
    }

    let email = normalize_email(&body.email);
    let pwd_hash = hash_password(&body.password)?;

    // Uniqueness is settled by the insert itself, not by a prior lookup.
    let user_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&pwd_hash)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::Conflict("User already exists".into()))?;

    db::freeze::ensure_row(&state.db, user_id).await?;

    tracing::info!(user_id = %user_id, "User registered");

    let token = create_access_token(user_id, &email, &state.config)?;
    Ok(Json(token))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AccessToken>> {
    body.validate().map_err(|_| AppError::Unauthorized)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(normalize_email(&body.email))
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = create_access_token(user.id, &user.email, &state.config)?;
    Ok(Json(token))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(auth_user.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_compared_normalized() {
        assert_eq!(normalize_email("  Dev@Example.COM "), "dev@example.com");
    }
}
