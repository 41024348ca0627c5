//! 인증 API.
//!
//! 로그인(토큰 발급) 엔드포인트.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::users::UserDto;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::{AuthService, ServiceError};
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 이메일 (로그인 식별자)
    pub email: String,
    /// 평문 비밀번호
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT Access Token (Bearer)
    pub access_token: String,
    /// 인증된 사용자 정보
    pub user: UserDto,
}

/// 로그인.
///
/// 자격증명을 검증하고 Access Token을 발급합니다.
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "잘못된 자격증명", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let pool = state.db()?;

    let (access_token, user) = AuthService::login(pool, &state.jwt, &request.email, &request.password)
        .await
        .map_err(ServiceError::into_api)?;

    Ok(Json(LoginResponse {
        access_token,
        user: user.into(),
    }))
}

/// 인증 라우터.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    #[tokio::test]
    async fn test_login_without_db_is_503() {
        let state = Arc::new(create_test_state());
        let app = Router::new().nest("/auth", auth_router()).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"email":"a@b.com","password":"123456"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_body() {
        let state = Arc::new(create_test_state());
        let app = Router::new().nest("/auth", auth_router()).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"a@b.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        // 필수 필드 누락은 본문 역직렬화 단계에서 거부된다
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
