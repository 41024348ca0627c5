//! 사용자 관리 API.
//!
//! 사용자 CRUD 엔드포인트. 생성을 제외한 모든 엔드포인트는
//! Bearer 토큰 인증과 능력 기반 권한 검사를 요구합니다.
//!
//! 게이트는 타입 수준 권한만 검사하고, 대상 레코드 조회 후의
//! 인스턴스/필드 수준 검사는 서비스 계층이 수행합니다.

use account_core::{Role, User};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::JwtAuth;
use crate::error::{reject, ApiErrorResponse, ApiResult};
use crate::guard;
use crate::services::{CreateUserInput, ServiceError, UpdateUserInput, UserService};
use crate::state::AppState;

/// 사용자 응답 DTO.
///
/// 비밀번호 해시는 어떤 응답에도 포함되지 않습니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// 사용자 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// 표시 이름
    pub name: String,
    /// 이메일 (유일해야 함)
    pub email: String,
    /// 평문 비밀번호 (필수, 해싱되어 저장됨)
    pub password: Option<String>,
    /// 역할 (기본값: user)
    #[serde(default)]
    pub role: Option<Role>,
}

/// 사용자 생성 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    /// 성공 여부
    pub success: bool,
    /// 메시지 (최초 사용자는 관리자 생성 안내)
    pub message: String,
    /// 생성된 사용자
    pub data: UserDto,
}

/// 사용자 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersListResponse {
    pub users: Vec<UserDto>,
    pub total: usize,
}

/// 사용자 수정 요청 (부분 패치).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// 사용자 삭제 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

fn parse_user_id(id: &str) -> Result<Uuid, (StatusCode, Json<ApiErrorResponse>)> {
    Uuid::parse_str(id).map_err(|_| {
        reject(
            StatusCode::BAD_REQUEST,
            "INVALID_USER_ID",
            format!("잘못된 사용자 ID 형식: {}", id),
        )
    })
}

// ==================== Handler ====================

/// 사용자 생성.
///
/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "사용자 생성됨", body = CreateUserResponse),
        (status = 400, description = "검증 실패 또는 중복 이메일", body = ApiErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let pool = state.db()?;

    let created = UserService::create(
        pool,
        CreateUserInput {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
        },
    )
    .await
    .map_err(ServiceError::into_api)?;

    let message = if created.first_user {
        "관리자 사용자가 생성되었습니다"
    } else {
        "사용자가 생성되었습니다"
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            success: true,
            message: message.to_string(),
            data: created.user.into(),
        }),
    ))
}

/// 사용자 목록 조회.
///
/// 요청자의 능력 규칙으로 필터링된 목록을 반환합니다.
/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "필터링된 사용자 목록", body = UsersListResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<UsersListResponse>> {
    let ability = guard::authorize(&claims, &[guard::read_user()])?;
    let pool = state.db()?;

    let users = UserService::list(pool, &ability)
        .await
        .map_err(ServiceError::into_api)?;

    let users: Vec<UserDto> = users.iter().map(UserDto::from).collect();
    let total = users.len();

    Ok(Json(UsersListResponse { users, total }))
}

/// 단일 사용자 조회.
///
/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "사용자 ID (UUID)")),
    responses(
        (status = 200, description = "사용자 정보", body = UserDto),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDto>> {
    let id = parse_user_id(&id)?;
    let ability = guard::authorize(&claims, &[guard::read_user()])?;
    let pool = state.db()?;

    let user = UserService::get(pool, &ability, id)
        .await
        .map_err(ServiceError::into_api)?;

    Ok(Json(user.into()))
}

/// 사용자 수정.
///
/// PATCH /users/{id}
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "사용자 ID (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정된 사용자", body = UserDto),
        (status = 403, description = "권한 없음 (role 필드 수정 금지 포함)", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    let id = parse_user_id(&id)?;
    let ability = guard::authorize(&claims, &[guard::update_user()])?;
    let pool = state.db()?;

    let updated = UserService::update(
        pool,
        &ability,
        id,
        UpdateUserInput {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
        },
    )
    .await
    .map_err(ServiceError::into_api)?;

    Ok(Json(updated.into()))
}

/// 사용자 삭제.
///
/// DELETE /users/{id}
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "사용자 ID (UUID)")),
    responses(
        (status = 200, description = "삭제 완료", body = DeleteUserResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteUserResponse>> {
    let id = parse_user_id(&id)?;
    let ability = guard::authorize(&claims, &[guard::delete_user()])?;
    let pool = state.db()?;

    UserService::remove(pool, &ability, id)
        .await
        .map_err(ServiceError::into_api)?;

    Ok(Json(DeleteUserResponse {
        success: true,
        message: "사용자가 삭제되었습니다".to_string(),
    }))
}

/// 사용자 라우터.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

// ==================== 테스트 ====================
