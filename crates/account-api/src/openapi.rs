//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    auth::{LoginRequest, LoginResponse},
    health::{ComponentHealth, ComponentStatus, HealthResponse},
    users::{
        CreateUserRequest, CreateUserResponse, DeleteUserResponse, UpdateUserRequest, UserDto,
        UsersListResponse,
    },
};

/// Account API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account Service API",
        version = "0.1.0",
        description = r#"
# 계정 관리 REST API

역할 기반 접근 제어(RBAC)와 JWT 인증을 갖춘 사용자 계정 관리 API입니다.

## 역할

- **admin**: 모든 작업 가능
- **manager**: 전체 조회, 비관리자 수정 (role 필드 제외)
- **user**: 본인 프로필 조회/수정만 가능 (role 필드 제외)

## 인증

`POST /auth/login`으로 토큰을 발급받아
`Authorization: Bearer <token>` 헤더로 전달하세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::login,
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(schemas(
        ApiErrorResponse,
        LoginRequest,
        LoginResponse,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        CreateUserRequest,
        CreateUserResponse,
        UpdateUserRequest,
        DeleteUserResponse,
        UserDto,
        UsersListResponse,
    )),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "인증 및 토큰 발급"),
        (name = "users", description = "사용자 관리 (능력 기반 접근 제어)"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer 인증 스키마 추가.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_user_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();

        assert!(json.contains("/users"));
        assert!(json.contains("/auth/login"));
        assert!(json.contains("/health"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_schemas_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components must exist");

        for schema in ["UserDto", "LoginRequest", "ApiErrorResponse"] {
            assert!(
                components.schemas.contains_key(schema),
                "missing schema: {}",
                schema
            );
        }
    }
}
