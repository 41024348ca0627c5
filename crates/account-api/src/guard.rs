//! 권한 게이트(Authorization Gate).
//!
//! 인증 이후에 실행되는 파이프라인 단계입니다. 엔드포인트에 선언된
//! (동작, 대상) 요구사항을 인증된 사용자의 능력 규칙 집합으로
//! 검사하고, 하나라도 충족되지 않으면 403으로 거부합니다.
//!
//! 이 단계는 타입 수준 권한만 검사합니다. 대상 인스턴스를 아직
//! 조회하지 않은 시점에 실행되므로, 인스턴스/필드 수준 조건은
//! 레코드 조회 후 서비스 계층([`crate::services`])이 반환된
//! [`Ability`]로 다시 검증합니다.

use account_core::{Ability, Action, RequiredRule, Subject};
use axum::http::StatusCode;
use axum::Json;

use crate::auth::Claims;
use crate::error::{reject, ApiErrorResponse};

/// 요구사항을 검사하고 사용자의 능력 규칙 집합을 반환.
///
/// 규칙 집합은 호출마다 새로 구성됩니다. 요구사항이 비어 있으면
/// 무조건 통과합니다 (인증은 추출기가 이미 강제한 상태).
///
/// # Errors
///
/// - `sub` 클레임이 UUID가 아니면 401
/// - 요구사항 중 하나라도 거부되면 403
pub fn authorize(
    claims: &Claims,
    requirements: &[RequiredRule],
) -> Result<Ability, (StatusCode, Json<ApiErrorResponse>)> {
    let user_id = claims.user_id().ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "유효하지 않은 토큰",
        )
    })?;

    let ability = Ability::for_user(user_id, claims.role);

    let denied = requirements
        .iter()
        .any(|rule| !ability.can(rule.action, rule.subject));
    if denied {
        tracing::warn!(
            user_id = %user_id,
            role = %claims.role,
            "Authorization denied by ability rules"
        );
        return Err(reject(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "이 작업을 수행할 권한이 없습니다",
        ));
    }

    Ok(ability)
}

/// User 리소스에 대한 읽기 요구사항.
pub fn read_user() -> RequiredRule {
    RequiredRule::new(Action::Read, Subject::User)
}

/// User 리소스에 대한 수정 요구사항.
pub fn update_user() -> RequiredRule {
    RequiredRule::new(Action::Update, Subject::User)
}

/// User 리소스에 대한 삭제 요구사항.
pub fn delete_user() -> RequiredRule {
    RequiredRule::new(Action::Delete, Subject::User)
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_core::Role;
    use uuid::Uuid;

    fn claims_for(role: Role) -> Claims {
        Claims::new(Uuid::new_v4(), "test@example.com", role, 60)
    }

    #[test]
    fn test_empty_requirements_always_pass() {
        for role in [Role::Admin, Role::Manager, Role::User] {
            assert!(authorize(&claims_for(role), &[]).is_ok());
        }
    }

    #[test]
    fn test_read_requirement_per_role() {
        // 모든 역할이 타입 수준 read User는 통과한다 (일반 사용자는
        // 조건부 규칙이지만 타입 수준 검사는 조건을 무시).
        for role in [Role::Admin, Role::Manager, Role::User] {
            assert!(authorize(&claims_for(role), &[read_user()]).is_ok());
        }
    }

    #[test]
    fn test_delete_requirement_per_role() {
        assert!(authorize(&claims_for(Role::Admin), &[delete_user()]).is_ok());

        for role in [Role::Manager, Role::User] {
            let err = authorize(&claims_for(role), &[delete_user()]).unwrap_err();
            assert_eq!(err.0, StatusCode::FORBIDDEN);
            assert_eq!(err.1 .0.code, "FORBIDDEN");
        }
    }

    #[test]
    fn test_any_failing_requirement_rejects_all() {
        // read는 통과하지만 delete가 거부되면 전체가 403
        let err = authorize(&claims_for(Role::Manager), &[read_user(), delete_user()]);
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_sub_is_unauthenticated() {
        let mut claims = claims_for(Role::Admin);
        claims.sub = "not-a-uuid".to_string();

        let err = authorize(&claims, &[read_user()]).unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_returned_ability_matches_role() {
        let ability = authorize(&claims_for(Role::Manager), &[read_user()]).unwrap();
        assert!(!ability.can(Action::Delete, Subject::User));
        assert!(ability.can(Action::Read, Subject::All));
    }
}
