//! 사용자 도메인 모델.
//!
//! 사용자 레코드와 역할(Role) 정의를 제공합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의합니다.
/// 능력 엔진([`crate::ability::Ability`])이 역할별 규칙 집합을 구성합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Role {
    /// 관리자 - 모든 권한 보유
    Admin,
    /// 매니저 - 전체 조회 및 제한적 수정 권한
    Manager,
    /// 일반 사용자 - 본인 프로필만 조회/수정
    User,
}

impl Role {
    /// 문자열 표현 반환.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 사용자 레코드.
///
/// users 테이블의 데이터베이스 표현입니다.
///
/// 이 타입은 의도적으로 `Serialize`를 구현하지 않습니다.
/// `password_hash`가 응답 본문에 실리는 것을 타입 수준에서 차단하며,
/// 응답용 DTO는 API 크레이트에서 별도로 정의합니다.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    /// 고유 식별자 (생성 후 불변)
    pub id: Uuid,
    /// 표시 이름
    pub name: String,
    /// 이메일 (로그인 식별자, 전체 사용자 간 유일)
    pub email: String,
    /// Argon2 해시된 비밀번호 (PHC 형식)
    pub password_hash: String,
    /// 역할
    pub role: Role,
    /// 생성 시각 (스토어가 설정)
    pub created_at: DateTime<Utc>,
    /// 마지막 수정 시각 (스토어가 갱신)
    pub updated_at: DateTime<Utc>,
}
