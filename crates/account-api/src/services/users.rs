//! 사용자 서비스.
//!
//! 사용자 CRUD의 비즈니스 로직입니다. 라우트 게이트는 타입 수준
//! 권한만 검사하므로, 이 계층이 조회된 인스턴스에 대해 인스턴스/
//! 필드 수준 조건을 다시 검증합니다.

use account_core::{Ability, Action, Role, User, UserField};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::auth::hash_password;
use crate::repository::{NewUser, UserRepository, UserUpdate};

/// 사용자 생성 입력.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// 생성 결과.
#[derive(Debug)]
pub struct CreatedUser {
    pub user: User,
    /// 시스템 최초 사용자 여부 (부트스트랩 관리자 안내용)
    pub first_user: bool,
}

/// 사용자 수정 입력 (부분 패치).
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// 사용자 서비스.
pub struct UserService;

impl UserService {
    /// 사용자 생성.
    ///
    /// 비밀번호가 없으면 검증 에러, 이메일이 중복이면 DB 제약
    /// 위반으로 중복 에러를 반환합니다.
    pub async fn create(pool: &PgPool, input: CreateUserInput) -> Result<CreatedUser, ServiceError> {
        let password = input
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ServiceError::MissingPassword)?;

        // 메시지 분기용 최초 사용자 감지. 역할 자동 승격은 하지 않는다.
        let first_user = UserRepository::count(pool).await? == 0;

        let password_hash = hash_password(password)?;
        let user = UserRepository::create(
            pool,
            NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role: input.role.unwrap_or_default(),
            },
        )
        .await?;

        info!(user_id = %user.id, role = %user.role, first_user, "User created");

        Ok(CreatedUser { user, first_user })
    }

    /// 사용자 목록 조회.
    ///
    /// 요청자의 능력 규칙으로 읽을 수 있는 레코드만 남깁니다.
    /// admin과 manager는 전체, 일반 사용자는 본인 레코드만 보입니다.
    pub async fn list(pool: &PgPool, ability: &Ability) -> Result<Vec<User>, ServiceError> {
        let mut users = UserRepository::list_all(pool).await?;
        users.retain(|u| ability.can_on(Action::Read, u));
        Ok(users)
    }

    /// 단일 사용자 조회.
    ///
    /// 게이트의 타입 수준 검사 이후, 조회된 인스턴스에 대한
    /// 읽기 권한을 다시 확인합니다.
    pub async fn get(pool: &PgPool, ability: &Ability, id: Uuid) -> Result<User, ServiceError> {
        let user = UserRepository::find_by_id(pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        if !ability.can_on(Action::Read, &user) {
            return Err(ServiceError::Forbidden);
        }

        Ok(user)
    }

    /// 사용자 수정.
    ///
    /// 대상 인스턴스에 대한 수정 권한과, 패치에 포함된 각 필드에
    /// 대한 필드 수준 권한을 모두 검사합니다. 새 비밀번호는
    /// 다시 해싱합니다.
    pub async fn update(
        pool: &PgPool,
        ability: &Ability,
        id: Uuid,
        patch: UpdateUserInput,
    ) -> Result<User, ServiceError> {
        let target = UserRepository::find_by_id(pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        if !ability.can_on(Action::Update, &target) {
            return Err(ServiceError::Forbidden);
        }

        let patched_fields = [
            (patch.name.is_some(), UserField::Name),
            (patch.email.is_some(), UserField::Email),
            (patch.password.is_some(), UserField::Password),
            (patch.role.is_some(), UserField::Role),
        ];
        for (present, field) in patched_fields {
            if present && !ability.can_on_field(Action::Update, &target, field) {
                return Err(ServiceError::Forbidden);
            }
        }

        let password_hash = match patch.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => hash_password(password)?,
            None => target.password_hash.clone(),
        };

        let merged = UserUpdate {
            name: patch.name.unwrap_or(target.name),
            email: patch.email.unwrap_or(target.email),
            password_hash,
            role: patch.role.unwrap_or(target.role),
        };

        let updated = UserRepository::update(pool, id, merged)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        info!(user_id = %id, "User updated");

        Ok(updated)
    }

    /// 사용자 삭제.
    pub async fn remove(pool: &PgPool, ability: &Ability, id: Uuid) -> Result<(), ServiceError> {
        let target = UserRepository::find_by_id(pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        if !ability.can_on(Action::Delete, &target) {
            return Err(ServiceError::Forbidden);
        }

        let deleted = UserRepository::delete(pool, id).await?;
        if deleted == 0 {
            return Err(ServiceError::NotFound(id));
        }

        info!(user_id = %id, "User deleted");

        Ok(())
    }
}
