//! 사용자 저장소.
//!
//! users 테이블에 대한 생성, 조회, 수정, 삭제 작업을 처리합니다.
//!
//! 이메일 유일성은 DB의 unique index가 강제하며, 위반 시
//! [`UserRepoError::DuplicateEmail`]로 변환됩니다. 사전
//! 존재-확인(check-then-insert)에 의존하지 않으므로 동시 생성
//! 경쟁에도 안전합니다.

use account_core::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

/// 사용자 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum UserRepoError {
    /// 이메일 unique 제약 위반
    #[error("이미 사용 중인 이메일입니다")]
    DuplicateEmail,
    /// 기타 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
}

impl UserRepoError {
    /// unique 제약 위반을 중복 이메일로 분류.
    fn from_sqlx(e: sqlx::Error) -> Self {
        let is_unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if is_unique {
            Self::DuplicateEmail
        } else {
            Self::Database(e)
        }
    }
}

/// 새 사용자 생성 입력.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// 사용자 수정 입력 (서비스 계층에서 병합 완료된 값).
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// 사용자 저장소.
pub struct UserRepository;

impl UserRepository {
    /// 새 사용자 생성.
    ///
    /// 이메일이 이미 등록되어 있으면 DB 제약 위반을
    /// [`UserRepoError::DuplicateEmail`]로 반환하며, 아무것도
    /// 기록되지 않습니다.
    pub async fn create(pool: &PgPool, input: NewUser) -> Result<User, UserRepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role)
        .fetch_one(pool)
        .await
        .map_err(UserRepoError::from_sqlx)
    }

    /// ID로 사용자 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 이메일로 사용자 조회 (로그인용).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// 전체 사용자 목록 조회.
    ///
    /// 가시성 필터링은 서비스 계층이 능력 엔진으로 수행합니다.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(pool)
            .await
    }

    /// 사용자 수정.
    ///
    /// `updated_at`을 함께 갱신합니다. 이메일 변경이 기존 레코드와
    /// 충돌하면 [`UserRepoError::DuplicateEmail`]을 반환합니다.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<Option<User>, UserRepoError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.password_hash)
        .bind(update.role)
        .fetch_optional(pool)
        .await
        .map_err(UserRepoError::from_sqlx)
    }

    /// 사용자 삭제.
    ///
    /// # Returns
    ///
    /// 삭제된 행 수 (0이면 해당 ID 없음)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// 전체 사용자 수.
    ///
    /// 최초 사용자(부트스트랩 관리자) 감지에 사용됩니다.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
