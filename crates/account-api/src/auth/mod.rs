//! 인증(Authentication).
//!
//! JWT 기반 인증 및 비밀번호 해싱을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체 (`{sub, email, role}`)
//! - [`JwtAuth`]: Axum 핸들러용 JWT 검증 추출기
//! - [`hash_password`] / [`verify_password`]: Argon2 해싱 프리미티브
//!
//! 권한 부여(authorization)는 별도 모듈인 [`crate::guard`]와
//! `account-core`의 능력 엔진이 담당합니다.

mod jwt;
mod middleware;
mod password;

pub use jwt::{create_token, decode_token, Claims, JwtError};
pub use middleware::{JwtAuth, JwtAuthError, JwtConfig};
pub use password::{hash_password, verify_password, PasswordError};
