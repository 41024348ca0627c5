//! # Account Core
//!
//! 계정 서비스의 핵심 도메인 모델 및 권한 엔진을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 레코드 및 역할 정의
//! - 능력(Ability) 엔진: 역할별 권한 규칙 구성 및 평가
//! - 로깅 인프라
//!
//! 능력 엔진은 순수 함수로 동작하며 I/O를 수행하지 않습니다.
//! 요청마다 새 규칙 집합을 생성하고 폐기하므로 동기화 없이
//! 여러 요청 처리 태스크에서 동시에 호출해도 안전합니다.

pub mod ability;
pub mod logging;
pub mod user;

pub use ability::{Ability, Action, Condition, RequiredRule, Rule, Subject, UserField};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use user::{Role, User};
