//! # Account API
//!
//! 사용자 계정 관리 REST API 서버.
//!
//! JWT 인증과 능력(Ability) 기반 권한 부여를 갖춘 사용자 CRUD를
//! 제공합니다. 권한 판단은 `account-core`의 능력 엔진 하나에
//! 위임됩니다.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
