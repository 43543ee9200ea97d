//! # Core Framework Module
//!
//! 컴포넌트 싱글톤 관리를 담당하는 모듈입니다.
//!
//! - [`registry`]: `ServiceLocator`와 `inventory` 기반 컴포넌트 등록

pub mod registry;

pub use registry::{ComponentRegistration, Repository, RepositoryRegistration, ServiceLocator};
