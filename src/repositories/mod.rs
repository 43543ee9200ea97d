//! 데이터 액세스 계층
//!
//! MongoDB를 저장소로 사용하며, 리포지토리는 `ServiceLocator`가 싱글톤으로 관리합니다.

pub mod members;
