//! 관리자 회원 관리 서비스

pub mod member_admin_service;

pub use member_admin_service::MemberAdminService;
