//! 회원 저장소 추상화
//!
//! 서비스 계층은 [`MemberStore`] trait에만 의존합니다.
//! 운영 환경에서는 MongoDB 구현체([`MemberRepository`](super::member_repo::MemberRepository))를,
//! 테스트에서는 인메모리 구현체를 주입합니다.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::config::AuthClient;
use crate::domain::entities::members::{AuthProfileSnapshot, MemberAuth, MemberInfo, MemberProfileFields};
use crate::errors::errors::AppError;

/// 관리자 목록 조회 조건
#[derive(Debug, Clone, Default)]
pub struct MemberListFilter {
    /// 계정/닉네임/실명/휴대폰 번호 부분 일치
    pub keyword: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// (client, openid)에 해당하는 인증 연결 정보를 조회합니다.
    async fn find_auth(&self, client: AuthClient, openid: &str) -> Result<Option<MemberAuth>, AppError>;

    /// 인증 연결 정보를 원자적으로 생성하거나 프로필 스냅샷을 갱신합니다.
    ///
    /// 같은 (client, openid)로 동시에 호출되어도 문서는 하나만 생성되며,
    /// 이미 연결된 `member_id`는 변경하지 않습니다.
    async fn upsert_auth(
        &self,
        client: AuthClient,
        openid: &str,
        profile: &AuthProfileSnapshot,
    ) -> Result<MemberAuth, AppError>;

    /// `member_id`가 비어 있을 때만 회원을 연결합니다. 연결에 성공하면 `true`.
    async fn link_member(&self, auth_id: ObjectId, member_id: ObjectId) -> Result<bool, AppError>;

    /// 연결된 `member_id`가 아직 `stale_id`일 때만 새 회원으로 바꿉니다. 바뀌면 `true`.
    ///
    /// 회원 문서가 사라진 연결을 복구할 때 사용합니다.
    async fn relink_member(
        &self,
        auth_id: ObjectId,
        stale_id: ObjectId,
        member_id: ObjectId,
    ) -> Result<bool, AppError>;

    async fn find_member(&self, id: ObjectId) -> Result<Option<MemberInfo>, AppError>;

    /// 삭제되지 않은 회원 중 계정이 일치하는 회원
    async fn find_member_by_username(&self, username: &str) -> Result<Option<MemberInfo>, AppError>;

    /// 회원을 저장하고 ID가 채워진 회원을 반환합니다.
    async fn create_member(&self, member: MemberInfo) -> Result<MemberInfo, AppError>;

    /// 문서를 실제로 삭제합니다. 연결 경쟁에서 밀린 회원 정리에만 사용합니다.
    async fn remove_member(&self, id: ObjectId) -> Result<(), AppError>;

    /// 방문 횟수 +1, 마지막 로그인 시각/IP 기록
    async fn record_visit(&self, id: ObjectId, ip: Option<&str>) -> Result<Option<MemberInfo>, AppError>;

    /// 삭제되지 않은 회원을 최신순으로 조회합니다.
    async fn list_members(&self, filter: &MemberListFilter) -> Result<Vec<MemberInfo>, AppError>;

    async fn count_members(&self, keyword: Option<&str>) -> Result<u64, AppError>;

    async fn update_profile(
        &self,
        id: ObjectId,
        profile: &MemberProfileFields,
    ) -> Result<Option<MemberInfo>, AppError>;

    async fn update_credentials(
        &self,
        id: ObjectId,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<MemberInfo>, AppError>;

    /// 상태 변경. 이미 삭제된 회원은 변경하지 않고 `None`을 반환합니다.
    async fn set_status(&self, id: ObjectId, status: i32) -> Result<Option<MemberInfo>, AppError>;
}
