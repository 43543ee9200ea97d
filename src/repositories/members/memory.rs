//! 테스트용 인메모리 회원 저장소

use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{DateTime, oid::ObjectId};

use crate::config::AuthClient;
use crate::domain::entities::members::{
    AuthProfileSnapshot, MemberAuth, MemberInfo, MemberProfileFields, STATUS_DELETED,
};
use crate::errors::errors::AppError;
use crate::repositories::members::member_store::{MemberListFilter, MemberStore};

#[derive(Default)]
struct State {
    auths: Vec<MemberAuth>,
    members: Vec<MemberInfo>,
}

/// `Mutex<Vec<_>>` 기반 [`MemberStore`] 구현체
#[derive(Default)]
pub struct InMemoryMemberStore {
    state: Mutex<State>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auth_count(&self) -> usize {
        self.lock().auths.len()
    }

    pub fn member_count(&self) -> usize {
        self.lock().members.len()
    }

    /// 다른 요청이 먼저 회원을 연결한 상황을 만들 때 사용합니다.
    pub fn force_link(&self, auth_id: ObjectId, member_id: ObjectId) {
        if let Some(auth) = self.lock().auths.iter_mut().find(|a| a.id == Some(auth_id)) {
            auth.member_id = Some(member_id);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn matches_keyword(member: &MemberInfo, keyword: Option<&str>) -> bool {
        let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
            return true;
        };
        let keyword = keyword.to_lowercase();

        [
            member.username.clone().unwrap_or_default(),
            member.nickname.clone(),
            member.realname.clone(),
            member.mobile_phone.clone(),
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&keyword))
    }

    fn update_active(
        &self,
        id: ObjectId,
        apply: impl FnOnce(&mut MemberInfo),
    ) -> Option<MemberInfo> {
        let mut state = self.lock();
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == Some(id) && m.status != STATUS_DELETED)?;

        apply(member);
        member.updated_at = DateTime::now();
        Some(member.clone())
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_auth(&self, client: AuthClient, openid: &str) -> Result<Option<MemberAuth>, AppError> {
        Ok(self
            .lock()
            .auths
            .iter()
            .find(|a| a.client == client && a.openid == openid)
            .cloned())
    }

    async fn upsert_auth(
        &self,
        client: AuthClient,
        openid: &str,
        profile: &AuthProfileSnapshot,
    ) -> Result<MemberAuth, AppError> {
        let mut state = self.lock();

        if let Some(auth) = state
            .auths
            .iter_mut()
            .find(|a| a.client == client && a.openid == openid)
        {
            auth.apply_profile(profile.clone());
            return Ok(auth.clone());
        }

        let mut auth = MemberAuth::new(client, openid.to_string(), profile.clone());
        auth.id = Some(ObjectId::new());
        state.auths.push(auth.clone());
        Ok(auth)
    }

    async fn link_member(&self, auth_id: ObjectId, member_id: ObjectId) -> Result<bool, AppError> {
        let mut state = self.lock();

        match state
            .auths
            .iter_mut()
            .find(|a| a.id == Some(auth_id) && a.member_id.is_none())
        {
            Some(auth) => {
                auth.member_id = Some(member_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn relink_member(
        &self,
        auth_id: ObjectId,
        stale_id: ObjectId,
        member_id: ObjectId,
    ) -> Result<bool, AppError> {
        let mut state = self.lock();

        match state
            .auths
            .iter_mut()
            .find(|a| a.id == Some(auth_id) && a.member_id == Some(stale_id))
        {
            Some(auth) => {
                auth.member_id = Some(member_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_member(&self, id: ObjectId) -> Result<Option<MemberInfo>, AppError> {
        Ok(self.lock().members.iter().find(|m| m.id == Some(id)).cloned())
    }

    async fn find_member_by_username(&self, username: &str) -> Result<Option<MemberInfo>, AppError> {
        Ok(self
            .lock()
            .members
            .iter()
            .find(|m| m.username.as_deref() == Some(username) && m.status != STATUS_DELETED)
            .cloned())
    }

    async fn create_member(&self, mut member: MemberInfo) -> Result<MemberInfo, AppError> {
        member.id = Some(ObjectId::new());
        self.lock().members.push(member.clone());
        Ok(member)
    }

    async fn remove_member(&self, id: ObjectId) -> Result<(), AppError> {
        self.lock().members.retain(|m| m.id != Some(id));
        Ok(())
    }

    async fn record_visit(&self, id: ObjectId, ip: Option<&str>) -> Result<Option<MemberInfo>, AppError> {
        let mut state = self.lock();
        let Some(member) = state.members.iter_mut().find(|m| m.id == Some(id)) else {
            return Ok(None);
        };

        let now = DateTime::now();
        member.visit_count += 1;
        member.last_time = Some(now);
        member.last_ip = ip.map(str::to_string);
        member.updated_at = now;
        Ok(Some(member.clone()))
    }

    async fn list_members(&self, filter: &MemberListFilter) -> Result<Vec<MemberInfo>, AppError> {
        let state = self.lock();
        let mut members: Vec<MemberInfo> = state
            .members
            .iter()
            .filter(|m| m.status != STATUS_DELETED)
            .filter(|m| Self::matches_keyword(m, filter.keyword.as_deref()))
            .cloned()
            .collect();

        // 최신순. 같은 시각이면 나중에 추가된 회원이 먼저
        members.reverse();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(members
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn count_members(&self, keyword: Option<&str>) -> Result<u64, AppError> {
        Ok(self
            .lock()
            .members
            .iter()
            .filter(|m| m.status != STATUS_DELETED && Self::matches_keyword(m, keyword))
            .count() as u64)
    }

    async fn update_profile(
        &self,
        id: ObjectId,
        profile: &MemberProfileFields,
    ) -> Result<Option<MemberInfo>, AppError> {
        let profile = profile.clone();
        Ok(self.update_active(id, move |member| {
            member.realname = profile.realname;
            member.nickname = profile.nickname;
            member.head_portrait = profile.head_portrait;
            member.sex = profile.sex;
            member.mobile_phone = profile.mobile_phone;
            member.email = profile.email;
        }))
    }

    async fn update_credentials(
        &self,
        id: ObjectId,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<MemberInfo>, AppError> {
        Ok(self.update_active(id, |member| {
            member.username = Some(username.to_string());
            member.password_hash = Some(password_hash.to_string());
        }))
    }

    async fn set_status(&self, id: ObjectId, status: i32) -> Result<Option<MemberInfo>, AppError> {
        Ok(self.update_active(id, |member| member.status = status))
    }
}
