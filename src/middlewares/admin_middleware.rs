//! 관리자 API 키 미들웨어
//!
//! `X-Admin-Key` 헤더를 설정된 키와 상수 시간으로 비교합니다.
//!
//! | 상황 | 응답 |
//! |------|------|
//! | 헤더 없음 | 401 |
//! | 키 불일치 | 403 |
//! | 서버에 키가 설정되지 않음 | 403 (모든 요청 거부) |

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::config::AdminConfig;
use crate::middlewares::admin_inner::AdminGuardService;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

#[derive(Clone)]
pub struct AdminGuard {
    api_key: Option<Rc<str>>,
}

impl AdminGuard {
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty()).map(Rc::from);
        Self { api_key }
    }

    /// `ADMIN_API_KEY` 환경 변수로 생성합니다.
    pub fn from_env() -> Self {
        let guard = Self::new(AdminConfig::api_key());
        if guard.api_key.is_none() {
            log::warn!("ADMIN_API_KEY가 설정되지 않아 관리자 API가 모두 거부됩니다");
        }
        guard
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardService {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        }))
    }
}
