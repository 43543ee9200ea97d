//! AdminGuard 키 검증 로직
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, forward_ready};
use actix_web::{Error, ResponseError};
use futures_util::future::LocalBoxFuture;
use subtle::ConstantTimeEq;

use crate::errors::errors::AppError;
use crate::middlewares::admin_middleware::ADMIN_KEY_HEADER;

pub struct AdminGuardService<S> {
    pub service: Rc<S>,
    pub api_key: Option<Rc<str>>,
}

impl<S, B> Service<ServiceRequest> for AdminGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = check_admin_key(&req, self.api_key.as_deref()) {
            log::warn!("관리자 API 거부: {} {} ({})", req.method(), req.path(), err);
            let response = err.error_response();
            let (req, _) = req.into_parts();
            let res = ServiceResponse::new(req, response).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let service = self.service.clone();
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn check_admin_key(req: &ServiceRequest, expected: Option<&str>) -> Result<(), AppError> {
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("관리자 키가 필요합니다".to_string()))?;

    let expected = expected
        .ok_or_else(|| AppError::AuthorizationError("관리자 API가 비활성화되어 있습니다".to_string()))?;

    if bool::from(expected.as_bytes().ct_eq(provided.trim().as_bytes())) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError("관리자 키가 올바르지 않습니다".to_string()))
    }
}
