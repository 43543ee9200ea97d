//! # Mini-Program Login HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/api/v1/mini-program/session-key?code=` | 로그인 코드 → `auth_key` |
//! | `POST` | `/api/v1/mini-program/decode` | 암호화 사용자 정보 → 액세스 토큰 |
//! | `POST` | `/api/v1/mini-program/find-token-by-openid` | openid → 액세스 토큰 |
//!
//! POST 본문은 JSON과 `application/x-www-form-urlencoded`를 모두 받습니다.
//! 미니프로그램의 `wx.request` 기본 Content-Type이 환경마다 달라서입니다.

use actix_web::{Either, HttpRequest, HttpResponse, get, post, web};

use crate::domain::dto::ApiResult;
use crate::domain::dto::mini_program::{FindTokenRequest, MiniProgramLoginRequest, SessionKeyQuery};
use crate::errors::errors::AppError;
use crate::services::auth::MiniProgramService;

type JsonOrForm<T> = Either<web::Json<T>, web::Form<T>>;

fn into_payload<T>(payload: JsonOrForm<T>) -> T {
    match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

/// 프록시 헤더(`Forwarded`, `X-Forwarded-For`)를 고려한 클라이언트 IP
pub(crate) fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
}

#[get("/session-key")]
pub async fn session_key(query: web::Query<SessionKeyQuery>) -> Result<HttpResponse, AppError> {
    let service = MiniProgramService::instance();
    let response = service.exchange_code(&query.code).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(response)))
}

/// `auth_key`로 캐시된 세션을 찾아 사용자 정보를 복호화하고 로그인합니다.
///
/// 처음 로그인하는 openid는 회원을 새로 만듭니다.
#[post("/decode")]
pub async fn decode(req: HttpRequest, payload: JsonOrForm<MiniProgramLoginRequest>) -> Result<HttpResponse, AppError> {
    let request = into_payload(payload);
    let ip = client_ip(&req);

    let service = MiniProgramService::instance();
    let token = service.decode_and_login(&request, ip.as_deref()).await?;

    log::info!("미니프로그램 로그인: member_id={}", token.member.id);
    Ok(HttpResponse::Ok().json(ApiResult::success(token)))
}

#[post("/find-token-by-openid")]
pub async fn find_token_by_openid(
    req: HttpRequest,
    payload: JsonOrForm<FindTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let request = into_payload(payload);
    let ip = client_ip(&req);

    let service = MiniProgramService::instance();
    let token = service.find_token_by_openid(&request.openid, ip.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(token)))
}
