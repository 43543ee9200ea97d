//! API 라우트 설정 모듈
//!
//! | 범위 | 인증 |
//! |------|------|
//! | `/api/v1/mini-program/*` | 없음 |
//! | `/api/v1/access-token/*` | refresh token / Bearer |
//! | `/api/v1/admin/members*` | `X-Admin-Key` |
//! | `/health` | 없음 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_web::{HttpResponse, get, web};
use serde_json::json;

use crate::handlers;
use crate::middlewares::AdminGuard;

/// 모든 라우트를 등록합니다. 관리자 키는 `ADMIN_API_KEY`에서 읽습니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_mini_program_routes(cfg);
    configure_access_token_routes(cfg);
    configure_admin_routes(cfg, AdminGuard::from_env());
}

/// 미니프로그램 로그인 라우트
///
/// ```bash
/// curl "http://localhost:8080/api/v1/mini-program/session-key?code=081xYz..."
///
/// curl -X POST http://localhost:8080/api/v1/mini-program/decode \
///   -H "Content-Type: application/json" \
///   -d '{"auth_key":"...","rawData":"...","signature":"...","iv":"...","encryptedData":"..."}'
/// ```
pub fn configure_mini_program_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/mini-program")
            .service(handlers::mini_program::session_key)
            .service(handlers::mini_program::decode)
            .service(handlers::mini_program::find_token_by_openid),
    );
}

pub fn configure_access_token_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/access-token")
            .service(handlers::access_token::refresh)
            .service(handlers::access_token::verify),
    );
}

/// 관리자 회원 관리 라우트
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig, guard: AdminGuard) {
    cfg.service(
        web::scope("/api/v1/admin/members")
            .wrap(guard)
            .service(handlers::members::list_members)
            .service(handlers::members::create_member)
            .service(handlers::members::get_member)
            .service(handlers::members::update_member)
            .service(handlers::members::update_credentials)
            .service(handlers::members::update_status)
            .service(handlers::members::delete_member),
    );
}

/// 로드밸런서/모니터링용 헬스체크
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "member_auth_gateway",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z"
/// }
/// ```
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "member_auth_gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "login": "mini_program"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use serde_json::Value;

    use crate::handlers::test_support;
    use crate::middlewares::ADMIN_KEY_HEADER;

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "member_auth_gateway");
    }

    #[actix_web::test]
    async fn test_routes_are_wired() {
        test_support::install();
        let app = test::init_service(App::new().configure(|cfg| {
            cfg.service(health_check);
            configure_mini_program_routes(cfg);
            configure_access_token_routes(cfg);
            configure_admin_routes(cfg, AdminGuard::new(Some(test_support::ADMIN_KEY.to_string())));
        }))
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/mini-program/session-key?code=code-routes")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

        let req = test::TestRequest::post().uri("/api/v1/access-token/verify").to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/members")
            .insert_header((ADMIN_KEY_HEADER, test_support::ADMIN_KEY))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    }
}
