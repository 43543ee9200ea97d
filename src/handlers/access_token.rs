//! 액세스 토큰 갱신/검증 핸들러
//!
//! - `POST /api/v1/access-token/refresh` - refresh token으로 새 토큰 쌍 발급 (이전 쌍은 폐기)
//! - `POST /api/v1/access-token/verify` - `Authorization: Bearer` 토큰 검증

use actix_web::{Either, HttpRequest, HttpResponse, post, web};
use validator::Validate;

use crate::domain::dto::ApiResult;
use crate::domain::dto::tokens::RefreshRequest;
use crate::errors::errors::AppError;
use crate::services::auth::AccessTokenService;
use crate::utils::string_utils::first_validation_message;

#[post("/refresh")]
pub async fn refresh(
    payload: Either<web::Json<RefreshRequest>, web::Form<RefreshRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    request
        .validate()
        .map_err(|errors| AppError::ValidationError(first_validation_message(&errors, &["refresh_token"])))?;

    let token_service = AccessTokenService::instance();
    let token = token_service.refresh(request.refresh_token.trim()).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(token)))
}

#[post("/verify")]
pub async fn verify(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let access_token = AccessTokenService::extract_bearer_token(auth_header)?;

    let token_service = AccessTokenService::instance();
    let verification = token_service.verify(access_token).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(verification)))
}
