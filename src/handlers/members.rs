//! # Member Admin HTTP Handlers
//!
//! 모든 경로는 `AdminGuard`(`X-Admin-Key`) 뒤에 있습니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/api/v1/admin/members?page=&page_size=&keyword=` | 목록 (페이지 버튼 최대 5개) |
//! | `POST` | `/api/v1/admin/members` | 생성 |
//! | `GET` | `/api/v1/admin/members/{id}` | 조회 |
//! | `PUT` | `/api/v1/admin/members/{id}` | 프로필 수정 |
//! | `PUT` | `/api/v1/admin/members/{id}/credentials` | 계정/비밀번호 변경 |
//! | `PUT` | `/api/v1/admin/members/{id}/status` | 활성/비활성 |
//! | `DELETE` | `/api/v1/admin/members/{id}` | 삭제 (status = -1) |

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::dto::ApiResult;
use crate::domain::dto::members::{
    CreateMemberRequest, MemberListQuery, MemberProfileRequest, UpdateCredentialsRequest, UpdateStatusRequest,
};
use crate::errors::errors::AppError;
use crate::services::members::MemberAdminService;

#[get("")]
pub async fn list_members(query: web::Query<MemberListQuery>) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    let page = service.list(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(page)))
}

#[post("")]
pub async fn create_member(payload: web::Json<CreateMemberRequest>) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    let member = service.create(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResult::success(member)))
}

#[get("/{member_id}")]
pub async fn get_member(member_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    let member = service.get(&member_id).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(member)))
}

#[put("/{member_id}")]
pub async fn update_member(
    member_id: web::Path<String>,
    payload: web::Json<MemberProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    let member = service.update(&member_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(member)))
}

#[put("/{member_id}/credentials")]
pub async fn update_credentials(
    member_id: web::Path<String>,
    payload: web::Json<UpdateCredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    let member = service.update_credentials(&member_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(member)))
}

#[put("/{member_id}/status")]
pub async fn update_status(
    member_id: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    let member = service.set_status(&member_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success(member)))
}

#[delete("/{member_id}")]
pub async fn delete_member(member_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = MemberAdminService::instance();
    service.delete(&member_id).await?;

    Ok(HttpResponse::Ok().json(ApiResult::success_with_message((), "회원이 삭제되었습니다")))
}
