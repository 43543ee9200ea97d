//! 회원 인증 게이트웨이 메인 애플리케이션
//!
//! MongoDB, Redis 연결을 설정하고 서비스를 초기화한 뒤 Actix-web 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use member_auth_gateway::caching::redis::RedisClient;
use member_auth_gateway::config::{Environment, RateLimitConfig, ServerConfig};
use member_auth_gateway::core::registry::ServiceLocator;
use member_auth_gateway::db::Database;
use member_auth_gateway::repositories::members::MemberRepository;
use member_auth_gateway::routes::configure_all_routes;
use member_auth_gateway::utils::display_terminal::print_server_banner;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let profile = load_env_file();
    init_logging();

    info!("🚀 회원 인증 게이트웨이 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    if let Err(e) = ServiceLocator::initialize_all().await {
        error!("서비스 초기화 실패: {}", e);
        return Err(io::Error::other(e.to_string()));
    }

    if let Err(e) = MemberRepository::instance().create_indexes().await {
        error!("인덱스 생성 실패: {}", e);
        return Err(io::Error::other(e.to_string()));
    }

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(&profile).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어 순서: Rate Limiting → CORS → 요청 로그 → 경로 정규화
///
/// # Environment Variables
///
/// * `SERVER_HOST` / `SERVER_PORT` - 바인딩 주소 (기본값: 127.0.0.1:8080)
/// * `SERVER_WORKERS` - 워커 스레드 수 (기본값: 4)
async fn start_http_server(profile: &str) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    let per_second = RateLimitConfig::per_second();
    let burst_size = RateLimitConfig::burst_size();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(per_second)
        .burst_size(burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!("🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개", per_second, burst_size);
    print_server_banner(&bind_address, profile);

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// `PROFILE`에 맞는 .env 파일을 로드하고 프로필 이름을 반환합니다
///
/// * `PROFILE=dev` - .env.dev (기본값)
/// * `PROFILE=prod` - .env.prod
/// * 기타 - .env
fn load_env_file() -> String {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    // 로거 초기화 전이므로 결과는 stderr로 출력
    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ".env.prod"),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ".env.dev"),
        _ => dotenv().map(|_| ".env"),
    };

    match loaded {
        Ok(file) => eprintln!("{} 파일 로드 됨 (profile: {})", file, profile),
        Err(e) => eprintln!("환경 파일 로드 실패 (profile: {}): {}", profile, e),
    }

    profile
}

/// `RUST_LOG` 기준으로 로거를 초기화합니다
///
/// 기본값은 운영 환경 "info", 그 외 "info,actix_web=debug"
fn init_logging() {
    let default_filter = if Environment::current().is_production() {
        "info"
    } else {
        "info,actix_web=debug"
    };
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));
}

/// MongoDB와 Redis 연결을 초기화합니다
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new().await.map_err(|e| {
        error!("데이터베이스 연결 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    info!("✅ MongoDB 연결 성공: {}", database.database_name());

    let redis_client = RedisClient::new().await.map_err(|e| {
        error!("Redis 연결 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// CORS 설정
///
/// 허용 Origin은 `CORS_ALLOWED_ORIGINS`(쉼표 구분)로 지정하며,
/// 지정하지 않으면 로컬 개발 주소만 허용합니다.
fn configure_cors() -> Cors {
    let origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-admin-key"),
        ])
        .max_age(3600)
}
