//! MongoDB 연결 관리 모듈
//!
//! `MONGODB_URI`와 `DATABASE_NAME` 환경 변수로 연결하며,
//! 기동 시 `ping` 명령으로 연결 상태를 확인합니다.
//!
//! ```rust,ignore
//! let database = Database::new().await?;
//! let members = database.get_database().collection::<MemberInfo>("member_info");
//! ```

use log::info;
use mongodb::{Client, options::ClientOptions};

use crate::config::DataStoreConfig;

/// MongoDB 클라이언트와 데이터베이스 이름을 묶은 래퍼
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 새 연결을 생성합니다.
    ///
    /// # Errors
    ///
    /// * URI 파싱 실패
    /// * 서버 연결 또는 `ping` 실패
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let database_name = DataStoreConfig::database_name();

        let mut client_options = ClientOptions::parse(DataStoreConfig::mongodb_uri()).await?;
        client_options.app_name = Some("member_auth_gateway".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self { client, database_name })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
