//! # Component Registry - 싱글톤 의존성 주입
//!
//! 게이트웨이의 리포지토리/서비스 싱글톤을 관리하는 `ServiceLocator`입니다.
//!
//! ## 등록 방식
//!
//! - **인프라 컴포넌트**: `Database`, `RedisClient` 등은
//!   `main`에서 [`ServiceLocator::set`]으로 직접 등록합니다.
//! - **리포지토리**: `#[repository]` 매크로가 `instance()`와 [`RepositoryRegistration`]을
//!   생성합니다. `db` 필드에는 `Database`가 자동 주입됩니다.
//! - **서비스**: `Arc<dyn Trait>` 필드는 매크로로 주입할 수 없으므로 각 모듈이
//!   `inventory::submit!`으로 [`ComponentRegistration`]을 제출합니다. 첫
//!   [`ServiceLocator::get`] 호출 시 생성자가 실행되어 싱글톤으로 보관됩니다.
//!
//! ```text
//! main()
//!  ├─ ServiceLocator::set(Arc<Database>)
//!  ├─ ServiceLocator::set(Arc<RedisClient>)
//!  └─ ServiceLocator::initialize_all()
//!       ├─ 1. Repository 생성 (MemberRepository)
//!       └─ 2. Service 생성 (AccessTokenService, MiniProgramService ...)
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! #[repository(name = "member", collection = "member_info")]
//! pub struct MemberRepository {
//!     db: Arc<Database>,
//! }
//!
//! inventory::submit! {
//!     ComponentRegistration {
//!         name: "access_token_service",
//!         type_id: TypeId::of::<AccessTokenService>,
//!         constructor: || {
//!             let members: Arc<dyn MemberStore> = MemberRepository::instance();
//!             Arc::new(AccessTokenService::new(cache, members, settings)) as Arc<dyn Any + Send + Sync>
//!         },
//!     }
//! }
//!
//! let tokens = ServiceLocator::get::<AccessTokenService>();
//! ```
//!
//! 생성자는 잠금 밖에서 실행되므로 생성자 내부에서 다른 컴포넌트를
//! `get`으로 가져올 수 있습니다. 생성 중인 타입을 다시 요청하면
//! 순환 참조로 판단하고 패닉합니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// `#[repository]` 매크로가 구현하는 리포지토리 인터페이스
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    /// 매크로의 `collection` 인자로 지정한 기본 컬렉션
    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 inventory로 제출하는 등록 정보
///
/// 생성자는 매크로가 만든 `instance()`를 호출하고 `Box<Arc<T>>`를 반환합니다.
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(RepositoryRegistration);

/// 직접 제출하는 서비스 등록 정보
pub struct ComponentRegistration {
    /// 로그/터미널 출력용 이름 (예: `mini_program_service`)
    pub name: &'static str,
    /// 생성되는 구체 타입의 `TypeId`
    pub type_id: fn() -> TypeId,
    pub constructor: fn() -> Arc<dyn Any + Send + Sync>,
}

inventory::collect!(ComponentRegistration);

static REGISTRATION_CACHE: Lazy<HashMap<TypeId, &'static ComponentRegistration>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<ComponentRegistration>()
            .map(|registration| ((registration.type_id)(), registration))
            .collect();

        print_cache_initialized("Component", cache.len());
        cache
    });

/// 전역 싱글톤 컨테이너
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    /// 등록된 인스턴스를 가져오거나 생성합니다.
    ///
    /// # Panics
    ///
    /// * 등록되지 않은 타입을 요청한 경우
    /// * 순환 의존성이 감지된 경우
    ///
    /// 컴포넌트 구성 오류는 기동 시점(`initialize_all`)에 드러나도록 패닉으로 처리합니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        match Self::try_get::<T>() {
            Some(instance) => instance,
            None => panic!(
                "Component not found: {}. Register it with inventory::submit! or ServiceLocator::set(). #[repository] types are reached through instance()",
                std::any::type_name::<T>()
            ),
        }
    }

    /// 인스턴스를 가져오거나 생성합니다. 등록 정보가 없으면 `None`을 반환합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::lookup::<T>(type_id) {
            return Some(instance);
        }

        let registration = *REGISTRATION_CACHE.get(&type_id)?;

        {
            let mut initializing = LOCATOR
                .initializing
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !initializing.insert(type_id) {
                log::error!("순환 의존성 감지: {}", type_name);
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        let created = std::panic::catch_unwind(registration.constructor);

        LOCATOR
            .initializing
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&type_id);

        let created = match created {
            Ok(instance) => instance,
            Err(_) => panic!("Failed to create instance for {}", type_name),
        };

        let mut instances = LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // 동시에 생성된 경우 먼저 저장된 인스턴스를 사용
        let stored = instances.entry(type_id).or_insert(created).clone();

        match stored.downcast::<T>() {
            Ok(instance) => Some(instance),
            Err(_) => panic!("Type mismatch for component: {}", registration.name),
        }
    }

    fn lookup<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        let instances = LOCATOR
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        instances
            .get(&type_id)
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// 인스턴스를 직접 등록합니다. 같은 타입이 이미 있으면 교체합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        let clean_name = type_name.rsplit("::").next().unwrap_or(type_name);

        log::debug!("📦 Registering: {}", clean_name);

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 미리 생성합니다.
    ///
    /// 인프라 컴포넌트(`Database`, `RedisClient`)가 `set`으로 등록된 뒤에 호출해야 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repo_registrations: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repo_registrations.len();

        if repo_count > 0 {
            print_step_start(1, "Creating Repository instances");

            for registration in repo_registrations {
                print_sub_task(registration.name, "Creating...");
                let _instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }

            print_step_complete(1, "Repository instances created", repo_count);
        }

        let service_registrations: Vec<_> = inventory::iter::<ComponentRegistration>().collect();
        let service_count = service_registrations.len();

        if service_count > 0 {
            print_step_start(2, "Creating Service instances");

            for registration in service_registrations {
                print_sub_task(registration.name, "Creating...");
                Self::warm_one(registration);
                print_sub_task(registration.name, "✓ Created");
            }

            print_step_complete(2, "Service instances created", service_count);
        }

        print_final_summary(repo_count, service_count);
        Ok(())
    }

    fn warm_one(registration: &'static ComponentRegistration) {
        let type_id = (registration.type_id)();

        let exists = LOCATOR
            .instances
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&type_id);

        if !exists {
            let created = (registration.constructor)();
            LOCATOR
                .instances
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .entry(type_id)
                .or_insert(created);
        }
    }
}
