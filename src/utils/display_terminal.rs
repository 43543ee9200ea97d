//! 기동 과정 터미널 출력
//!
//! 컴포넌트 레지스트리 초기화와 서버 기동 정보를 박스/트리 형태로 출력합니다.
//!
//! ```text
//! ╔══════════════════════════════════════════════════╗
//! ║         🔄 INITIALIZING SERVICE REGISTRY         ║
//! ╚══════════════════════════════════════════════════╝
//! → Step 1: Creating Repository instances
//!    ├─ member_repository: ✓ Created
//! ✓ Step 1: Repository instances created (1 items)
//! ```

const BOX_WIDTH: usize = 50;

/// 박스로 둘러싼 가운데 정렬 제목
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);

    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 레지스트리 초기화 요약
pub fn print_final_summary(repos: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Repositories: {}", repos);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repos + services);
    println!();
}

pub fn print_cache_initialized(cache_type: &str, count: usize) {
    println!("   ├─ {} Registry: {} registrations", cache_type, count);
}

/// 서버 주소와 주요 엔드포인트를 출력합니다.
pub fn print_server_banner(bind_address: &str, profile: &str) {
    print_boxed_title("🚀 MEMBER AUTH GATEWAY");
    println!("   ├─ Profile: {}", profile);
    println!("   ├─ Listen: http://{}", bind_address);
    println!("   ├─ Health: http://{}/health", bind_address);
    println!("   ├─ Mini-program: http://{}/api/v1/mini-program", bind_address);
    println!("   └─ Admin: http://{}/api/v1/admin/members", bind_address);
    println!();
}
