use crate::cache::{ObjectCache, create_cache};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use crate::models::seed::SeedData;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

// 随机字母数字密码
fn generate_random_password(length: usize) -> String {
    use rand::{Rng, distr::Alphanumeric};
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 读取种子文件，并把明文密码替换为哈希
pub fn load_seed_file(path: &str) -> Result<SeedData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SchoolError::file_operation(format!("读取种子文件 {path} 失败: {e}")))?;
    let mut data: SeedData = serde_json::from_str(&content)?;

    for user in &mut data.users {
        user.password = hash_password(&user.password)?;
    }

    Ok(data)
}

/// 导入种子数据
/// 仅在配置了种子文件且数据库中没有学生时执行
async fn seed_directory(storage: &Arc<dyn Storage>) {
    let Some(path) = AppConfig::get().seed_path() else {
        return;
    };

    match storage.count_students().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} student(s), skipping seed import", count);
            return;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Failed to count students: {}, skipping seed import", e);
            return;
        }
    }

    let data = match load_seed_file(path) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load seed file {}: {}", path, e);
            return;
        }
    };

    let summary = format!(
        "{} users, {} instructors, {} students, {} classes",
        data.users.len(),
        data.instructors.len(),
        data.students.len(),
        data.classes.len()
    );

    match storage.import_seed(data).await {
        Ok(()) => info!("Seed data imported from {}: {}", path, summary),
        Err(e) => error!("Seed import failed, nothing was written: {}", e),
    }
}

/// 数据库中没有任何用户时创建 `admin` 账号
///
/// 密码取自 `ADMIN_PASSWORD`，未设置时随机生成并写入日志。
async fn ensure_admin(storage: &Arc<dyn Storage>) -> Result<Option<User>> {
    let users = storage.count_users().await?;
    if users > 0 {
        debug!("Database already has {} user(s), skipping admin seed", users);
        return Ok(None);
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.trim().is_empty() => password,
        _ => {
            let generated = generate_random_password(16);
            warn!(
                "ADMIN_PASSWORD is not set, generated admin password: {} (change it after first login)",
                generated
            );
            generated
        }
    };

    let admin = storage
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            password: hash_password(&password)?,
            role: UserRole::Admin,
        })
        .await?;
    Ok(Some(admin))
}

/// 准备服务器启动的上下文：存储、初始数据与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时保留已有 provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    info!("Storage backend initialized and migrations completed");

    // 种子数据可能自带 admin，先于默认管理员导入
    seed_directory(&storage).await;
    match ensure_admin(&storage).await {
        Ok(Some(admin)) => info!("Default admin account created (ID: {})", admin.id),
        Ok(None) => {}
        Err(e) => warn!("Failed to create default admin account: {}", e),
    }

    let cache = create_cache(config.cache.memory.max_capacity, config.cache.default_ttl);

    Ok(StartupContext { storage, cache })
}
