use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, TutorHubError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{NewAdminProfile, NewUser};
use crate::sms::{SmsSender, create_sms_sender};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@tutorhub.local";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub sms: Arc<dyn SmsSender>,
}

async fn try_cache_plugin(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = try_cache_plugin(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = try_cache_plugin("moka").await {
            return Ok(cache);
        }
    }

    Err(TutorHubError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 数据库中没有任何用户时创建默认管理员（账号 + 管理员档案）
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| {
            let pwd = generate_random_password(16);
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", pwd);
            warn!("  Please save this password or set ADMIN_PASSWORD env var");
            warn!("==========================================================");
            pwd
        });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let user = NewUser {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password_hash,
        role: UserRole::Admin,
    };
    let profile = NewAdminProfile {
        full_name: "Administrator".to_string(),
        phone: None,
        position: Some("System administrator".to_string()),
    };

    match storage.create_admin_user(user, profile).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文：存储（含迁移）、默认管理员、缓存与短信发送器
pub async fn prepare_server_startup() -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| TutorHubError::crypto("Failed to install rustls crypto provider"))?;

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    let sms = create_sms_sender();

    Ok(StartupContext {
        storage,
        cache,
        sms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_length_and_charset() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.chars().count(), 16);
        assert!(pwd.chars().all(|c| c.is_ascii_graphic()));
    }
}
