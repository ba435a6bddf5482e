//! LocalStorage 会话存储
//!
//! 使用 `gloo-storage` 以 JSON 形式读写会话。

use gloo_storage::{LocalStorage, Storage};
use storyfeed::error::{StoryError, StoryResult};
use storyfeed::session::SessionStore;
use storyfeed_shared::Session;
use storyfeed::log_warn;

/// 保存在单个键下的会话
pub struct LocalSessionStore {
    key: String,
}

impl LocalSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SessionStore for LocalSessionStore {
    fn get(&self) -> Session {
        // 键不存在或内容损坏都按未登录处理
        LocalStorage::get::<Session>(&self.key).unwrap_or_default()
    }

    fn set(&self, session: &Session) -> StoryResult<()> {
        LocalStorage::set(&self.key, session).map_err(|e| {
            log_warn!("[Storage] failed to persist session: {}", e);
            StoryError::transport(format!("Could not save session: {}", e)).in_op("session.set")
        })
    }

    fn clear(&self) {
        LocalStorage::delete(&self.key);
    }
}
