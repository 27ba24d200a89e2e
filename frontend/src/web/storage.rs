//! Token 持久化模块
//!
//! 会话 token 是唯一落盘的本地状态，固定键名单值。

use gloo_storage::{LocalStorage, Storage};

const STORAGE_TOKEN_KEY: &str = "servitec_token";

/// 会话 token 的存取封装
pub struct TokenStore;

impl TokenStore {
    /// 读取持久化的 token
    ///
    /// 键不存在或存储不可用时返回 `None`。
    pub fn get() -> Option<String> {
        LocalStorage::get(STORAGE_TOKEN_KEY).ok()
    }

    /// 持久化 token
    pub fn set(token: &str) -> bool {
        LocalStorage::set(STORAGE_TOKEN_KEY, token).is_ok()
    }

    /// 清除持久化的 token
    pub fn clear() {
        LocalStorage::delete(STORAGE_TOKEN_KEY);
    }
}
