//! 应用配置
//!
//! 后端地址在编译期确定，运行时没有其它环境变量。

/// Backend base URL（含 API 根前缀）
/// - 开发环境默认 http://localhost:8000/api
/// - 生产构建通过 SERVITEC_BACKEND_URL 注入
pub const BACKEND_URL: &str = match option_env!("SERVITEC_BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api",
};
