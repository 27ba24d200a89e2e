//! API 客户端模块
//!
//! 带 Bearer 认证的 HTTP 封装：统一注入头部、序列化请求体、
//! 把非 2xx 响应整形成可模式匹配的 [`ApiError`]。
//! 单次尝试，无重试、无超时、无退避 —— 失败同步向调用方传播。

use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use servitec_shared::protocol::{ApiRequest, ErrorBody, HttpMethod, REPORT_PDF_PATH};

use crate::config;
use crate::web::TokenStore;

// =========================================================
// 错误类型
// =========================================================

/// 客户端可见的请求失败分类
///
/// - `Network`: 没有拿到响应（传输层失败、请求构建失败）
/// - `Status`: 非 2xx 响应，携带状态码和容错解析后的结构化负载
/// - `Decode`: 2xx 响应但响应体无法解码成目标类型
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Network(String),
    Status { status: u16, body: Option<ErrorBody> },
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 ⇒ 会话已失效，调用方走强制注销路径
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// 给 UI 的一行文案：校验负载的第一条消息优先，
    /// 其次是后端的 message，最后是通用提示。
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body
                .first_message()
                .map(str::to_string)
                .or_else(|| body.message.clone())
                .unwrap_or_else(|| "Ocurrió un error en el servidor".to_string()),
            ApiError::Status { status, body: None } => {
                format!("Error del servidor ({})", status)
            }
            ApiError::Network(_) => "No se pudo conectar con el servidor".to_string(),
            ApiError::Decode(_) => "Respuesta inesperada del servidor".to_string(),
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "[NETWORK] {}", msg),
            ApiError::Status { status, body } => {
                write!(f, "[HTTP {}]", status)?;
                if let Some(msg) = body.as_ref().and_then(|b| b.message.as_deref()) {
                    write!(f, " {}", msg)?;
                }
                Ok(())
            }
            ApiError::Decode(msg) => write!(f, "[DECODE] {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// =========================================================
// 解码辅助（纯函数，便于测试）
// =========================================================

/// 2xx 响应体解码：空体或非 JSON 体按 `null` 处理，
/// 只有目标类型不接受 `null` 时才报 `Decode`。
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return serde_json::from_str("null").map_err(|e| ApiError::Decode(e.to_string()));
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        // 非 JSON 体降级为 null，与空体同路径
        Err(first_err) => serde_json::from_str("null")
            .map_err(|_| ApiError::Decode(first_err.to_string())),
    }
}

/// 非 2xx 响应整形：结构化负载解析失败时以 `None` 代替
fn error_from_parts(status: u16, text: &str) -> ApiError {
    ApiError::Status {
        status,
        body: serde_json::from_str::<ErrorBody>(text).ok(),
    }
}

// =========================================================
// 客户端
// =========================================================

/// ServiTec API 客户端
///
/// 持有 base URL 和可选的 Bearer token。token 解析顺序：
/// 显式传入（`with_token`）优先，否则从持久化存储读取。
#[derive(Clone, Debug, PartialEq)]
pub struct ServiTecApi {
    base_url: String,
    token: Option<String>,
}

impl ServiTecApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    /// 从持久化存储解析 token（常规路径）
    pub fn from_storage() -> Self {
        Self::new(config::BACKEND_URL, TokenStore::get())
    }

    /// 显式 token 覆盖（登录/恢复期间状态尚未可见时使用）
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(config::BACKEND_URL, Some(token.into()))
    }

    /// 无认证客户端（登录、注册）
    pub fn anonymous() -> Self {
        Self::new(config::BACKEND_URL, None)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn builder(&self, method: HttpMethod, url: &str) -> RequestBuilder {
        let builder = match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Delete => Request::delete(url),
            HttpMethod::Patch => Request::patch(url),
        };
        let builder = builder.header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// 发送一个类型化请求
    ///
    /// `Content-Type` 只在携带请求体时设置。
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let url = self.url(&request.path());
        let builder = self.builder(R::METHOD, &url);

        let prepared = match request.body() {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body)
                .map_err(|e| ApiError::Network(e.to_string()))?,
            None => builder
                .build()
                .map_err(|e| ApiError::Network(e.to_string()))?,
        };

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !response.ok() {
            return Err(error_from_parts(status, &text));
        }

        decode_body(&text)
    }

    /// 下载 PDF 报表（二进制，不走 JSON 解码）
    pub async fn download_report_pdf(&self) -> Result<Vec<u8>, ApiError> {
        let url = self.url(REPORT_PDF_PATH);
        let builder = self.builder(HttpMethod::Get, &url);

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_parts(status, &text));
        }

        response
            .binary()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use servitec_shared::Ticket;

    #[test]
    fn error_500_con_mensaje() {
        let err = error_from_parts(500, r#"{"message":"fail"}"#);
        assert_eq!(err.status(), Some(500));
        match err {
            ApiError::Status { body: Some(body), .. } => {
                assert_eq!(body.message.as_deref(), Some("fail"));
            }
            other => panic!("inesperado: {:?}", other),
        }
    }

    #[test]
    fn error_sin_cuerpo_estructurado() {
        let err = error_from_parts(502, "<html>Bad Gateway</html>");
        match &err {
            ApiError::Status { status: 502, body: None } => {}
            other => panic!("inesperado: {:?}", other),
        }
        assert_eq!(err.user_message(), "Error del servidor (502)");
    }

    #[test]
    fn error_422_expone_primer_mensaje_de_campo() {
        let err = error_from_parts(
            422,
            r#"{"message":"Datos inválidos","errors":{"email":["El email ya está registrado"]}}"#,
        );
        assert_eq!(err.user_message(), "El email ya está registrado");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn error_401_es_no_autorizado() {
        let err = error_from_parts(401, r#"{"message":"Unauthenticated."}"#);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn cuerpo_vacio_decodifica_como_null() {
        let value: Value = decode_body("").unwrap();
        assert!(value.is_null());
        // unit también acepta null
        decode_body::<()>("  ").unwrap();
    }

    #[test]
    fn cuerpo_no_json_degrada_a_null() {
        let value: Value = decode_body("OK").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn cuerpo_no_json_falla_si_el_tipo_no_acepta_null() {
        let err = decode_body::<Vec<Ticket>>("<html></html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn base_url_sin_barra_final() {
        let api = ServiTecApi::new("http://localhost:8000/api/", None);
        assert_eq!(api.url("/tickets"), "http://localhost:8000/api/tickets");
        assert_eq!(api.url("tickets"), "http://localhost:8000/api/tickets");
    }
}
