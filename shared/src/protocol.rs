//! API 协议定义
//!
//! 每个后端端点对应一个请求类型，通过 `ApiRequest` trait 声明
//! 方法、路径和响应类型。真正的业务逻辑、持久化和校验都在
//! 后端完成，这里只描述 wire 形状。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{EstadoInterno, EstadoUsuario, Prioridad, Role, Ticket, User};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// GET/DELETE 不携带请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// 与固定 `PATH` 常量不同，`path()` 是实例方法：
/// `/tickets/{id}` 这类端点需要把参数拼进路径里。
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path (or suffix), including any query string.
    fn path(&self) -> String;

    /// JSON 请求体。默认：有体方法序列化自身，其余无体。
    fn body(&self) -> Option<String> {
        if Self::METHOD.has_body() {
            serde_json::to_string(self).ok()
        } else {
            None
        }
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

/// 登录
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/login".to_string()
    }
}

/// 登录响应
///
/// 后端把 `role` 作为 user 的兄弟字段返回，而不是嵌在 user 里。
/// `merged_user` 负责把它合并回去 —— 这是对 API 形状的
/// 刻意客户端修正，顶层值始终获胜。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub role: Option<Role>,
    pub user: User,
}

impl LoginResponse {
    pub fn merged_user(&self) -> User {
        let mut user = self.user.clone();
        if let Some(role) = self.role {
            user.role = role;
        }
        user
    }
}

/// 注册（不自动登录，调用方注册成功后应跳回登录页）
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub password: String,
    pub password_confirmation: String,
}

impl ApiRequest for RegisterRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/signup".to_string()
    }
}

/// 注销（服务端会话失效，尽力而为）
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/logout".to_string()
    }

    // unit struct 会序列化成 `null`，这里显式不发送请求体
    fn body(&self) -> Option<String> {
        None
    }
}

/// 当前认证用户（会话恢复时使用）
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/user".to_string()
    }
}

// =========================================================
// 工单 (Tickets)
// =========================================================

/// 工单集合，服务端按调用者角色决定可见范围
#[derive(Debug, Serialize, Deserialize)]
pub struct ListTicketsRequest;

impl ApiRequest for ListTicketsRequest {
    type Response = Vec<Ticket>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/tickets".to_string()
    }
}

/// 指派给调用者本人的工单
#[derive(Debug, Serialize, Deserialize)]
pub struct MyTicketsRequest;

impl ApiRequest for MyTicketsRequest {
    type Response = Vec<Ticket>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/my-tickets".to_string()
    }
}

/// 创建工单。初始状态等默认字段由服务端计算，
/// 客户端创建后必须重新拉取集合而不是本地拼装。
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CreateTicketRequest {
    pub tipo_dispositivo: String,
    pub marca: String,
    pub modelo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_serie: Option<String>,
    pub descripcion_problema: String,
    pub prioridad: Prioridad,
}

impl ApiRequest for CreateTicketRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/tickets".to_string()
    }
}

/// 部分更新工单（技术员：状态、观察、费用）。
/// 状态流转是否合法由后端裁决。
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateTicketRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_usuario: Option<EstadoUsuario>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_interno: Option<EstadoInterno>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones_tecnico: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costo_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abono: Option<f64>,
}

impl ApiRequest for UpdateTicketRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/tickets/{}", self.id)
    }
}

/// 认领工单：把调用者设为工单的技术员。
/// 不带请求体；"一个工单最多一个技术员" 由服务端保证。
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignTicketRequest {
    #[serde(skip)]
    pub id: u64,
}

impl ApiRequest for AssignTicketRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/tickets/{}/assign", self.id)
    }

    fn body(&self) -> Option<String> {
        None
    }
}

// =========================================================
// 管理端 (Admin)
// =========================================================

/// 用户列表，可按角色过滤
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ListUsersRequest {
    #[serde(skip)]
    pub role: Option<Role>,
}

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.role {
            Some(role) => format!("/admin/users?role={}", role.as_str()),
            None => "/admin/users".to_string(),
        }
    }
}

/// 修改用户角色
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUserRoleRequest {
    #[serde(skip)]
    pub id: u64,
    pub role: Role,
}

impl ApiRequest for UpdateUserRoleRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/users/{}/role", self.id)
    }
}

/// 删除用户
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub id: u64,
}

impl ApiRequest for DeleteUserRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/users/{}", self.id)
    }
}

/// 报表统计。字段全部带默认值：缺失的计数降级为 0，
/// 不让仪表盘因为后端加减字段而挂掉。
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ReportStats {
    #[serde(default)]
    pub total_tickets: u64,
    #[serde(default)]
    pub pendientes: u64,
    #[serde(default)]
    pub en_revision: u64,
    #[serde(default)]
    pub reparados: u64,
    #[serde(default)]
    pub cerrados: u64,
    #[serde(default)]
    pub sin_asignar: u64,
    #[serde(default)]
    pub ingresos_total: f64,
    #[serde(default)]
    pub abonos_total: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportStatsRequest;

impl ApiRequest for ReportStatsRequest {
    type Response = ReportStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/reports/stats".to_string()
    }
}

/// PDF 报表端点（二进制下载，不经过 `ApiRequest` 的 JSON 解码）
pub const REPORT_PDF_PATH: &str = "/admin/reports/pdf";

// =========================================================
// 错误响应体
// =========================================================

/// 非 2xx 响应的结构化负载
///
/// 校验失败（HTTP 422 风格）时 `errors` 按字段分组；
/// 其余情况通常只有 `message`。两者都可能缺失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    /// 第一个字段的第一条消息（表单直接展示这一条）
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .as_ref()?
            .values()
            .next()?
            .first()
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_role_gana_el_valor_superior() {
        // user 内嵌的 role 和兄弟字段冲突：el superior siempre gana
        let resp: LoginResponse = serde_json::from_value(json!({
            "token": "abc123",
            "role": "tecnico",
            "user": {
                "id": 5,
                "name": "Luis",
                "email": "luis@example.com",
                "role": "admin"
            }
        }))
        .unwrap();

        assert_eq!(resp.merged_user().role, Role::Tecnico);
        // el objeto original no se modifica
        assert_eq!(resp.user.role, Role::Admin);
    }

    #[test]
    fn merge_role_conserva_el_anidado_si_no_hay_superior() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "token": "abc123",
            "user": {
                "id": 5,
                "name": "Luis",
                "email": "luis@example.com",
                "role": "recepcionista"
            }
        }))
        .unwrap();

        assert_eq!(resp.role, None);
        assert_eq!(resp.merged_user().role, Role::Recepcionista);
    }

    #[test]
    fn update_ticket_omite_id_y_campos_vacios() {
        let req = UpdateTicketRequest {
            id: 9,
            estado_interno: Some(EstadoInterno::EnProceso),
            ..Default::default()
        };

        assert_eq!(req.path(), "/tickets/9");
        let body = req.body().unwrap();
        assert_eq!(body, r#"{"estado_interno":"en_proceso"}"#);
    }

    #[test]
    fn assign_no_lleva_cuerpo() {
        let req = AssignTicketRequest { id: 3 };
        assert_eq!(req.path(), "/tickets/3/assign");
        assert_eq!(req.body(), None);
    }

    #[test]
    fn logout_no_lleva_cuerpo() {
        assert_eq!(LogoutRequest.body(), None);
    }

    #[test]
    fn listado_usuarios_con_filtro_de_rol() {
        let todos = ListUsersRequest { role: None };
        assert_eq!(todos.path(), "/admin/users");

        let tecnicos = ListUsersRequest {
            role: Some(Role::Tecnico),
        };
        assert_eq!(tecnicos.path(), "/admin/users?role=tecnico");
        // GET 无请求体
        assert_eq!(tecnicos.body(), None);
    }

    #[test]
    fn error_body_primer_mensaje() {
        let body: ErrorBody = serde_json::from_value(json!({
            "message": "Datos inválidos",
            "errors": {
                "email": ["El email ya está registrado", "Formato inválido"],
                "password": ["Demasiado corta"]
            }
        }))
        .unwrap();

        // BTreeMap: orden determinista por clave
        assert_eq!(body.first_message(), Some("El email ya está registrado"));
    }

    #[test]
    fn error_body_tolera_cuerpo_minimo() {
        let body: ErrorBody = serde_json::from_value(json!({ "message": "fail" })).unwrap();
        assert_eq!(body.first_message(), None);
        assert_eq!(body.message.as_deref(), Some("fail"));
    }

    #[test]
    fn stats_con_campos_faltantes() {
        let stats: ReportStats =
            serde_json::from_value(json!({ "total_tickets": 12, "pendientes": 4 })).unwrap();
        assert_eq!(stats.total_tickets, 12);
        assert_eq!(stats.cerrados, 0);
        assert_eq!(stats.ingresos_total, 0.0);
    }
}
