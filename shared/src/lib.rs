use serde::{Deserialize, Serialize};

pub mod protocol;
mod ticket;

pub use ticket::{EstadoInterno, EstadoUsuario, Prioridad, Ticket};

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
///
/// 由服务端分配。未知的角色值一律降级为 `Usuario`，
/// 与路由守卫的 "otherwise" 分支保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Tecnico,
    Recepcionista,
    #[default]
    #[serde(other)]
    Usuario,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Tecnico,
        Role::Recepcionista,
        Role::Usuario,
    ];

    /// 角色的 wire 值（同时用于 `?role=` 查询参数）
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tecnico => "tecnico",
            Role::Recepcionista => "recepcionista",
            Role::Usuario => "usuario",
        }
    }

    /// UI 显示标签
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Tecnico => "Técnico",
            Role::Recepcionista => "Recepcionista",
            Role::Usuario => "Usuario",
        }
    }
}

/// 用户模型
///
/// `role` 带默认值：后端在部分响应里把角色作为兄弟字段返回
/// 而不是嵌在 user 对象里（见 `protocol::LoginResponse`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_desconocido_cae_a_usuario() {
        let role: Role = serde_json::from_value(json!("superjefe")).unwrap();
        assert_eq!(role, Role::Usuario);
    }

    #[test]
    fn role_conocido_se_parsea() {
        let role: Role = serde_json::from_value(json!("tecnico")).unwrap();
        assert_eq!(role, Role::Tecnico);
        assert_eq!(role.as_str(), "tecnico");
    }

    #[test]
    fn user_sin_role_usa_default() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "name": "Ana",
            "email": "ana@example.com"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Usuario);
        assert_eq!(user.telefono, None);
    }
}
