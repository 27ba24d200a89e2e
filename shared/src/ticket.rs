//! 工单领域模型
//!
//! 所有字段名与后端的 wire 格式一致（西班牙语命名）。
//! 两条状态轴（`estado_usuario` / `estado_interno`）相互独立，
//! 状态流转只由服务端计算，客户端只读。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::User;

/// 面向客户的工单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstadoUsuario {
    #[default]
    Pendiente,
    EnRevision,
    Reparado,
    Cerrado,
}

impl EstadoUsuario {
    pub const ALL: [EstadoUsuario; 4] = [
        EstadoUsuario::Pendiente,
        EstadoUsuario::EnRevision,
        EstadoUsuario::Reparado,
        EstadoUsuario::Cerrado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoUsuario::Pendiente => "pendiente",
            EstadoUsuario::EnRevision => "en_revision",
            EstadoUsuario::Reparado => "reparado",
            EstadoUsuario::Cerrado => "cerrado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EstadoUsuario::Pendiente => "Pendiente",
            EstadoUsuario::EnRevision => "En revisión",
            EstadoUsuario::Reparado => "Reparado",
            EstadoUsuario::Cerrado => "Cerrado",
        }
    }

    /// daisyUI badge 样式
    pub fn badge_class(&self) -> &'static str {
        match self {
            EstadoUsuario::Pendiente => "badge badge-warning",
            EstadoUsuario::EnRevision => "badge badge-info",
            EstadoUsuario::Reparado => "badge badge-success",
            EstadoUsuario::Cerrado => "badge badge-neutral",
        }
    }
}

/// 内部流程状态（技术员视角）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstadoInterno {
    #[default]
    SinIniciar,
    EnProceso,
    Completado,
}

impl EstadoInterno {
    pub const ALL: [EstadoInterno; 3] = [
        EstadoInterno::SinIniciar,
        EstadoInterno::EnProceso,
        EstadoInterno::Completado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoInterno::SinIniciar => "sin_iniciar",
            EstadoInterno::EnProceso => "en_proceso",
            EstadoInterno::Completado => "completado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EstadoInterno::SinIniciar => "Sin iniciar",
            EstadoInterno::EnProceso => "En proceso",
            EstadoInterno::Completado => "Completado",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            EstadoInterno::SinIniciar => "badge badge-ghost",
            EstadoInterno::EnProceso => "badge badge-info",
            EstadoInterno::Completado => "badge badge-success",
        }
    }
}

/// 工单优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Prioridad {
    Baja,
    #[default]
    Media,
    Alta,
}

impl Prioridad {
    pub const ALL: [Prioridad; 3] = [Prioridad::Baja, Prioridad::Media, Prioridad::Alta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Prioridad::Baja => "baja",
            Prioridad::Media => "media",
            Prioridad::Alta => "alta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Prioridad::Baja => "Baja",
            Prioridad::Media => "Media",
            Prioridad::Alta => "Alta",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Prioridad::Baja => "badge badge-ghost",
            Prioridad::Media => "badge badge-warning",
            Prioridad::Alta => "badge badge-error",
        }
    }
}

/// 维修工单
///
/// 客户端的副本只是临时缓存：任何写操作之后都重新拉取完整集合，
/// 本地不做乐观合并。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    /// 工单所属客户
    #[serde(default)]
    pub usuario: Option<User>,
    /// 指派的技术员，`None` 表示工单可认领
    #[serde(default)]
    pub tecnico: Option<User>,
    #[serde(default)]
    pub tecnico_id: Option<u64>,
    pub tipo_dispositivo: String,
    pub marca: String,
    pub modelo: String,
    #[serde(default)]
    pub numero_serie: Option<String>,
    pub descripcion_problema: String,
    #[serde(default)]
    pub estado_usuario: EstadoUsuario,
    #[serde(default)]
    pub estado_interno: EstadoInterno,
    #[serde(default)]
    pub prioridad: Prioridad,
    #[serde(default)]
    pub costo_total: Option<f64>,
    #[serde(default)]
    pub abono: Option<f64>,
    #[serde(default)]
    pub observaciones_tecnico: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// 可认领 ⇔ 尚未指派技术员
    pub fn es_disponible(&self) -> bool {
        self.tecnico_id.is_none()
    }

    /// 设备的简短描述，用于列表显示
    pub fn dispositivo(&self) -> String {
        format!("{} {} {}", self.tipo_dispositivo, self.marca, self.modelo)
    }

    /// 创建日期的短格式（列表列）
    pub fn fecha_corta(&self) -> String {
        self.created_at
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".to_string())
    }

    /// 本地自由文本过滤：对已拉取的集合做子串匹配。
    /// 空查询恒为 true。
    pub fn matches_filter(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let cliente = self
            .usuario
            .as_ref()
            .map(|u| u.name.to_lowercase())
            .unwrap_or_default();
        let serie = self
            .numero_serie
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.id.to_string().contains(&query)
            || self.tipo_dispositivo.to_lowercase().contains(&query)
            || self.marca.to_lowercase().contains(&query)
            || self.modelo.to_lowercase().contains(&query)
            || self.descripcion_problema.to_lowercase().contains(&query)
            || cliente.contains(&query)
            || serie.contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket_base() -> Ticket {
        serde_json::from_value(json!({
            "id": 42,
            "tipo_dispositivo": "Laptop",
            "marca": "Lenovo",
            "modelo": "ThinkPad T14",
            "descripcion_problema": "No enciende la pantalla",
            "estado_usuario": "en_revision",
            "estado_interno": "en_proceso",
            "prioridad": "alta"
        }))
        .unwrap()
    }

    #[test]
    fn estados_usan_nombres_wire() {
        let t = ticket_base();
        assert_eq!(t.estado_usuario, EstadoUsuario::EnRevision);
        assert_eq!(t.estado_interno, EstadoInterno::EnProceso);
        assert_eq!(t.prioridad, Prioridad::Alta);
        assert_eq!(t.estado_usuario.as_str(), "en_revision");
    }

    #[test]
    fn disponible_sin_tecnico() {
        let mut t = ticket_base();
        assert!(t.es_disponible());

        t.tecnico_id = Some(3);
        assert!(!t.es_disponible());
    }

    #[test]
    fn campos_opcionales_con_default() {
        let t = ticket_base();
        assert_eq!(t.costo_total, None);
        assert_eq!(t.tecnico, None);
        assert_eq!(t.created_at, None);
        assert_eq!(t.fecha_corta(), "—");
    }

    #[test]
    fn filtro_local_por_subcadena() {
        let t = ticket_base();
        assert!(t.matches_filter(""));
        assert!(t.matches_filter("lenovo"));
        assert!(t.matches_filter("PANTALLA"));
        assert!(t.matches_filter("42"));
        assert!(!t.matches_filter("impresora"));
    }

    #[test]
    fn filtro_local_por_cliente() {
        let mut t = ticket_base();
        t.usuario = Some(crate::User {
            id: 1,
            name: "María López".to_string(),
            email: "maria@example.com".to_string(),
            telefono: None,
            role: crate::Role::Usuario,
        });
        assert!(t.matches_filter("maría"));
    }

    #[test]
    fn prioridad_default_es_media() {
        let t: Ticket = serde_json::from_value(json!({
            "id": 1,
            "tipo_dispositivo": "Tablet",
            "marca": "Samsung",
            "modelo": "Tab S9",
            "descripcion_problema": "Batería agotada"
        }))
        .unwrap();
        assert_eq!(t.prioridad, Prioridad::Media);
        assert_eq!(t.estado_usuario, EstadoUsuario::Pendiente);
        assert_eq!(t.estado_interno, EstadoInterno::SinIniciar);
    }
}
