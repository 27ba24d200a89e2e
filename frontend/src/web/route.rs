//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。
//! 守卫决策是一个全函数：`decide_redirect` 对任意输入同步返回
//! "跳转到哪里" 或 "原地不动"，导航副作用留给路由服务。

use servitec_shared::Role;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 管理员面板 (需要认证)
    AdminDashboard,
    /// 技术员面板 (需要认证)
    TechDashboard,
    /// recepción / 用户面板 (需要认证)
    ReceptionDashboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/registro" => Self::Register,
            "/admin" => Self::AdminDashboard,
            "/tecnico" => Self::TechDashboard,
            "/recepcion" => Self::ReceptionDashboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/registro",
            Self::AdminDashboard => "/admin",
            Self::TechDashboard => "/tecnico",
            Self::ReceptionDashboard => "/recepcion",
            Self::NotFound => "/404",
        }
    }

    /// 该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::AdminDashboard | Self::TechDashboard | Self::ReceptionDashboard
        )
    }

    /// 该路由是否属于认证流程（已登录用户不应停留）
    pub fn is_auth_route(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 按角色选择登录后的落地路由
    pub fn landing_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Tecnico => Self::TechDashboard,
            // recepcionista / usuario / 其它一律落到 recepción 面板
            _ => Self::ReceptionDashboard,
        }
    }
}

impl core::fmt::Display for AppRoute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 守卫决策
// =========================================================

/// 守卫的输入快照：会话状态里与导航相关的最小切片。
/// `role == None` ⇔ 匿名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardInput {
    pub is_loading: bool,
    pub role: Option<Role>,
}

/// **核心守卫逻辑**
///
/// 返回 `Some(target)` 表示需要跳转，`None` 表示原地不动。
/// 对相同输入重复调用得到相同结果；已在目标路由时返回 `None`，
/// 因此守卫天然幂等。
pub fn decide_redirect(input: &GuardInput, current: &AppRoute) -> Option<AppRoute> {
    // 恢复中：不做任何导航，上游渲染加载指示
    if input.is_loading {
        return None;
    }

    match input.role {
        // 匿名用户访问受保护路由 → 登录页
        None => {
            if current.requires_auth() {
                Some(AppRoute::Login)
            } else {
                None
            }
        }
        // 已认证用户停留在认证流程 → 按角色落地
        Some(role) => {
            if current.is_auth_route() {
                let target = AppRoute::landing_for(role);
                if target == *current { None } else { Some(target) }
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anon() -> GuardInput {
        GuardInput {
            is_loading: false,
            role: None,
        }
    }

    fn con_rol(role: Role) -> GuardInput {
        GuardInput {
            is_loading: false,
            role: Some(role),
        }
    }

    #[test]
    fn cargando_nunca_navega() {
        let input = GuardInput {
            is_loading: true,
            role: None,
        };
        for route in [
            AppRoute::Login,
            AppRoute::AdminDashboard,
            AppRoute::TechDashboard,
            AppRoute::NotFound,
        ] {
            assert_eq!(decide_redirect(&input, &route), None);
        }

        let input = GuardInput {
            is_loading: true,
            role: Some(Role::Admin),
        };
        assert_eq!(decide_redirect(&input, &AppRoute::Login), None);
    }

    #[test]
    fn anonimo_en_ruta_protegida_va_a_login() {
        assert_eq!(
            decide_redirect(&anon(), &AppRoute::ReceptionDashboard),
            Some(AppRoute::Login)
        );
        assert_eq!(
            decide_redirect(&anon(), &AppRoute::AdminDashboard),
            Some(AppRoute::Login)
        );
    }

    #[test]
    fn anonimo_en_rutas_publicas_no_navega() {
        assert_eq!(decide_redirect(&anon(), &AppRoute::Login), None);
        assert_eq!(decide_redirect(&anon(), &AppRoute::Register), None);
        assert_eq!(decide_redirect(&anon(), &AppRoute::NotFound), None);
    }

    #[test]
    fn admin_en_login_va_a_su_panel() {
        assert_eq!(
            decide_redirect(&con_rol(Role::Admin), &AppRoute::Login),
            Some(AppRoute::AdminDashboard)
        );
    }

    #[test]
    fn landing_por_rol() {
        assert_eq!(
            decide_redirect(&con_rol(Role::Tecnico), &AppRoute::Register),
            Some(AppRoute::TechDashboard)
        );
        assert_eq!(
            decide_redirect(&con_rol(Role::Recepcionista), &AppRoute::Login),
            Some(AppRoute::ReceptionDashboard)
        );
        // "otherwise": usuario también cae en recepción
        assert_eq!(
            decide_redirect(&con_rol(Role::Usuario), &AppRoute::Login),
            Some(AppRoute::ReceptionDashboard)
        );
    }

    #[test]
    fn autenticado_fuera_del_flujo_auth_no_navega() {
        assert_eq!(
            decide_redirect(&con_rol(Role::Admin), &AppRoute::AdminDashboard),
            None
        );
        // 角色 y ruta no coinciden: el guard no opina, el backend autoriza
        assert_eq!(
            decide_redirect(&con_rol(Role::Tecnico), &AppRoute::AdminDashboard),
            None
        );
    }

    #[test]
    fn decision_idempotente() {
        // misma entrada dos veces ⇒ mismo resultado
        let input = anon();
        let first = decide_redirect(&input, &AppRoute::TechDashboard);
        let second = decide_redirect(&input, &AppRoute::TechDashboard);
        assert_eq!(first, second);

        // tras aplicar el redirect, la segunda evaluación es no-op
        let landed = first.unwrap();
        assert_eq!(decide_redirect(&input, &landed), None);
    }
}
