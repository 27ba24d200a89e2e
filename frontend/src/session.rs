//! 会话模块
//!
//! 管理认证状态和工单缓存，与路由系统解耦：
//! 路由服务只消费 `guard_signal` 注入的快照。
//!
//! 会话是全应用唯一的共享可变状态，读取都是快照，
//! 写入统一走 `set_state.update`（单写者）。生命周期：
//! `Restoring → { Authenticated | Anonymous }`，进程内在
//! 后两者之间循环，没有终态。

use leptos::prelude::*;
use leptos::task::spawn_local;

use servitec_shared::protocol::{
    CreateTicketRequest, CurrentUserRequest, ListTicketsRequest, LoginRequest, LogoutRequest,
    RegisterRequest,
};
use servitec_shared::{Role, Ticket, User};

use crate::api::{ApiError, ServiTecApi};
use crate::web::TokenStore;
use crate::web::route::GuardInput;

// =========================================================
// 状态
// =========================================================

/// 认证生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// 进程启动，正在尝试从存储恢复 token
    #[default]
    Restoring,
    /// 无认证身份
    Anonymous,
    /// 已认证
    Authenticated,
}

/// 会话状态
///
/// `tickets` 是服务端集合的临时镜像：每次写操作之后整体重拉，
/// 本地从不合成条目。
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub token: Option<String>,
    pub user: Option<User>,
    pub tickets: Vec<Ticket>,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Restoring)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated)
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// 路由守卫消费的最小快照
    pub fn guard_input(&self) -> GuardInput {
        GuardInput {
            is_loading: self.is_loading(),
            role: if self.is_authenticated() {
                self.role()
            } else {
                None
            },
        }
    }

    /// 注销 / 强制失效后的状态：内存里不留任何会话痕迹
    fn cleared() -> Self {
        Self {
            phase: SessionPhase::Anonymous,
            token: None,
            user: None,
            tickets: Vec::new(),
        }
    }
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    /// 设置会话状态（写入）
    pub set_state: WriteSignal<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self { state, set_state }
    }

    /// 守卫输入信号（用于路由服务注入）
    pub fn guard_signal(&self) -> Signal<GuardInput> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.guard_input()))
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 操作
// =========================================================

/// 初始化会话：异步从存储恢复 token
pub fn init_session(ctx: &SessionContext) {
    let ctx = *ctx;
    spawn_local(async move {
        restore_session(ctx).await;
    });
}

/// 恢复流程
///
/// 有 token → 用它拉当前用户和工单；任何失败（含解码错误和 401）
/// 都清掉持久化 token 并落到 Anonymous。
async fn restore_session(ctx: SessionContext) {
    let Some(token) = TokenStore::get() else {
        ctx.set_state.set(SessionState::cleared());
        return;
    };

    let api = ServiTecApi::with_token(token.clone());
    match api.send(&CurrentUserRequest).await {
        Ok(user) => {
            log::info!("sesión restaurada para {}", user.email);
            ctx.set_state.update(|state| {
                state.phase = SessionPhase::Authenticated;
                state.token = Some(token.clone());
                state.user = Some(user);
            });
            fetch_tickets(ctx, Some(token.as_str())).await;
        }
        Err(e) => {
            log::warn!("no se pudo restaurar la sesión: {}", e);
            TokenStore::clear();
            ctx.set_state.set(SessionState::cleared());
        }
    }
}

/// 登录
///
/// 后端把 `role` 作为兄弟字段返回，这里合并进 user（顶层值获胜）。
/// 成功后持久化 token、急切刷新工单缓存，并返回合并后的用户 ——
/// 调用方应使用返回值而不是回读 context（状态更新的可见性
/// 不保证同步）。
pub async fn login(ctx: SessionContext, email: String, password: String) -> Result<User, ApiError> {
    let api = ServiTecApi::anonymous();
    let response = api.send(&LoginRequest { email, password }).await?;

    let user = response.merged_user();
    let token = response.token;

    TokenStore::set(&token);
    ctx.set_state.update(|state| {
        state.phase = SessionPhase::Authenticated;
        state.token = Some(token.clone());
        state.user = Some(user.clone());
    });

    fetch_tickets(ctx, Some(token.as_str())).await;

    log::info!("login correcto: {} ({})", user.email, user.role.as_str());
    Ok(user)
}

/// 注册
///
/// 不自动登录；成功后调用方负责跳回登录页。
pub async fn register(form: RegisterRequest) -> Result<(), ApiError> {
    let api = ServiTecApi::anonymous();
    api.send(&form).await?;
    Ok(())
}

/// 注销
///
/// 服务端会话的失效是尽力而为（错误只记日志，绝不阻塞本地清理）；
/// 内存状态和持久化 token 无条件清除。导航由路由服务的守卫
/// 监听自动处理。
pub fn logout(ctx: SessionContext) {
    let token = ctx.state.with_untracked(|s| s.token.clone());

    if let Some(token) = token {
        spawn_local(async move {
            let api = ServiTecApi::with_token(token);
            if let Err(e) = api.send(&LogoutRequest).await {
                log::warn!("logout en servidor falló (ignorado): {}", e);
            }
        });
    }

    TokenStore::clear();
    ctx.set_state.set(SessionState::cleared());
}

/// 刷新工单缓存
///
/// 可见范围由服务端按角色决定。401 走强制注销（会话已失效）；
/// 其它错误只记日志，缓存保持过期值而不是让 UI 崩掉。
pub async fn fetch_tickets(ctx: SessionContext, token_override: Option<&str>) {
    let api = match token_override {
        Some(token) => ServiTecApi::with_token(token),
        None => ServiTecApi::from_storage(),
    };

    match api.send(&ListTicketsRequest).await {
        Ok(tickets) => {
            ctx.set_state.update(|state| state.tickets = tickets);
        }
        Err(e) if e.is_unauthorized() => {
            log::warn!("401 al refrescar tickets: sesión invalidada, cerrando");
            logout(ctx);
        }
        Err(e) => {
            log::warn!("no se pudo refrescar tickets (se mantiene la caché): {}", e);
        }
    }
}

/// 创建工单
///
/// 成功后无条件重拉完整集合：初始状态等字段由服务端计算，
/// 信任服务端而不是本地拼装。失败则向上抛，表单据此展示校验错误。
pub async fn create_ticket(ctx: SessionContext, form: CreateTicketRequest) -> Result<(), ApiError> {
    let api = ServiTecApi::from_storage();
    api.send(&form).await?;

    fetch_tickets(ctx, None).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use servitec_shared::Role;

    fn usuario(role: Role) -> User {
        User {
            id: 1,
            name: "Eva".to_string(),
            email: "eva@example.com".to_string(),
            telefono: None,
            role,
        }
    }

    #[test]
    fn el_estado_inicial_esta_cargando() {
        let state = SessionState::default();
        assert_eq!(state.phase, SessionPhase::Restoring);
        assert!(state.is_loading());
        assert!(!state.is_authenticated());
        assert_eq!(state.guard_input().role, None);
        assert!(state.guard_input().is_loading);
    }

    #[test]
    fn cleared_no_deja_rastros() {
        let state = SessionState::cleared();

        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
        assert!(state.tickets.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn guard_input_refleja_el_rol_autenticado() {
        let state = SessionState {
            phase: SessionPhase::Authenticated,
            token: Some("tok".to_string()),
            user: Some(usuario(Role::Admin)),
            tickets: Vec::new(),
        };
        let input = state.guard_input();
        assert!(!input.is_loading);
        assert_eq!(input.role, Some(Role::Admin));
    }

    #[test]
    fn guard_input_anonimo_sin_rol() {
        // aunque quede un user colgado, fuera de Authenticated no hay rol
        let state = SessionState {
            phase: SessionPhase::Anonymous,
            token: None,
            user: Some(usuario(Role::Admin)),
            tickets: Vec::new(),
        };
        assert_eq!(state.guard_input().role, None);
    }
}
