//! ServiTec 前端应用
//!
//! 维修工单流程的客户端。采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义 + 守卫决策（领域模型，纯函数）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话状态管理（认证 + 工单缓存）
//! - `api`: 带 Bearer 认证的 HTTP 客户端
//! - `components`: UI 组件层
//!
//! 所有业务规则（角色授权、状态流转、报表）都在远端 REST 后端，
//! 这里只是它的薄客户端。

mod api;
mod config;
mod session;

mod components {
    pub mod admin;
    mod icons;
    pub mod login;
    mod navbar;
    pub mod reception;
    pub mod register;
    pub mod technician;
    mod ticket_form;
    mod tickets;
}

// 浏览器侧基础设施封装模块
pub(crate) mod web {
    mod download;
    pub mod route;
    pub mod router;
    mod storage;

    pub use download::save_bytes;
    pub use storage::TokenStore;
}

use leptos::prelude::*;

use crate::components::admin::AdminPage;
use crate::components::login::LoginPage;
use crate::components::reception::ReceptionPage;
use crate::components::register::RegisterPage;
use crate::components::technician::TechnicianPage;
use crate::session::{SessionContext, init_session};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminPage /> }.into_any(),
        AppRoute::TechDashboard => view! { <TechnicianPage /> }.into_any(),
        AppRoute::ReceptionDashboard => view! { <ReceptionPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Página no encontrada"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文
    let session = SessionContext::new();
    provide_context(session);

    // 2. 异步恢复会话（从 LocalStorage 加载 token）
    init_session(&session);

    // 3. 派生守卫快照信号，注入路由服务（解耦！）
    let guard = session.guard_signal();

    view! {
        // 4. 路由器组件：注入守卫快照实现重定向
        <Router guard=guard>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
