//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 守卫决策本身是 `route::decide_redirect` 纯函数，这里只负责
//! 在会话快照、popstate 和显式导航三个入口上重新求值并施加副作用。

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardInput, decide_redirect};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话快照信号实现与会话系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 守卫输入快照（注入的信号，实现解耦）
    guard: Signal<GuardInput>,
}

impl RouterService {
    fn new(guard: Signal<GuardInput>) -> Self {
        // 初始路由从 URL 解析；守卫在首个 Effect 里求值
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            guard,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **显式导航**
    ///
    /// 先对目标路由求守卫决策，再推入 History 并更新 UI。
    pub fn navigate(&self, target: AppRoute) {
        let input = self.guard.get_untracked();
        let resolved = match decide_redirect(&input, &target) {
            Some(redirect) => {
                log::info!("[router] acceso a {} redirigido a {}", target, redirect);
                redirect
            }
            None => target,
        };

        if resolved != self.current_route.get_untracked() {
            push_history_state(resolved.to_path());
            self.set_route.set(resolved);
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let guard = self.guard;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let input = guard.get_untracked();

            // popstate 时也执行守卫逻辑
            match decide_redirect(&input, &target) {
                Some(redirect) => {
                    replace_history_state(redirect.to_path());
                    set_route.set(redirect);
                }
                None => set_route.set(target),
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话快照或路由变化时重新求守卫决策
    ///
    /// 依赖追踪覆盖两个输入（快照 + 当前路由）；决策函数已在目标
    /// 路由时返回 `None`，所以这里不会产生重定向循环。
    fn setup_guard_effect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let guard = self.guard;

        Effect::new(move |_| {
            let input = guard.get();
            let route = current_route.get();

            if let Some(redirect) = decide_redirect(&input, &route) {
                log::info!("[router] guard: {} -> {}", route, redirect);
                replace_history_state(redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(guard: Signal<GuardInput>) -> RouterService {
    let router = RouterService::new(guard);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_guard_effect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 守卫输入快照信号
    guard: Signal<GuardInput>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(guard);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
