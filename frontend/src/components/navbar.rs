//! 顶栏组件：logo、标题、用户身份和注销按钮

use leptos::prelude::*;

use crate::components::icons::{LogOut, Wrench};
use crate::session::{logout, use_session};

#[component]
pub fn Navbar(#[prop(into)] title: String) -> impl IntoView {
    let session = use_session();

    let user_name = move || {
        session
            .state
            .with(|s| s.user.as_ref().map(|u| u.name.clone()).unwrap_or_default())
    };
    let role_label = move || {
        session
            .state
            .with(|s| s.role().map(|r| r.label()).unwrap_or(""))
    };

    // 注销后不需要手动导航：路由守卫监听会话变化并自动重定向
    let on_logout = move |_| {
        logout(session);
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Wrench attr:class="text-primary h-6 w-6" />
                <a class="btn btn-ghost text-xl">"ServiTec"</a>
                <span class="text-base-content/70 hidden md:inline">{title}</span>
            </div>
            <div class="flex-none gap-2">
                <span class="badge badge-neutral hidden md:inline-flex">
                    {user_name} " · " {role_label}
                </span>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Salir"
                </button>
            </div>
        </div>
    }
}
