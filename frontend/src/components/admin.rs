use leptos::prelude::*;
use leptos::task::spawn_local;

use servitec_shared::protocol::{
    DeleteUserRequest, ListUsersRequest, ReportStats, ReportStatsRequest, UpdateUserRoleRequest,
};
use servitec_shared::{Role, User};

use crate::api::ServiTecApi;
use crate::components::icons::{FileDown, RefreshCw, Trash2, Users};
use crate::components::navbar::Navbar;
use crate::session::use_session;
use crate::web::save_bytes;

/// 管理员面板：用户管理 + 报表
///
/// 用户集合是页面本地的（不进会话缓存），每次变更后重拉。
#[component]
pub fn AdminPage() -> impl IntoView {
    let session = use_session();

    let (users, set_users) = signal(Vec::<User>::new());
    let (loading_users, set_loading_users) = signal(false);
    let (role_filter, set_role_filter) = signal(Option::<Role>::None);
    let (stats, set_stats) = signal(Option::<ReportStats>::None);
    let (downloading, set_downloading) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load_users = move || {
        let role = role_filter.get_untracked();
        set_loading_users.set(true);
        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&ListUsersRequest { role }).await {
                Ok(list) => set_users.set(list),
                Err(e) => {
                    log::warn!("no se pudieron cargar usuarios: {}", e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            set_loading_users.set(false);
        });
    };

    let load_stats = move || {
        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&ReportStatsRequest).await {
                Ok(s) => set_stats.set(Some(s)),
                Err(e) => log::warn!("no se pudieron cargar estadísticas: {}", e),
            }
        });
    };

    // 初始加载 + 过滤器变化时重拉
    Effect::new(move |_| {
        let _ = role_filter.get();
        if session.state.with(|s| s.is_authenticated()) {
            load_users();
        }
    });

    Effect::new(move |_| {
        if session.state.with(|s| s.is_authenticated()) {
            load_stats();
        }
    });

    let change_role = move |id: u64, role: Role| {
        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&UpdateUserRoleRequest { id, role }).await {
                Ok(_) => {
                    set_notification.set(Some(("Rol actualizado".to_string(), false)));
                    load_users();
                }
                Err(e) => {
                    log::warn!("no se pudo cambiar el rol de {}: {}", id, e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
        });
    };

    let delete_user = move |id: u64| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("¿Eliminar este usuario?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&DeleteUserRequest { id }).await {
                Ok(_) => {
                    set_notification.set(Some(("Usuario eliminado".to_string(), false)));
                    load_users();
                }
                Err(e) => {
                    log::warn!("no se pudo eliminar el usuario {}: {}", id, e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
        });
    };

    let download_pdf = move |_| {
        set_downloading.set(true);
        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.download_report_pdf().await {
                Ok(bytes) => {
                    if let Err(e) = save_bytes(&bytes, "reporte-servitec.pdf", "application/pdf") {
                        log::error!("no se pudo guardar el PDF: {}", e);
                        set_notification.set(Some(("No se pudo guardar el PDF".to_string(), true)));
                    }
                }
                Err(e) => {
                    log::warn!("descarga de PDF fallida: {}", e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            set_downloading.set(false);
        });
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let (_, is_err) = notification.get().unwrap();
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().unwrap().0}</span>
                        </div>
                    </div>
                </Show>

                <Navbar title="Administración" />

                // 报表统计
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Tickets totales"</div>
                        <div class="stat-value text-primary">
                            {move || stats.get().map(|s| s.total_tickets).unwrap_or_default()}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Pendientes"</div>
                        <div class="stat-value text-warning">
                            {move || stats.get().map(|s| s.pendientes).unwrap_or_default()}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"En revisión"</div>
                        <div class="stat-value text-info">
                            {move || stats.get().map(|s| s.en_revision).unwrap_or_default()}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Reparados"</div>
                        <div class="stat-value text-success">
                            {move || stats.get().map(|s| s.reparados).unwrap_or_default()}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Ingresos"</div>
                        <div class="stat-value text-secondary text-2xl">
                            {move || format!("${:.2}", stats.get().map(|s| s.ingresos_total).unwrap_or_default())}
                        </div>
                        <div class="stat-desc">
                            <button
                                class="btn btn-ghost btn-xs gap-1 mt-1"
                                on:click=download_pdf
                                disabled=move || downloading.get()
                            >
                                <FileDown attr:class="h-3 w-3" />
                                {move || if downloading.get() { "Descargando..." } else { "Reporte PDF" }}
                            </button>
                        </div>
                    </div>
                </div>

                // 用户管理
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex flex-wrap items-center justify-between gap-4 p-6 pb-2">
                            <div>
                                <h3 class="card-title">
                                    <Users attr:class="h-5 w-5" /> "Usuarios"
                                </h3>
                                <p class="text-base-content/70 text-sm">"Gestiona cuentas y roles del taller."</p>
                            </div>
                            <div class="flex items-center gap-2">
                                <select
                                    class="select select-bordered select-sm"
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        set_role_filter.set(
                                            Role::ALL.into_iter().find(|r| r.as_str() == value),
                                        );
                                    }
                                >
                                    <option value="">"Todos los roles"</option>
                                    {Role::ALL
                                        .into_iter()
                                        .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                                        .collect_view()}
                                </select>
                                <button
                                    on:click=move |_| load_users()
                                    disabled=move || loading_users.get()
                                    class="btn btn-ghost btn-circle"
                                >
                                    <RefreshCw attr:class=move || if loading_users.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                                </button>
                            </div>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Nombre"</th>
                                        <th class="hidden md:table-cell">"Correo"</th>
                                        <th>"Rol"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || users.get().is_empty() && !loading_users.get()>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "Sin usuarios para este filtro."
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || loading_users.get() && users.get().is_empty()>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span> " Cargando..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || users.get()
                                        key=|u| (u.id, u.role)
                                        children=move |user| {
                                            let id = user.id;
                                            let current_role = user.role;
                                            view! {
                                                <tr>
                                                    <td class="font-bold text-sm">{user.name.clone()}</td>
                                                    <td class="hidden md:table-cell text-sm opacity-70">
                                                        {user.email.clone()}
                                                    </td>
                                                    <td>
                                                        <select
                                                            class="select select-bordered select-xs"
                                                            on:change=move |ev| {
                                                                let value = event_target_value(&ev);
                                                                if let Some(role) = Role::ALL.into_iter().find(|r| r.as_str() == value) {
                                                                    if role != current_role {
                                                                        change_role(id, role);
                                                                    }
                                                                }
                                                            }
                                                            prop:value=current_role.as_str()
                                                        >
                                                            {Role::ALL
                                                                .into_iter()
                                                                .map(|r| view! {
                                                                    <option value=r.as_str() selected=move || r == current_role>
                                                                        {r.label()}
                                                                    </option>
                                                                })
                                                                .collect_view()}
                                                        </select>
                                                    </td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-sm text-error"
                                                            on:click=move |_| delete_user(id)
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" />
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
