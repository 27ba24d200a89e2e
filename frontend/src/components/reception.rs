use leptos::prelude::*;
use leptos::task::spawn_local;

use servitec_shared::{EstadoUsuario, Ticket};

use crate::components::icons::{ClipboardList, RefreshCw, Search};
use crate::components::navbar::Navbar;
use crate::components::ticket_form::TicketFormDialog;
use crate::components::tickets::{EstadoBadge, PrioridadBadge};
use crate::session::{fetch_tickets, use_session};

/// recepción / 用户面板
///
/// 列表来自会话缓存；搜索和状态过滤只在本地进行，
/// 不向后端发查询。
#[component]
pub fn ReceptionPage() -> impl IntoView {
    let session = use_session();

    let (query, set_query) = signal(String::new());
    let (estado_filter, set_estado_filter) = signal(Option::<EstadoUsuario>::None);
    let (refreshing, set_refreshing) = signal(false);
    let (notification, set_notification) = signal(Option::<String>::None);

    let filtered = move || -> Vec<Ticket> {
        let q = query.get();
        let estado = estado_filter.get();
        session.state.with(|s| {
            s.tickets
                .iter()
                .filter(|t| t.matches_filter(&q))
                .filter(|t| estado.is_none_or(|e| t.estado_usuario == e))
                .cloned()
                .collect()
        })
    };

    let refresh = move || {
        set_refreshing.set(true);
        spawn_local(async move {
            fetch_tickets(session, None).await;
            set_refreshing.set(false);
        });
    };

    let on_created = move |_: ()| {
        set_notification.set(Some("Ticket registrado".to_string()));
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

    let total = move || session.state.with(|s| s.tickets.len());
    let pendientes = move || {
        session.state.with(|s| {
            s.tickets
                .iter()
                .filter(|t| t.estado_usuario == EstadoUsuario::Pendiente)
                .count()
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class="alert alert-success shadow-lg">
                            <span>{move || notification.get().unwrap()}</span>
                        </div>
                    </div>
                </Show>

                <Navbar title="Recepción" />

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Tickets visibles"</div>
                        <div class="stat-value text-primary">{total}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Pendientes"</div>
                        <div class="stat-value text-warning">{pendientes}</div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex flex-wrap items-center justify-between gap-4 p-6 pb-2">
                            <div>
                                <h3 class="card-title">
                                    <ClipboardList attr:class="h-5 w-5" /> "Tickets de reparación"
                                </h3>
                                <p class="text-base-content/70 text-sm">"Equipos registrados y su estado actual."</p>
                            </div>
                            <div class="flex items-center gap-2">
                                <label class="input input-bordered input-sm flex items-center gap-2">
                                    <Search attr:class="h-4 w-4 opacity-50" />
                                    <input
                                        type="text"
                                        class="grow"
                                        placeholder="Buscar..."
                                        on:input=move |ev| set_query.set(event_target_value(&ev))
                                        prop:value=query
                                    />
                                </label>
                                <select
                                    class="select select-bordered select-sm"
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        set_estado_filter.set(
                                            EstadoUsuario::ALL.into_iter().find(|e| e.as_str() == value),
                                        );
                                    }
                                >
                                    <option value="">"Todos los estados"</option>
                                    {EstadoUsuario::ALL
                                        .into_iter()
                                        .map(|e| view! { <option value=e.as_str()>{e.label()}</option> })
                                        .collect_view()}
                                </select>
                                <TicketFormDialog on_saved=on_created />
                                <button
                                    on:click=move |_| refresh()
                                    disabled=move || refreshing.get()
                                    class="btn btn-ghost btn-circle"
                                >
                                    <RefreshCw attr:class=move || if refreshing.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                                </button>
                            </div>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"#"</th>
                                        <th>"Equipo"</th>
                                        <th class="hidden md:table-cell">"Cliente"</th>
                                        <th>"Estado"</th>
                                        <th class="hidden md:table-cell">"Prioridad"</th>
                                        <th class="hidden md:table-cell">"Técnico"</th>
                                        <th class="hidden md:table-cell">"Fecha"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || filtered().is_empty()>
                                        <tr>
                                            <td colspan="7" class="text-center py-8 text-base-content/50">
                                                "Sin tickets que mostrar."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=filtered
                                        key=|t| (t.id, t.estado_usuario, t.updated_at)
                                        children=move |ticket| {
                                            view! {
                                                <tr>
                                                    <td class="font-mono text-sm">{ticket.id}</td>
                                                    <td>
                                                        <div class="font-bold text-sm">{ticket.dispositivo()}</div>
                                                        <div class="text-xs opacity-60 max-w-xs truncate">
                                                            {ticket.descripcion_problema.clone()}
                                                        </div>
                                                    </td>
                                                    <td class="hidden md:table-cell text-sm">
                                                        {ticket.usuario.as_ref().map(|u| u.name.clone()).unwrap_or_else(|| "—".to_string())}
                                                    </td>
                                                    <td><EstadoBadge estado=ticket.estado_usuario /></td>
                                                    <td class="hidden md:table-cell">
                                                        <PrioridadBadge prioridad=ticket.prioridad />
                                                    </td>
                                                    <td class="hidden md:table-cell text-sm">
                                                        {ticket.tecnico.as_ref().map(|u| u.name.clone()).unwrap_or_else(|| "Sin asignar".to_string())}
                                                    </td>
                                                    <td class="hidden md:table-cell text-sm opacity-70">
                                                        {ticket.fecha_corta()}
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
