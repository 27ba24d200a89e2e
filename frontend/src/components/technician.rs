use leptos::prelude::*;
use leptos::task::spawn_local;

use servitec_shared::protocol::{AssignTicketRequest, MyTicketsRequest, UpdateTicketRequest};
use servitec_shared::{EstadoInterno, EstadoUsuario, Ticket};

use crate::api::ServiTecApi;
use crate::components::icons::RefreshCw;
use crate::components::navbar::Navbar;
use crate::components::tickets::{EstadoBadge, EstadoInternoBadge, PrioridadBadge};
use crate::session::{fetch_tickets, use_session};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Disponibles,
    Asignados,
}

/// 技术员面板
///
/// "Disponibles" 读会话缓存（`tecnico_id == null`）；
/// "Mis asignados" 作为页面本地查询直接打 `/my-tickets`。
/// 每次变更之后两边都整体重拉。
#[component]
pub fn TechnicianPage() -> impl IntoView {
    let session = use_session();

    let (tab, set_tab) = signal(Tab::Disponibles);
    let (mine, set_mine) = signal(Vec::<Ticket>::new());
    let (loading_mine, set_loading_mine) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 编辑对话框的状态
    let (editing, set_editing) = signal(Option::<Ticket>::None);
    let (estado_interno, set_estado_interno) = signal(EstadoInterno::SinIniciar);
    let (estado_usuario, set_estado_usuario) = signal(EstadoUsuario::Pendiente);
    let (costo, set_costo) = signal(String::new());
    let (abono, set_abono) = signal(String::new());
    let (observaciones, set_observaciones) = signal(String::new());
    let (saving, set_saving) = signal(false);

    let load_mine = move || {
        set_loading_mine.set(true);
        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&MyTicketsRequest).await {
                Ok(tickets) => set_mine.set(tickets),
                Err(e) => {
                    log::warn!("no se pudieron cargar mis tickets: {}", e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            set_loading_mine.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| {
        if session.state.with(|s| s.is_authenticated()) {
            load_mine();
        }
    });

    let disponibles = move || -> Vec<Ticket> {
        session.state.with(|s| {
            s.tickets
                .iter()
                .filter(|t| t.es_disponible())
                .cloned()
                .collect()
        })
    };

    let refresh_all = move || {
        spawn_local(async move {
            fetch_tickets(session, None).await;
        });
        load_mine();
    };

    let claim = move |id: u64| {
        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&AssignTicketRequest { id }).await {
                Ok(_) => {
                    set_notification.set(Some((format!("Ticket #{} asignado", id), false)));
                    // 重拉而不是合并：服务端决定指派结果
                    fetch_tickets(session, None).await;
                    load_mine();
                }
                Err(e) => {
                    log::warn!("no se pudo tomar el ticket {}: {}", id, e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
        });
    };

    let open_editor = move |ticket: Ticket| {
        set_estado_interno.set(ticket.estado_interno);
        set_estado_usuario.set(ticket.estado_usuario);
        set_costo.set(ticket.costo_total.map(|c| c.to_string()).unwrap_or_default());
        set_abono.set(ticket.abono.map(|a| a.to_string()).unwrap_or_default());
        set_observaciones.set(ticket.observaciones_tecnico.clone().unwrap_or_default());
        set_editing.set(Some(ticket));
    };

    let save_edit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(ticket) = editing.get() else { return };
        set_saving.set(true);

        let form = UpdateTicketRequest {
            id: ticket.id,
            estado_interno: Some(estado_interno.get()),
            estado_usuario: Some(estado_usuario.get()),
            observaciones_tecnico: {
                let o = observaciones.get();
                if o.trim().is_empty() { None } else { Some(o) }
            },
            costo_total: costo.get().trim().parse().ok(),
            abono: abono.get().trim().parse().ok(),
        };

        spawn_local(async move {
            let api = ServiTecApi::from_storage();
            match api.send(&form).await {
                Ok(_) => {
                    set_notification.set(Some((format!("Ticket #{} actualizado", ticket.id), false)));
                    set_editing.set(None);
                    fetch_tickets(session, None).await;
                    load_mine();
                }
                Err(e) => {
                    log::warn!("no se pudo actualizar el ticket {}: {}", ticket.id, e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            set_saving.set(false);
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

                <Navbar title="Panel técnico" />

                <div class="flex items-center justify-between">
                    <div role="tablist" class="tabs tabs-boxed bg-base-100">
                        <a
                            role="tab"
                            class=move || if tab.get() == Tab::Disponibles { "tab tab-active" } else { "tab" }
                            on:click=move |_| set_tab.set(Tab::Disponibles)
                        >
                            "Disponibles " <span class="badge badge-sm ml-1">{move || disponibles().len()}</span>
                        </a>
                        <a
                            role="tab"
                            class=move || if tab.get() == Tab::Asignados { "tab tab-active" } else { "tab" }
                            on:click=move |_| set_tab.set(Tab::Asignados)
                        >
                            "Mis asignados " <span class="badge badge-sm ml-1">{move || mine.get().len()}</span>
                        </a>
                    </div>
                    <button on:click=move |_| refresh_all() class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if loading_mine.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>

                // 可认领工单
                <Show when=move || tab.get() == Tab::Disponibles>
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body p-0">
                            <div class="p-6 pb-2">
                                <h3 class="card-title">"Tickets sin asignar"</h3>
                                <p class="text-base-content/70 text-sm">"Toma un equipo para empezar a trabajarlo."</p>
                            </div>
                            <div class="overflow-x-auto w-full">
                                <table class="table table-zebra w-full">
                                    <thead>
                                        <tr>
                                            <th>"#"</th>
                                            <th>"Equipo"</th>
                                            <th class="hidden md:table-cell">"Prioridad"</th>
                                            <th>"Estado"</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        <Show when=move || disponibles().is_empty()>
                                            <tr>
                                                <td colspan="5" class="text-center py-8 text-base-content/50">
                                                    "No hay tickets disponibles."
                                                </td>
                                            </tr>
                                        </Show>
                                        <For
                                            each=disponibles
                                            key=|t| t.id
                                            children=move |ticket| {
                                                let id = ticket.id;
                                                view! {
                                                    <tr>
                                                        <td class="font-mono text-sm">{id}</td>
                                                        <td>
                                                            <div class="font-bold text-sm">{ticket.dispositivo()}</div>
                                                            <div class="text-xs opacity-60 max-w-xs truncate">
                                                                {ticket.descripcion_problema.clone()}
                                                            </div>
                                                        </td>
                                                        <td class="hidden md:table-cell">
                                                            <PrioridadBadge prioridad=ticket.prioridad />
                                                        </td>
                                                        <td><EstadoBadge estado=ticket.estado_usuario /></td>
                                                        <td>
                                                            <button
                                                                class="btn btn-primary btn-sm"
                                                                on:click=move |_| claim(id)
                                                            >
                                                                "Tomar"
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
                </Show>

                // 我的工单
                <Show when=move || tab.get() == Tab::Asignados>
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body p-0">
                            <div class="p-6 pb-2">
                                <h3 class="card-title">"Mis tickets"</h3>
                                <p class="text-base-content/70 text-sm">"Equipos asignados a ti."</p>
                            </div>
                            <div class="overflow-x-auto w-full">
                                <table class="table table-zebra w-full">
                                    <thead>
                                        <tr>
                                            <th>"#"</th>
                                            <th>"Equipo"</th>
                                            <th>"Estado interno"</th>
                                            <th class="hidden md:table-cell">"Estado cliente"</th>
                                            <th class="hidden md:table-cell">"Costo"</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        <Show when=move || mine.get().is_empty() && !loading_mine.get()>
                                            <tr>
                                                <td colspan="6" class="text-center py-8 text-base-content/50">
                                                    "No tienes tickets asignados."
                                                </td>
                                            </tr>
                                        </Show>
                                        <Show when=move || loading_mine.get() && mine.get().is_empty()>
                                            <tr>
                                                <td colspan="6" class="text-center py-8 text-base-content/50">
                                                    <span class="loading loading-spinner loading-md"></span> " Cargando..."
                                                </td>
                                            </tr>
                                        </Show>
                                        <For
                                            each=move || mine.get()
                                            key=|t| (t.id, t.estado_interno, t.updated_at)
                                            children=move |ticket| {
                                                let editable = ticket.clone();
                                                view! {
                                                    <tr>
                                                        <td class="font-mono text-sm">{ticket.id}</td>
                                                        <td>
                                                            <div class="font-bold text-sm">{ticket.dispositivo()}</div>
                                                        </td>
                                                        <td><EstadoInternoBadge estado=ticket.estado_interno /></td>
                                                        <td class="hidden md:table-cell">
                                                            <EstadoBadge estado=ticket.estado_usuario />
                                                        </td>
                                                        <td class="hidden md:table-cell font-mono text-sm">
                                                            {ticket.costo_total.map(|c| format!("${:.2}", c)).unwrap_or_else(|| "—".to_string())}
                                                        </td>
                                                        <td>
                                                            <button
                                                                class="btn btn-outline btn-sm"
                                                                on:click=move |_| open_editor(editable.clone())
                                                            >
                                                                "Actualizar"
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
                </Show>

                // 更新对话框
                <Show when=move || editing.get().is_some()>
                    <dialog class="modal modal-open">
                        <div class="modal-box">
                            <h3 class="font-bold text-lg">
                                {move || format!("Ticket #{}", editing.get().map(|t| t.id).unwrap_or_default())}
                            </h3>
                            <p class="py-2 text-base-content/70 text-sm">
                                "El servidor valida la transición de estados; aquí solo se solicita."
                            </p>

                            <form on:submit=save_edit class="space-y-4">
                                <div class="grid grid-cols-2 gap-4">
                                    <div class="form-control">
                                        <label class="label" for="estado-interno">
                                            <span class="label-text">"Estado interno"</span>
                                        </label>
                                        <select
                                            id="estado-interno"
                                            class="select select-bordered"
                                            on:change=move |ev| {
                                                let value = event_target_value(&ev);
                                                if let Some(e) = EstadoInterno::ALL.into_iter().find(|e| e.as_str() == value) {
                                                    set_estado_interno.set(e);
                                                }
                                            }
                                            prop:value=move || estado_interno.get().as_str()
                                        >
                                            {EstadoInterno::ALL
                                                .into_iter()
                                                .map(|e| view! { <option value=e.as_str()>{e.label()}</option> })
                                                .collect_view()}
                                        </select>
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="estado-usuario">
                                            <span class="label-text">"Estado para el cliente"</span>
                                        </label>
                                        <select
                                            id="estado-usuario"
                                            class="select select-bordered"
                                            on:change=move |ev| {
                                                let value = event_target_value(&ev);
                                                if let Some(e) = EstadoUsuario::ALL.into_iter().find(|e| e.as_str() == value) {
                                                    set_estado_usuario.set(e);
                                                }
                                            }
                                            prop:value=move || estado_usuario.get().as_str()
                                        >
                                            {EstadoUsuario::ALL
                                                .into_iter()
                                                .map(|e| view! { <option value=e.as_str()>{e.label()}</option> })
                                                .collect_view()}
                                        </select>
                                    </div>
                                </div>

                                <div class="grid grid-cols-2 gap-4">
                                    <div class="form-control">
                                        <label class="label" for="costo">
                                            <span class="label-text">"Costo total"</span>
                                        </label>
                                        <input
                                            id="costo"
                                            type="number"
                                            step="0.01"
                                            min="0"
                                            class="input input-bordered"
                                            on:input=move |ev| set_costo.set(event_target_value(&ev))
                                            prop:value=costo
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="abono">
                                            <span class="label-text">"Abono"</span>
                                        </label>
                                        <input
                                            id="abono"
                                            type="number"
                                            step="0.01"
                                            min="0"
                                            class="input input-bordered"
                                            on:input=move |ev| set_abono.set(event_target_value(&ev))
                                            prop:value=abono
                                        />
                                    </div>
                                </div>

                                <div class="form-control">
                                    <label class="label" for="observaciones">
                                        <span class="label-text">"Observaciones"</span>
                                    </label>
                                    <textarea
                                        id="observaciones"
                                        class="textarea textarea-bordered"
                                        rows="3"
                                        on:input=move |ev| set_observaciones.set(event_target_value(&ev))
                                        prop:value=observaciones
                                    ></textarea>
                                </div>

                                <div class="modal-action">
                                    <button
                                        type="button"
                                        class="btn btn-ghost"
                                        on:click=move |_| set_editing.set(None)
                                    >
                                        "Cancelar"
                                    </button>
                                    <button class="btn btn-primary" disabled=move || saving.get()>
                                        {move || if saving.get() {
                                            view! { <span class="loading loading-spinner"></span> "Guardando..." }.into_any()
                                        } else {
                                            "Guardar cambios".into_any()
                                        }}
                                    </button>
                                </div>
                            </form>
                        </div>
                    </dialog>
                </Show>
            </div>
        </div>
    }
}
