use leptos::prelude::*;
use leptos::task::spawn_local;

use servitec_shared::Prioridad;
use servitec_shared::protocol::CreateTicketRequest;

use crate::components::icons::Plus;
use crate::session::{create_ticket, use_session};

/// 新建工单对话框
///
/// 提交成功后不在本地拼装条目 —— `create_ticket` 自己重拉集合。
#[component]
pub fn TicketFormDialog(#[prop(into)] on_saved: Callback<()>) -> impl IntoView {
    let session = use_session();

    let (open, set_open) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 表单字段
    let (tipo, set_tipo) = signal("Laptop".to_string());
    let (marca, set_marca) = signal(String::new());
    let (modelo, set_modelo) = signal(String::new());
    let (serie, set_serie) = signal(String::new());
    let (descripcion, set_descripcion) = signal(String::new());
    let (prioridad, set_prioridad) = signal(Prioridad::Media);

    let reset_form = move || {
        set_tipo.set("Laptop".to_string());
        set_marca.set(String::new());
        set_modelo.set(String::new());
        set_serie.set(String::new());
        set_descripcion.set(String::new());
        set_prioridad.set(Prioridad::Media);
        set_error_msg.set(None);
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let form = CreateTicketRequest {
            tipo_dispositivo: tipo.get(),
            marca: marca.get(),
            modelo: modelo.get(),
            numero_serie: {
                let s = serie.get();
                if s.trim().is_empty() { None } else { Some(s) }
            },
            descripcion_problema: descripcion.get(),
            prioridad: prioridad.get(),
        };

        spawn_local(async move {
            match create_ticket(session, form).await {
                Ok(()) => {
                    set_open.set(false);
                    reset_form();
                    on_saved.run(());
                }
                Err(e) => {
                    log::warn!("creación de ticket fallida: {}", e);
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        // 触发按钮
        <button
            class="btn btn-primary gap-2"
            on:click=move |_| set_open.set(true)
        >
            <Plus attr:class="h-4 w-4" /> "Nuevo ticket"
        </button>

        // 模态框内容
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Registrar equipo"</h3>
                <p class="py-4 text-base-content/70">"Datos del dispositivo y del problema reportado."</p>

                <form on:submit=on_submit class="space-y-4">
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap()}</span>
                        </div>
                    </Show>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="tipo" class="label">
                                <span class="label-text">"Tipo de dispositivo"</span>
                            </label>
                            <select
                                id="tipo"
                                class="select select-bordered"
                                on:change=move |ev| set_tipo.set(event_target_value(&ev))
                                prop:value=tipo
                            >
                                <option>"Laptop"</option>
                                <option>"Teléfono"</option>
                                <option>"Tablet"</option>
                                <option>"Computadora"</option>
                                <option>"Consola"</option>
                                <option>"Otro"</option>
                            </select>
                        </div>
                        <div class="form-control">
                            <label for="prioridad" class="label">
                                <span class="label-text">"Prioridad"</span>
                            </label>
                            <select
                                id="prioridad"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    let selected = Prioridad::ALL
                                        .into_iter()
                                        .find(|p| p.as_str() == value)
                                        .unwrap_or_default();
                                    set_prioridad.set(selected);
                                }
                                prop:value=move || prioridad.get().as_str()
                            >
                                {Prioridad::ALL
                                    .into_iter()
                                    .map(|p| view! { <option value=p.as_str()>{p.label()}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="marca" class="label">
                                <span class="label-text">"Marca"</span>
                            </label>
                            <input
                                id="marca"
                                required
                                class="input input-bordered"
                                placeholder="Lenovo"
                                on:input=move |ev| set_marca.set(event_target_value(&ev))
                                prop:value=marca
                            />
                        </div>
                        <div class="form-control">
                            <label for="modelo" class="label">
                                <span class="label-text">"Modelo"</span>
                            </label>
                            <input
                                id="modelo"
                                required
                                class="input input-bordered"
                                placeholder="ThinkPad T14"
                                on:input=move |ev| set_modelo.set(event_target_value(&ev))
                                prop:value=modelo
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="serie" class="label">
                            <span class="label-text">"Número de serie (opcional)"</span>
                        </label>
                        <input
                            id="serie"
                            class="input input-bordered font-mono"
                            on:input=move |ev| set_serie.set(event_target_value(&ev))
                            prop:value=serie
                        />
                    </div>

                    <div class="form-control">
                        <label for="descripcion" class="label">
                            <span class="label-text">"Descripción del problema"</span>
                        </label>
                        <textarea
                            id="descripcion"
                            required
                            class="textarea textarea-bordered"
                            rows="3"
                            on:input=move |ev| set_descripcion.set(event_target_value(&ev))
                            prop:value=descripcion
                        ></textarea>
                    </div>

                    <div class="modal-action">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| set_open.set(false)
                        >
                            "Cancelar"
                        </button>
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Guardando..." }.into_any()
                            } else {
                                "Guardar".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </dialog>
    }
}
