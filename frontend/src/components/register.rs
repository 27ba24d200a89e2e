use leptos::prelude::*;
use leptos::task::spawn_local;

use servitec_shared::protocol::RegisterRequest;

use crate::components::icons::Wrench;
use crate::session::register;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (telefono, set_telefono) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (password_confirmation, set_password_confirmation) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        if password.get() != password_confirmation.get() {
            set_error_msg.set(Some("Las contraseñas no coinciden".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let form = RegisterRequest {
            name: name.get(),
            email: email.get(),
            telefono: {
                let t = telefono.get();
                if t.trim().is_empty() { None } else { Some(t) }
            },
            password: password.get(),
            password_confirmation: password_confirmation.get(),
        };

        spawn_local(async move {
            match register(form).await {
                Ok(()) => {
                    // 注册不自动登录，跳回登录页
                    router.navigate(AppRoute::Login);
                }
                Err(e) => {
                    log::warn!("registro fallido: {}", e);
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Wrench attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Crear cuenta"</h1>
                        <p class="text-base-content/70">
                            "Registra tus datos para dar seguimiento a tus reparaciones"
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Nombre completo"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg-email">
                                <span class="label-text">"Correo electrónico"</span>
                            </label>
                            <input
                                id="reg-email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="telefono">
                                <span class="label-text">"Teléfono (opcional)"</span>
                            </label>
                            <input
                                id="telefono"
                                type="tel"
                                on:input=move |ev| set_telefono.set(event_target_value(&ev))
                                prop:value=telefono
                                class="input input-bordered"
                            />
                        </div>
                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="reg-password">
                                    <span class="label-text">"Contraseña"</span>
                                </label>
                                <input
                                    id="reg-password"
                                    type="password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="reg-password2">
                                    <span class="label-text">"Confirmar"</span>
                                </label>
                                <input
                                    id="reg-password2"
                                    type="password"
                                    on:input=move |ev| set_password_confirmation.set(event_target_value(&ev))
                                    prop:value=password_confirmation
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Enviando..." }.into_any()
                                } else {
                                    "Registrarme".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center mt-2">
                            <button
                                type="button"
                                class="btn btn-link btn-sm"
                                on:click=move |_| router.navigate(AppRoute::Login)
                            >
                                "Ya tengo cuenta"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
