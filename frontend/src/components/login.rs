use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::icons::Wrench;
use crate::session::{login, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = move || session.state.with(|s| s.is_loading());

    view! {
        <Show when=move || !is_loading() fallback=|| view! { <div class="flex items-center justify-center min-h-screen"><span class="loading loading-spinner loading-lg text-primary"></span></div> }>
            {
                let on_submit = move |ev: web_sys::SubmitEvent| {
                    ev.prevent_default();
                    if email.get().is_empty() || password.get().is_empty() {
                        set_error_msg.set(Some("Completa todos los campos".to_string()));
                        return;
                    }

                    set_is_submitting.set(true);
                    set_error_msg.set(None);

                    spawn_local(async move {
                        // 使用返回的 user（状态更新的可见性不保证同步）
                        match login(session, email.get(), password.get()).await {
                            Ok(user) => {
                                router.navigate(AppRoute::landing_for(user.role));
                            }
                            Err(e) => {
                                log::warn!("login fallido: {}", e);
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
                                    <h1 class="text-3xl font-bold">"ServiTec"</h1>
                                    <p class="text-base-content/70">
                                        "Ingresa con tu cuenta para continuar"
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
                                        <label class="label" for="email">
                                            <span class="label-text">"Correo electrónico"</span>
                                        </label>
                                        <input
                                            id="email"
                                            type="email"
                                            placeholder="tu@correo.com"
                                            on:input=move |ev| set_email.set(event_target_value(&ev))
                                            prop:value=email
                                            class="input input-bordered"
                                            required
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label" for="password">
                                            <span class="label-text">"Contraseña"</span>
                                        </label>
                                        <input
                                            id="password"
                                            type="password"
                                            placeholder="••••••••"
                                            on:input=move |ev| set_password.set(event_target_value(&ev))
                                            prop:value=password
                                            class="input input-bordered"
                                            required
                                        />
                                    </div>
                                    <div class="form-control mt-6">
                                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                            {move || if is_submitting.get() {
                                                view! { <span class="loading loading-spinner"></span> "Ingresando..." }.into_any()
                                            } else {
                                                "Iniciar sesión".into_any()
                                            }}
                                        </button>
                                    </div>
                                    <div class="text-center mt-2">
                                        <button
                                            type="button"
                                            class="btn btn-link btn-sm"
                                            on:click=move |_| router.navigate(AppRoute::Register)
                                        >
                                            "¿No tienes cuenta? Regístrate"
                                        </button>
                                    </div>
                                </form>
                            </div>
                        </div>
                    </div>
                }
            }
        </Show>
    }
}
