//! 工单列表的共享 UI 片段：状态 / 优先级徽章

use leptos::prelude::*;
use servitec_shared::{EstadoInterno, EstadoUsuario, Prioridad};

#[component]
pub fn EstadoBadge(estado: EstadoUsuario) -> impl IntoView {
    view! { <span class=estado.badge_class()>{estado.label()}</span> }
}

#[component]
pub fn EstadoInternoBadge(estado: EstadoInterno) -> impl IntoView {
    view! { <span class=format!("{} badge-outline", estado.badge_class())>{estado.label()}</span> }
}

#[component]
pub fn PrioridadBadge(prioridad: Prioridad) -> impl IntoView {
    view! { <span class=prioridad.badge_class()>{prioridad.label()}</span> }
}
