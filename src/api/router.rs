// src/api/router.rs

use axum::{
    handler::Handler,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handler::{auth, basculas, pacientes, status, temperaturas, usuarios};
use super::middleware::{auth_gate, flash_failures, load_flashes, require_role, ADMIN_ONLY};
use crate::models::AppState;
use crate::services::auth_service::session_layer;

pub fn build_router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/api/status", get(status::status))
        .route("/api/auth/registro", post(auth::registro))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verificar", get(auth::verificar))
        .route("/api/auth/usuario", get(auth::usuario_actual))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/mensajes", get(auth::mensajes))
        .route("/logout", get(auth::logout_redirect));

    let admin = Router::new()
        .route("/api/usuarios", get(usuarios::listar_usuarios))
        .route_layer(from_fn(require_role(ADMIN_ONLY)));

    // Layers added later wrap earlier ones, so the gate runs before any
    // role check.
    let gated = Router::new()
        .route("/api/protegido", get(status::protegido))
        .route(
            "/api/pacientes",
            get(pacientes::listar).post(pacientes::crear),
        )
        .route(
            "/api/pacientes/{id}",
            get(pacientes::obtener)
                .put(pacientes::actualizar)
                .delete(pacientes::eliminar.layer(from_fn(require_role(ADMIN_ONLY)))),
        )
        .route("/api/basculas", get(basculas::listar).post(basculas::crear))
        .route(
            "/api/basculas/paciente/{id}",
            get(basculas::por_paciente),
        )
        .route(
            "/api/basculas/paciente/{id}/ultima",
            get(basculas::ultima),
        )
        .route(
            "/api/basculas/{id}",
            get(basculas::obtener)
                .put(basculas::actualizar)
                .delete(basculas::eliminar),
        )
        .route(
            "/api/temperaturas",
            get(temperaturas::listar).post(temperaturas::crear),
        )
        .route(
            "/api/temperaturas/paciente/{id}",
            get(temperaturas::por_paciente),
        )
        .route(
            "/api/temperaturas/{id}",
            get(temperaturas::obtener)
                .put(temperaturas::actualizar)
                .delete(temperaturas::eliminar),
        )
        .merge(admin)
        .route_layer(from_fn(flash_failures))
        .route_layer(from_fn_with_state(state.clone(), auth_gate));

    Router::new()
        .merge(public)
        .merge(gated)
        .fallback(status::not_found)
        .layer(from_fn(load_flashes))
        .layer(session_layer(&state.session))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
}
