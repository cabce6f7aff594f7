mod api;
mod config;
mod error;
mod filters;
mod handlers;
mod middleware;
mod models;
mod state;
mod utils;

use axum::{
    response::Redirect,
    routing::{get, post, put},
    Router,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use api::HttpApi;
use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let api = HttpApi::new(&config)?;
    log::info!("API REST en {}", config.api_base_url);

    let app = create_router(AppState::new(Arc::new(api), &config));

    let addr = format!("0.0.0.0:{}", config.port);
    log::info!("Colorcor escuchando en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Public routes
        .route("/", get(|| async { Redirect::permanent("/login") }))
        .route("/login", get(handlers::auth::login_page).post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))

        .route("/dashboard", get(handlers::dashboard))
        .route("/catalogos", get(handlers::catalogos))

        // Products
        .route("/productos", get(handlers::productos::list).post(handlers::productos::create))
        .route("/productos/exportar", get(handlers::productos::export))
        .route(
            "/productos/:id",
            get(handlers::productos::get)
                .put(handlers::productos::update)
                .delete(handlers::productos::delete),
        )

        // Suppliers
        .route("/proveedores", get(handlers::proveedores::list).post(handlers::proveedores::create))
        .route("/proveedores/exportar", get(handlers::proveedores::export))
        .route("/proveedores/comparacion", get(handlers::proveedores::comparacion))
        .route(
            "/proveedores/:id",
            get(handlers::proveedores::get)
                .put(handlers::proveedores::update)
                .delete(handlers::proveedores::delete),
        )

        // Clients
        .route("/clientes", get(handlers::clientes::list).post(handlers::clientes::create))
        .route("/clientes/exportar", get(handlers::clientes::export))
        .route(
            "/clientes/:id",
            get(handlers::clientes::get)
                .put(handlers::clientes::update)
                .delete(handlers::clientes::delete),
        )

        // Users and margins, administrators only
        .route("/usuarios", get(handlers::usuarios::list).post(handlers::usuarios::create))
        .route(
            "/usuarios/:id",
            get(handlers::usuarios::get)
                .put(handlers::usuarios::update)
                .delete(handlers::usuarios::delete),
        )
        .route("/margenes", get(handlers::margenes::list).post(handlers::margenes::create))
        .route(
            "/margenes/:id",
            put(handlers::margenes::update).delete(handlers::margenes::delete),
        )
        .route("/margenes/:id/precio", get(handlers::margenes::simulate))

        // Purchase orders
        .route("/notas-pedido", get(handlers::notas_pedido::list).post(handlers::notas_pedido::create))
        .route("/notas-pedido/exportar", get(handlers::notas_pedido::export))
        .route("/notas-pedido/:id", get(handlers::notas_pedido::get))
        .route("/notas-pedido/:id/estado", put(handlers::notas_pedido::change_status))
        .route("/notas-pedido/:id/imprimir", get(handlers::notas_pedido::print))

        // Invoices
        .route("/facturas", get(handlers::facturas::list).post(handlers::facturas::create))
        .route("/facturas/exportar", get(handlers::facturas::export))
        .route("/facturas/:id", get(handlers::facturas::get))
        .route("/facturas/:id/imprimir", get(handlers::facturas::print))

        .nest_service("/static", ServeDir::new("static"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
