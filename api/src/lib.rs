mod config;
mod dto;
mod error;
mod handlers;
mod mailer;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use lettre::message::Mailbox;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tera::Tera;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, MailConfig};
pub use error::ApiError;
pub use mailer::{MailPolicy, MailTransport, Mailer, SmtpMailTransport};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub templates: Tera,
    pub mailer: Mailer,
    pub mail_from: Mailbox,
}

/// Loads the bundled text templates.
pub fn load_templates() -> tera::Result<Tera> {
    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
}

/// Builds the full router; tests drive it directly without a listener.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/customers",
            get(handlers::customers::list).post(handlers::customers::create),
        )
        .route(
            "/customers/{slug}",
            get(handlers::customers::get)
                .put(handlers::customers::update)
                .delete(handlers::customers::delete),
        )
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/products/{code}",
            get(handlers::products::get)
                .put(handlers::products::update)
                .delete(handlers::products::delete),
        )
        .route(
            "/quotations",
            get(handlers::quotations::list).post(handlers::quotations::create),
        )
        .route(
            "/quotations/{id}",
            get(handlers::quotations::detail).delete(handlers::quotations::delete),
        )
        .route(
            "/quotations/{id}/status",
            patch(handlers::quotations::set_status),
        )
        .route(
            "/quotations/{id}/lines",
            post(handlers::quotations::add_line),
        )
        .route("/quotations/{id}/pdf", get(handlers::quotations::export_pdf))
        .route(
            "/bills",
            get(handlers::bills::list).post(handlers::bills::create),
        )
        .route(
            "/bills/{id}",
            get(handlers::bills::detail).delete(handlers::bills::delete),
        )
        .route("/bills/{id}/status", patch(handlers::bills::set_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let db = comptoir_service::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    let transport = Arc::new(SmtpMailTransport::from_config(&config.mail)?);
    let mailer = Mailer::spawn(transport, config.mail.policy.clone(), config.mail.queue_size);

    let state = AppState {
        db,
        templates: load_templates()?,
        mailer,
        mail_from: config.mail.sender.clone(),
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}

pub fn main() {
    let result = start();

    if let Some(err) = result.err() {
        println!("Error: {err}");
    }
}
