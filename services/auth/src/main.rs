use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod confirmation;
mod error;
mod jwt;
mod mailer;
mod registration;
mod repositories;
mod routes;
mod settings;

use common::database;

use crate::{
    confirmation::ConfirmationCodes, jwt::JwtService, mailer::Mailer,
    repositories::UserRepository, settings::Settings,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub jwt_service: JwtService,
    pub confirmation_codes: ConfirmationCodes,
    pub mailer: Arc<dyn Mailer>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    let settings = Settings::load()?;

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    // Initialize JWT service
    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;
    info!(
        "Access tokens expire after {} seconds",
        jwt_service.access_token_expiry()
    );

    let mailer = mailer::from_settings(&settings.mail)?;
    info!("Mail backend: {:?}", settings.mail.backend);

    let app_state = AppState {
        user_repository: UserRepository::new(pool),
        jwt_service,
        confirmation_codes: ConfirmationCodes::new(settings.confirmation_ttl_seconds),
        mailer,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!("Authentication service listening on {}", settings.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
