use pushbox::{
    config::AppConfig,
    db,
    repositories::{SqliteNotificationRepository, SqliteTokenRepository, SqliteUserRepository},
    services::{HttpPushGateway, NotificationService, TokenService, UserService},
    AppState,
};

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pushbox=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup configuration: the one place a fatal exit is acceptable.
    let config = AppConfig::from_env()?;

    // Database connection
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Initialize repositories
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let token_repository = Arc::new(SqliteTokenRepository::new(pool.clone()));
    let notification_repository = Arc::new(SqliteNotificationRepository::new(pool.clone()));

    // Initialize services
    let push_gateway = Arc::new(HttpPushGateway::new(&config.push_gateway));
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let token_service = Arc::new(TokenService::new(
        token_repository.clone(),
        user_repository.clone(),
    ));
    let notification_service = Arc::new(NotificationService::new(
        token_repository,
        notification_repository,
        push_gateway,
    ));

    // Create app state
    let app_state = AppState {
        user_service,
        token_service,
        notification_service,
        pool: pool.clone(),
    };

    let app = pushbox::app(app_state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
