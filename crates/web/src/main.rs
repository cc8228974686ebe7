use anyhow::Context;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod notifier;
mod payment_gateway;
mod routes;
mod state;

use config::Config;
use features::{admin, events, payments, registrations};
use middleware::auth::JwtKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        events::handlers::list_events,
        events::handlers::get_event,
        events::handlers::create_event,
        registrations::handlers::submit_registration,
        registrations::handlers::spot_register,
        registrations::handlers::list_my_registrations,
        registrations::handlers::check_registration,
        payments::handlers::create_order,
        payments::handlers::verify_payment,
        payments::handlers::record_failure,
        admin::handlers::update_event,
        admin::handlers::delete_event,
        admin::handlers::toggle_registration,
        admin::handlers::assign_manager,
        admin::handlers::list_registrations,
        admin::handlers::export_registrations,
        admin::handlers::delete_registration,
    ),
    components(
        schemas(
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::event::ToggleRegistrationResponse,
            storage::dto::registration::RegistrationRequest,
            storage::dto::registration::RegistrationCreatedResponse,
            storage::dto::registration::RegistrationDetails,
            storage::dto::registration::CheckRegistrationResponse,
            storage::dto::payment::FreeEventResponse,
            storage::dto::payment::CreateOrderResponse,
            storage::dto::payment::VerifyPaymentRequest,
            storage::dto::payment::PaymentFailureRequest,
            storage::dto::payment::VerifyPaymentResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Event,
            storage::models::Registration,
            storage::models::RegistrationWithEvent,
            storage::models::TeamLeaderDetails,
            storage::models::TeamMember,
            storage::models::PaymentStatus,
            storage::models::Role,
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "events", description = "Event catalogue"),
        (name = "registrations", description = "Participant and spot registration"),
        (name = "payments", description = "Gateway orders and payment callbacks"),
        (name = "admin", description = "Event and registration administration"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting fest registration API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        payment_enforcement = %config.payment_enforcement,
        "Configuration loaded successfully"
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let state = AppState::from_config(db, &config).context("Failed to build application state")?;
    let keys = JwtKeys::from_secret(&config.jwt_secret);

    let app = routes::router(state, keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive());

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
