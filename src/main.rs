mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::JwtValidator;
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::jobs::{CsvExportService, JobWorker, MonthlyReportService, ReminderService};
use crate::features::lots::{routes as lots_routes, LotService, LotStatusCache};
use crate::features::reservations::{routes as reservations_routes, ReservationService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::mail::{HttpMailClient, Mailer};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// TTL of the best-effort lot status cache
const LOT_STATUS_CACHE_TTL: Duration = Duration::from_secs(5);

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth boundary
    let jwt_validator = Arc::new(JwtValidator::new(
        &config.auth.jwt_secret,
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized");

    // Initialize mail client
    let mailer: Arc<dyn Mailer> = Arc::new(HttpMailClient::new(config.mail.clone()));
    tracing::info!("Mail client initialized for {}", config.mail.endpoint);

    // Initialize Lot Service with its status side cache
    let lot_cache = Arc::new(LotStatusCache::new(LOT_STATUS_CACHE_TTL));
    let lot_service = Arc::new(LotService::new(pool.clone(), Arc::clone(&lot_cache)));
    tracing::info!("Lot service initialized");

    // Initialize Reservation Service
    let reservation_service = Arc::new(ReservationService::new(pool.clone()));
    tracing::info!("Reservation service initialized");

    // Initialize User Service
    let user_service = Arc::new(UserService::new(pool.clone()));
    tracing::info!("User service initialized");

    // Initialize Dashboard Service
    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    tracing::info!("Dashboard service initialized");

    // Initialize job services
    let reminder_service = Arc::new(ReminderService::new(
        Arc::clone(&user_service),
        Arc::clone(&mailer),
        config.jobs.reminder_inactive_days,
    ));
    let monthly_report_service = Arc::new(MonthlyReportService::new(
        pool.clone(),
        Arc::clone(&user_service),
        Arc::clone(&mailer),
    ));
    let export_service = Arc::new(CsvExportService::new(
        Arc::clone(&user_service),
        Arc::clone(&reservation_service),
        config.jobs.export_dir.clone(),
    ));
    tracing::info!(
        "Job services initialized (exports to {})",
        export_service.export_dir().display()
    );

    // Spawn the background job worker
    let job_worker = JobWorker::new(
        Arc::clone(&reminder_service),
        Arc::clone(&monthly_report_service),
        &config.jobs,
    );
    tokio::spawn(async move {
        job_worker.run().await;
    });
    tracing::info!("Job worker spawned");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication; role checks happen in
    // the handlers' guards)
    let protected_routes = Router::new()
        .merge(lots_routes::routes(Arc::clone(&lot_service)))
        .merge(users_routes::routes(Arc::clone(&user_service)))
        .merge(dashboard_routes::routes(Arc::clone(&dashboard_service)))
        .merge(reservations_routes::routes(
            Arc::clone(&reservation_service),
            Arc::clone(&export_service),
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
