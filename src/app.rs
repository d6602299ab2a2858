use std::sync::Arc;
use std::time::Instant;

use actix_web::{
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use env_logger::Env;
use log::{debug, info};

use crate::{
    cache::RedisCache,
    config::{AnalyticsBackend, CacheBackend, Config, Environment},
    db::Database,
    errors::AppError,
    metrics::Metrics,
    middleware::RequestMetrics,
    repositories::{
        MemoryUrlAnalyticRepository, MemoryUrlCacheRepository, PgUrlAnalyticRepository,
        RedisUrlCacheRepository, UrlAnalyticRepositoryTrait, UrlCacheRepositoryTrait,
    },
    routes, services,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info,sqlx=warn".to_string(),
        Environment::Production => "info,actix_web=warn,sqlx=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

async fn cache_store(config: &Config) -> AppResult<Arc<dyn UrlCacheRepositoryTrait>> {
    match config.store.cache {
        CacheBackend::Redis => {
            let cache = RedisCache::connect(&config.redis)
                .await
                .map_err(|e| AppError::Store(format!("Failed to connect to Redis: {}", e)))?;
            Ok(Arc::new(RedisUrlCacheRepository::new(&cache)))
        }
        CacheBackend::Memory => {
            info!("Using in-memory cache store; links do not survive a restart");
            Ok(Arc::new(MemoryUrlCacheRepository::new()))
        }
    }
}

async fn analytics_store(
    config: &Config,
) -> AppResult<(Arc<dyn UrlAnalyticRepositoryTrait>, Option<Database>)> {
    match config.store.analytics {
        AnalyticsBackend::Postgres => {
            let db = Database::connect(&config.db).await?;
            Ok((Arc::new(PgUrlAnalyticRepository::new(&db)), Some(db)))
        }
        AnalyticsBackend::Memory => {
            info!("Using in-memory analytics store; statistics do not survive a restart");
            Ok((Arc::new(MemoryUrlAnalyticRepository::new()), None))
        }
    }
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Stores: cache={:?}, analytics={:?}",
        config.store.cache, config.store.analytics
    );
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    let metrics = Arc::new(
        Metrics::new().map_err(|e| AppError::Internal(format!("Failed to build metrics: {}", e)))?,
    );
    let cache = cache_store(&config).await?;
    let (analytics, db) = analytics_store(&config).await?;

    // Determine log format based on environment
    let log_format = if config.app.environment == Environment::Production {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}o"
    } else {
        "%a \"%r\" %s %b %T"
    };

    let version = config.app.version.clone();

    // Start the HTTP server
    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                version: version.clone(),
                cache: Arc::clone(&cache),
                analytics: Arc::clone(&analytics),
            }))
            .app_data(web::Data::from(Arc::clone(&metrics)))
            .wrap(RequestMetrics::new(Arc::clone(&metrics)))
            .wrap(Logger::new(log_format))
            // Add request tracking ID
            .wrap(DefaultHeaders::new().add(("X-Request-ID", uuid::Uuid::new_v4().to_string())))
            .configure(|cfg| {
                services::register(
                    Arc::clone(&cache),
                    Arc::clone(&analytics),
                    Arc::clone(&metrics),
                    cfg,
                )
            })
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await;

    if let Some(db) = db {
        db.shutdown().await;
    }

    result.map_err(AppError::from)
}
