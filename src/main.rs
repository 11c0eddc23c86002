use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use elysia::logging::init_tracing;
use elysia::router::init_router;
use elysia::sms::create_sms_sender;
use elysia::state::AppStateBuilder;
use elysia::stores::postgres::PgStore;
use elysia_auth::{MemoryDenylist, TokenDenylist, TokenService};
use elysia_cache::{
    CacheConfig, MemoryVerificationCodeStore, RedisCache, RedisTokenDenylist,
    RedisVerificationCodeStore, VerificationCodeStore,
};
use elysia_config::{CorsConfig, JwtConfig, ServerConfig, SmsConfig, VerificationConfig};
use elysia_db::{init_db_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;
    init_tracing(server_config.json_logs);

    let jwt_config = JwtConfig::from_env().context("invalid JWT configuration")?;
    let sms_config = SmsConfig::from_env().context("invalid SMS configuration")?;
    let verification_config =
        VerificationConfig::from_env().context("invalid verification configuration")?;
    let cache_config = CacheConfig::from_env();

    let pool = init_db_pool(
        &server_config.database_url,
        server_config.database_max_connections,
    )
    .await
    .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let (codes, denylist) = match cache_config.redis_url.as_deref() {
        Some(url) => {
            let cache = RedisCache::new(url)
                .await
                .context("failed to connect to Redis")?;
            info!("Using Redis for verification codes and revoked tokens");
            let codes: Arc<dyn VerificationCodeStore> = Arc::new(RedisVerificationCodeStore::new(
                cache.clone(),
                cache_config.key_prefix.clone(),
            ));
            let denylist: Arc<dyn TokenDenylist> =
                Arc::new(RedisTokenDenylist::new(cache, cache_config.key_prefix));
            (codes, denylist)
        }
        None => {
            warn!("REDIS_URL not set; codes and revoked tokens are kept in process memory");
            let codes: Arc<dyn VerificationCodeStore> = Arc::new(MemoryVerificationCodeStore::new());
            let denylist: Arc<dyn TokenDenylist> = Arc::new(MemoryDenylist::new());
            (codes, denylist)
        }
    };

    let state = AppStateBuilder {
        codes,
        sms: create_sms_sender(&sms_config),
        tokens: TokenService::new(jwt_config, denylist),
        sms_config,
        verification_config,
        cors_config: CorsConfig::from_env(),
    }
    .build(Arc::new(PgStore::new(pool)));

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&server_config.addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.addr))?;
    info!(addr = %server_config.addr, "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
