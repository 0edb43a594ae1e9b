//! SQLx Postgres 连接池初始化与健康检查
//!
//! 连接池是进程级资源：启动时创建、注入 Repository，停机时显式关闭。
//! 池大小即并发事务数上限。
//!
//! 用法：
//! let pool = init_pool(&config.database).await?;
//! run_migrations(&pool).await?;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::DatabaseConfig;

pub type PgPool = sqlx::Pool<sqlx::Postgres>;

fn pool_options(config: &DatabaseConfig) -> sqlx::postgres::PgPoolOptions {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        // 确保连接在使用前是有效的，避免使用已断开的连接
        .test_before_acquire(true)
}

/// 初始化连接池并验证连接
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options(config)
        .connect(&config.url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;

    // 验证连接
    health_check(&pool).await?;

    Ok(pool)
}

/// 执行内嵌的数据库迁移
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(())
}

/// 健康检查
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// 停机时关闭连接池（等待借出的连接归还）
pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}
