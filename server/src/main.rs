use std::net::SocketAddr;

use driver::config::StoreBackend;
use driver::database::{MemoryDatabase, PostgresDatabase};
use error_stack::ResultExt;
use kernel::KernelError;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::AppConfig;
use crate::error::StackTrace;
use crate::handler::{AppModule, Store};

mod config;
mod controller;
mod error;
mod handler;
mod request;
mod response;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let config = AppConfig::load()?;

    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "application=debug,driver=debug,server=debug,reconciliation=error,tower_http=debug,sqlx=info".into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    match config.store.backend {
        StoreBackend::Postgres => {
            let database = PostgresDatabase::from_config(&config.store).await?;
            database.migrate().await?;
            let served = serve(AppModule::new(database.clone()), config.port).await;
            database.close().await;
            served?;
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on shutdown");
            let database = MemoryDatabase::with_timeout(config.store.operation_timeout);
            serve(AppModule::new(database), config.port).await?;
        }
    }

    tracing::info!("shut down");
    Ok(())
}

async fn serve<D: Store>(module: AppModule<D>, port: u16) -> error_stack::Result<(), KernelError> {
    let bind = SocketAddr::from(([0, 0, 0, 0], port));
    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to listen tcp")?;
    tracing::info!("listening on {bind}");

    axum::serve(tcp, route::router(module).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .change_context_lazy(|| KernelError::Internal)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {error}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
