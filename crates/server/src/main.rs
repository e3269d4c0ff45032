mod auth;
mod handlers;
mod pagination;
mod storage;
mod validation;

#[cfg(test)]
mod testing;

use std::{net::SocketAddr, sync::Arc};

use axum::{middleware::from_fn_with_state, Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new(None)?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);
    let server = Server::bind(&server_config.address);
    let config = Arc::new(config);

    server
        .serve(
            app_router(database, config).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

    Ok(())
}

fn app_router(database: Arc<DatabaseConnection>, config: Arc<Config>) -> Router {
    let store = Arc::new(storage::S3MediaStore::new(config.clone()));

    app_router_with_store(database, config, store)
}

fn app_router_with_store(
    database: Arc<DatabaseConnection>,
    config: Arc<Config>,
    store: Arc<dyn storage::MediaStore>,
) -> Router {
    let protected_routes = Router::new()
        .nest("/fax", handlers::fax::routes())
        .nest("/auth", handlers::auth::protected_routes())
        .route_layer(from_fn_with_state(
            database.clone(),
            auth::require_authentication,
        ));

    Router::new()
        .merge(protected_routes)
        .nest("/auth", handlers::auth::routes())
        .nest("/fax/callbacks", handlers::fax::callback_routes())
        .layer(Extension(config))
        .layer(Extension(store))
        .with_state(database)
}
