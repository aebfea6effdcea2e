use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::info;

use settleup::{config::Settings, logging::init_logging, routes, store};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_logging(settings.log_format)
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))?;

    let store = store::open(&settings.storage).await?;
    let data = web::Data::from(store.clone());

    info!(
        host = %settings.host,
        port = settings.port,
        backend = settings.storage.name(),
        "starting server"
    );
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    store.close().await;
    info!("server stopped");
    Ok(())
}
