use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use photo_portfolio::config::Config;
use photo_portfolio::routes;
use photo_portfolio::utils::media_host::{CloudinaryClient, MediaHost};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();

    let missing = config.media_host.missing_vars();
    if !missing.is_empty() {
        warn!(?missing, "media host is not fully configured, see /api/test-env");
    }

    let host: Arc<dyn MediaHost> = Arc::new(CloudinaryClient::new(&config.media_host));
    let host_data = web::Data::from(host);
    let media_host_config = web::Data::new(config.media_host.clone());
    let photo_settings = web::Data::new(config.photos.clone());
    let port = config.port;
    let config_data = web::Data::new(config);

    info!("Binding to 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(host_data.clone())
            .app_data(media_host_config.clone())
            .app_data(photo_settings.clone())
            .app_data(config_data.clone())
            .configure(routes::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
