use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;

use visit_tracker::config::Config;
use visit_tracker::db::backend::{OpenStore, open_store};
use visit_tracker::middlewares::cors::build_cors;
use visit_tracker::routes::init_routes;
use visit_tracker::state::app_state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    // Initialize the store
    let OpenStore { store, client } = match open_store(&config).await {
        Ok(opened) => opened,
        Err(e) => {
            log::error!("Error opening the visitor store: {e:#}");
            std::process::exit(1);
        }
    };

    // Create shared state
    let app_state = web::Data::new(AppState::new(store, config.placeholder_ip));

    let cors_origins = config.cors_origins.clone();
    log::info!(
        "Tracking server running on {}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        App::new()
            .wrap(logger)
            .wrap(build_cors(&cors_origins))
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    // The server has drained; release pooled connections before exiting
    if let Some(client) = client {
        client.shutdown().await;
    }
    log::info!("Tracking server stopped");

    Ok(())
}
