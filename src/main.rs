use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use runphp::api::{configure_routes, AppState};
use runphp::banner;
use runphp::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("ℹ️  No .env file loaded: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e)
    })?;

    let state = AppState::new(app_config);

    // The workspace has to be usable before any request touches it.
    state.workspace.ensure().await.map_err(|e| {
        log::error!("{}", e);
        std::io::Error::other(e)
    })?;

    let bind = (state.config.bind_address.clone(), state.config.port);
    println!("📝 Workspace file: {}", state.workspace.path().display());
    println!("🐘 Interpreter: {}", state.config.interpreter.executable);
    println!("🚀 Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(state.form_config())
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
