use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use luxueux_backend::auth::session::SessionStore;
use luxueux_backend::config::AppConfig;
use luxueux_backend::create_pool;
use luxueux_backend::handlers;
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    let sessions = web::Data::new(SessionStore::new(
        config.auth.session_max_age,
        config.auth.session_idle_timeout,
    ));
    let db_data = web::Data::new(db);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let json_body_limit = config.json_body_limit;
    let frontend_dir = config.frontend_dir.clone();
    if let Some(dir) = &frontend_dir {
        tracing::info!("Serving frontend from {}", dir.display());
    }
    let config_data = web::Data::new(config);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let frontend_dir = frontend_dir.clone();
        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(sessions.clone())
            .app_data(handlers::json_config(json_body_limit))
            .app_data(handlers::query_config())
            .service(web::scope("/api").configure(handlers::init_routes))
            .configure(move |cfg| {
                if let Some(dir) = frontend_dir {
                    cfg.service(Files::new("/", dir).index_file("index.html"));
                }
            })
    })
    .bind(&bind_addr)?
    .run()
    .await
}
