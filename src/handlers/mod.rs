pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod orders;

use actix_web::web;

use crate::error::{json_error_handler, query_error_handler};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));

    // ── Auth routes (login is public, the rest need a session) ──
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/session", web::get().to(auth::session)),
    );

    // ── Client routes (all protected) ──
    // The admin pages address rows with `?id=`; `/{id}` is the REST form.
    cfg.service(
        web::resource("/clients")
            .route(web::get().to(clients::get_clients))
            .route(web::post().to(clients::create_client))
            .route(web::put().to(clients::update_client_by_query))
            .route(web::delete().to(clients::delete_client_by_query)),
    );
    cfg.service(
        web::resource("/clients/{id}")
            .route(web::get().to(clients::get_client))
            .route(web::put().to(clients::update_client))
            .route(web::delete().to(clients::delete_client)),
    );

    // ── Order routes (all protected) ──
    cfg.service(
        web::resource("/orders")
            .route(web::get().to(orders::get_orders))
            .route(web::post().to(orders::create_order))
            .route(web::put().to(orders::update_order_by_query))
            .route(web::delete().to(orders::delete_order_by_query)),
    );
    // Registered before `/orders/{id}` so it is not parsed as an id.
    cfg.service(
        web::resource("/orders/next-number").route(web::get().to(orders::get_next_order_number)),
    );
    cfg.service(
        web::resource("/orders/{id}")
            .route(web::get().to(orders::get_order))
            .route(web::put().to(orders::update_order))
            .route(web::delete().to(orders::delete_order)),
    );
    cfg.service(
        web::resource("/orders/{id}/deliver").route(web::post().to(orders::mark_delivered)),
    );

    cfg.route("/dashboard", web::get().to(dashboard::get_dashboard));
}

/// JSON body settings shared by the server and the tests.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(json_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
