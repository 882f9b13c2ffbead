// src/main.rs
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use servicemart_be::config::{mask_key, Config};
use servicemart_be::{routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Supabase URL: {}", config.supabase_url);
    info!("Supabase Key: {}", mask_key(&config.supabase_service_role_key));
    if config.jwt_secret.is_none() {
        info!("SUPABASE_JWT_SECRET not set, tokens will be checked against the auth service");
    }
    if config.admin_emails.is_empty() {
        info!("ADMIN_EMAILS is empty, only users with the admin role can use the admin API");
    }

    let state = match AppState::new(config.clone()) {
        Ok(s) => web::Data::new(s),
        Err(e) => {
            error!("Failed to initialise services: {:#}", e);
            std::process::exit(1);
        }
    };

    let bind_address = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", bind_address);

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(config.max_upload_bytes * 3))
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
