use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use serde::Serialize;

use tracing_actix_web::TracingLogger;

use crate::controller::{auth, definitions, users};
use crate::crypto::TokenIssuer;
use crate::database::Database;
use crate::domain::CatalogCache;
use crate::error::{route_not_found, validation_error};
use crate::insights::Advisor;

/// Public metadata about the running service
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub title: String,
    pub version: String,
    pub description: String,
}

#[derive(Serialize)]
struct Welcome<'a> {
    message: String,
    version: &'a str,
}

#[tracing::instrument(name = "Root", skip(info))]
#[get("/")]
async fn root(info: web::Data<AppInfo>) -> impl Responder {
    HttpResponse::Ok().json(Welcome {
        message: format!("Welcome to the {}", info.title),
        version: &info.version,
    })
}

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    database: Database,
    advisor: Advisor,
    token_issuer: TokenIssuer,
    info: AppInfo,
) -> anyhow::Result<Server> {
    // Wrap application data
    let database = web::Data::new(database);
    let advisor = web::Data::new(advisor);
    let token_issuer = web::Data::new(token_issuer);
    let info = web::Data::new(info);
    let catalog = web::Data::new(CatalogCache::new());

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(|e, _| validation_error(e)))
            .app_data(web::PathConfig::default().error_handler(|e, _| validation_error(e)))
            .app_data(web::FormConfig::default().error_handler(|e, _| validation_error(e)))
            .app_data(database.clone())
            .app_data(advisor.clone())
            .app_data(token_issuer.clone())
            .app_data(info.clone())
            .app_data(catalog.clone())
            .service(root)
            .service(health_check)
            .service(users::scope())
            .service(definitions::scope())
            .service(auth::scope())
            .default_service(web::to(route_not_found))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
