// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::environment::AppConfig;
use crate::extractor::OpenAiClient;
use crate::notion::NotionClient;
use crate::pipeline::ScrapePipeline;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use std::sync::Arc;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/scrape-job", data = "<request>")]
pub async fn scrape_job(
    request: Json<JobScrapeRequest>,
    state: &State<AppState>,
) -> Result<Json<ScrapeResponse>, Custom<Json<ErrorResponse>>> {
    handlers::scrape_job_handler(request, state).await
}

#[get("/health")]
pub async fn health(state: &State<AppState>) -> Result<Json<HealthResponse>, Status> {
    handlers::health_handler(state).await
}

#[get("/hello_world")]
pub async fn hello_world() -> Json<HelloResponse> {
    handlers::hello_world_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request format"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error"))
}

/// Wire the components together and launch the Rocket server.
pub async fn start_web_server(config: AppConfig, port: u16) -> Result<()> {
    let notion = Arc::new(NotionClient::new(config.notion_token.clone())?);
    let completer = Arc::new(OpenAiClient::new(config.openai_api_key.clone())?);
    let pipeline = ScrapePipeline::new(completer, notion.clone(), notion.clone(), &config);

    let state = AppState {
        config,
        notion,
        pipeline,
    };

    info!("Starting Job Tracker API server on port {}", port);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register("/", catchers![bad_request, internal_error])
        .mount("/", routes![scrape_job, health, hello_world, options])
        .launch()
        .await?;

    Ok(())
}
