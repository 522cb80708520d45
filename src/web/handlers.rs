// src/web/handlers.rs
use crate::error::PipelineError;
use crate::notion::SchemaStore;
use crate::web::types::*;

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn scrape_job_handler(
    request: Json<JobScrapeRequest>,
    state: &State<AppState>,
) -> Result<Json<ScrapeResponse>, Custom<Json<ErrorResponse>>> {
    if url::Url::parse(&request.url).is_err() {
        return Err(Custom(
            Status::BadRequest,
            Json(ErrorResponse::new("Invalid job page URL.")),
        ));
    }

    if request.page_content.is_some() {
        info!("Ignoring provided page content; re-rendering server-side");
    }

    match state.pipeline.handle(&request.url).await {
        Ok(()) => Ok(Json(ScrapeResponse {
            status: "success".to_string(),
            message: "Job scraped and being added to Notion".to_string(),
        })),
        Err(PipelineError::FetchTransport(reason)) => {
            error!("Error fetching page: {}", reason);
            Err(Custom(
                Status::BadRequest,
                Json(ErrorResponse::new("Failed to fetch job page.")),
            ))
        }
        Err(e) => {
            error!("Unexpected error in scrape-job endpoint: {}", e);
            Err(Custom(
                Status::InternalServerError,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}

pub async fn health_handler(state: &State<AppState>) -> Result<Json<HealthResponse>, Status> {
    if !state.config.has_notion_credentials() {
        error!("NOTION_TOKEN or NOTION_DATABASE_ID not set in environment");
        return Err(Status::ServiceUnavailable);
    }

    // Credentials were checked above, so the id is present.
    let database_id = state.config.notion_database_id.as_deref().unwrap_or_default();

    match state.notion.database_properties(database_id).await {
        Ok(properties) => {
            info!(
                "Successfully accessed the destination database ({} properties)",
                properties.len()
            );
            Ok(Json(HealthResponse {
                status: "healthy".to_string(),
            }))
        }
        Err(e) => {
            error!("Failed to access Notion database: {:#}", e);
            Err(Status::ServiceUnavailable)
        }
    }
}

pub async fn hello_world_handler() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello, World!".to_string(),
    })
}
