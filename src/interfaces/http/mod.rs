use crate::application::use_cases::contact_import::ContactImportUseCase;
use crate::domain::error::AppError;
use crate::infrastructure::config::ServerConfig;
use crate::infrastructure::db::contacts::ContactRepository;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

pub struct HttpState {
    pub import_use_case: Arc<ContactImportUseCase>,
    pub repository: Arc<ContactRepository>,
    /// Upload bodies larger than this are refused with 413
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadQuery {
    /// Original filename, only used to check the extension
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[post("/users/{user_id}/connections/upload")]
async fn upload_connections(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<UploadQuery>,
    payload: web::Payload,
) -> impl Responder {
    let user_id = path.into_inner();
    let query = query.into_inner();

    if let Err(e) = query.validate() {
        return error_response(&AppError::ValidationError(e.to_string()));
    }

    // reject by name before pulling the body off the wire
    if let Err(e) = data.import_use_case.importer().check_filename(&query.filename) {
        return error_response(&e);
    }

    let body = match payload.to_bytes_limited(data.max_upload_bytes).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            return error_response(&AppError::ValidationError(format!(
                "Failed to read upload: {}",
                e
            )))
        }
        Err(_) => {
            warn!(user_id, limit = data.max_upload_bytes, "Upload too large");
            return HttpResponse::PayloadTooLarge().json(serde_json::json!({
                "detail": format!("File exceeds the {} byte upload limit", data.max_upload_bytes)
            }));
        }
    };

    info!(
        user_id,
        filename = %query.filename,
        bytes = body.len(),
        "Contact upload received"
    );

    match data
        .import_use_case
        .execute(user_id, query.filename, body.to_vec())
        .await
    {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

#[get("/users/{user_id}/connections")]
async fn list_connections(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.repository.list_for_user(path.into_inner()).await {
        Ok(contacts) => HttpResponse::Ok().json(contacts),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &AppError) -> HttpResponse {
    let body = serde_json::json!({ "detail": e.to_string() });
    if e.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        error!(error = %e, "Request failed");
        HttpResponse::InternalServerError().json(body)
    }
}

/// Routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health)
            .service(upload_connections)
            .service(list_connections),
    );
}

pub fn start_server(state: HttpState, config: &ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    info!(host = %config.host, port = config.port, "HTTP server listening");

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::contact_import::ContactImporter;
    use actix_web::{http::StatusCode, test};

    async fn state() -> web::Data<HttpState> {
        state_with_limit(ServerConfig::default().max_upload_bytes).await
    }

    async fn state_with_limit(max_upload_bytes: usize) -> web::Data<HttpState> {
        let repository = Arc::new(ContactRepository::init("sqlite::memory:", 1).await.unwrap());
        let import_use_case = Arc::new(ContactImportUseCase::new(
            Arc::new(ContactImporter::default()),
            repository.clone(),
        ));
        web::Data::new(HttpState {
            import_use_case,
            repository,
            max_upload_bytes,
        })
    }

    #[actix_web::test]
    async fn test_upload_returns_summary() {
        let app = test::init_service(App::new().app_data(state().await).configure(configure)).await;

        let body = "Notes:\nexported today\nFirst Name,Last Name,Company,Position\nJane,Doe,Acme,CTO\n,,Acme,CFO\n";
        let req = test::TestRequest::post()
            .uri("/api/users/5/connections/upload?filename=Connections.csv")
            .set_payload(body)
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["imported_count"], 1);
        assert_eq!(resp["total_errors"], 1);
        assert_eq!(resp["errors"][0], "Row 3: missing name");

        let req = test::TestRequest::get()
            .uri("/api/users/5/connections")
            .to_request();
        let contacts: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(contacts[0]["name"], "Jane Doe");
        assert_eq!(contacts[0]["company"], "Acme");
    }

    #[actix_web::test]
    async fn test_upload_without_header_is_bad_request() {
        let app = test::init_service(App::new().app_data(state().await).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/users/5/connections/upload?filename=c.csv")
            .set_payload("nothing tabular here")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_upload_wrong_extension_is_bad_request() {
        let app = test::init_service(App::new().app_data(state().await).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/users/5/connections/upload?filename=c.pdf")
            .set_payload("First Name,Last Name,Company\nJane,Doe,Acme")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_wrong_extension_is_refused_before_size_check() {
        let app = test::init_service(
            App::new()
                .app_data(state_with_limit(8).await)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users/5/connections/upload?filename=c.pdf")
            .set_payload("First Name,Last Name,Company\nJane,Doe,Acme")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert!(resp["detail"].as_str().unwrap().starts_with("Unsupported file"));
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_refused() {
        let app = test::init_service(
            App::new()
                .app_data(state_with_limit(16).await)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users/5/connections/upload?filename=c.csv")
            .set_payload("First Name,Last Name,Company\nJane,Doe,Acme\n")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let req = test::TestRequest::get()
            .uri("/api/users/5/connections")
            .to_request();
        let contacts: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(contacts.as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn test_undecodable_upload_is_bad_request() {
        let app = test::init_service(App::new().app_data(state().await).configure(configure)).await;

        let mut body = b"First Name,Last Name,Company\nJos".to_vec();
        body.push(0xe9);
        let req = test::TestRequest::post()
            .uri("/api/users/5/connections/upload?filename=c.csv")
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp: serde_json::Value = test::read_body_json(resp).await;
        assert!(resp["detail"].as_str().unwrap().starts_with("Could not decode file"));
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
