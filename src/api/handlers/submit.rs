// src/api/handlers/submit.rs - request dispatcher for editor submissions
use actix_web::error::UrlencodedError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, HttpResponseBuilder};
use serde::Deserialize;
use uuid::Uuid;
use crate::api::AppState;
use crate::errors::PipelineError;
use crate::models::{Action, Submission};
use crate::render;
use crate::runner::Theme;
use super::assets::{page_shell_response, HTML_CONTENT_TYPE};

pub const DOWNLOAD_EXTENSION: &str = ".php";

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub runphp_data: Option<String>,
}

/// Ensure the name ends in the download extension and is safe to put in a header.
pub fn download_filename(name: &str) -> String {
    let mut filename: String = name.chars().filter(|c| !c.is_control()).collect();
    if !filename.ends_with(DOWNLOAD_EXTENSION) {
        filename.push_str(DOWNLOAD_EXTENSION);
    }
    filename
}

fn no_cache(status: StatusCode) -> HttpResponseBuilder {
    let last_modified = chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    let mut builder = HttpResponse::build(status);
    builder
        .insert_header(("Expires", "Mon, 16 Apr 2012 05:00:00 GMT"))
        .insert_header(("Last-Modified", last_modified))
        .insert_header(("Cache-Control", "no-store, no-cache, must-revalidate"))
        .append_header(("Cache-Control", "post-check=0, pre-check=0"))
        .insert_header(("Content-Type", HTML_CONTENT_TYPE))
        .insert_header(("Pragma", "no-cache"))
        .insert_header(("X-XSS-Protection", "0"));
    builder
}

fn error_response(request_id: &str, err: &PipelineError) -> HttpResponse {
    log::error!("[{}] {}", request_id, err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    no_cache(status).body(render::error_block(&err.to_string()))
}

fn download(submission: &Submission) -> HttpResponse {
    let filename = download_filename(&submission.filename);
    log::info!("Download of {} ({} bytes)", filename, submission.code.len());
    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/plain"))
        .insert_header(("Content-Disposition", format!("attachment; filename={}", filename)))
        .body(submission.code.clone())
}

/// Map a failed form extraction. `None` means there was no form to decode at all.
fn form_error(err: &actix_web::Error) -> Option<PipelineError> {
    match err.as_error::<UrlencodedError>() {
        Some(UrlencodedError::ContentType) => None,
        Some(UrlencodedError::Overflow { limit, .. }) => {
            Some(PipelineError::PayloadTooLarge { limit: *limit })
        }
        _ => Some(PipelineError::InvalidForm(err.to_string())),
    }
}

pub async fn submit(
    state: web::Data<AppState>,
    form: Result<web::Form<SubmitForm>, actix_web::Error>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let form = match form {
        Ok(form) => form.into_inner(),
        Err(err) => match form_error(&err) {
            Some(e) => return error_response(&request_id, &e),
            None => return page_shell_response(),
        },
    };
    let Some(raw) = form.runphp_data else {
        return page_shell_response();
    };

    let submission = match Submission::from_json(&raw) {
        Ok(submission) => submission,
        Err(e) => return error_response(&request_id, &e),
    };

    match submission.action {
        Action::Download => download(&submission),
        Action::Page => page_shell_response(),
        Action::Refactor => {
            log::info!("[{}] Refactor requested", request_id);
            match state.refactor.refactor(&state.workspace, submission.source()).await {
                Ok(formatted) => no_cache(StatusCode::OK).body(render::refactor_block(&formatted)),
                Err(e) => error_response(&request_id, &e),
            }
        }
        Action::Run => {
            log::info!(
                "[{}] Run requested (error_reporting={:?})",
                request_id,
                submission.settings.error_reporting
            );
            let theme = Theme {
                bgcolor: &submission.bgcolor,
                color: &submission.color,
            };
            match state
                .engine
                .execute(&state.workspace, submission.source(), &submission.settings, theme)
                .await
            {
                Ok(html) => no_cache(StatusCode::OK).body(html),
                Err(e) => error_response(&request_id, &e),
            }
        }
    }
}
