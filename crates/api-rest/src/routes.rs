//! HTTP surface for the intake navigator.
//!
//! Response shapes follow the established intake API contract: a `success`
//! flag plus the step lists, page lookup and page metadata a browser needs
//! to render the form and run the client-side navigator offline.

use crate::error::NavigateError;
use crate::navigator::{StepNavigator, StepView};
use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
    routing::get,
    Router,
};
use intake_types::{AnswerSet, TemplatePage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<StepNavigator>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub code: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub require_consent: bool,
    pub show_thankyou_page: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepLists {
    pub all_steps: Vec<String>,
    pub question_steps: Vec<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagesLookup {
    pub by_id: HashMap<String, String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagesMeta {
    pub total: usize,
    pub first_step: String,
    pub current_step: String,
    pub valid: bool,
    pub prev_step: Option<String>,
    pub next_step: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetStepRes {
    pub success: bool,
    pub template: TemplateInfo,
    pub steps: StepLists,
    pub pages_lookup: PagesLookup,
    pub pages_meta: PagesMeta,
    #[schema(value_type = Option<Object>)]
    pub page: Option<TemplatePage>,
}

#[derive(Deserialize, ToSchema)]
pub struct PostStepReq {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: AnswerSet,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostStepRes {
    pub success: bool,
    pub next_step: Option<String>,
    pub persisted: bool,
}

impl From<StepView> for GetStepRes {
    fn from(view: StepView) -> Self {
        GetStepRes {
            success: true,
            template: TemplateInfo {
                code: view.template.code,
                title: view.template.title,
                description: view.template.description,
                require_consent: view.template.require_consent,
                show_thankyou_page: view.template.show_thankyou_page,
            },
            steps: StepLists {
                all_steps: view.all_steps,
                question_steps: view.question_steps,
            },
            pages_lookup: PagesLookup {
                by_id: view.pages_by_id,
            },
            pages_meta: PagesMeta {
                total: view.total,
                first_step: view.first_step,
                current_step: view.current_step,
                valid: view.valid,
                prev_step: view.prev_step,
                next_step: view.next_step,
            },
            page: view.page,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_form, get_step, post_step),
    components(schemas(
        HealthRes,
        TemplateInfo,
        StepLists,
        PagesLookup,
        PagesMeta,
        GetStepRes,
        PostStepReq,
        PostStepRes
    ))
)]
struct ApiDoc;

/// Builds the intake REST router with CORS and Swagger UI attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/intake/:form_code", get(get_form))
        .route("/intake/:form_code/:step", get(get_step).post(post_step))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "intake API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/intake/{form_code}",
    params(("form_code" = String, Path, description = "Form template code")),
    responses(
        (status = 200, description = "First step of the form", body = GetStepRes),
        (status = 404, description = "Form template not found"),
        (status = 422, description = "Form template has no pages")
    )
)]
/// Loads the first page of a form.
///
/// Equivalent to requesting the form with an empty step code.
async fn get_form(
    State(state): State<AppState>,
    AxumPath(form_code): AxumPath<String>,
) -> Result<Json<GetStepRes>, NavigateError> {
    let view = state.navigator.view_step(&form_code, "").await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    get,
    path = "/intake/{form_code}/{step}",
    params(
        ("form_code" = String, Path, description = "Form template code"),
        ("step" = String, Path, description = "Step code; the first page when empty")
    ),
    responses(
        (status = 200, description = "Step page and navigation metadata", body = GetStepRes),
        (status = 400, description = "Missing form code"),
        (status = 404, description = "Form template not found"),
        (status = 422, description = "Form template has no pages")
    )
)]
/// Loads one step of a form.
///
/// No answers are available on a page load, so the returned `nextStep` is
/// the static decision (literal/skip/sequential tiers only). An unknown
/// step returns `valid: false` with a null page; the caller is expected to
/// redirect to `firstStep`.
async fn get_step(
    State(state): State<AppState>,
    AxumPath((form_code, step)): AxumPath<(String, String)>,
) -> Result<Json<GetStepRes>, NavigateError> {
    let view = state.navigator.view_step(&form_code, &step).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    post,
    path = "/intake/{form_code}/{step}",
    params(
        ("form_code" = String, Path, description = "Form template code"),
        ("step" = String, Path, description = "Step code being submitted")
    ),
    request_body = PostStepReq,
    responses(
        (status = 200, description = "Next step decision", body = PostStepRes),
        (status = 400, description = "Missing or unknown step"),
        (status = 404, description = "Form template not found"),
        (status = 422, description = "Form template has no pages")
    )
)]
/// Submits one step's answers and returns the next step.
///
/// Progress is persisted only when a session identity is present and a
/// progress record was already provisioned for the patient; `persisted`
/// reports whether the write happened.
async fn post_step(
    State(state): State<AppState>,
    AxumPath((form_code, step)): AxumPath<(String, String)>,
    Json(req): Json<PostStepReq>,
) -> Result<Json<PostStepRes>, NavigateError> {
    let outcome = state
        .navigator
        .submit_step(&form_code, &step, &req.answers)
        .await?;
    Ok(Json(PostStepRes {
        success: true,
        next_step: outcome.next_step,
        persisted: outcome.persisted,
    }))
}
