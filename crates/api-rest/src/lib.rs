//! # API REST
//!
//! REST API implementation for the AFB form builder.
//!
//! Handles:
//! - HTTP endpoints with axum over the in-memory form store
//! - Preview sessions (one per form) and inline sentiment resolution
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for wire types and `afb-core` for all semantics. The
//! domain's no-op-on-missing-id behaviour is preserved: only a missing
//! *form* maps to `404`, since the handlers need a form to operate on;
//! missing section and field ids fall through to the core's silent no-ops.

#![warn(rust_2018_idioms)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use afb_core::{
    form::{AppraisalForm, FieldType},
    preview::{FieldValue, PreviewSession, Widget},
    sentiment::{SentimentAnalysis, SentimentAnalyzer, SentimentLabel},
    store::FormStore,
    wire as translate,
    workflow::WorkflowProcess,
};
use afb_types::EntityId;
use api_shared::wire::{
    AddFieldReq, AnalyzeSentimentReq, AssignWorkflowReq, AssignWorkflowRes, FieldSettingsWire,
    FieldWire, FormWire, HealthRes, ListFormsRes, PreviewRes, PreviewValueWire, SectionWire,
    SelectFormRes, SentimentWire, SetPreviewValueReq, WidgetWire,
};
use api_shared::HealthService;

type HandlerError = (StatusCode, &'static str);

/// Application state for the REST API server.
///
/// Holds the single form store every mutation lands in, one preview session
/// per form id, and the injected sentiment analyzer.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<FormStore>>,
    previews: Arc<RwLock<HashMap<EntityId, PreviewSession>>>,
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self {
            store: Arc::new(RwLock::new(FormStore::new())),
            previews: Arc::new(RwLock::new(HashMap::new())),
            analyzer,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_forms,
        create_form,
        select_form,
        update_form,
        add_section,
        update_section,
        delete_section,
        advance_section_status,
        add_field,
        update_field,
        delete_field,
        mount_preview,
        get_preview,
        set_preview_value,
        assign_workflow,
        analyze_sentiment,
    ),
    components(schemas(
        HealthRes,
        ListFormsRes,
        SelectFormRes,
        FormWire,
        SectionWire,
        FieldWire,
        FieldSettingsWire,
        AddFieldReq,
        PreviewRes,
        WidgetWire,
        PreviewValueWire,
        SetPreviewValueReq,
        AssignWorkflowReq,
        AssignWorkflowRes,
        AnalyzeSentimentReq,
        SentimentWire,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST router, including Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/forms", get(list_forms))
        .route("/forms", post(create_form))
        .route("/forms/:id", put(update_form))
        .route("/forms/:id/select", post(select_form))
        .route("/forms/:id/sections", post(add_section))
        .route("/forms/:id/sections/:sid", put(update_section))
        .route("/forms/:id/sections/:sid", delete(delete_section))
        .route("/forms/:id/sections/:sid/status", post(advance_section_status))
        .route("/forms/:id/sections/:sid/fields", post(add_field))
        .route("/forms/:id/sections/:sid/fields/:fid", put(update_field))
        .route("/forms/:id/sections/:sid/fields/:fid", delete(delete_field))
        .route("/forms/:id/preview", post(mount_preview))
        .route("/forms/:id/preview", get(get_preview))
        .route("/forms/:id/preview/values", put(set_preview_value))
        .route("/workflow", post(assign_workflow))
        .route("/sentiment", post(analyze_sentiment))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the AFB service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/forms",
    responses(
        (status = 200, description = "List of forms", body = ListFormsRes)
    )
)]
/// List all forms in the store
///
/// Returns every form created this session, in creation order.
#[axum::debug_handler]
async fn list_forms(State(state): State<AppState>) -> Json<ListFormsRes> {
    let store = state.store.read().await;
    let forms = store.forms().iter().map(translate::form_to_wire).collect();
    Json(ListFormsRes { forms })
}

#[utoipa::path(
    post,
    path = "/forms",
    responses(
        (status = 201, description = "Form created", body = FormWire)
    )
)]
/// Create a new appraisal form
///
/// Creates a draft form with a fresh id, the default title and no sections,
/// appends it to the store and makes it the current form.
#[axum::debug_handler]
async fn create_form(State(state): State<AppState>) -> Json<FormWire> {
    let mut store = state.store.write().await;
    let form = store.create_form();
    tracing::info!(form_id = %form.id, "created form");
    Json(translate::form_to_wire(&form))
}

#[utoipa::path(
    post,
    path = "/forms/{id}/select",
    responses(
        (status = 200, description = "Current selection after the attempt", body = SelectFormRes),
        (status = 400, description = "Bad request")
    )
)]
/// Select a form as current
///
/// When no stored form matches the id the selection is left unchanged, so
/// the response simply reports whatever is current after the attempt.
#[axum::debug_handler]
async fn select_form(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SelectFormRes>, HandlerError> {
    let form_id = parse_id(&id)?;
    let mut store = state.store.write().await;
    store.select_form(form_id);
    Ok(Json(SelectFormRes {
        current: store.current_form().map(translate::form_to_wire),
    }))
}

#[utoipa::path(
    put,
    path = "/forms/{id}",
    request_body = FormWire,
    responses(
        (status = 200, description = "Form accepted", body = FormWire),
        (status = 400, description = "Bad request")
    )
)]
/// Replace a stored form wholesale
///
/// The path id overrides the body id. When no stored form matches, the list
/// is left unchanged but the value still becomes the current form — the
/// update is accepted either way, matching the store's semantics.
#[axum::debug_handler]
async fn update_form(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(mut req): Json<FormWire>,
) -> Result<Json<FormWire>, HandlerError> {
    req.id = id;

    let form = match translate::form_from_wire(req) {
        Ok(form) => form,
        Err(e) => {
            tracing::error!("Invalid form document: {e}");
            return Err((StatusCode::BAD_REQUEST, "Invalid form document"));
        }
    };

    let mut store = state.store.write().await;
    store.update_form(form.clone());
    Ok(Json(translate::form_to_wire(&form)))
}

#[utoipa::path(
    post,
    path = "/forms/{id}/sections",
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Append a new empty section to a form
#[axum::debug_handler]
async fn add_section(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = form.with_section_added();
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    put,
    path = "/forms/{id}/sections/{sid}",
    request_body = SectionWire,
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Replace a section by id
///
/// The path section id overrides the body id. An id matching no section is
/// a silent no-op and returns the form unchanged.
#[axum::debug_handler]
async fn update_section(
    State(state): State<AppState>,
    AxumPath((id, sid)): AxumPath<(String, String)>,
    Json(mut req): Json<SectionWire>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let section_id = parse_id(&sid)?;
    req.id = sid;

    let section = match translate::section_from_wire(req) {
        Ok(section) => section,
        Err(e) => {
            tracing::error!("Invalid section document: {e}");
            return Err((StatusCode::BAD_REQUEST, "Invalid section document"));
        }
    };

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = form.with_section_replaced(section_id, section);
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    delete,
    path = "/forms/{id}/sections/{sid}",
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Remove a section by id, discarding its fields with it
#[axum::debug_handler]
async fn delete_section(
    State(state): State<AppState>,
    AxumPath((id, sid)): AxumPath<(String, String)>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let section_id = parse_id(&sid)?;

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = form.with_section_removed(section_id);
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    post,
    path = "/forms/{id}/sections/{sid}/status",
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Advance a section's traffic light one step
///
/// not-started -> in-progress -> complete -> not-started.
#[axum::debug_handler]
async fn advance_section_status(
    State(state): State<AppState>,
    AxumPath((id, sid)): AxumPath<(String, String)>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let section_id = parse_id(&sid)?;

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = match form.section(section_id) {
        Some(section) => form.with_section_replaced(section_id, section.with_status_advanced()),
        None => form,
    };
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    post,
    path = "/forms/{id}/sections/{sid}/fields",
    request_body = AddFieldReq,
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Append a fresh default field of the given type to a section
#[axum::debug_handler]
async fn add_field(
    State(state): State<AppState>,
    AxumPath((id, sid)): AxumPath<(String, String)>,
    Json(req): Json<AddFieldReq>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let section_id = parse_id(&sid)?;

    let field_type: FieldType = match req.field_type.parse() {
        Ok(field_type) => field_type,
        Err(e) => {
            tracing::error!("Invalid field type: {e}");
            return Err((StatusCode::BAD_REQUEST, "Invalid field type"));
        }
    };

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = match form.section(section_id) {
        Some(section) => {
            form.with_section_replaced(section_id, section.with_field_added(field_type))
        }
        None => form,
    };
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    put,
    path = "/forms/{id}/sections/{sid}/fields/{fid}",
    request_body = FieldWire,
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Replace a field by id
///
/// The path field id overrides the body id. An id matching no field is a
/// silent no-op and returns the form unchanged.
#[axum::debug_handler]
async fn update_field(
    State(state): State<AppState>,
    AxumPath((id, sid, fid)): AxumPath<(String, String, String)>,
    Json(mut req): Json<FieldWire>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let section_id = parse_id(&sid)?;
    let field_id = parse_id(&fid)?;
    req.id = fid;

    let field = match translate::field_from_wire(req) {
        Ok(field) => field,
        Err(e) => {
            tracing::error!("Invalid field document: {e}");
            return Err((StatusCode::BAD_REQUEST, "Invalid field document"));
        }
    };

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = match form.section(section_id) {
        Some(section) => {
            form.with_section_replaced(section_id, section.with_field_replaced(field_id, field))
        }
        None => form,
    };
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    delete,
    path = "/forms/{id}/sections/{sid}/fields/{fid}",
    responses(
        (status = 200, description = "Updated form", body = FormWire),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Remove a field by id
#[axum::debug_handler]
async fn delete_field(
    State(state): State<AppState>,
    AxumPath((id, sid, fid)): AxumPath<(String, String, String)>,
) -> Result<Json<FormWire>, HandlerError> {
    let form_id = parse_id(&id)?;
    let section_id = parse_id(&sid)?;
    let field_id = parse_id(&fid)?;

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let next = match form.section(section_id) {
        Some(section) => {
            form.with_section_replaced(section_id, section.with_field_removed(field_id))
        }
        None => form,
    };
    store.update_form(next.clone());
    Ok(Json(translate::form_to_wire(&next)))
}

#[utoipa::path(
    post,
    path = "/forms/{id}/preview",
    responses(
        (status = 200, description = "Freshly mounted preview", body = PreviewRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Mount (or remount) the preview for a form
///
/// Remounting discards all transient values and sentiment results collected
/// so far, as a fresh component mount would.
#[axum::debug_handler]
async fn mount_preview(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PreviewRes>, HandlerError> {
    let form_id = parse_id(&id)?;
    let store = state.store.read().await;
    let form = fetch_form(&store, form_id)?;

    let session = PreviewSession::new();
    let rendered = render_preview(&form, &session);
    state.previews.write().await.insert(form_id, session);
    Ok(Json(rendered))
}

#[utoipa::path(
    get,
    path = "/forms/{id}/preview",
    responses(
        (status = 200, description = "Rendered preview", body = PreviewRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Render the preview for a form
///
/// Renders one widget per field in section order, carrying whatever
/// transient values the session currently holds. Rendering mounts a fresh
/// session when none exists yet.
#[axum::debug_handler]
async fn get_preview(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PreviewRes>, HandlerError> {
    let form_id = parse_id(&id)?;
    let store = state.store.read().await;
    let form = fetch_form(&store, form_id)?;

    let mut previews = state.previews.write().await;
    let session = previews.entry(form_id).or_default();
    Ok(Json(render_preview(&form, session)))
}

#[utoipa::path(
    put,
    path = "/forms/{id}/preview/values",
    request_body = SetPreviewValueReq,
    responses(
        (status = 200, description = "Rendered preview after the write", body = PreviewRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Write a transient value into a form's preview session
///
/// The write is interpreted against the target field's type; writes that do
/// not fit (unknown field id, unlisted option, out-of-range score) are
/// silent no-ops. A sentiment-enabled textbox edited past the trigger
/// length has its text analyzed and the result recorded before responding.
#[axum::debug_handler]
async fn set_preview_value(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<SetPreviewValueReq>,
) -> Result<Json<PreviewRes>, HandlerError> {
    let form_id = parse_id(&id)?;
    let field_id = parse_id(&req.field_id)?;

    let store = state.store.read().await;
    let form = fetch_form(&store, form_id)?;

    let mut previews = state.previews.write().await;
    let session = previews.entry(form_id).or_default();

    if let Some(field) = form.field(field_id) {
        if let Some(text) = req.text {
            if let Some(request) = session.set_text(field, text) {
                let analysis = state.analyzer.analyze(&request.text);
                session.apply_sentiment(request.field_id, analysis);
            }
        } else if let Some(choice) = req.choice {
            session.select_choice(field, &choice);
        } else if let Some(option) = req.toggle_option {
            session.toggle_selection(field, &option);
        } else if let Some(score) = req.score {
            session.set_score(field, score);
        } else if let Some(raw) = req.sentiment {
            match raw.parse::<SentimentLabel>() {
                Ok(label) => session.choose_sentiment(field, label),
                Err(e) => {
                    tracing::error!("Invalid sentiment label: {e}");
                    return Err((StatusCode::BAD_REQUEST, "Invalid sentiment label"));
                }
            }
        }
    }

    Ok(Json(render_preview(&form, session)))
}

#[utoipa::path(
    post,
    path = "/workflow",
    request_body = AssignWorkflowReq,
    responses(
        (status = 200, description = "Workflow assignment outcome", body = AssignWorkflowRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Form not found")
    )
)]
/// Assign a form to workflow stages
///
/// Recomputes the form's single workflow stage from the three flags in
/// fixed priority order (pre -> meeting -> post) and records the assignment
/// in the log. No external workflow system is contacted.
#[axum::debug_handler]
async fn assign_workflow(
    State(state): State<AppState>,
    Json(req): Json<AssignWorkflowReq>,
) -> Result<Json<AssignWorkflowRes>, HandlerError> {
    let form_id = parse_id(&req.form_id)?;

    let mut store = state.store.write().await;
    let form = fetch_form(&store, form_id)?;

    let process = WorkflowProcess {
        pre_appraisal: req.pre_appraisal,
        appraisal_meeting: req.appraisal_meeting,
        post_appraisal: req.post_appraisal,
        assigned_form: form_id,
    };

    let next = process.apply_to(&form);
    store.update_form(next.clone());
    process.assign();

    Ok(Json(AssignWorkflowRes {
        form_id: req.form_id,
        workflow: next.workflow.map(|w| w.as_str().to_string()),
    }))
}

#[utoipa::path(
    post,
    path = "/sentiment",
    request_body = AnalyzeSentimentReq,
    responses(
        (status = 200, description = "Sentiment analysis result", body = SentimentWire)
    )
)]
/// Analyze a piece of text with the configured sentiment analyzer
#[axum::debug_handler]
async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeSentimentReq>,
) -> Json<SentimentWire> {
    let analysis = state.analyzer.analyze(&req.text);
    Json(sentiment_to_wire(&analysis))
}

// ============================================================================
// Helper functions
// ============================================================================

fn parse_id(raw: &str) -> Result<EntityId, HandlerError> {
    EntityId::parse(raw).map_err(|e| {
        tracing::error!("Invalid entity id: {e}");
        (StatusCode::BAD_REQUEST, "Invalid entity id")
    })
}

fn fetch_form(store: &FormStore, form_id: EntityId) -> Result<AppraisalForm, HandlerError> {
    store
        .form(form_id)
        .cloned()
        .ok_or((StatusCode::NOT_FOUND, "Form not found"))
}

/// Renders one widget per field in section order, attaching session state.
fn render_preview(form: &AppraisalForm, session: &PreviewSession) -> PreviewRes {
    let widgets = form
        .sections
        .iter()
        .flat_map(|section| section.fields.iter())
        .map(|field| {
            let widget = Widget::for_field(field);
            let (min_score, max_score) = match widget {
                Widget::ScoreButtons { min, max } => (Some(min), Some(max)),
                _ => (None, None),
            };
            WidgetWire {
                field_id: field.id.to_string(),
                label: field.label.clone(),
                required: field.required,
                widget: widget.kind().to_string(),
                options: field.config.options().map(<[String]>::to_vec),
                min_score,
                max_score,
                placeholder: field.placeholder.clone(),
                value: session.value(field.id).map(value_to_wire),
                sentiment: session.sentiment(field.id).map(sentiment_to_wire),
            }
        })
        .collect();

    PreviewRes {
        form_id: form.id.to_string(),
        title: form.title.clone(),
        widgets,
    }
}

fn value_to_wire(value: &FieldValue) -> PreviewValueWire {
    let mut wire = PreviewValueWire::default();
    match value {
        FieldValue::Text(text) => wire.text = Some(text.clone()),
        FieldValue::Choice(choice) => wire.choice = Some(choice.clone()),
        FieldValue::Selections(selections) => wire.selections = Some(selections.clone()),
        FieldValue::Score(score) => wire.score = Some(*score),
        FieldValue::Sentiment(label) => wire.sentiment = Some(label.as_str().to_string()),
    }
    wire
}

fn sentiment_to_wire(analysis: &SentimentAnalysis) -> SentimentWire {
    SentimentWire {
        score: analysis.score,
        label: analysis.label.as_str().to_string(),
        confidence: analysis.confidence,
    }
}
