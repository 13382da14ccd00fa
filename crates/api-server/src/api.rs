use crate::error::ApiError;
use crate::functions;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use domain::access::{default_panel, menu_for};
use domain::entry::HistoryFilter;
use domain::reference::ReferenceKind;
use domain::user::Identity;
use domain::{HierarchySelection, WorkEntryDraft};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/functions/v1/create-user", post(functions::create_user))
        .route("/functions/v1/reset-password", post(functions::reset_password))
        .route("/functions/v1/delete-user", post(functions::delete_user))
        .route("/functions/v1/upload-to-r2", post(functions::upload_url))
        .route("/api/me", get(me))
        .route("/api/users", get(list_users))
        .route("/api/reference", get(get_reference))
        .route("/api/reference/{kind}/{id}", delete(delete_reference))
        .route("/api/cities", post(add_city))
        .route("/api/zones", post(add_zone))
        .route("/api/wards", post(add_ward))
        .route("/api/locations", post(add_location))
        .route("/api/form-options", get(form_options))
        .route("/api/entries", get(list_entries).post(submit_entry))
        .route("/api/entries/{id}", get(get_entry).delete(delete_entry))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

async fn caller(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    Ok(state.auth.authenticate(authorization(headers)).await?)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storageConfigured": state.uploads.is_configured(),
    }))
}

async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    Ok(Json(json!({
        "success": true,
        "user": {
            "id": caller.id,
            "email": caller.email,
            "fullName": caller.full_name,
            "role": caller.role,
            "cityId": caller.city_id,
        },
        "menu": menu_for(caller.role),
        "defaultPanel": default_panel(caller.role),
    })))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let users = state.accounts.list_users(&caller).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

async fn get_reference(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let hierarchy = state.reference.visible_to(&caller).await?;
    Ok(Json(json!({
        "success": true,
        "cities": hierarchy.cities,
        "zones": hierarchy.zones,
        "wards": hierarchy.wards,
        "locations": hierarchy.locations,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewReference {
    #[serde(default)]
    name: String,
    #[serde(default)]
    city_id: String,
    #[serde(default)]
    zone_id: String,
    #[serde(default)]
    ward_id: String,
}

async fn add_city(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewReference>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Json(body) = payload?;
    let city = state.reference.add_city(&caller, &body.name).await?;
    Ok(Json(json!({ "success": true, "city": city })))
}

async fn add_zone(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewReference>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Json(body) = payload?;
    let zone = state
        .reference
        .add_zone(&caller, &body.name, &body.city_id)
        .await?;
    Ok(Json(json!({ "success": true, "zone": zone })))
}

async fn add_ward(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewReference>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Json(body) = payload?;
    let ward = state
        .reference
        .add_ward(&caller, &body.name, &body.zone_id)
        .await?;
    Ok(Json(json!({ "success": true, "ward": ward })))
}

async fn add_location(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewReference>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Json(body) = payload?;
    let location = state
        .reference
        .add_location(&caller, &body.name, &body.ward_id)
        .await?;
    Ok(Json(json!({ "success": true, "location": location })))
}

async fn delete_reference(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let kind = ReferenceKind::from_plural(&kind)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown reference kind: {}", kind)))?;
    state.reference.delete(&caller, kind, &id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionQuery {
    city_id: Option<String>,
    zone_id: Option<String>,
    ward_id: Option<String>,
    location_id: Option<String>,
}

async fn form_options(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<SelectionQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Query(query) = query?;
    let selection = HierarchySelection::from_ids(
        query.city_id,
        query.zone_id,
        query.ward_id,
        query.location_id,
    );

    let form = state.entries.form_options(&caller, &selection).await?;
    Ok(Json(json!({ "success": true, "form": form })))
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    filter: Result<Query<HistoryFilter>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Query(filter) = filter?;
    let history = state.entries.history(&caller, &filter).await?;
    Ok(Json(json!({
        "success": true,
        "entries": history.entries,
        "summary": history.summary,
    })))
}

async fn submit_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<WorkEntryDraft>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let Json(draft) = payload?;
    let outcome = state.entries.submit(&caller, &draft).await?;

    let mut body = json!({
        "success": true,
        "entry": outcome.entry,
        "media": outcome.media,
        "mediaSaved": outcome.media_saved,
    });
    if let Some(warning) = outcome.warning {
        body["warning"] = json!(warning);
    }
    Ok(Json(body))
}

async fn get_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    let detail = state.entries.detail(&caller, &id).await?;
    Ok(Json(json!({
        "success": true,
        "entry": detail.entry,
        "media": detail.media,
    })))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let caller = caller(&state, &headers).await?;
    state.entries.delete(&caller, &id).await?;
    Ok(Json(json!({ "success": true })))
}
