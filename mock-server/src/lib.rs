use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A source-control project held by the stub.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub default_branch: String,
}

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

pub type Db = Arc<RwLock<HashMap<Uuid, Project>>>;

/// Stub of a CI/CD service API. Routes are chosen to produce one response of
/// every shape the client's taxonomy distinguishes: JSON and plain-text
/// bodies, empty bodies with headers, 401/404/409/500 statuses.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/health", get(health))
        .route("/api/whoami", get(whoami))
        .route("/api/plain", get(plain))
        .route("/api/empty", get(empty))
        .route("/api/boom", get(boom))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{id}", get(get_project).delete(delete_project))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Requires a bearer token; any token is accepted, none is rejected.
async fn whoami(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization") {
        Some(value) if value.as_bytes().starts_with(b"Bearer ") => (
            StatusCode::OK,
            Json(json!({"user": "cicd-bot"})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "authentication required"})),
        ),
    }
}

async fn plain() -> impl IntoResponse {
    ([(axum::http::header::CONTENT_TYPE, "text/plain")], "OK")
}

async fn empty() -> impl IntoResponse {
    ([("x-auth", "something")], "")
}

async fn boom() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "internal failure"})),
    )
}

async fn list_projects(State(db): State<Db>) -> Json<Vec<Project>> {
    let projects = db.read().await;
    Json(projects.values().cloned().collect())
}

async fn create_project(
    State(db): State<Db>,
    Json(input): Json<CreateProject>,
) -> Result<(StatusCode, Json<Project>), (StatusCode, Json<serde_json::Value>)> {
    let mut projects = db.write().await;
    if projects.values().any(|p| p.name == input.name) {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({"error": "project already exists"})),
        ));
    }
    let project = Project {
        id: Uuid::new_v4(),
        name: input.name,
        default_branch: input.default_branch,
    };
    projects.insert(project.id, project.clone());
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, (StatusCode, Json<serde_json::Value>)> {
    let projects = db.read().await;
    projects
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "missing"}))))
}

async fn delete_project(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    let mut projects = db.write().await;
    projects
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "missing"}))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_serializes_to_json() {
        let project = Project {
            id: Uuid::nil(),
            name: "pipeline-lib".to_string(),
            default_branch: "main".to_string(),
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["name"], "pipeline-lib");
        assert_eq!(json["default_branch"], "main");
    }

    #[test]
    fn create_project_defaults_branch_to_main() {
        let input: CreateProject = serde_json::from_str(r#"{"name":"api-gateway"}"#).unwrap();
        assert_eq!(input.name, "api-gateway");
        assert_eq!(input.default_branch, "main");
    }

    #[test]
    fn create_project_accepts_explicit_branch() {
        let input: CreateProject =
            serde_json::from_str(r#"{"name":"legacy","default_branch":"trunk"}"#).unwrap();
        assert_eq!(input.default_branch, "trunk");
    }

    #[test]
    fn create_project_rejects_missing_name() {
        let result: Result<CreateProject, _> = serde_json::from_str(r#"{"default_branch":"main"}"#);
        assert!(result.is_err());
    }
}
