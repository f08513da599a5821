use async_trait::async_trait;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::models::{
    AddedDocument, DashboardStats, DirectoryListing, FileContent, PageViewEvent, SubmitResponse,
};

// --- Rutas de la API (el servidor es un colaborador externo) ---

pub const TRACK_ROUTE: &str = "/api/v1/website/track";
pub const CONTACT_ROUTE: &str = "/api/v1/website/contact";
pub const SUBSCRIBE_ROUTE: &str = "/api/v1/website/subscribe";
pub const FILES_ROUTE: &str = "/api/v1/admin/files";
pub const FILE_VIEW_ROUTE: &str = "/api/v1/admin/files/view";
pub const FILE_DOWNLOAD_ROUTE: &str = "/api/v1/admin/files/download";
pub const ADD_TO_RAG_ROUTE: &str = "/api/v1/admin/files/add-to-rag";
pub const DASHBOARD_STATS_ROUTE: &str = "/api/v1/admin/dashboard/stats";

// --- Contratos que consumen los componentes ---

/// Endpoints públicos de la web (seguimiento y formularios).
#[async_trait]
pub trait WebsiteApi: Send + Sync {
    /// Envía un evento de página vista. La respuesta se ignora.
    async fn track(&self, event: &PageViewEvent) -> Result<()>;

    /// Envía los campos de un formulario codificados como `x-www-form-urlencoded`.
    async fn submit_form(&self, route: &str, fields: &[(String, String)]) -> Result<SubmitResponse>;
}

/// Endpoints del panel de administración.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_files(&self, path: &str) -> Result<DirectoryListing>;
    async fn view_file(&self, path: &str) -> Result<FileContent>;
    async fn add_to_rag(&self, path: &str, document_type: &str) -> Result<AddedDocument>;
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    /// URL de descarga; el binario lo gestiona el navegador, no el cliente.
    fn download_url(&self, path: &str) -> Result<Url>;
}

// --- Cliente HTTP ---

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route)
            .map_err(|e| anyhow!("Ruta inválida {route}: {e}"))
    }

    fn endpoint_with_query(&self, route: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.endpoint(route)?;
        url.query_pairs_mut().extend_pairs(params.iter().copied());
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Fallo de red en GET {url}"))?
            .error_for_status()?;
        let body = response
            .json::<T>()
            .await
            .with_context(|| format!("Respuesta inesperada de {url}"))?;
        Ok(body)
    }
}

#[async_trait]
impl WebsiteApi for ApiClient {
    async fn track(&self, event: &PageViewEvent) -> Result<()> {
        let url = self.endpoint(TRACK_ROUTE)?;
        let response = self
            .http
            .post(url)
            .json(event)
            .send()
            .await
            .context("Fallo de red enviando el seguimiento")?;
        debug!("Seguimiento de '{}' respondido con {}", event.page, response.status());
        Ok(())
    }

    async fn submit_form(&self, route: &str, fields: &[(String, String)]) -> Result<SubmitResponse> {
        let url = self.endpoint(route)?;
        let response = self
            .http
            .post(url)
            .form(fields)
            .send()
            .await
            .with_context(|| format!("Fallo de red enviando el formulario a {route}"))?;
        // Los errores del servidor también traen JSON ({"detail": ...}).
        let body = response
            .json::<SubmitResponse>()
            .await
            .with_context(|| format!("Respuesta no JSON de {route}"))?;
        Ok(body)
    }
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn list_files(&self, path: &str) -> Result<DirectoryListing> {
        let url = self.endpoint_with_query(FILES_ROUTE, &[("path", path)])?;
        self.get_json(url).await
    }

    async fn view_file(&self, path: &str) -> Result<FileContent> {
        let url = self.endpoint_with_query(FILE_VIEW_ROUTE, &[("path", path)])?;
        self.get_json(url).await
    }

    async fn add_to_rag(&self, path: &str, document_type: &str) -> Result<AddedDocument> {
        let url = self.endpoint_with_query(
            ADD_TO_RAG_ROUTE,
            &[("path", path), ("document_type", document_type)],
        )?;
        self.get_json(url).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let url = self.endpoint(DASHBOARD_STATS_ROUTE)?;
        self.get_json(url).await
    }

    fn download_url(&self, path: &str) -> Result<Url> {
        self.endpoint_with_query(FILE_DOWNLOAD_ROUTE, &[("path", path)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Form, Query, State},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio_test::assert_ok;

    #[derive(Clone, Default)]
    struct Recorded {
        tracks: Arc<Mutex<Vec<PageViewEvent>>>,
        forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
        queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    }

    async fn track(State(rec): State<Recorded>, Json(event): Json<PageViewEvent>) -> Json<Value> {
        rec.tracks.lock().unwrap().push(event);
        Json(json!({"success": true}))
    }

    async fn contact(
        State(rec): State<Recorded>,
        Form(fields): Form<HashMap<String, String>>,
    ) -> Json<Value> {
        rec.forms.lock().unwrap().push(fields);
        Json(json!({"success": true, "message": "Thank you for your message."}))
    }

    async fn subscribe_fails() -> (StatusCode, Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Error subscribing to newsletter: db down"})),
        )
    }

    async fn files(
        State(rec): State<Recorded>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        let path = params.get("path").cloned().unwrap_or_default();
        rec.queries.lock().unwrap().push(params);
        if path == "secret" {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(Json(json!({
            "current_path": path,
            "files": [{"name": "a b.txt", "path": "docs/a b.txt", "type": "file",
                       "size": "3 B", "modified": "2024-01-01 00:00:00",
                       "icon": "fa-file-alt", "can_add_to_rag": true}]
        })))
    }

    async fn view(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({"name": "a b.txt", "path": params["path"], "content": "<b>hola</b>"}))
    }

    async fn add_to_rag(
        State(rec): State<Recorded>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        rec.queries.lock().unwrap().push(params);
        Json(json!({"success": true, "document_id": 7, "title": "a b.txt", "document_type": "regulation"}))
    }

    async fn stats() -> Json<Value> {
        Json(json!({
            "stats": {"total_clients": 3, "website_visits": 40, "total_reports": 2, "monthly_revenue": 25000},
            "rag_stats": {"total_documents": 12, "total_chunks": 340, "total_queries": 5},
            "recent_activity": []
        }))
    }

    async fn spawn_server() -> (ApiClient, Recorded) {
        let rec = Recorded::default();
        let app = Router::new()
            .route(TRACK_ROUTE, post(track))
            .route(CONTACT_ROUTE, post(contact))
            .route(SUBSCRIBE_ROUTE, post(subscribe_fails))
            .route(FILES_ROUTE, get(files))
            .route(FILE_VIEW_ROUTE, get(view))
            .route(ADD_TO_RAG_ROUTE, get(add_to_rag))
            .route(DASHBOARD_STATS_ROUTE, get(stats))
            .with_state(rec.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base = Url::parse(&format!("http://{addr}")).unwrap();
        (ApiClient::new(base), rec)
    }

    #[tokio::test]
    async fn track_posts_json_event() {
        let (client, rec) = spawn_server().await;
        let event = PageViewEvent {
            page: "pricing".to_string(),
            session_id: "s-1".to_string(),
            time_spent: 0,
        };

        assert_ok!(client.track(&event).await);
        assert_eq!(rec.tracks.lock().unwrap().as_slice(), &[event]);
    }

    #[tokio::test]
    async fn contact_form_is_form_encoded() {
        let (client, rec) = spawn_server().await;
        let fields = vec![
            ("name".to_string(), "Ana".to_string()),
            ("email".to_string(), "ana@example.com".to_string()),
            ("message".to_string(), "Hola & adiós".to_string()),
        ];

        let response = client.submit_form(CONTACT_ROUTE, &fields).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message(), "Thank you for your message.");

        let forms = rec.forms.lock().unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0]["message"], "Hola & adiós");
        assert_eq!(forms[0]["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn server_error_body_becomes_rejection() {
        let (client, _rec) = spawn_server().await;
        let fields = vec![("email".to_string(), "ana@example.com".to_string())];

        let response = client.submit_form(SUBSCRIBE_ROUTE, &fields).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.message(), "Error subscribing to newsletter: db down");
    }

    #[tokio::test]
    async fn listing_sends_path_query() {
        let (client, rec) = spawn_server().await;

        let listing = client.list_files("docs/specs").await.unwrap();
        assert_eq!(listing.current_path, "docs/specs");
        assert_eq!(listing.files.len(), 1);

        let root = client.list_files("").await.unwrap();
        assert_eq!(root.current_path, "");

        let queries = rec.queries.lock().unwrap();
        assert_eq!(queries[0]["path"], "docs/specs");
        assert_eq!(queries[1]["path"], "");
    }

    #[tokio::test]
    async fn listing_error_status_is_an_error() {
        let (client, _rec) = spawn_server().await;
        assert!(client.list_files("secret").await.is_err());
    }

    #[tokio::test]
    async fn view_and_add_to_rag_round_trip_paths() {
        let (client, rec) = spawn_server().await;

        let file = client.view_file("docs/a b.txt").await.unwrap();
        assert_eq!(file.content, "<b>hola</b>");
        assert_eq!(file.path.as_deref(), Some("docs/a b.txt"));

        let doc = client.add_to_rag("docs/a b.txt", "regulation").await.unwrap();
        assert_eq!(doc.document_type, "regulation");
        let queries = rec.queries.lock().unwrap();
        assert_eq!(queries[0]["document_type"], "regulation");
        assert_eq!(queries[0]["path"], "docs/a b.txt");
    }

    #[tokio::test]
    async fn dashboard_stats_are_decoded() {
        let (client, _rec) = spawn_server().await;
        let stats = client.dashboard_stats().await.unwrap();
        assert_eq!(stats.rag_stats.total_documents, 12);
        assert_eq!(stats.stats.unwrap().website_visits, 40);
    }

    #[test]
    fn download_url_encodes_path() {
        let client = ApiClient::new(Url::parse("http://localhost:8000").unwrap());
        let url = client.download_url("docs/a b&c.pdf").unwrap();
        assert_eq!(url.path(), FILE_DOWNLOAD_ROUTE);
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "path");
        assert_eq!(value, "docs/a b&c.pdf");
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        // Puerto reservado y sin escucha.
        let client = ApiClient::new(Url::parse("http://127.0.0.1:9").unwrap());
        let event = PageViewEvent {
            page: "home".to_string(),
            session_id: "s".to_string(),
            time_spent: 0,
        };
        assert!(client.track(&event).await.is_err());
    }
}
