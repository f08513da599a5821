//! Modelos de dominio (eventos de analítica, ficheros remotos, estadísticas y formularios).

use serde::{Deserialize, Serialize};

/// Evento de página vista que se envía al endpoint de seguimiento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViewEvent {
    pub page: String,
    pub session_id: String,
    pub time_spent: u64,
}

/// Tipo de entrada del explorador remoto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Folder,
}

/// Entrada de un listado de directorio tal y como la devuelve el panel de administración.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub can_add_to_rag: bool,
}

/// Respuesta de `/api/v1/admin/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub current_path: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Contenido de un fichero para el visor. Se muestra como texto literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

/// Contadores de la base de conocimiento RAG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagStats {
    pub total_documents: u64,
    pub total_chunks: u64,
    pub total_queries: u64,
}

/// Contadores generales del panel (clientes, visitas, informes, ingresos).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteStats {
    #[serde(default)]
    pub total_clients: u64,
    #[serde(default)]
    pub website_visits: u64,
    #[serde(default)]
    pub total_reports: u64,
    #[serde(default)]
    pub monthly_revenue: f64,
}

/// Una línea de actividad reciente del panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub user: String,
    pub action: String,
    pub time: String,
    pub status: String,
    #[serde(default)]
    pub status_class: String,
}

/// Respuesta de `/api/v1/admin/dashboard/stats`. Sólo `rag_stats` es obligatorio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub rag_stats: RagStats,
    #[serde(default)]
    pub stats: Option<SiteStats>,
    #[serde(default)]
    pub recent_activity: Vec<ActivityItem>,
}

/// Respuesta de los endpoints de formularios.
///
/// Un error del servidor llega como `{"detail": "..."}`; se trata como
/// `success = false` con el detalle como mensaje.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl SubmitResponse {
    pub fn accepted(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            detail: None,
        }
    }

    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            detail: None,
        }
    }

    /// Mensaje a mostrar: el del servidor, o su `detail` si era un error.
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .unwrap_or_default()
    }
}

/// Documento creado al añadir un fichero a la base RAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedDocument {
    #[serde(default)]
    pub success: bool,
    pub document_id: serde_json::Value,
    pub title: String,
    pub document_type: String,
}
