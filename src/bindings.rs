//! Contrato de identificadores de elementos entre el marcado y los componentes.
//!
//! Cualquier front-end (el de terminal incluido) se enlaza por estos ids.

// --- Explorador de ficheros ---
pub const FILE_EXPLORER: &str = "file-explorer";
pub const FILE_LIST: &str = "file-list";
pub const CURRENT_PATH: &str = "current-path";
pub const FILE_VIEWER: &str = "file-viewer";
pub const FILE_NAME: &str = "file-name";
pub const FILE_CONTENT: &str = "file-content";
pub const ADD_TO_RAG_MODAL: &str = "add-to-rag-modal";
pub const ADD_TO_RAG_FORM: &str = "add-to-rag-form";
pub const ADD_TO_RAG_PATH_FIELD: &str = "file_path";

// --- Estadísticas RAG ---
pub const RAG_STATS: &str = "rag-stats";
pub const RAG_DOC_COUNT: &str = "rag-doc-count";
pub const RAG_CHUNK_COUNT: &str = "rag-chunk-count";
pub const RAG_QUERY_COUNT: &str = "rag-query-count";

// --- Contadores generales del panel ---
pub const TOTAL_CLIENTS: &str = "total-clients";
pub const WEBSITE_VISITS: &str = "website-visits";
pub const TOTAL_REPORTS: &str = "total-reports";
pub const MONTHLY_REVENUE: &str = "monthly-revenue";

// --- Formularios ---
pub const CONTACT_FORM: &str = "contact-form";
pub const NEWSLETTER_FORM: &str = "newsletter-form";
pub const NEWSLETTER_EMAIL: &str = "newsletter-email";

/// Clase CSS del aviso de éxito insertado antes de un formulario.
pub const SUCCESS_NOTICE_CLASS: &str = "alert alert-success";
