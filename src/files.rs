//! Explorador remoto de ficheros del panel de administración.
//!
//! El render (`render_listing`) es puro; `FileBrowser` orquesta las llamadas
//! y guarda el estado visible: listado actual, visor y formulario de alta en RAG.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    api::AdminApi,
    models::{AddedDocument, DirectoryListing, EntryType, FileContent, FileEntry},
    ui::Ui,
};

/// Tipos de documento ofrecidos en el formulario de alta en RAG.
pub const DOCUMENT_TYPES: &[&str] = &[
    "appraisal_report",
    "market_analysis",
    "property_listing",
    "regulation",
    "other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Parent,
    Folder,
    File,
}

/// Acciones de una fila de fichero, en el orden en que se muestran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    AddToRag,
    View,
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub size: String,
    pub modified: String,
}

/// Fila renderizada del listado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub kind: RowKind,
    pub name: String,
    pub path: String,
    pub icon: String,
    pub details: Option<FileDetails>,
    pub actions: Vec<FileAction>,
}

/// Efecto de activar (clic) una fila.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Navigate(String),
    View(String),
}

impl FileRow {
    fn parent_of(current_path: &str) -> Self {
        Self {
            kind: RowKind::Parent,
            name: "..".to_string(),
            path: parent_path(current_path).to_string(),
            icon: "fa-folder".to_string(),
            details: None,
            actions: Vec::new(),
        }
    }

    fn from_entry(entry: &FileEntry) -> Self {
        match entry.entry_type {
            EntryType::Folder => Self {
                kind: RowKind::Folder,
                name: entry.name.clone(),
                path: entry.path.clone(),
                icon: entry.icon.clone(),
                details: None,
                actions: Vec::new(),
            },
            EntryType::File => {
                let mut actions = Vec::with_capacity(3);
                if entry.can_add_to_rag {
                    actions.push(FileAction::AddToRag);
                }
                actions.push(FileAction::View);
                actions.push(FileAction::Download);
                Self {
                    kind: RowKind::File,
                    name: entry.name.clone(),
                    path: entry.path.clone(),
                    icon: entry.icon.clone(),
                    details: Some(FileDetails {
                        size: entry.size.clone(),
                        modified: entry.modified.clone(),
                    }),
                    actions,
                }
            }
        }
    }

    pub fn activation(&self) -> Activation {
        match self.kind {
            RowKind::Parent | RowKind::Folder => Activation::Navigate(self.path.clone()),
            RowKind::File => Activation::View(self.path.clone()),
        }
    }
}

/// Quita el último segmento de `path` (`"docs/specs"` -> `"docs"`, `"docs"` -> `""`).
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Ruta a mostrar en la cabecera: la actual, o `/` en la raíz.
pub fn display_path(current_path: &str) -> &str {
    if current_path.is_empty() {
        "/"
    } else {
        current_path
    }
}

/// Construye las filas de un listado: `..` primero si no es la raíz.
pub fn render_listing(listing: &DirectoryListing) -> Vec<FileRow> {
    let mut rows = Vec::with_capacity(listing.files.len() + 1);
    if !listing.current_path.is_empty() {
        rows.push(FileRow::parent_of(&listing.current_path));
    }
    rows.extend(listing.files.iter().map(FileRow::from_entry));
    rows
}

/// Directorio mostrado.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub current_path: String,
    pub rows: Vec<FileRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserState {
    Idle,
    Listing(Listing),
}

/// Panel de contenido. Cerrarlo sólo lo oculta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewer {
    pub visible: bool,
    pub file: Option<FileContent>,
}

/// Formulario modal de alta en RAG, precargado con la ruta del fichero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RagForm {
    pub visible: bool,
    pub file_path: String,
}

pub struct FileBrowser {
    api: Arc<dyn AdminApi>,
    state: BrowserState,
    viewer: Viewer,
    rag_form: RagForm,
}

impl FileBrowser {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            state: BrowserState::Idle,
            viewer: Viewer::default(),
            rag_form: RagForm::default(),
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn rows(&self) -> &[FileRow] {
        match &self.state {
            BrowserState::Idle => &[],
            BrowserState::Listing(listing) => &listing.rows,
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        match &self.state {
            BrowserState::Idle => None,
            BrowserState::Listing(listing) => Some(&listing.current_path),
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn rag_form(&self) -> &RagForm {
        &self.rag_form
    }

    /// Pide el listado de `path` y sustituye el estado. Si falla, se registra
    /// y el estado anterior queda intacto.
    pub async fn navigate(&mut self, path: &str) {
        match self.api.list_files(path).await {
            Ok(listing) => {
                let rows = render_listing(&listing);
                self.state = BrowserState::Listing(Listing {
                    current_path: listing.current_path,
                    rows,
                });
            }
            Err(e) => error!("Error navegando a la carpeta '{path}': {e:#}"),
        }
    }

    /// Carga el contenido de un fichero en el visor.
    pub async fn view(&mut self, path: &str) {
        match self.api.view_file(path).await {
            Ok(file) => {
                self.viewer.file = Some(file);
                self.viewer.visible = true;
            }
            Err(e) => error!("Error mostrando el fichero '{path}': {e:#}"),
        }
    }

    /// Clic sobre una fila: carpeta (o `..`) navega, fichero abre el visor.
    pub async fn activate(&mut self, row: &FileRow) {
        match row.activation() {
            Activation::Navigate(path) => self.navigate(&path).await,
            Activation::View(path) => self.view(&path).await,
        }
    }

    /// Ejecuta una acción de fila. Las acciones sólo existen en filas de fichero.
    pub async fn perform(&mut self, row: &FileRow, action: FileAction, ui: &dyn Ui) {
        if !row.actions.contains(&action) {
            return;
        }
        match action {
            FileAction::AddToRag => self.open_add_to_rag(&row.path),
            FileAction::View => self.view(&row.path).await,
            FileAction::Download => self.download(&row.path, ui),
        }
    }

    /// Entrega la URL de descarga al navegador.
    pub fn download(&self, path: &str, ui: &dyn Ui) {
        match self.api.download_url(path) {
            Ok(url) => ui.open_url(&url),
            Err(e) => error!("Error preparando la descarga de '{path}': {e:#}"),
        }
    }

    pub fn open_add_to_rag(&mut self, path: &str) {
        self.rag_form.file_path = path.to_string();
        self.rag_form.visible = true;
    }

    pub fn close_add_to_rag(&mut self) {
        self.rag_form.visible = false;
    }

    /// Envía el formulario de alta en RAG abierto.
    pub async fn submit_add_to_rag(&mut self, document_type: &str) -> Option<AddedDocument> {
        if !self.rag_form.visible || self.rag_form.file_path.is_empty() {
            return None;
        }
        let path = self.rag_form.file_path.clone();
        match self.api.add_to_rag(&path, document_type).await {
            Ok(document) => {
                info!("Fichero '{path}' añadido a RAG como '{}'", document.document_type);
                self.rag_form.visible = false;
                Some(document)
            }
            Err(e) => {
                error!("Error añadiendo '{path}' a RAG: {e:#}");
                None
            }
        }
    }

    pub fn close_viewer(&mut self) {
        self.viewer.visible = false;
    }
}
