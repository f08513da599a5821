//! Superficie de interfaz: alertas bloqueantes, navegación a URLs y el
//! front-end de terminal que pinta los modelos de vista por id de elemento.

use std::fmt::Write as _;

use tracing::info;
use url::Url;

use crate::{
    bindings,
    files::{display_path, FileAction, FileBrowser, RowKind},
    forms::{FormHandler, Notice},
    stats::StatsView,
};

/// Lo que un componente necesita del "navegador".
pub trait Ui: Send + Sync {
    /// Alerta bloqueante con un mensaje para el usuario.
    fn alert(&self, message: &str);

    /// Lleva el navegador a `url` (descargas).
    fn open_url(&self, url: &Url);
}

/// Front-end de terminal.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl Ui for TerminalUi {
    fn alert(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn open_url(&self, url: &Url) {
        if webbrowser::open(url.as_str()).is_err() {
            info!("No se pudo abrir el navegador. Descarga manual: {url}");
        }
    }
}

fn action_label(action: FileAction) -> &'static str {
    match action {
        FileAction::AddToRag => "rag",
        FileAction::View => "ver",
        FileAction::Download => "descargar",
    }
}

/// Pinta el explorador: ruta actual, filas numeradas, visor y formulario RAG.
pub fn render_browser(browser: &FileBrowser) -> String {
    let mut out = String::new();
    let Some(current) = browser.current_path() else {
        return out;
    };

    let _ = writeln!(out, "[{}] {}", bindings::CURRENT_PATH, display_path(current));
    let _ = writeln!(out, "[{}]", bindings::FILE_LIST);
    for (index, row) in browser.rows().iter().enumerate() {
        let marker = match row.kind {
            RowKind::Parent => "↩",
            RowKind::Folder => "📁",
            RowKind::File => "📄",
        };
        let _ = write!(out, "  {index:>3} {marker} {}", row.name);
        if let Some(details) = &row.details {
            let _ = write!(out, "  {}  {}", details.size, details.modified);
        }
        if !row.actions.is_empty() {
            let labels: Vec<&str> = row.actions.iter().copied().map(action_label).collect();
            let _ = write!(out, "  [{}]", labels.join("|"));
        }
        out.push('\n');
    }

    let viewer = browser.viewer();
    if let (true, Some(file)) = (viewer.visible, &viewer.file) {
        let _ = writeln!(out, "[{}]", bindings::FILE_VIEWER);
        let _ = writeln!(out, "  [{}] {}", bindings::FILE_NAME, file.name);
        let _ = writeln!(out, "  [{}]\n{}", bindings::FILE_CONTENT, file.content);
    }

    let form = browser.rag_form();
    if form.visible {
        let _ = writeln!(
            out,
            "[{} > {}] {}={}",
            bindings::ADD_TO_RAG_MODAL,
            bindings::ADD_TO_RAG_FORM,
            bindings::ADD_TO_RAG_PATH_FIELD,
            form.file_path
        );
    }
    out
}

/// Pinta los contadores como `id: valor` y la actividad reciente.
pub fn render_stats_view(view: &StatsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", bindings::RAG_STATS);
    for (id, value) in &view.counters {
        let _ = writeln!(out, "  {id}: {value}");
    }
    for item in &view.recent_activity {
        let _ = writeln!(out, "  · {} {} - {} ({})", item.time, item.user, item.action, item.status);
    }
    out
}

/// Pinta los campos de un formulario con el id de su elemento.
pub fn render_form(form: &FormHandler) -> String {
    let kind = form.kind();
    let mut out = format!("[{}]\n", kind.form_id());
    for &field in kind.fields() {
        let _ = writeln!(out, "  #{}: {}", kind.field_element_id(field), form.field(field));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    format!("[{} antes de #{}] {}", notice.class, notice.before, notice.text)
}
