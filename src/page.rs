//! Arranque de una página: lo que el navegador hacía al terminar de cargar el DOM.
//!
//! Los componentes son independientes; sólo comparten el id de sesión.

use std::collections::HashSet;

use tracing::info;

use crate::{
    analytics::AnalyticsSession,
    app_state::AppState,
    bindings,
    files::FileBrowser,
    forms::{FormHandler, FormKind},
    stats::StatsWidget,
};

/// Nombre de página para la analítica: la ruta sin la barra inicial ni la
/// final, o `home` si queda vacía.
pub fn page_name(url_path: &str) -> String {
    let trimmed = url_path.strip_prefix('/').unwrap_or(url_path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        "home".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Componentes inicializados según los contenedores presentes.
pub struct LoadedPage {
    pub analytics: AnalyticsSession,
    pub file_browser: Option<FileBrowser>,
    pub stats: Option<StatsWidget>,
    pub contact: Option<FormHandler>,
    pub newsletter: Option<FormHandler>,
}

pub async fn load_page(state: &AppState, url_path: &str, elements: &HashSet<String>) -> LoadedPage {
    let page = page_name(url_path);
    let analytics = AnalyticsSession::track(state.website.clone(), &state.sessions, &page).await;
    info!("Página '{page}' cargada (sesión {})", analytics.session_id());

    let init_browser = async {
        if !elements.contains(bindings::FILE_EXPLORER) {
            return None;
        }
        let mut browser = FileBrowser::new(state.admin.clone());
        browser.navigate("").await;
        Some(browser)
    };

    let init_stats = async {
        if !elements.contains(bindings::RAG_STATS) {
            return None;
        }
        let mut widget = StatsWidget::new(state.admin.clone());
        widget.load_stats().await;
        Some(widget)
    };

    let (file_browser, stats) = futures::join!(init_browser, init_stats);

    let attach = |kind: FormKind| {
        elements
            .contains(kind.form_id())
            .then(|| FormHandler::new(kind, state.website.clone(), state.ui.clone()))
    };

    LoadedPage {
        analytics,
        file_browser,
        stats,
        contact: attach(FormKind::Contact),
        newsletter: attach(FormKind::Newsletter),
    }
}
