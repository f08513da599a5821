//! Widget de estadísticas del panel: contadores de la base RAG y, si vienen,
//! los contadores generales del sitio.

use std::sync::Arc;

use tracing::error;

use crate::{
    api::AdminApi,
    bindings,
    models::{ActivityItem, DashboardStats},
};

/// Valores listos para pintar, cada uno con el id de su elemento.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub counters: Vec<(&'static str, String)>,
    pub recent_activity: Vec<ActivityItem>,
}

impl StatsView {
    pub fn counter(&self, element_id: &str) -> Option<&str> {
        self.counters
            .iter()
            .find(|(id, _)| *id == element_id)
            .map(|(_, value)| value.as_str())
    }
}

/// Render puro de la respuesta del panel.
pub fn render_stats(stats: &DashboardStats) -> StatsView {
    let rag = &stats.rag_stats;
    let mut counters = vec![
        (bindings::RAG_DOC_COUNT, rag.total_documents.to_string()),
        (bindings::RAG_CHUNK_COUNT, rag.total_chunks.to_string()),
        (bindings::RAG_QUERY_COUNT, rag.total_queries.to_string()),
    ];

    if let Some(site) = &stats.stats {
        counters.push((bindings::TOTAL_CLIENTS, site.total_clients.to_string()));
        counters.push((bindings::WEBSITE_VISITS, site.website_visits.to_string()));
        counters.push((bindings::TOTAL_REPORTS, site.total_reports.to_string()));
        counters.push((bindings::MONTHLY_REVENUE, site.monthly_revenue.to_string()));
    }

    StatsView {
        counters,
        recent_activity: stats.recent_activity.clone(),
    }
}

pub struct StatsWidget {
    api: Arc<dyn AdminApi>,
    view: Option<StatsView>,
}

impl StatsWidget {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api, view: None }
    }

    pub fn view(&self) -> Option<&StatsView> {
        self.view.as_ref()
    }

    /// Una única petición, sin reintentos. Si falla se conservan los valores previos.
    pub async fn load_stats(&mut self) {
        match self.api.dashboard_stats().await {
            Ok(stats) => self.view = Some(render_stats(&stats)),
            Err(e) => error!("Error cargando las estadísticas RAG: {e:#}"),
        }
    }
}
