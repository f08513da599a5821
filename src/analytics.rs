//! Baliza de analítica de páginas: una visita al cargar y el tiempo de
//! permanencia al salir.
//!
//! Flujo:
//!   1. `track` obtiene (o crea) el id de sesión y envía `{page, session_id, time_spent: 0}`.
//!   2. La hora de carga queda en la propia `AnalyticsSession`, no en un global.
//!   3. `end` consume la sesión y lanza un envío best-effort con los segundos transcurridos.
//!
//! El servidor debe tratar ambos envíos como eventos independientes: el orden
//! de llegada no está garantizado.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::{api::WebsiteApi, models::PageViewEvent, session::SessionIdProvider};

/// Visita en curso de una página.
pub struct AnalyticsSession {
    api: Arc<dyn WebsiteApi>,
    page: String,
    session_id: String,
    loaded_at: DateTime<Utc>,
}

impl AnalyticsSession {
    /// Registra la visita de `page` con la hora actual.
    pub async fn track(
        api: Arc<dyn WebsiteApi>,
        sessions: &SessionIdProvider,
        page: &str,
    ) -> Self {
        Self::track_at(api, sessions, page, Utc::now()).await
    }

    /// Igual que `track`, con la hora de carga explícita.
    pub async fn track_at(
        api: Arc<dyn WebsiteApi>,
        sessions: &SessionIdProvider,
        page: &str,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        let session = Self {
            api,
            page: page.to_string(),
            session_id: sessions.get_or_create(),
            loaded_at,
        };

        if let Err(e) = session.api.track(&session.event(0)).await {
            error!("Error registrando la visita de '{}': {e:#}", session.page);
        }
        session
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Cierre de la página: envía el tiempo de permanencia.
    pub fn end(self) -> JoinHandle<()> {
        self.end_at(Utc::now())
    }

    /// Envío de salida sin ninguna respuesta de error. El `JoinHandle` permite
    /// al anfitrión dejar que termine antes de apagar el runtime.
    pub fn end_at(self, now: DateTime<Utc>) -> JoinHandle<()> {
        let event = self.event(elapsed_seconds(self.loaded_at, now));
        let api = self.api;
        tokio::spawn(async move {
            if api.track(&event).await.is_ok() {
                debug!("Baliza de salida enviada para '{}' ({}s)", event.page, event.time_spent);
            }
        })
    }

    fn event(&self, time_spent: u64) -> PageViewEvent {
        PageViewEvent {
            page: self.page.clone(),
            session_id: self.session_id.clone(),
            time_spent,
        }
    }
}

/// Segundos enteros (redondeados) entre dos instantes; nunca negativo.
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let millis = (to - from).num_milliseconds().max(0);
    (millis as f64 / 1000.0).round() as u64
}
