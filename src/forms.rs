//! Manejadores de los formularios de contacto y de boletín.
//!
//! La validación del cliente es orientativa: el servidor vuelve a validar.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use regex::Regex;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    api::{WebsiteApi, CONTACT_ROUTE, SUBSCRIBE_ROUTE},
    bindings,
    ui::Ui,
};

/// Tiempo que permanece visible el aviso de éxito.
pub const NOTICE_TTL: Duration = Duration::from_millis(5000);

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Contact,
    Newsletter,
}

impl FormKind {
    pub fn form_id(self) -> &'static str {
        match self {
            FormKind::Contact => bindings::CONTACT_FORM,
            FormKind::Newsletter => bindings::NEWSLETTER_FORM,
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            FormKind::Contact => CONTACT_ROUTE,
            FormKind::Newsletter => SUBSCRIBE_ROUTE,
        }
    }

    /// Campos que se envían, en orden.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            FormKind::Contact => &["name", "email", "phone", "service", "message"],
            FormKind::Newsletter => &["email"],
        }
    }

    /// Id del elemento de un campo en el marcado. El email del boletín tiene
    /// su propio id aunque se envía como `email`.
    pub fn field_element_id(self, field: &'static str) -> &'static str {
        match (self, field) {
            (FormKind::Newsletter, "email") => bindings::NEWSLETTER_EMAIL,
            _ => field,
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            FormKind::Contact => &["name", "email", "service", "message"],
            FormKind::Newsletter => &["email"],
        }
    }

    fn rejected_prefix(self) -> &'static str {
        match self {
            FormKind::Contact => "Error submitting form",
            FormKind::Newsletter => "Error subscribing",
        }
    }

    fn missing_error(self) -> ValidationError {
        match self {
            FormKind::Contact => ValidationError::MissingFields,
            FormKind::Newsletter => ValidationError::MissingEmail,
        }
    }
}

/// Fallos de validación; su texto es el de la alerta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields,
    #[error("Please enter your email address.")]
    MissingEmail,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Validación previa al envío.
pub fn validate(kind: FormKind, fields: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    let value = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();

    if kind.required_fields().iter().any(|&name| value(name).is_empty()) {
        return Err(kind.missing_error());
    }
    if !is_valid_email(value("email")) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Aviso transitorio insertado antes del formulario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub class: &'static str,
    pub text: String,
    /// Id del formulario delante del cual se inserta.
    pub before: &'static str,
}

/// Resultado de un intento de envío.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid(ValidationError),
    Accepted(String),
    Rejected(String),
    Failed,
}

pub struct FormHandler {
    kind: FormKind,
    api: Arc<dyn WebsiteApi>,
    ui: Arc<dyn Ui>,
    fields: BTreeMap<String, String>,
    notice: Arc<Mutex<Option<Notice>>>,
}

impl FormHandler {
    pub fn new(kind: FormKind, api: Arc<dyn WebsiteApi>, ui: Arc<dyn Ui>) -> Self {
        Self {
            kind,
            api,
            ui,
            fields: BTreeMap::new(),
            notice: Arc::new(Mutex::new(None)),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Escribe un campo. Los nombres desconocidos se ignoran.
    pub fn set_field(&mut self, name: &str, value: &str) {
        if self.kind.fields().contains(&name) {
            self.fields.insert(name.to_string(), value.to_string());
        }
    }

    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.fields.clear();
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.lock().ok().and_then(|notice| notice.clone())
    }

    /// Valida y envía. Las alertas se muestran a través de `Ui`.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Err(invalid) = validate(self.kind, &self.fields) {
            self.ui.alert(&invalid.to_string());
            return SubmitOutcome::Invalid(invalid);
        }

        let payload: Vec<(String, String)> = self
            .kind
            .fields()
            .iter()
            .map(|&name| (name.to_string(), self.field(name).to_string()))
            .collect();

        match self.api.submit_form(self.kind.route(), &payload).await {
            Ok(response) if response.success => {
                let message = response.message().to_string();
                info!("Formulario '{}' enviado correctamente", self.kind.form_id());
                self.reset();
                self.show_notice(&message);
                SubmitOutcome::Accepted(message)
            }
            Ok(response) => {
                let message = response.message().to_string();
                self.ui
                    .alert(&format!("{}: {}", self.kind.rejected_prefix(), message));
                SubmitOutcome::Rejected(message)
            }
            Err(e) => {
                error!("Error enviando el formulario '{}': {e:#}", self.kind.form_id());
                self.ui.alert(&format!(
                    "{}. Please try again later.",
                    self.kind.rejected_prefix()
                ));
                SubmitOutcome::Failed
            }
        }
    }

    /// Inserta el aviso y programa su retirada. Un aviso posterior no lo
    /// retira el temporizador de uno anterior.
    fn show_notice(&self, text: &str) {
        let notice = Notice {
            id: Uuid::new_v4(),
            class: bindings::SUCCESS_NOTICE_CLASS,
            text: text.to_string(),
            before: self.kind.form_id(),
        };
        let id = notice.id;
        if let Ok(mut slot) = self.notice.lock() {
            *slot = Some(notice);
        }

        let slot = Arc::clone(&self.notice);
        tokio::spawn(async move {
            tokio::time::sleep(NOTICE_TTL).await;
            if let Ok(mut current) = slot.lock() {
                if current.as_ref().map(|n| n.id) == Some(id) {
                    *current = None;
                }
            }
        });
    }
}
