//! Carga y gestión de configuración del cliente (servidor, almacenamiento y página).

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use url::Url;

use crate::bindings;

/// Configuración completa del cliente.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: Url,
    pub storage_path: PathBuf,
    pub page_path: String,
    pub page_elements: HashSet<String>,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let base_url_str =
            env::var("APEKO_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let base_url = Url::parse(&base_url_str)
            .map_err(|e| anyhow!("APEKO_BASE_URL no es una URL válida ({base_url_str}): {e}"))?;

        let storage_path = match env::var("APEKO_STORAGE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_storage_path()?,
        };

        let page_path = env::var("APEKO_PAGE").unwrap_or_else(|_| "/admin".to_string());

        let elements_str = env::var("APEKO_PAGE_ELEMENTS").unwrap_or_else(|_| {
            format!("{},{}", bindings::FILE_EXPLORER, bindings::RAG_STATS)
        });
        let page_elements = parse_elements(&elements_str);

        Ok(Self {
            base_url,
            storage_path,
            page_path,
            page_elements,
        })
    }
}

fn default_storage_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("No se pudo determinar el directorio de datos; define APEKO_STORAGE_PATH")
    })?;
    Ok(data_dir.join("apeko").join("storage.json"))
}

fn parse_elements(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
