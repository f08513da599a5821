//! Identificador de sesión estable por "navegador", persistido en almacenamiento duradero.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use uuid::Uuid;

/// Clave con la que se guarda el identificador de sesión.
pub const SESSION_KEY: &str = "apeko_session_id";

/// Almacenamiento clave/valor que sobrevive entre arranques.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Almacén en un fichero JSON (un objeto plano de cadenas).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializa lectura-modificación-escritura dentro del proceso.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("No se pudo leer {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("Almacén corrupto en {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| anyhow!("Bloqueo del almacén envenenado: {e}"))?;
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| anyhow!("Bloqueo del almacén envenenado: {e}"))?;
        // Un fichero ilegible se sobrescribe en lugar de bloquear la escritura.
        let mut map = self.read_map().unwrap_or_else(|e| {
            warn!("Se descarta el almacén ilegible: {e:#}");
            HashMap::new()
        });
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("No se pudo crear {}", parent.display()))?;
        }
        // Escritura a un temporal y `rename`: el fichero nunca queda a medias.
        let raw = serde_json::to_string_pretty(&map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).with_context(|| format!("No se pudo escribir {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("No se pudo reemplazar {}", self.path.display()))?;
        Ok(())
    }
}

/// Almacén en memoria, para pruebas y ejecuciones efímeras.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("No se pudo leer el almacén en memoria: {e}"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("No se pudo escribir el almacén en memoria: {e}"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Proveedor del identificador de sesión. Nunca falla.
#[derive(Clone, Debug)]
pub struct SessionIdProvider {
    store: Arc<dyn KeyValueStore>,
}

impl SessionIdProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Devuelve el identificador guardado o crea uno nuevo y lo persiste.
    ///
    /// Si el almacén falla se registra el problema y se devuelve un id recién
    /// generado, aunque no quede persistido.
    pub fn get_or_create(&self) -> String {
        match self.store.get(SESSION_KEY) {
            Ok(Some(existing)) if !existing.is_empty() => return existing,
            Ok(_) => {}
            Err(e) => warn!("No se pudo leer el id de sesión: {e:#}"),
        }

        let session_id = generate_session_id();
        match self.store.set(SESSION_KEY, &session_id) {
            Ok(()) => info!("Nuevo id de sesión creado: {session_id}"),
            Err(e) => warn!("No se pudo guardar el id de sesión: {e:#}"),
        }
        session_id
    }
}

/// Genera un id con forma de UUID v4 (`xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`).
pub fn generate_session_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
