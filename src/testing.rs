//! Dobles de prueba compartidos: APIs falsas que registran las llamadas y una
//! `Ui` que guarda alertas y URLs abiertas.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use url::Url;

use crate::{
    api::{AdminApi, WebsiteApi, FILE_DOWNLOAD_ROUTE},
    models::{
        AddedDocument, DashboardStats, DirectoryListing, EntryType, FileContent, FileEntry,
        PageViewEvent, SubmitResponse,
    },
    ui::Ui,
};

pub fn entry(name: &str, path: &str, entry_type: EntryType, can_add_to_rag: bool) -> FileEntry {
    let (icon, size) = match entry_type {
        EntryType::Folder => ("fa-folder", ""),
        EntryType::File => ("fa-file-alt", "1.0 KB"),
    };
    FileEntry {
        name: name.to_string(),
        path: path.to_string(),
        entry_type,
        icon: icon.to_string(),
        icon_class: None,
        size: size.to_string(),
        modified: "2024-05-01 10:00:00".to_string(),
        can_add_to_rag,
    }
}

#[derive(Default)]
pub struct FakeWebsite {
    fail: bool,
    attempts: Mutex<usize>,
    tracked: Mutex<Vec<PageViewEvent>>,
    submitted: Mutex<Vec<(String, Vec<(String, String)>)>>,
    response: Mutex<Option<SubmitResponse>>,
}

impl FakeWebsite {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn respond_with(&self, response: SubmitResponse) {
        *self.response.lock().unwrap() = Some(response);
    }

    pub fn tracked(&self) -> Vec<PageViewEvent> {
        self.tracked.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl WebsiteApi for FakeWebsite {
    async fn track(&self, event: &PageViewEvent) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(anyhow!("conexión rechazada"));
        }
        self.tracked.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn submit_form(&self, route: &str, fields: &[(String, String)]) -> Result<SubmitResponse> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(anyhow!("conexión rechazada"));
        }
        self.submitted
            .lock()
            .unwrap()
            .push((route.to_string(), fields.to_vec()));
        Ok(self
            .response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| SubmitResponse::accepted("Thank you.")))
    }
}

#[derive(Default)]
pub struct FakeAdmin {
    listings: Mutex<HashMap<String, DirectoryListing>>,
    files: Mutex<HashMap<String, String>>,
    stats: Mutex<Option<DashboardStats>>,
    listed: Mutex<Vec<String>>,
    rag_requests: Mutex<Vec<(String, String)>>,
}

impl FakeAdmin {
    pub fn add_listing(&self, listing: DirectoryListing) {
        self.listings
            .lock()
            .unwrap()
            .insert(listing.current_path.clone(), listing);
    }

    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    pub fn set_stats(&self, stats: DashboardStats) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    pub fn clear_stats(&self) {
        *self.stats.lock().unwrap() = None;
    }

    pub fn listed_paths(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    pub fn rag_requests(&self) -> Vec<(String, String)> {
        self.rag_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminApi for FakeAdmin {
    async fn list_files(&self, path: &str) -> Result<DirectoryListing> {
        self.listed.lock().unwrap().push(path.to_string());
        self.listings
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("403 Access denied: {path}"))
    }

    async fn view_file(&self, path: &str) -> Result<FileContent> {
        let content = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("403 Access denied: {path}"))?;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Ok(FileContent {
            name,
            content,
            path: Some(path.to_string()),
            size: None,
            modified: None,
        })
    }

    async fn add_to_rag(&self, path: &str, document_type: &str) -> Result<AddedDocument> {
        self.rag_requests
            .lock()
            .unwrap()
            .push((path.to_string(), document_type.to_string()));
        Ok(AddedDocument {
            success: true,
            document_id: serde_json::json!(1),
            title: path.rsplit('/').next().unwrap_or(path).to_string(),
            document_type: document_type.to_string(),
        })
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.stats
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("500 Error getting dashboard stats"))
    }

    fn download_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse("http://admin.test")?.join(FILE_DOWNLOAD_ROUTE)?;
        url.query_pairs_mut().append_pair("path", path);
        Ok(url)
    }
}

#[derive(Default)]
pub struct RecordingUi {
    alerts: Mutex<Vec<String>>,
    opened: Mutex<Vec<Url>>,
}

impl RecordingUi {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

impl Ui for RecordingUi {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn open_url(&self, url: &Url) {
        self.opened.lock().unwrap().push(url.clone());
    }
}
