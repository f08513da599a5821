// Módulos de la aplicación
mod analytics;
mod api;
mod app_state;
mod bindings;
mod config;
mod files;
mod forms;
mod models;
mod page;
mod session;
mod stats;
mod ui;

#[cfg(test)]
mod testing;

use crate::app_state::AppState;
use crate::files::{FileAction, DOCUMENT_TYPES};
use crate::forms::{FormHandler, SubmitOutcome};
use crate::page::LoadedPage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Comandos:
  ls                      vuelve a pintar el explorador
  cd <ruta>               navega a una carpeta ('' para la raíz)
  abrir <n>               activa la fila n (carpeta: entra, fichero: ver)
  ver <n> | descargar <n> | rag <n>
  rag-enviar <tipo>       envía el formulario RAG abierto
  rag-cerrar | cerrar     cierra el formulario RAG o el visor
  stats                   recarga las estadísticas
  contacto nombre|email|servicio|mensaje[|teléfono]
  boletin <email>
  salir";

#[tokio::main]
async fn main() {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Cargar configuración
    let cfg = config::AppConfig::from_env().expect("Error al cargar la configuración");
    info!(
        "Servidor {} · almacén {}",
        cfg.base_url,
        cfg.storage_path.display()
    );

    // 3. Crear estado compartido y arrancar la página
    let state = AppState::from_config(&cfg);
    let mut page = page::load_page(&state, &cfg.page_path, &cfg.page_elements).await;
    print_page(&page);
    println!("{HELP}");

    // 4. Consola interactiva hasta `salir` o fin de la entrada
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Error leyendo la entrada: {e}");
                break;
            }
        };
        let (command, arg) = line
            .trim()
            .split_once(' ')
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line.trim(), ""));
        if command == "salir" {
            break;
        }
        run_command(&state, &mut page, command, arg).await;
    }

    // 5. Cierre de la página: baliza de salida
    let LoadedPage { analytics, .. } = page;
    analytics.end().await.ok();
    info!("✅ Sesión cerrada correctamente.");
}

async fn run_command(state: &AppState, page: &mut LoadedPage, command: &str, arg: &str) {
    match command {
        "" => {}
        "ayuda" | "help" => println!("{HELP}"),
        "stats" => match page.stats.as_mut() {
            Some(widget) => {
                widget.load_stats().await;
                print_page(page);
            }
            None => println!("Esta página no tiene #{}", bindings::RAG_STATS),
        },
        "contacto" => {
            let parts: Vec<&str> = arg.split('|').map(str::trim).collect();
            let fields = ["name", "email", "service", "message", "phone"];
            submit_form(page.contact.as_mut(), &fields, &parts).await;
        }
        "boletin" => {
            submit_form(page.newsletter.as_mut(), &["email"], &[arg]).await;
        }
        _ => browser_command(state, page, command, arg).await,
    }
}

async fn browser_command(state: &AppState, page: &mut LoadedPage, command: &str, arg: &str) {
    let Some(browser) = page.file_browser.as_mut() else {
        println!("Esta página no tiene #{}", bindings::FILE_EXPLORER);
        return;
    };

    let row = arg
        .parse::<usize>()
        .ok()
        .and_then(|index| browser.rows().get(index).cloned());

    match (command, row) {
        ("ls", _) => {}
        ("cd", _) => browser.navigate(arg.trim_matches('\'')).await,
        ("abrir", Some(row)) => browser.activate(&row).await,
        ("ver", Some(row)) => browser.perform(&row, FileAction::View, state.ui.as_ref()).await,
        ("descargar", Some(row)) => {
            browser
                .perform(&row, FileAction::Download, state.ui.as_ref())
                .await
        }
        ("rag", Some(row)) => {
            browser
                .perform(&row, FileAction::AddToRag, state.ui.as_ref())
                .await
        }
        ("rag-enviar", _) => {
            let document_type = if arg.is_empty() { DOCUMENT_TYPES[0] } else { arg };
            if let Some(document) = browser.submit_add_to_rag(document_type).await {
                println!("Añadido a RAG: {} ({})", document.title, document.document_type);
            }
        }
        ("rag-cerrar", _) => browser.close_add_to_rag(),
        ("cerrar", _) => browser.close_viewer(),
        ("abrir" | "ver" | "descargar" | "rag", None) => {
            println!("Fila inexistente: {arg}");
            return;
        }
        _ => {
            println!("Comando desconocido. Escribe 'ayuda'.");
            return;
        }
    }
    print_page(page);
}

async fn submit_form(form: Option<&mut FormHandler>, names: &[&str], values: &[&str]) {
    let Some(form) = form else {
        println!("El formulario no está en esta página.");
        return;
    };
    for (name, value) in names.iter().zip(values) {
        form.set_field(name, value);
    }
    match form.submit().await {
        SubmitOutcome::Accepted(_) => {
            if let Some(notice) = form.notice() {
                println!("{}", ui::render_notice(&notice));
            }
        }
        _ => print!("{}", ui::render_form(form)),
    }
}

fn print_page(page: &LoadedPage) {
    if let Some(browser) = &page.file_browser {
        print!("{}", ui::render_browser(browser));
    }
    if let Some(view) = page.stats.as_ref().and_then(|w| w.view()) {
        print!("{}", ui::render_stats_view(view));
    }
}
