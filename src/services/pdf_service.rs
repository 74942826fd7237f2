use crate::{config::pdf_config::PdfOrientation, models::pdf_model::PdfRequest};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    process::Command,
    sync::{Semaphore, SemaphorePermit},
    time::timeout,
};
use uuid::Uuid;

/// Cantidad máxima de wkhtmltopdf simultáneos
const MAX_CONCURRENT_PROCESSES: usize = 4;
/// Tiempo máximo para generar un PDF
const PDF_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Prefijo de carpeta temporal
const TEMP_DIR_PREFIX: &str = "ticket_pdf_";

/// Convierte el HTML de un ticket en un documento PDF.
#[async_trait]
pub trait TicketRenderer: Send + Sync {
    async fn render(&self, req: PdfRequest) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct PdfService {
    semaphore: Arc<Semaphore>,
    temp_dir: Arc<PathBuf>,
    wkhtmltopdf_path: Arc<PathBuf>,
}

impl PdfService {
    pub async fn new() -> Result<Self> {
        // Crea un subdirectorio temporal (para HTML/PDF provisionales).
        let temp_dir = std::env::temp_dir().join(format!("{}_{}", TEMP_DIR_PREFIX, Uuid::new_v4()));
        fs::create_dir_all(&temp_dir)?;

        // Verifica que wkhtmltopdf esté en PATH
        let wkhtmltopdf_path =
            which::which("wkhtmltopdf").context("No se encontró wkhtmltopdf en el sistema")?;

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_PROCESSES)),
            temp_dir: Arc::new(temp_dir),
            wkhtmltopdf_path: Arc::new(wkhtmltopdf_path),
        })
    }

    /// Genera el PDF en memoria; los temporales se borran al terminar.
    pub async fn generate_pdf(&self, req: PdfRequest) -> Result<Vec<u8>> {
        let start = Instant::now();

        // Control de concurrencia
        let _guard = self.acquire_permit().await?;

        let temp_files = self.create_temp_files();
        let _cleanup = TempCleanup::new(temp_files.clone());

        fs::write(&temp_files.html_path, &req.html).with_context(|| {
            format!(
                "Error escribiendo HTML temporal en {:?}",
                temp_files.html_path
            )
        })?;

        let pdf_data = self.run_wkhtmltopdf(&req, &temp_files).await?;

        log::info!(
            "PDF '{}' generado en {:.2}s ({} bytes)",
            req.file_name,
            start.elapsed().as_secs_f32(),
            pdf_data.len()
        );
        Ok(pdf_data)
    }

    async fn acquire_permit(&self) -> Result<SemaphorePermit> {
        timeout(Duration::from_secs(5), self.semaphore.acquire())
            .await
            .context("Timeout esperando permiso en PdfService")?
            .map_err(|_| anyhow!("No se pudo adquirir el semaphore"))
    }

    fn create_temp_files(&self) -> TempFiles {
        let id = Uuid::new_v4().to_string();
        TempFiles {
            html_path: self.temp_dir.join(format!("ticket_{}.html", id)),
            pdf_path: self.temp_dir.join(format!("ticket_{}.pdf", id)),
        }
    }

    async fn run_wkhtmltopdf(&self, req: &PdfRequest, paths: &TempFiles) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&*self.wkhtmltopdf_path);

        let orientation_str = match req.orientation {
            PdfOrientation::Landscape => "Landscape",
            PdfOrientation::Portrait => "Portrait",
        };
        cmd.arg("--orientation").arg(orientation_str);
        cmd.arg("--page-size").arg(&req.page_size);

        let margin = format!("{}mm", req.margin_mm);
        for side in ["--margin-top", "--margin-bottom", "--margin-left", "--margin-right"] {
            cmd.arg(side).arg(&margin);
        }

        if (req.zoom - 1.0).abs() > f64::EPSILON {
            cmd.arg("--zoom").arg(format!("{}", req.zoom));
        }

        cmd.arg("--print-media-type");
        cmd.arg(&paths.html_path);
        cmd.arg(&paths.pdf_path);

        cmd.stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let output = timeout(PDF_GENERATION_TIMEOUT, cmd.output())
            .await
            .context("Timeout ejecutando wkhtmltopdf")?
            .context("No se pudo lanzar wkhtmltopdf")?;

        if !output.status.success() {
            let stderr_msg = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("wkhtmltopdf falló: {}", stderr_msg));
        }

        let pdf_bytes = fs::read(&paths.pdf_path)
            .with_context(|| format!("Error leyendo PDF final en {:?}", paths.pdf_path))?;

        Ok(pdf_bytes)
    }
}

#[async_trait]
impl TicketRenderer for PdfService {
    async fn render(&self, req: PdfRequest) -> Result<Vec<u8>> {
        self.generate_pdf(req).await
    }
}

/// Se usa cuando wkhtmltopdf no está instalado: toda exportación falla.
#[derive(Debug, Clone)]
pub struct UnavailableRenderer {
    pub reason: String,
}

#[async_trait]
impl TicketRenderer for UnavailableRenderer {
    async fn render(&self, _req: PdfRequest) -> Result<Vec<u8>> {
        Err(anyhow!("Renderizador no disponible: {}", self.reason))
    }
}

// --------------------------------------------------------------------------------
// Estructuras auxiliares
// --------------------------------------------------------------------------------
#[derive(Clone)]
struct TempFiles {
    html_path: PathBuf,
    pdf_path: PathBuf,
}

struct TempCleanup {
    files: TempFiles,
}

impl TempCleanup {
    fn new(files: TempFiles) -> Self {
        Self { files }
    }
}

/// Borra los archivos temporales al salir de scope
impl Drop for TempCleanup {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.files.html_path);
        let _ = fs::remove_file(&self.files.pdf_path);
    }
}
