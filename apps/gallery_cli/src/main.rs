mod config;
mod upload_bridge;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use gallery_core::{Alerts, ControllerOrchestrator, EventBus, PhotoEditorView};
use photo_services::InMemoryPhotoAssistant;
use shared::{
    domain::{FilterMethod, SurfaceHandle},
    protocol::GalleryEvent,
};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::upload_bridge::{DirectoryUploadService, UploadCompletion};

#[derive(Parser, Debug)]
#[command(about = "Upload a directory of images into a photo gallery and print its layout")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    upload_dir: Option<PathBuf>,
    #[arg(long)]
    columns: Option<u32>,
    #[arg(long)]
    container: Option<String>,
    /// Name of the photo to edit once the gallery is displayed.
    #[arg(long, requires = "filter")]
    edit: Option<String>,
    /// Filter for the edited photo, as METHOD=VALUE (e.g. sepia=80).
    #[arg(long, requires = "edit")]
    filter: Option<String>,
}

struct StderrAlerts;

impl Alerts for StderrAlerts {
    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

fn init_tracing(fallback_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn edit_photo(orchestrator: &mut ControllerOrchestrator, name: &str, filter: &str) -> Result<()> {
    let (method, value) = filter
        .split_once('=')
        .context("filter must be given as METHOD=VALUE")?;
    let method: FilterMethod = method.parse()?;

    let photo = orchestrator
        .photo_gallery()
        .context("photo gallery was not constructed")?
        .photos()
        .into_iter()
        .find(|photo| photo.display_name() == name)
        .with_context(|| format!("no uploaded photo named '{name}'"))?;

    let mut view = PhotoEditorView::new(Arc::new(StderrAlerts));
    view.open(Some(photo), orchestrator)?;
    view.form_mut().select_method(method);
    view.form_mut().set_value(value);
    let submitted = view.submit(orchestrator);
    view.close(orchestrator);
    if let Err(err) = submitted {
        warn!(error = %err, photo = name, "filter was not applied");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(v) = args.upload_dir {
        settings.upload_dir = v;
    }
    if let Some(v) = args.columns {
        settings.columns = v;
    }
    if let Some(v) = args.container {
        settings.container = v;
    }
    init_tracing(&settings.log_filter);

    let assistant = Arc::new(InMemoryPhotoAssistant::new());
    let events = EventBus::new();
    let (upload, mut completions) =
        DirectoryUploadService::new(&settings.upload_dir, Handle::current());
    info!(dir = %upload.directory().display(), "uploading from directory");

    let mut orchestrator =
        ControllerOrchestrator::new(assistant.clone(), Arc::new(upload), events.clone());
    orchestrator.construct_photo_gallery(f64::from(settings.columns), &settings.container)?;
    orchestrator.upload_photos()?;

    match completions.recv().await {
        Some(UploadCompletion::Uploaded { photos }) => {
            info!(photos, "upload finished");
            events.publish(GalleryEvent::PhotosUploaded);
        }
        Some(UploadCompletion::Failed { reason }) => bail!("upload failed: {reason}"),
        None => bail!("upload bridge closed before reporting completion"),
    }

    if let (Some(name), Some(filter)) = (args.edit.as_deref(), args.filter.as_deref()) {
        edit_photo(&mut orchestrator, name, filter)?;
    }

    let container = SurfaceHandle::parse(&settings.container)?;
    let layout = assistant
        .rendered(&container)
        .context("photo gallery was never displayed")?;
    println!("{}", serde_json::to_string_pretty(&layout)?);

    Ok(())
}
