//! Portal Desktop - native window with an in-memory document
//!
//! Navigation and overlays are recorded instead of shown, which makes this
//! binary useful for exercising manifests outside a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use portal_core::SceneManifest;
    use portal_scene::PortalDocument;
    use std::path::PathBuf;
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    #[derive(Parser, Debug)]
    #[command(name = "portal-desktop")]
    #[command(about = "Run a portal scene manifest in a native window")]
    #[command(version)]
    struct Args {
        /// Scene manifest (.toml or .json). The bundled scene is used when omitted.
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Log filter, e.g. "info" or "portal_core=debug"
        #[arg(short, long, default_value = "info")]
        log_level: String,
    }

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    info!("Portal desktop v{}", env!("CARGO_PKG_VERSION"));

    let manifest = match &args.manifest {
        Some(path) => SceneManifest::load(path)?,
        None => portal_web::app::embedded_manifest()?,
    };
    info!(portals = manifest.portals.len(), "Manifest loaded");

    portal_web::app::build(manifest, PortalDocument::default()).run();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
