//! Headless preview: runs the page logic against an in-memory map and prints
//! the resulting style (sources, layer order, camera) as JSON.
//!
//! ```text
//! mapstage-app [--config app.json] [--data-dir static] [--heat] [--select AUS,NZL]
//! ```
//!
//! `--help` lists every option.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::Context;
    use clap::Parser;
    use mapstage::{
        constants, App, AppConfig, DataProvider, HttpDataProvider, InMemoryDraw, InMemorySurface,
        MapEvent, RecordingView, StaticDataProvider,
    };
    use std::path::PathBuf;

    /// Headless style preview for the mapstage page.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// JSON configuration (any subset of the page config)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory the document paths are resolved against when no base URL is set
        #[arg(short, long, value_name = "DIR", default_value = "static")]
        data_dir: PathBuf,

        /// Switch to heat mode after loading
        #[arg(long)]
        heat: bool,

        /// Country codes to select, comma separated
        #[arg(short, long, value_name = "CODES", value_delimiter = ',')]
        select: Vec<String>,
    }

    fn local_provider(config: &AppConfig, dir: &std::path::Path) -> anyhow::Result<StaticDataProvider> {
        let read = |path: &str| {
            let file = dir.join(path.trim_start_matches('/'));
            std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))
        };
        Ok(StaticDataProvider::new(
            read(&config.data.country_path)?,
            read(&config.data.polygon_path)?,
        ))
    }

    #[tokio::main]
    pub async fn run() -> anyhow::Result<()> {
        env_logger::init();
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                AppConfig::from_json(&json)?
            }
            None => AppConfig::default(),
        };

        let provider: Box<dyn DataProvider> = if config.data.base_url.is_empty() {
            Box::new(local_provider(&config, &args.data_dir)?)
        } else {
            Box::new(HttpDataProvider::new(config.data.clone()))
        };

        let surface = InMemorySurface::with_base_layers(&[
            constants::HEAT_BEFORE_LAYER,
            constants::ADMIN_BOUNDARY_LAYER,
        ]);
        let mut app = App::with_parts(
            surface.clone(),
            InMemoryDraw::new(),
            RecordingView::new(),
            config,
        )?;

        app.handle_event(MapEvent::Loaded)?;
        app.load_data(provider.as_ref()).await;
        for event in surface.resolve_images() {
            // a missing marker image only drops the single-point layer
            let _ = app.handle_event(event);
        }

        if args.heat {
            app.toggle_mode()?;
        }
        for code in args.select.iter().map(|c| c.trim()) {
            if app.toggle_country(code)?.is_none() {
                log::warn!("no country {}", code);
            }
        }

        let sources: serde_json::Map<String, serde_json::Value> = surface
            .source_ids()
            .into_iter()
            .filter_map(|id| {
                let spec = serde_json::to_value(surface.source(&id)?).ok()?;
                Some((id, spec))
            })
            .collect();
        let layers: Vec<serde_json::Value> = surface
            .layer_ids()
            .iter()
            .filter_map(|id| surface.layer(id))
            .filter_map(|layer| serde_json::to_value(layer).ok())
            .collect();

        let preview = serde_json::json!({
            "mode": app.mode().to_string(),
            "selected": app.selected().iter().map(|c| c.code.clone()).collect::<Vec<_>>(),
            "camera": surface.last_camera_move().map(|m| m.target()),
            "sources": sources,
            "layers": layers,
        });
        println!("{}", serde_json::to_string_pretty(&preview)?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults() {
            let args = Args::try_parse_from(["mapstage-app"]).unwrap();
            assert_eq!(args.config, None);
            assert_eq!(args.data_dir, PathBuf::from("static"));
            assert!(!args.heat);
            assert!(args.select.is_empty());
        }

        #[test]
        fn test_args_select_list() {
            let args = Args::try_parse_from([
                "mapstage-app",
                "--heat",
                "--select",
                "AUS,NZL",
                "-d",
                "site",
            ])
            .unwrap();
            assert!(args.heat);
            assert_eq!(args.select, vec!["AUS".to_string(), "NZL".to_string()]);
            assert_eq!(args.data_dir, PathBuf::from("site"));
        }

        #[test]
        fn test_args_reject_unknown_flag() {
            let err = Args::try_parse_from(["mapstage-app", "--bogus"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
        }

        #[test]
        fn test_args_help() {
            let err = Args::try_parse_from(["mapstage-app", "--help"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
