use anyhow::{anyhow, Context};
use mapboard::{prelude::*, ui::controls::SwitcherInput};
use std::time::Duration;

/// Composes the configured map headlessly, loads the boundary overlay and
/// reports the layer tree and the tiles the initial view would request.
///
/// Usage: `mapboard-app [config.json] [data-root-or-origin]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => MapConfig::from_path(&path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("loading configuration from {}", path))?,
        None => MapConfig::default(),
    };
    let data_root = args.next().unwrap_or_else(|| "demos".to_string());

    let fetcher: Arc<dyn BoundaryFetcher> = if data_root.starts_with("http://") || data_root.starts_with("https://") {
        Arc::new(HttpFetcher::new(&data_root).map_err(|e| anyhow!(e))?)
    } else {
        Arc::new(FileFetcher::new(&data_root))
    };

    let document = Document::standard(&config);
    let mut controller = MapController::mount(config, document)
        .map_err(|e| anyhow!(e))
        .context("mounting the map")?;

    controller.map_mut().on("layeradd", |event| log::debug!("{:?}", event));
    controller.spawn_boundary_load(fetcher);
    for _ in 0..250 {
        if controller.poll_background() || controller.boundary_state().is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    log::info!("boundary overlay {}", controller.boundary_state());

    report(&controller);
    Ok(())
}

fn report(controller: &MapController) {
    let map = controller.map();
    let center = map.viewport().center_lat_lng();
    println!(
        "#{}: center {:.4}, {:.4} at zoom {}",
        map.target(),
        center.lng,
        center.lat,
        map.viewport().zoom
    );

    let scale = controller.controls().scale_line.bar(map.viewport());
    println!("scale: {} ({} px)", scale.label, scale.width);
    println!("controls: {}", controller.controls().order().join(", "));

    println!("layers:");
    for entry in controller.controls().layer_switcher.entries(map) {
        let mark = match (entry.input, entry.checked) {
            (SwitcherInput::Radio, true) => "(o)",
            (SwitcherInput::Radio, false) => "( )",
            (SwitcherInput::Checkbox, true) => "[x]",
            (SwitcherInput::Checkbox, false) => "[ ]",
            (SwitcherInput::Label, _) => "   ",
        };
        println!("{}{} {}", "  ".repeat(entry.depth + 1), mark, entry.title);
    }

    let requests = map.tile_requests();
    println!("tile requests: {}", requests.len());
    let mut seen = HashSet::default();
    for request in &requests {
        if seen.insert(request.layer_id.as_str()) {
            let count = requests
                .iter()
                .filter(|r| r.layer_id == request.layer_id)
                .count();
            println!("  {} x{}: {}", request.layer_id, count, request.url);
        }
    }
}
