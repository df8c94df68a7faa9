//! LifeOS Desktop — application entry.

mod app;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Reply timers, the install prompt and worker registration run here; all UI state stays on the main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("lifeos-worker")
        .enable_all()
        .build()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("LifeOS")
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([360.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "LifeOS",
        options,
        Box::new(move |cc| Box::new(app::LifeOsApp::new(cc, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("desktop app failed: {}", e))
}
