#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context;
use clap::Parser;
use procwatch::cli::Args;
use procwatch::process::{ProcessDirectory, SysinfoSource};
use procwatch::UsageModel;
use std::io::Write;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_filter()),
    )
    .init();

    if let Some(prefix) = &args.list {
        let directory = ProcessDirectory::capture(&mut SysinfoSource::new());
        let mut out = std::io::stdout().lock();
        for name in directory.filter(Some(prefix)) {
            writeln!(out, "{name}")?;
        }
        return Ok(());
    }

    if let Some(name) = &args.watch {
        let mut model = UsageModel::new(Box::new(SysinfoSource::new()), &args.settings());
        model.select(name);
        let mut out = std::io::stdout().lock();
        procwatch::headless::watch(&mut model, &mut out, args.count, |pause| {
            std::thread::sleep(pause);
            Instant::now()
        })
        .with_context(|| format!("stopped watching {name}"))?;
        return Ok(());
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([280.0, 180.0])
            .with_min_inner_size([220.0, 140.0]),
        ..Default::default()
    };
    eframe::run_native(
        "procwatch",
        native_options,
        Box::new(|cc| Ok(Box::new(procwatch::UsageApp::new(cc)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to open the widget: {err}"))
}
