use anyhow::Context;
use bridge::http::SessionBridge;
use clap::Parser;
use scenario::generator::{build_scenario, ScenarioConfig};
use session::config::WorkstationConfig;
use session::state::AnalystSession;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod scenario;
mod session;
mod table;

#[derive(Parser)]
#[command(author, version, about = "Seismic location-review workstation driver")]
struct Args {
    /// Run one offline review pass over a synthetic event and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workstation config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 4)]
    minimum_defining: usize,
    #[arg(long, default_value_t = 8)]
    stations: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the HTTP bridge alive for an attached front end
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        WorkstationConfig::load(path)?
    } else {
        WorkstationConfig::from_args(args.minimum_defining)
    };

    let scenario = build_scenario(&ScenarioConfig {
        stations: args.stations,
        seed: args.seed,
        ..ScenarioConfig::default()
    })?;

    let mut session = AnalystSession::new(config);
    session.open_event(scenario.event);
    session.ingest_detections(scenario.detections);

    let state = Arc::new(RwLock::new(session));
    let bridge = SessionBridge::new(state.clone());

    if args.offline {
        let session = state.read().unwrap();
        let rows = session.rows();
        let eligibility = session.locate_eligibility();
        let defining_cells = rows
            .iter()
            .map(|row| {
                usize::from(row.arrival_time.defining)
                    + usize::from(row.azimuth.defining)
                    + usize::from(row.slowness.defining)
            })
            .sum::<usize>();

        let locate_status = match &eligibility.reason {
            Some(reason) => format!("blocked ({})", reason),
            None => "enabled".to_string(),
        };
        println!(
            "Offline review -> rows {}, defining cells {}, locate {}",
            rows.len(),
            defining_cells,
            locate_status
        );

        let report = format!(
            "rows={} defining_cells={} locate={}\n",
            rows.len(),
            defining_cells,
            locate_status
        );
        let report_path = PathBuf::from("tools/data/offline_review.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;

        bridge.publish_status("Offline review results ready.");
    }
    if args.serve {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
