// Meeting Alarm - tray icon that warns before meetings start
// Main entry point

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use meetingalarm::notifier::{DesktopNotifier, APP_NAME};
use meetingalarm::tray::{self, MeetingTray};
use meetingalarm::utils::logging;
use meetingalarm::{run_report_loop, Args, Calendar, Config, ReportCycle, SystemOpener};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose).context("Failed to initialize logging")?;

    let config = Config::try_from(args)?;
    info!("Starting Meeting Alarm");

    let (sender, receiver) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();

    let calendar = Calendar::new(config.source.clone(), config.default_url.clone())
        .context("Failed to set up calendar client")?;
    let notifier = DesktopNotifier::new(APP_NAME, sender.clone());

    let online = Arc::new(AtomicBool::new(false));
    let service = ksni::TrayService::new(MeetingTray::new(
        config.alarm_enabled,
        sender.clone(),
        Arc::clone(&online),
    ));
    let tray_handle = service.handle();
    service.spawn();

    if !tray::wait_for_tray(&online, tray::MAX_WAIT_FOR_TRAY).await {
        error!("No system tray appeared within {:?}", tray::MAX_WAIT_FOR_TRAY);
        println!("Could not find system tray");
        tray_handle.shutdown();
        return Ok(());
    }

    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            ctrl_c.cancel();
        }
    });

    let cycle = ReportCycle::new(
        calendar,
        Box::new(notifier),
        Box::new(tray_handle.clone()),
        Box::new(SystemOpener),
        config.alarm_enabled,
    );
    drop(sender);

    run_report_loop(cycle, receiver, shutdown).await;

    tray_handle.shutdown();
    info!("Meeting Alarm stopped");
    Ok(())
}
