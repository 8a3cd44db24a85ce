mod cli;
mod error_fmt;
mod logging;
mod monitor;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use serde_json::json;
use thermo_config::{Config, PowerBackend};
use thermo_core::error::MonitorError;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::monitor::{RunOpts, make_power, run_monitor, summary_json};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn config_error(msg: String) -> eyre::Report {
    eyre::Report::new(MonitorError::Config(msg))
}

/// Read, parse and validate the config; built-in defaults without a path.
fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let cfg = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| config_error(format!("read config {}: {e}", p.display())))?;
            thermo_config::load_toml(&text)
                .map_err(|e| config_error(format!("parse config {}: {e}", p.display())))?
        }
        None => Config::default(),
    };
    cfg.validate().map_err(|e| config_error(format!("{e}")))?;
    Ok(cfg)
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;
    let cfg = load_config(cli.config.as_deref())?;
    logging::init_tracing(cli.json, &cli.log_level, &cfg.logging)?;

    match cli.cmd {
        Commands::Run {
            trace,
            period_ms,
            limit,
            unit,
            charging,
            max_samples,
            no_input,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install Ctrl-C handler")?;

            let opts = RunOpts {
                trace,
                period_ms,
                limit,
                unit: unit.map(Into::into),
                charging,
                max_samples,
                no_input,
            };
            let summary = run_monitor(&cfg, &opts, cli.json, &shutdown)?;
            if cli.json {
                println!("{}", summary_json(&summary));
            } else {
                println!(
                    "samples={} alarms={} dismissals={} phase={}",
                    summary.samples, summary.alarms, summary.dismissals, summary.final_phase
                );
            }
        }
        Commands::SelfCheck => self_check(&cfg)?,
        Commands::Health => health(&cfg, cli.json),
    }
    Ok(())
}

fn backend_name(b: PowerBackend) -> &'static str {
    match b {
        PowerBackend::Sim => "sim",
        PowerBackend::Sysfs => "sysfs",
    }
}

fn self_check(cfg: &Config) -> eyre::Result<()> {
    let (mut power, _) = make_power(cfg, false)?;
    let status = power
        .poll()
        .map_err(|e| eyre::Report::new(MonitorError::Power(e.to_string())))?;
    // constructing the monitor runs the builder validation
    monitor::build_monitor(cfg, &RunOpts::default(), power)?;
    tracing::info!(backend = backend_name(cfg.power.backend), charging = status.charging, "self-check ok");
    println!("OK");
    Ok(())
}

fn health(cfg: &Config, json_out: bool) {
    let power = make_power(cfg, false).and_then(|(mut pm, _)| {
        pm.poll()
            .map_err(|e| eyre::Report::new(MonitorError::Power(e.to_string())))
    });
    let (status, power_obj) = match power {
        Ok(s) => (
            "ok",
            json!({ "ok": true, "charging": s.charging, "battery_percent": s.battery_percent }),
        ),
        Err(e) => ("degraded", json!({ "ok": false, "error": format!("{e:#}") })),
    };
    let obj = json!({
        "status": status,
        "config": "ok",
        "power_backend": backend_name(cfg.power.backend),
        "power": power_obj,
        "sampling_period_ms": cfg.sampling.period_ms,
    });
    if json_out {
        println!("{obj}");
    } else {
        println!("{obj:#}");
    }
}
