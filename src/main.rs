use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use uuid::Uuid;

mod artifacts;
mod cli;
mod clipboard;
mod config;
mod errors;
mod form;
mod prompt;
mod provider;
mod session;
mod ux;
mod wire;

use clipboard::{CopyAction, SystemClipboard};
use errors::PlanError;
use session::LoadingState;

/// Failure detail is only for diagnostics; it stays off the terminal
/// unless asked for with --debug or RUST_LOG.
fn log_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "off"
    }
}

/// Fills the form from flags. An explicit --attach that cannot be used
/// stops the run rather than generating without the file.
async fn apply_args(form: &mut form::FormState, args: &cli::Args) -> Result<(), PlanError> {
    if let Some(v) = &args.edition {
        form.set_edition(v.as_str());
    }
    if let Some(v) = &args.grade {
        form.set_grade(v);
    }
    if let Some(v) = &args.subject {
        form.set_subject(v.as_str());
    }
    if let Some(v) = &args.topic {
        form.set_topic(v.as_str());
    }
    if let Some(v) = &args.periods {
        form.set_total_periods(v.as_str());
    }
    if let Some(v) = args.structure {
        form.set_structure(v);
    }
    if let Some(path) = &args.attach {
        form.select_attachment(Path::new(path)).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(args.debug)),
    )
    .init();

    let cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    let artifacts_root = Path::new(&cfg.artifacts_dir);

    let txid = Uuid::new_v4();
    if args.debug {
        println!("debug: flag enabled");
        artifacts::print_planned_paths(artifacts_root, txid);
    }

    // ===== FORM =====
    let mut form = form::FormState::default();
    if let Err(e) = apply_args(&mut form, &args).await {
        ux::alert(&e);
        return Ok(ExitCode::FAILURE);
    }
    if args.interactive {
        let mut input = std::io::stdin().lock();
        if let Err(e) = ux::fill_form(&mut input, &mut form).await {
            ux::alert(&e);
            return Ok(ExitCode::FAILURE);
        }
        if !ux::confirm(&mut input, "Tạo Kế Hoạch Bài Dạy?") {
            println!("Đã hủy.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let mut session = session::Session::new();
    if !form.can_submit(session.state()) {
        println!("{}", ux::render_view(&ux::View::Idle));
        ux::alert(&PlanError::MissingSubject);
        return Ok(ExitCode::FAILURE);
    }
    let request = match form.to_request() {
        Ok(r) => r,
        Err(e) => {
            ux::alert(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    // ===== GENERATE =====
    let prov = provider::make_provider(&cfg, args.model.clone(), args.debug)?;
    let presenter = tokio::spawn(ux::present(session.subscribe()));
    let state = session.submit(&request, &*prov).await?;
    if state.is_finished() {
        presenter.await?;
    } else {
        presenter.abort();
    }

    let snap = session.snapshot();
    if args.save_request || args.save_response {
        let model = args.model.as_deref().unwrap_or(&cfg.model);
        let saved = artifacts::save_run(
            artifacts_root,
            txid,
            model,
            &session::build_request(&request),
            &snap,
            args.save_request,
            args.save_response,
        )?;
        if args.debug {
            artifacts::print_saved_paths(&saved);
        }
    }

    if state != LoadingState::Complete {
        return Ok(ExitCode::FAILURE);
    }

    // ===== OUTPUT =====
    if let Some(out) = &args.output {
        artifacts::write_plan(Path::new(out), &snap.result)?;
        println!("Đã lưu kế hoạch vào {}", out);
    }

    if args.copy {
        let mut copy = CopyAction::default();
        let pressed = SystemClipboard::detect()
            .and_then(|cb| copy.press(&cb, &snap.result, Instant::now()));
        match pressed {
            Ok(()) => ux::show_copy_ack(&copy).await,
            Err(e) => {
                log::warn!("copy to clipboard failed: {e:#}");
                eprintln!("Không thể sao chép vào clipboard.");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
