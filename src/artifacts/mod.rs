use crate::session::Snapshot;
use crate::wire::GenerateRequest;
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunRecord<'a> {
    tx: Uuid,
    finished_at: DateTime<Utc>,
    model: &'a str,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

/// Stores the outgoing request and the final snapshot under `<root>/tx/<uuid>/`.
pub fn save_run(
    root: &Path,
    tx: Uuid,
    model: &str,
    req: &GenerateRequest,
    snapshot: &Snapshot,
    save_request: bool,
    save_response: bool,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(root, tx);
    fs::create_dir_all(&dir)?;

    let mut request_path = None;
    let mut response_path = None;

    if save_request {
        let p = dir.join("generate.request.json");
        fs::write(&p, to_string_pretty(req)?)?;
        request_path = Some(p);
    }

    if save_response {
        let p = dir.join("generate.response.json");
        let record = RunRecord { tx, finished_at: Utc::now(), model, snapshot };
        fs::write(&p, to_string_pretty(&record)?)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

/// Writes the raw markdown, creating parent directories as needed.
pub fn write_plan(path: &Path, markdown: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markdown)?;
    Ok(())
}

pub fn print_planned_paths(root: &Path, tx: Uuid) {
    let dir = tx_dir(root, tx);
    println!("debug: planned artifacts directory: {}", dir.display());
    println!("debug: planned request path: {}", dir.join("generate.request.json").display());
    println!("debug: planned response path: {}", dir.join("generate.response.json").display());
    std::io::stdout().flush().ok();
}

pub fn print_saved_paths(saved: &SavedPaths) {
    println!("debug: artifacts directory: {}", saved.dir.display());
    match &saved.request {
        Some(p) => println!("debug: request saved at: {}", p.display()),
        None => println!("debug: request not saved (flag off)"),
    }
    match &saved.response {
        Some(p) => println!("debug: response saved at: {}", p.display()),
        None => println!("debug: response not saved (flag off)"),
    }
    std::io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LoadingState;
    use crate::wire::Payload;

    #[test]
    fn saves_only_requested_files() {
        let root = tempfile::tempdir().unwrap();
        let tx = Uuid::new_v4();
        let req = GenerateRequest::new(Payload::new("prompt".into(), None));
        let snap = Snapshot { state: LoadingState::Complete, result: "# Plan".into(), error: None };

        let saved = save_run(root.path(), tx, "gemini-2.5-flash", &req, &snap, false, true).unwrap();
        assert!(saved.request.is_none());
        let resp = saved.response.unwrap();
        assert!(resp.starts_with(root.path().join("tx").join(tx.to_string())));

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(resp).unwrap()).unwrap();
        assert_eq!(v["state"], "COMPLETE");
        assert_eq!(v["result"], "# Plan");
        assert_eq!(v["model"], "gemini-2.5-flash");
    }

    #[test]
    fn write_plan_creates_parents() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("plans").join("toan-10.md");
        write_plan(&out, "# KẾ HOẠCH").unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), "# KẾ HOẠCH");
    }
}
