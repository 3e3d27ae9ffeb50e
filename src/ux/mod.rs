use colored::Colorize;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::cli::StructureMode;
use crate::clipboard::{CopyAction, COPY_ACK};
use crate::errors::PlanError;
use crate::form::{FormState, EDITIONS, MAX_ATTACHMENT_BYTES};
use crate::session::{LoadingState, Snapshot, USER_ERROR_MESSAGE};

pub mod markdown;

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Idle,
    Busy,
    Error(&'a str),
    Plan(&'a str),
}

impl<'a> View<'a> {
    pub fn of(snap: &'a Snapshot) -> Self {
        match snap.state {
            LoadingState::Idle => View::Idle,
            LoadingState::Thinking | LoadingState::Generating => View::Busy,
            LoadingState::Error => View::Error(snap.error.as_deref().unwrap_or(USER_ERROR_MESSAGE)),
            LoadingState::Complete => View::Plan(&snap.result),
        }
    }
}

const BUSY_TITLE: &str = "Đang soạn giáo án...";
const BUSY_HINT: &str =
    "Hệ thống đang phân tích yêu cầu và tích hợp khung năng lực số 3456. Vui lòng đợi trong giây lát.";

pub fn render_view(view: &View) -> String {
    match view {
        View::Idle => format!(
            "\n{}\n{}\n",
            "Chưa có kết quả".bold(),
            "Điền thông tin bài dạy (--subject, --topic, --attach ... hoặc --interactive), sau đó chạy lại để tạo kế hoạch bài dạy.".dimmed()
        ),
        View::Busy => format!("{}\n{}", BUSY_TITLE.bold(), BUSY_HINT.dimmed()),
        View::Error(msg) => format!("\n{} {}\n", "[LỖI]".red().bold(), msg.red()),
        View::Plan(text) => format!(
            "\n{}\n{}\n{}",
            "┏━━━━━━━━━━━━━━━━━━━━━━━ Kế hoạch bài dạy ━━━━━━━━━━━━━━━━━━━━━━━┓".bold(),
            markdown::render(text),
            "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold()
        ),
    }
}

fn busy_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("{} {}", BUSY_TITLE.bold(), BUSY_HINT.dimmed()));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Draws snapshots as they arrive until the session finishes.
pub async fn present(mut rx: watch::Receiver<Snapshot>) {
    let mut spinner: Option<ProgressBar> = None;
    loop {
        let snap = rx.borrow_and_update().clone();
        match View::of(&snap) {
            View::Idle => {}
            View::Busy => {
                if spinner.is_none() {
                    spinner = Some(busy_spinner());
                }
            }
            view => {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
                println!("{}", render_view(&view));
                break;
            }
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
    if let Some(pb) = spinner.take() {
        pb.finish_and_clear();
    }
}

/// Shows the copy acknowledgment, then clears it once it lapses.
pub async fn show_copy_ack(copy: &CopyAction) {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("{} {}", "✓".green().bold(), copy.label(Instant::now()).green()));
    tokio::time::sleep(COPY_ACK).await;
    pb.finish_and_clear();
}

pub fn alert(err: &PlanError) {
    let msg = match err {
        PlanError::AttachmentTooLarge { size, .. } => format!(
            "File quá lớn ({}). Vui lòng chọn file dưới {}.",
            format_size(*size, BINARY),
            format_size(MAX_ATTACHMENT_BYTES, BINARY)
        ),
        PlanError::UnsupportedAttachment { mime, .. } => {
            format!("Định dạng {} không được hỗ trợ. Vui lòng chọn ảnh hoặc PDF.", mime)
        }
        PlanError::MissingSubject => "Vui lòng nhập Môn học.".to_string(),
        PlanError::InputClosed => "Đã hết dữ liệu nhập, dừng soạn giáo án.".to_string(),
        PlanError::InvalidPeriods(v) => format!("Tổng số tiết phải là số nguyên dương (nhận được {:?}).", v),
        other => other.to_string(),
    };
    eprintln!("{} {}", "[!]".yellow().bold(), msg.yellow());
}

pub fn confirm(input: &mut impl BufRead, prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    match input.read_line(&mut s) {
        Ok(n) if n > 0 => {
            let ans = s.trim().to_lowercase();
            ans == "y" || ans == "yes"
        }
        _ => false,
    }
}

/// Reads one line; an empty answer keeps `default`. None once input is closed.
pub fn ask(input: &mut impl BufRead, label: &str, default: &str) -> Option<String> {
    if default.is_empty() {
        print!("{}: ", label.bold());
    } else {
        print!("{} [{}]: ", label.bold(), default.dimmed());
    }
    let _ = io::stdout().flush();
    let mut s = String::new();
    match input.read_line(&mut s) {
        Ok(0) | Err(_) => {
            println!();
            return None;
        }
        Ok(_) => {}
    }
    let t = s.trim();
    if t.is_empty() {
        Some(default.to_string())
    } else {
        Some(t.to_string())
    }
}

fn structure_choice(answer: &str, current: StructureMode) -> StructureMode {
    match answer.trim() {
        "1" => StructureMode::ByPeriod,
        "2" => StructureMode::ByTopic,
        _ => current,
    }
}

/// Interactive form: every field is asked once, the subject until non-empty.
/// Fails with `InputClosed` if input ends before the form is complete.
pub async fn fill_form(input: &mut impl BufRead, form: &mut FormState) -> Result<(), PlanError> {
    println!("\n{}", "Thông tin bài dạy".bold().cyan());
    println!("{}", format!("Bộ sách: {}", EDITIONS.join(" / ")).dimmed());
    let edition = ask(input, "Bộ sách", form.edition()).ok_or(PlanError::InputClosed)?;
    form.set_edition(edition);

    let grade = ask(input, "Khối lớp (1-12)", form.grade()).ok_or(PlanError::InputClosed)?;
    form.set_grade(grade);

    let periods = ask(input, "Tổng số tiết", form.total_periods()).ok_or(PlanError::InputClosed)?;
    form.set_total_periods(periods);

    let current = form.structure();
    let default = if current == StructureMode::ByPeriod { "1" } else { "2" };
    let answer = ask(input, "Cấu trúc soạn thảo (1 = Chia theo tiết, 2 = Theo bài)", default)
        .ok_or(PlanError::InputClosed)?;
    form.set_structure(structure_choice(&answer, current));

    loop {
        let subject = ask(input, "Môn học (VD: Toán, Ngữ Văn...)", form.subject())
            .ok_or(PlanError::InputClosed)?;
        form.set_subject(subject);
        if !form.subject().trim().is_empty() {
            break;
        }
        alert(&PlanError::MissingSubject);
    }

    let topic = ask(input, "Tên bài học (để trống nếu dùng ảnh/PDF)", form.topic())
        .ok_or(PlanError::InputClosed)?;
    form.set_topic(topic);

    let current = form
        .attachment()
        .map(|a| a.file_name.clone())
        .unwrap_or_default();
    let path = ask(input, "Tài liệu (PDF hoặc ảnh chụp SGK, tối đa 10MB; '-' để bỏ)", &current)
        .ok_or(PlanError::InputClosed)?;
    if path == "-" {
        form.clear_attachment();
    } else if !path.is_empty() && path != current {
        if let Err(e) = form.select_attachment(Path::new(&path)).await {
            alert(&e);
        }
    }
    Ok(())
}
