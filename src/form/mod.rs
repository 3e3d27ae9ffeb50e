//! Form state for one lesson plan request.
//!
//! Holds the editable fields between submits. [`FormState::to_request`]
//! freezes them into an immutable [`LessonRequest`].

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use std::path::Path;

use crate::cli::StructureMode;
use crate::errors::PlanError;
use crate::session::LoadingState;

/// Upper bound for an attached textbook page or PDF.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const EDITIONS: &[&str] = &["Chân trời sáng tạo", "Kết nối tri thức", "Cánh diều", "Khác"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    /// Base64 of the raw file bytes.
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonRequest {
    pub textbook_edition: String,
    pub grade: String,
    pub subject_name: String,
    pub topic_title: Option<String>,
    pub total_periods: u32,
    pub structure_mode: StructureMode,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone)]
pub struct FormState {
    edition: String,
    grade: String,
    subject: String,
    topic: String,
    total_periods: String,
    structure: StructureMode,
    attachment: Option<Attachment>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            edition: EDITIONS[0].into(),
            grade: "Lớp 10".into(),
            subject: String::new(),
            topic: String::new(),
            total_periods: "1".into(),
            structure: StructureMode::ByPeriod,
            attachment: None,
        }
    }
}

impl FormState {
    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn total_periods(&self) -> &str {
        &self.total_periods
    }

    pub fn structure(&self) -> StructureMode {
        self.structure
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn set_edition(&mut self, v: impl Into<String>) {
        self.edition = v.into();
    }

    pub fn set_grade(&mut self, v: impl AsRef<str>) {
        self.grade = normalize_grade(v.as_ref());
    }

    pub fn set_subject(&mut self, v: impl Into<String>) {
        self.subject = v.into();
    }

    pub fn set_topic(&mut self, v: impl Into<String>) {
        self.topic = v.into();
    }

    pub fn set_total_periods(&mut self, v: impl Into<String>) {
        self.total_periods = v.into();
    }

    pub fn set_structure(&mut self, v: StructureMode) {
        self.structure = v;
    }

    /// Reads `path` and attaches it. Oversized or non image/PDF files are
    /// rejected and leave the form untouched.
    pub async fn select_attachment(&mut self, path: &Path) -> Result<(), PlanError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let size = tokio::fs::metadata(path).await?.len();
        check_size(&name, size)?;

        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        if !is_accepted_mime(&mime) {
            return Err(PlanError::UnsupportedAttachment { name, mime });
        }

        let bytes = tokio::fs::read(path).await?;
        // the file may have grown between stat and read
        check_size(&name, bytes.len() as u64)?;

        log::debug!("attached {} ({}, {} bytes)", name, mime, bytes.len());
        self.attachment = Some(Attachment {
            file_name: name,
            mime_type: mime,
            data: BASE64.encode(&bytes),
        });
        Ok(())
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self, state: LoadingState) -> bool {
        !state.is_busy() && !self.subject.trim().is_empty()
    }

    pub fn to_request(&self) -> Result<LessonRequest, PlanError> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(PlanError::MissingSubject);
        }
        let total_periods = match self.total_periods.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(PlanError::InvalidPeriods(self.total_periods.clone())),
        };
        let topic = self.topic.trim();

        Ok(LessonRequest {
            textbook_edition: self.edition.trim().to_string(),
            grade: self.grade.clone(),
            subject_name: subject.to_string(),
            topic_title: (!topic.is_empty()).then(|| topic.to_string()),
            total_periods,
            structure_mode: self.structure,
            attachment: self.attachment.clone(),
        })
    }
}

fn check_size(name: &str, size: u64) -> Result<(), PlanError> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(PlanError::AttachmentTooLarge {
            name: name.to_string(),
            size,
            limit: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(())
}

pub fn is_accepted_mime(mime: &str) -> bool {
    mime.starts_with("image/") || mime == "application/pdf"
}

/// "10" and "lớp 10" both become "Lớp 10"; anything else is kept as typed.
pub fn normalize_grade(raw: &str) -> String {
    let t = raw.trim();
    let digits = t
        .strip_prefix("Lớp")
        .or_else(|| t.strip_prefix("lớp"))
        .unwrap_or(t)
        .trim();
    match digits.parse::<u8>() {
        Ok(n) if (1..=12).contains(&n) => format!("Lớp {n}"),
        _ => t.to_string(),
    }
}
