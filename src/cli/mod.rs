use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureMode {
    /// Explicit per-period breakdown (Tiết 1, Tiết 2...)
    #[default]
    #[value(alias = "lesson", alias = "period")]
    ByPeriod,
    /// One continuous activity sequence
    #[value(alias = "topic")]
    ByTopic,
}

#[derive(Parser, Debug)]
#[command(
    name = "lesson_plan_gen",
    version,
    about = "Generate lesson plans with integrated digital competence (CV 3456) via Gemini"
)]
pub struct Args {
    /// Textbook edition, e.g. "Chân trời sáng tạo", "Kết nối tri thức", "Cánh diều"
    #[arg(long)]
    pub edition: Option<String>,

    /// Grade, either "Lớp 10" or just 10
    #[arg(long)]
    pub grade: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// Lesson title; leave empty to let the model infer it from the attachment
    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long)]
    pub periods: Option<String>,

    #[arg(long, value_enum)]
    pub structure: Option<StructureMode>,

    /// Textbook page photo or PDF (image/* or application/pdf, at most 10 MiB)
    #[arg(long)]
    pub attach: Option<String>,

    /// Ask for every field on stdin
    #[arg(long, short = 'i', default_value_t = false)]
    pub interactive: bool,

    #[arg(long)]
    pub model: Option<String>,

    /// Write the generated markdown to this file
    #[arg(long)]
    pub output: Option<String>,

    /// Copy the generated markdown to the system clipboard
    #[arg(long, default_value_t = false)]
    pub copy: bool,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_form() {
        let args = Args::parse_from([
            "lesson_plan_gen",
            "--subject", "Toán",
            "--topic", "Hàm số bậc hai",
            "--grade", "10",
            "--periods", "2",
            "--structure", "by-topic",
            "--copy",
        ]);
        assert_eq!(args.subject.as_deref(), Some("Toán"));
        assert_eq!(args.structure, Some(StructureMode::ByTopic));
        assert!(args.copy);
        assert!(!args.interactive);
        assert!(args.attach.is_none());
    }

    #[test]
    fn structure_accepts_original_aliases() {
        let args = Args::parse_from(["lesson_plan_gen", "--structure", "lesson"]);
        assert_eq!(args.structure, Some(StructureMode::ByPeriod));
        let args = Args::parse_from(["lesson_plan_gen", "--structure", "topic"]);
        assert_eq!(args.structure, Some(StructureMode::ByTopic));
    }
}
