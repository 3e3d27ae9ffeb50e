use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// How long the "copied" acknowledgment stays up.
pub const COPY_ACK: Duration = Duration::from_secs(2);

pub const LABEL_COPY: &str = "Sao chép";
pub const LABEL_COPIED: &str = "Đã chép";

pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Pipes text into whichever clipboard tool the platform has.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: PathBuf,
    args: Vec<String>,
}

const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
    ("clip", &[]),
];

impl SystemClipboard {
    pub fn detect() -> Result<Self> {
        for (name, args) in CANDIDATES {
            if let Ok(program) = which::which(name) {
                log::debug!("clipboard tool: {}", program.display());
                return Ok(Self {
                    program,
                    args: args.iter().map(|a| a.to_string()).collect(),
                });
            }
        }
        bail!("no clipboard tool found (tried pbcopy, wl-copy, xclip, xsel, clip)")
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        // xclip and wl-copy fork a child that keeps the selection alive, so
        // none of the tool's output pipes may be waited on.
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .context("writing to clipboard tool")?;
        }
        let status = child.wait()?;
        if !status.success() {
            bail!("{} exited with {}", self.program.display(), status);
        }
        Ok(())
    }
}

/// The copy button: writes the raw markdown and flips its label for [`COPY_ACK`].
#[derive(Debug, Default)]
pub struct CopyAction {
    copied_at: Option<Instant>,
}

impl CopyAction {
    pub fn press(&mut self, sink: &dyn ClipboardSink, text: &str, now: Instant) -> Result<()> {
        sink.write_text(text)?;
        self.copied_at = Some(now);
        Ok(())
    }

    pub fn acknowledged(&self, now: Instant) -> bool {
        self.copied_at
            .map(|t| now.saturating_duration_since(t) < COPY_ACK)
            .unwrap_or(false)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.acknowledged(now) {
            LABEL_COPIED
        } else {
            LABEL_COPY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl ClipboardSink for Recorder {
        fn write_text(&self, text: &str) -> Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl ClipboardSink for Broken {
        fn write_text(&self, _: &str) -> Result<()> {
            bail!("no display")
        }
    }

    #[test]
    fn copies_raw_text_exactly() {
        let sink = Recorder::default();
        let mut copy = CopyAction::default();
        let md = "# KẾ HOẠCH\n\n- **5.2.NC1b**: GeoGebra\n";
        copy.press(&sink, md, Instant::now()).unwrap();
        assert_eq!(sink.0.borrow().as_slice(), [md.to_string()]);
    }

    #[test]
    fn acknowledgment_reverts_after_two_seconds() {
        let sink = Recorder::default();
        let mut copy = CopyAction::default();
        let t0 = Instant::now();
        assert_eq!(copy.label(t0), LABEL_COPY);

        copy.press(&sink, "x", t0).unwrap();
        assert_eq!(copy.label(t0), LABEL_COPIED);
        assert_eq!(copy.label(t0 + Duration::from_millis(1999)), LABEL_COPIED);
        assert_eq!(copy.label(t0 + COPY_ACK), LABEL_COPY);
        assert_eq!(copy.label(t0 + Duration::from_secs(10)), LABEL_COPY);
    }

    #[test]
    fn failed_write_does_not_acknowledge() {
        let mut copy = CopyAction::default();
        let now = Instant::now();
        assert!(copy.press(&Broken, "x", now).is_err());
        assert!(!copy.acknowledged(now));
    }

    #[cfg(unix)]
    fn shell_tool(dir: &std::path::Path, script: &str) -> SystemClipboard {
        let path = dir.join("fake-clip.sh");
        std::fs::write(&path, script).unwrap();
        SystemClipboard {
            program: which::which("sh").unwrap(),
            args: vec![path.display().to_string()],
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_clipboard_pipes_text_to_tool() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.txt");
        let tool = shell_tool(dir.path(), &format!("cat > '{}'\n", out.display()));

        tool.write_text("# KẾ HOẠCH\n").unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "# KẾ HOẠCH\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_clipboard_does_not_wait_for_forked_owner() {
        let dir = tempfile::tempdir().unwrap();
        // like xclip: the selection owner lives on after the tool exits
        let tool = shell_tool(dir.path(), "cat >/dev/null\n(sleep 6) &\nexit 0\n");

        let started = Instant::now();
        tool.write_text("plan").unwrap();
        assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
    }

    #[cfg(unix)]
    #[test]
    fn system_clipboard_reports_failed_tool() {
        let dir = tempfile::tempdir().unwrap();
        let tool = shell_tool(dir.path(), "cat >/dev/null\nexit 3\n");
        assert!(tool.write_text("plan").is_err());
    }
}
