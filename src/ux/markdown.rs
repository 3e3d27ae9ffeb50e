use colored::{ColoredString, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Render markdown as coloured terminal text.
pub fn render(md: &str) -> String {
    let mut r = Renderer::default();
    for event in Parser::new(md) {
        match event {
            Event::Start(tag) => r.start(tag),
            Event::End(tag) => r.end(tag),
            Event::Text(text) => r.text(&text),
            Event::Code(code) => r.push(&code.cyan().to_string()),
            Event::SoftBreak => r.push(" "),
            Event::HardBreak => r.newline(),
            Event::Rule => {
                r.block_gap();
                r.push(&"─".repeat(40).dimmed().to_string());
                r.newline();
                r.newline();
            }
            _ => {}
        }
    }
    r.out.trim_end().to_string() + "\n"
}

#[derive(Default)]
struct Renderer {
    out: String,
    heading: Option<HeadingLevel>,
    strong: usize,
    emphasis: usize,
    code_block: bool,
    /// One entry per open list: next number for ordered lists.
    lists: Vec<Option<u64>>,
}

impl Renderer {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn ensure_newline(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.newline();
        }
    }

    fn block_gap(&mut self) {
        self.ensure_newline();
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.newline();
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                self.block_gap();
                self.heading = Some(level);
            }
            Tag::Paragraph if self.lists.is_empty() => self.block_gap(),
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.block_gap();
                } else {
                    self.ensure_newline();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.ensure_newline();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{n}. ");
                        *n += 1;
                        m
                    }
                    _ => "• ".to_string(),
                };
                self.push(&"  ".repeat(depth));
                self.push(&marker);
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::CodeBlock(_) => {
                self.block_gap();
                self.code_block = true;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.heading = None;
                self.newline();
                self.newline();
            }
            TagEnd::Paragraph => {
                self.newline();
                if self.lists.is_empty() {
                    self.newline();
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.ensure_newline();
                if self.lists.is_empty() {
                    self.newline();
                }
            }
            TagEnd::Item => self.ensure_newline(),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::CodeBlock => {
                self.code_block = false;
                self.ensure_newline();
                self.newline();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let mut s: ColoredString = text.normal();
        match self.heading {
            Some(HeadingLevel::H1) => s = s.bold().bright_cyan().underline(),
            Some(HeadingLevel::H2) => s = s.bold().cyan(),
            Some(_) => s = s.bold(),
            None => {}
        }
        if self.strong > 0 {
            s = s.bold();
        }
        if self.emphasis > 0 {
            s = s.italic();
        }
        if self.code_block {
            s = s.dimmed();
        }
        let rendered = s.to_string();
        self.push(&rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(md: &str) -> String {
        colored::control::set_override(false);
        render(md)
    }

    #[test]
    fn headings_and_lists_lose_markup() {
        let out = plain("# KẾ HOẠCH\n\n## 1. Mục tiêu\n\n- **5.2.NC1b**: GeoGebra\n- *Desmos*\n");
        assert_eq!(out, "KẾ HOẠCH\n\n1. Mục tiêu\n\n• 5.2.NC1b: GeoGebra\n• Desmos\n");
    }

    #[test]
    fn ordered_and_nested_lists() {
        let out = plain("1. Tiết 1\n2. Tiết 2\n    - Khởi động\n");
        assert!(out.contains("1. Tiết 1\n"));
        assert!(out.contains("2. Tiết 2\n"));
        assert!(out.contains("  • Khởi động"));
    }

    #[test]
    fn paragraphs_are_separated() {
        let out = plain("Đoạn một\ntiếp tục.\n\nĐoạn hai `code`.");
        assert_eq!(out, "Đoạn một tiếp tục.\n\nĐoạn hai code.\n");
    }
}
