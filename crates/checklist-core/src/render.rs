use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::controller::Notice;
use crate::task::Task;
use crate::view::FilterMode;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_task_table(&mut self, tasks: &[&Task]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if tasks.is_empty() {
            writeln!(out, "(no tasks)")?;
            return Ok(());
        }

        let headers = ["ID", "Done", "Title"];
        let mut rows = Vec::with_capacity(tasks.len());

        for task in tasks {
            let id = self.paint(&task.id.to_string(), "33");
            let done = if task.completed {
                self.paint("[x]", "32")
            } else {
                "[ ]".to_string()
            };
            rows.push([id, done, task.title.clone()]);
        }

        write_table(&mut out, &headers, &rows)?;
        Ok(())
    }

    pub fn print_summary(
        &mut self,
        completed: usize,
        total: usize,
        filter: FilterMode,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(
            out,
            "Completed: {completed}  Total Tasks: {total}  (filter: {filter})"
        )?;
        Ok(())
    }

    /// Toast line: green for success, red for errors.
    pub fn print_notice(&mut self, notice: &Notice) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let line = match notice {
            Notice::Success(text) => self.paint(text, "32"),
            Notice::Error(text) => self.paint(text, "31"),
        };
        writeln!(out, "{line}")?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write, const N: usize>(
    mut writer: W,
    headers: &[&str; N],
    rows: &[[String; N]],
) -> anyhow::Result<()> {
    let mut widths = [0usize; N];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = UnicodeWidthStr::width(*header);
    }
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..N {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in widths {
        write!(writer, "{:-<width$} ", "")?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
