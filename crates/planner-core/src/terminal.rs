use std::cell::Cell;
use std::io::{self, BufRead, IsTerminal, Write};

use chrono::NaiveDate;
use planner_shared::{CategoryRecord, TaskForm};
use tracing::{debug, trace, warn};
use unicode_width::UnicodeWidthStr;

use crate::api::wire_date;
use crate::config::Config;
use crate::messages::Messages;
use crate::notify::{Notifier, Toast, ToastLevel};
use crate::panel::{PanelState, PanelView, Tab};
use crate::render::{TaskRenderer, TaskRow};

/// Panel surface for the terminal: the task list becomes a table on stdout,
/// toasts go to stderr.
#[derive(Debug)]
pub struct TerminalSurface {
    color: bool,
    html: bool,
    assume_yes: bool,
    renderer: TaskRenderer,
    count: Cell<Option<usize>>,
}

impl TerminalSurface {
    pub fn new(cfg: &Config, messages: &'static Messages) -> anyhow::Result<Self> {
        let color = cfg.color()?;

        Ok(Self {
            color,
            html: false,
            assume_yes: false,
            renderer: TaskRenderer::new(messages),
            count: Cell::new(None),
        })
    }

    /// Print panel markup instead of a table.
    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Answer every confirmation with yes.
    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn print_rows(&self, rows: &[TaskRow]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "ID".to_string(),
            "Done".to_string(),
            "Time".to_string(),
            "Category".to_string(),
            "Title".to_string(),
        ];

        let rows = rows
            .iter()
            .map(|row| {
                let done = if row.completed {
                    self.paint("[x]", "32")
                } else {
                    "[ ]".to_string()
                };
                let category = row
                    .category
                    .as_ref()
                    .map(|c| format!("{} {}", c.icon, c.name))
                    .unwrap_or_default();
                vec![
                    self.paint(&row.id, "33"),
                    done,
                    row.time.clone().unwrap_or_default(),
                    category,
                    row.title.clone(),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        if let Some(count) = self.count.get() {
            writeln!(out, "{count} task(s)")?;
        }
        Ok(())
    }

    fn print_categories(&self, categories: &[CategoryRecord]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let headers = vec![
            "ID".to_string(),
            "Icon".to_string(),
            "Name".to_string(),
            "Color".to_string(),
        ];
        let rows = categories
            .iter()
            .map(|c| {
                vec![
                    self.paint(&c.id, "33"),
                    c.icon.clone(),
                    c.name_ua.clone(),
                    c.color_hex.clone(),
                ]
            })
            .collect();
        write_table(&mut out, headers, rows)
    }

    fn print_line(&self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(err) = writeln!(out, "{line}") {
            warn!(error = %err, "failed to write to stdout");
        }
    }
}

impl PanelView for TerminalSurface {
    fn show_panel(&self, state: &PanelState) {
        if self.html {
            if !matches!(state, PanelState::Loading) {
                self.print_line(&self.renderer.panel_markup(state));
            }
            return;
        }

        let messages = self.renderer.messages();
        match state {
            PanelState::Loading => trace!("loading"),
            PanelState::Empty => self.print_line(messages.empty),
            PanelState::Error(detail) => {
                self.print_line(&self.paint(&messages.failure(detail), "31"));
            }
            PanelState::Rows(rows) => {
                if let Err(err) = self.print_rows(rows) {
                    warn!(error = %err, "failed to print tasks");
                }
            }
        }
    }

    fn set_count(&self, count: usize) {
        self.count.set(Some(count));
    }

    fn set_title(&self, title: &str) {
        self.print_line(&self.paint(title, "1"));
    }

    fn reset_form(&self) {
        trace!("form reset");
    }

    fn fill_form(&self, form: &TaskForm) {
        debug!(?form, "form filled");
    }

    fn switch_tab(&self, tab: Tab) {
        trace!(tab = tab.name(), "tab switched");
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut err = io::stderr().lock();
        if write!(err, "{question} [y/N] ").and_then(|_| err.flush()).is_err() {
            return false;
        }
        drop(err);

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "т" | "так"
        )
    }

    fn reload_page(&self) {
        debug!("page reload requested; nothing cached in the terminal");
    }

    fn show_stickers(&self, date: NaiveDate, stickers: &[String]) {
        if stickers.is_empty() {
            return;
        }
        self.print_line(&format!("{} {}", wire_date(date), stickers.join(" ")));
    }

    fn paint_day(&self, date: NaiveDate, color: &str) {
        self.print_line(&format!("{} {color}", wire_date(date)));
    }

    fn mark_day(&self, date: NaiveDate, completed: bool) {
        if completed {
            self.print_line(&self.paint(&format!("{} ✔", wire_date(date)), "32"));
        }
    }

    fn show_categories(&self, categories: &[CategoryRecord]) {
        if let Err(err) = self.print_categories(categories) {
            warn!(error = %err, "failed to print categories");
        }
    }
}

impl Notifier for TerminalSurface {
    fn notify(&self, toast: Toast) {
        let code = match toast.level {
            ToastLevel::Success => "32",
            ToastLevel::Error => "31",
            ToastLevel::Info => "36",
        };
        let line = if self.color && io::stderr().is_terminal() {
            format!("\x1b[{code}m{toast}\x1b[0m")
        } else {
            toast.to_string()
        };
        let mut err = io::stderr().lock();
        if let Err(e) = writeln!(err, "{line}") {
            warn!(error = %e, "failed to write to stderr");
        }
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{header:width$} ", width = *width)?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible_width);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_by_visible_width() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            vec!["ID".into(), "Title".into()],
            vec![
                vec!["\x1b[33m1\x1b[0m".into(), "Купити молоко".into()],
                vec!["22".into(), "Gym".into()],
            ],
        )
        .expect("write table");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "ID Title         ");
        assert_eq!(lines[1], "-- ------------- ");
        assert_eq!(strip_ansi(lines[2]), "1  Купити молоко ");
        assert_eq!(lines[3], "22 Gym           ");
    }

    #[test]
    fn strip_ansi_keeps_plain_text() {
        assert_eq!(strip_ansi("\x1b[1mbold\x1b[0m text"), "bold text");
    }

    #[test]
    fn rejects_unknown_color_setting() {
        let mut cfg = Config::defaults();
        cfg.apply_overrides([("color".to_string(), "sometimes".to_string())]);
        assert!(TerminalSurface::new(&cfg, &crate::messages::UK).is_err());
    }
}
