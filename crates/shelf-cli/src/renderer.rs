//! Terminal output for shelf's markdown.
//!
//! The core renders books, reminders and results as line-oriented markdown.
//! With colour enabled each line is styled by what it carries: book headings,
//! the status field, reminder notes (`> ...`) and everything else through the
//! termimad skin. Plain mode writes the markdown unchanged so scripts and
//! tests see exactly what the core produced.

use std::io::{self, Write};

use anyhow::Result;
use shelf_core::ReadingStatus;
use termimad::{
    crossterm::style::{style, Attribute, Color, Stylize},
    MadSkin,
};

const STATUS_FIELD: &str = "- Status: ";

/// Writes core markdown to stdout, styled or plain.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.format(markdown).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn format(&self, markdown: &str) -> String {
        if !self.rich_enabled {
            return markdown.to_string();
        }

        markdown
            .lines()
            .map(|line| format!("{}\n", self.style_line(line)))
            .collect()
    }

    fn style_line(&self, line: &str) -> String {
        // Headings keep their hash marks so book ids stay visible.
        if line.starts_with('#') {
            return style(line)
                .with(Color::Blue)
                .attribute(Attribute::Bold)
                .to_string();
        }

        if let Some(note) = line.strip_prefix("> ") {
            return format!("{} {}", style("›").with(Color::DarkGrey), style(note).italic());
        }

        if let Some(label) = line.strip_prefix(STATUS_FIELD) {
            if let Some(color) = status_color(label) {
                return format!("{STATUS_FIELD}{}", style(label).with(color));
            }
        }

        self.skin.inline(line).to_string()
    }
}

/// Colour for a rendered status label such as `Reading`.
fn status_color(label: &str) -> Option<Color> {
    let status = label.to_ascii_lowercase().parse::<ReadingStatus>().ok()?;
    Some(match status {
        ReadingStatus::Planned => Color::Cyan,
        ReadingStatus::Reading => Color::Green,
        ReadingStatus::Finished => Color::DarkGrey,
    })
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
