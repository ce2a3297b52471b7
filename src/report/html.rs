//! Minimal HTML builder for the build report
//!
//! The report layout is fixed; only cell colors and bodies vary. Text is
//! written as given, without escaping.

use crate::analysis::Status;
use std::fmt;

/// Background color of a status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    LimeGreen,
    Orange,
    Tomato,
    LightGray,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::LimeGreen => "LimeGreen",
            Color::Orange => "Orange",
            Color::Tomato => "Tomato",
            Color::LightGray => "LightGray",
        }
    }
}

impl From<Status> for Color {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => Color::LimeGreen,
            Status::Warning => Color::Orange,
            Status::Failed => Color::Tomato,
            Status::NotApplicable => Color::LightGray,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bootstrap alert flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    Success,
    Warning,
    Danger,
}

impl Alert {
    fn class(&self) -> &'static str {
        match self {
            Alert::Success => "alert-success",
            Alert::Warning => "alert-warning",
            Alert::Danger => "alert-danger",
        }
    }

    fn glyph(&self) -> &'static str {
        match self {
            Alert::Success => "glyphicon-ok-circle",
            Alert::Warning => "glyphicon-warning-sign",
            Alert::Danger => "glyphicon-ban-circle",
        }
    }
}

/// Accumulates report markup
#[derive(Debug, Default)]
pub struct HtmlWriter {
    body: String,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line verbatim
    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
        self
    }

    /// Append pre-rendered markup
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.body.push_str(markup);
        self
    }

    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.line(format!("  <h2>{}</h2>", text))
    }

    pub fn br(&mut self) -> &mut Self {
        self.line("  <br>")
    }

    /// Colored status cell; `body` lines are kept inside a `<pre>` block
    pub fn cell(&mut self, color: Color, body: &str) -> &mut Self {
        self.line(format!(
            "\t  <td bgcolor=\"{c}\"><pre style=\"border:none; background-color:{c}\"><b>{body}</b></pre></td>",
            c = color,
            body = body
        ))
    }

    /// Plain cell
    pub fn td(&mut self, text: &str) -> &mut Self {
        self.line(format!("      <td>{}</td>", text))
    }

    /// First column of a table row
    pub fn row_label(&mut self, label: &str, rowspan: Option<u32>) -> &mut Self {
        match rowspan {
            Some(n) => self.line(format!("\t   <td rowspan={} bgcolor=\"lightcyan\" >{}</td>", n, label)),
            None => self.line(format!("\t   <td bgcolor=\"lightcyan\" >{}</td>", label)),
        }
    }

    pub fn alert(&mut self, alert: Alert, text: &str) -> &mut Self {
        self.alert_with_trailer(alert, text, "")
    }

    /// Alert whose glyph sits between `text` and `trailer`
    pub fn alert_with_trailer(&mut self, alert: Alert, text: &str, trailer: &str) -> &mut Self {
        self.line(format!("  <div class=\"alert {}\">", alert.class()));
        self.line(format!(
            "\t  <strong>{} <span class=\"glyphicon {}\"></span>{}</strong>",
            text,
            alert.glyph(),
            trailer
        ));
        self.line("  </div>")
    }

    /// Start of a bordered table with a header row
    pub fn table_start(&mut self, width: &str, headers: &[&str]) -> &mut Self {
        self.line(format!(
            "  <table class=\"table-bordered\" width = \"{}\" align = \"center\" border = \"1\">",
            width
        ));
        self.line("\t  <tr bgcolor=\"#33CCFF\" >");
        for header in headers {
            self.line(format!("\t\t<th>{}</th>", header));
        }
        self.line("\t  </tr>")
    }

    pub fn table_end(&mut self) -> &mut Self {
        self.line("  </table>").br()
    }

    /// Collapsible block opened by a button
    pub fn collapse_start(&mut self, id: &str, button: &str) -> &mut Self {
        self.line(format!(
            "  <button data-toggle=\"collapse\" data-target=\"#{}\">{}</button>",
            id, button
        ));
        self.line(format!("  <div id=\"{}\" class=\"collapse\">", id))
    }

    pub fn collapse_end(&mut self) -> &mut Self {
        self.line("  </div>")
    }

    pub fn finish(self) -> String {
        self.body
    }
}
