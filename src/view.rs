use std::fmt::{self, Write};

use crate::models::ShowRecord;

const STYLE: &str = "body{font-family:Arial,sans-serif;color:#333}\
.show{display:flex;gap:12px;padding:12px 0;border-bottom:1px solid #e3e3e3;max-width:640px}\
.show img{width:140px}\
.title{font-size:18px;margin:0 0 8px}\
.title a{text-decoration:none;color:#333}\
.small{font-size:11px}\
.grey{color:#6b6b6b}\
.description{font-size:12px;text-align:justify}";

/// Render the report: returning series first, then new series.
pub fn render_report(
    new_series: &[ShowRecord],
    returning_series: &[ShowRecord],
) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(4096);
    out.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    render_section(&mut out, "Returning Series", returning_series)?;
    render_section(&mut out, "New Series", new_series)?;
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

fn render_section(out: &mut String, heading: &str, shows: &[ShowRecord]) -> fmt::Result {
    writeln!(out, "<h1>{}</h1>", escape(heading))?;
    for show in shows {
        let title = escape(&show.title);
        writeln!(out, "<div class=\"show\">")?;
        if !show.image.is_empty() {
            writeln!(
                out,
                "<img alt=\"{title} Poster\" src=\"{}\">",
                escape(&show.image)
            )?;
        }
        writeln!(out, "<div>")?;
        writeln!(
            out,
            "<div class=\"title\"><a href=\"{}\">{title}</a></div>",
            escape(&show.canonical_link)
        )?;
        writeln!(
            out,
            "<div class=\"small\"><strong>{}</strong><span class=\"grey\">/10</span> \
             <span class=\"grey\">({} ratings)</span></div>",
            escape(&show.average_rating),
            format_count(show.rating_count)
        )?;
        writeln!(out, "<div class=\"small grey\">Score {}/100</div>", show.score)?;
        writeln!(
            out,
            "<div class=\"small grey\">{}</div>",
            escape(&show.genres.join(", "))
        )?;
        writeln!(
            out,
            "<p class=\"description\">{}</p>",
            escape(&show.description)
        )?;
        if let Some(service) = show.streaming_service.display_name() {
            writeln!(
                out,
                "<div class=\"small\"><strong>Available on {}</strong></div>",
                escape(service)
            )?;
        }
        writeln!(out, "</div>\n</div>")?;
    }
    Ok(())
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `1663502` -> `"1,663,502"`
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
