//! HTML rendering of the sortable media table.

use crate::catalog::{SortColumn, SortOrder};
use crate::media::StoredRecord;
use std::fmt::Write;

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; background: #fafafa; }
h1 { text-align: center; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th, td { border: 1px solid #ccc; padding: 8px; text-align: left; }
th { background-color: #f0f0f0; position: sticky; top: 0; }
tr:nth-child(even) { background-color: #f9f9f9; }
a { color: #007bff; text-decoration: none; }
a:hover { text-decoration: underline; }
.true { color: green; font-weight: bold; }
.false { color: red; }";

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Order a header link requests: flips the active column, starts others ascending.
pub fn next_order(column: SortColumn, sort: SortColumn, order: SortOrder) -> SortOrder {
    if column == sort {
        order.reversed()
    } else {
        SortOrder::Asc
    }
}

/// Date part of an RFC 3339 timestamp, or the first ten characters of anything else.
pub fn format_date(created_at: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(dt) => dt.date_naive().to_string(),
        Err(_) => created_at.chars().take(10).collect(),
    }
}

fn opt_text(value: Option<&str>) -> String {
    match value {
        Some(v) if v != "N/A" => escape_html(v),
        _ => String::new(),
    }
}

fn opt_num<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn render_cell(out: &mut String, column: SortColumn, row: &StoredRecord) {
    let record = &row.record;
    let _ = match column {
        SortColumn::Creator => write!(out, "<td>{}</td>", escape_html(&record.creator)),
        SortColumn::Title => write!(
            out,
            "<td><a href=\"{}\" target=\"_blank\">{}</a></td>",
            escape_html(&record.link),
            escape_html(&record.title)
        ),
        SortColumn::Category => write!(out, "<td>{}</td>", escape_html(&record.category)),
        SortColumn::Duration => write!(out, "<td>{}</td>", record.duration),
        SortColumn::VoteAverage => write!(out, "<td>{}</td>", opt_num(record.vote_average)),
        SortColumn::ImdbId => match record.imdb_id.as_deref() {
            Some(id) if !id.is_empty() => write!(
                out,
                "<td><a href=\"{}{}\" target=\"_blank\">{}</a></td>",
                IMDB_TITLE_URL,
                escape_html(id),
                escape_html(id)
            ),
            _ => write!(out, "<td>&ndash;</td>"),
        },
        SortColumn::ImdbRating => write!(out, "<td>{}</td>", opt_num(record.imdb_rating)),
        SortColumn::RottenTomatoes => {
            write!(out, "<td>{}</td>", opt_text(record.rotten_tomatoes.as_deref()))
        }
        SortColumn::Metacritic => {
            write!(out, "<td>{}</td>", opt_text(record.metacritic.as_deref()))
        }
        SortColumn::MediaType => write!(
            out,
            "<td>{}</td>",
            record.resolved_media_type.unwrap_or(record.media_type)
        ),
        SortColumn::Downloaded => {
            let (class, mark) = if row.downloaded {
                ("true", "&#10004;")
            } else {
                ("false", "&#10008;")
            };
            write!(out, "<td class=\"{}\">{}</td>", class, mark)
        }
        SortColumn::CreatedAt => write!(out, "<td>{}</td>", escape_html(&format_date(&row.created_at))),
    };
}

pub fn render_table(rows: &[StoredRecord], sort: SortColumn, order: SortOrder) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n<meta charset=\"UTF-8\">\n");
    out.push_str("<title>MovieRater</title>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("\n</style>\n</head>\n<body>\n<h1>MovieRater</h1>\n<table>\n<thead>\n<tr>\n");

    for column in SortColumn::ALL {
        let arrow = match (column == sort, order) {
            (true, SortOrder::Asc) => " &#9650;",
            (true, SortOrder::Desc) => " &#9660;",
            (false, _) => "",
        };
        let _ = writeln!(
            out,
            "<th><a href=\"/?sort={}&amp;order={}\">{}{}</a></th>",
            column.as_str(),
            next_order(column, sort, order).as_str(),
            column.label(),
            arrow
        );
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        out.push_str("<tr>");
        for column in SortColumn::ALL {
            render_cell(&mut out, column, row);
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{EnrichedRecord, MediaItem, MediaType};

    fn row(title: &str, imdb_id: Option<&str>) -> StoredRecord {
        let mut record = EnrichedRecord::unresolved(MediaItem {
            title: title.to_string(),
            category: "Krimi".to_string(),
            description: String::new(),
            pubdate: String::new(),
            link: "https://example.org/a?b=1&c=2".to_string(),
            creator: "ARD".to_string(),
            duration_minutes: 90,
            media_type: MediaType::Movie,
        });
        record.imdb_id = imdb_id.map(str::to_string);
        record.rotten_tomatoes = Some("N/A".to_string());
        StoredRecord {
            id: 1,
            record,
            downloaded: false,
            created_at: "2024-03-05T18:30:00.123456+00:00".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_next_order_toggles_active_column_only() {
        assert_eq!(
            next_order(SortColumn::Title, SortColumn::Title, SortOrder::Asc),
            SortOrder::Desc
        );
        assert_eq!(
            next_order(SortColumn::Title, SortColumn::Title, SortOrder::Desc),
            SortOrder::Asc
        );
        assert_eq!(
            next_order(SortColumn::Duration, SortColumn::Title, SortOrder::Desc),
            SortOrder::Asc
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05T18:30:00.123456+00:00"), "2024-03-05");
        assert_eq!(format_date("2024-03-05 18:30:00"), "2024-03-05");
    }

    #[test]
    fn test_render_escapes_and_links() {
        let html = render_table(
            &[row("<script>alert(1)</script>", Some("tt0001"))],
            SortColumn::ImdbRating,
            SortOrder::Desc,
        );

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"https://www.imdb.com/title/tt0001\""));
        assert!(html.contains("href=\"https://example.org/a?b=1&amp;c=2\""));
        assert!(html.contains("<td>2024-03-05</td>"));
        assert!(html.contains("href=\"/?sort=imdb_rating&amp;order=asc\">Imdb Rating &#9660;"));
        assert!(html.contains("href=\"/?sort=title&amp;order=asc\">Title</a>"));
    }

    #[test]
    fn test_render_shows_resolved_media_type() {
        let mut fallback = row("Tatort", Some("tt0007"));
        fallback.record.resolved_media_type = Some(MediaType::Tv);
        let unresolved = row("Film", None);

        let html = render_table(&[fallback, unresolved], SortColumn::Title, SortOrder::Asc);

        let tatort_row = html.lines().find(|l| l.contains(">Tatort<")).unwrap();
        assert!(tatort_row.contains("<td>tv</td>"));
        assert!(!tatort_row.contains("<td>movie</td>"));
        let film_row = html.lines().find(|l| l.contains(">Film<")).unwrap();
        assert!(film_row.contains("<td>movie</td>"));
    }

    #[test]
    fn test_render_placeholders_for_missing_values() {
        let html = render_table(&[row("Foo", None)], SortColumn::Title, SortOrder::Asc);

        assert!(html.contains("<td>&ndash;</td>"));
        assert!(!html.contains("N/A"));
        assert!(html.contains("<td class=\"false\">"));
    }
}
