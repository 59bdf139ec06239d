use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::locale::Locale;
use crate::models::{ArticleRecord, Summary};

pub struct DigestComposer;

impl DigestComposer {
    /// Render the digest email body, one list item per article, in order.
    pub fn compose(
        pairs: &[(ArticleRecord, Summary)],
        locale: Locale,
        date: DateTime<Utc>,
    ) -> String {
        let mut html = String::new();
        let heading = Self::escape_html(locale.digest_heading());
        let formatted_date = date.format(locale.date_format()).to_string();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!("<html lang=\"{}\">\n<head>\n", locale.tag()));
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(&format!(
            "  <title>{} - {}</title>\n",
            heading, formatted_date
        ));
        html.push_str("  <style>\n");
        html.push_str("    body { font-family: Arial, sans-serif; max-width: 760px; margin: 24px auto; padding: 0 16px; line-height: 1.5; }\n");
        html.push_str(
            "    h2 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 6px; }\n",
        );
        html.push_str("    .date { color: #7f8c8d; font-size: 0.9em; }\n");
        html.push_str("    li { margin: 14px 0; }\n");
        html.push_str("    a { color: #3498db; font-weight: bold; text-decoration: none; }\n");
        html.push_str("  </style>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!("<h2>{}</h2>\n", heading));
        html.push_str(&format!("<p class=\"date\">{}</p>\n", formatted_date));

        html.push_str("<ul>\n");
        for (article, summary) in pairs {
            html.push_str(&format!(
                "  <li><a href=\"{}\">{}</a><br>{}</li>\n",
                Self::escape_html(article.url.trim()),
                Self::escape_html(article.title.trim()),
                Self::escape_html(summary.display_text(locale))
            ));
        }
        html.push_str("</ul>\n");

        html.push_str("</body>\n</html>");
        html
    }

    /// Plain-text rendering of a composed digest, for the text/plain part.
    pub fn to_plain_text(html: &str) -> Result<String> {
        html2text::config::plain()
            .string_from_read(html.as_bytes(), 80)
            .context("Failed to render plain-text digest")
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn pair(title: &str, url: &str, summary: Summary) -> (ArticleRecord, Summary) {
        (ArticleRecord::new(title, url, "en"), summary)
    }

    fn generated(text: &str) -> Summary {
        Summary::Generated(text.to_string())
    }

    // ==================== HTML Escaping Tests ====================

    #[test]
    fn test_escape_html_combined() {
        assert_eq!(
            DigestComposer::escape_html("<a href=\"test\">Click & Go</a>"),
            "&lt;a href=&quot;test&quot;&gt;Click &amp; Go&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_html_single_quotes() {
        assert_eq!(DigestComposer::escape_html("It's here"), "It&#39;s here");
    }

    // ==================== HTML Generation Tests ====================

    #[test]
    fn test_compose_one_item_per_pair_in_order() {
        let pairs = vec![
            pair("First", "https://1.example", generated("One.")),
            pair("Second", "https://2.example", Summary::Unavailable),
            pair("Third", "https://3.example", Summary::ContentUnavailable),
        ];
        let html = DigestComposer::compose(&pairs, Locale::En, date());

        assert_eq!(html.matches("<li>").count(), 3);
        let first = html.find("https://1.example").unwrap();
        let second = html.find("https://2.example").unwrap();
        let third = html.find("https://3.example").unwrap();
        assert!(first < second && second < third);

        let item = "<li><a href=\"https://1.example\">First</a><br>One.</li>";
        assert!(html.contains(item));
        assert!(html.contains("Summary not available"));
        assert!(html.contains("Article content not available"));
    }

    #[test]
    fn test_compose_heading_and_date() {
        let html = DigestComposer::compose(&[], Locale::En, date());
        assert!(html.contains("<h2>Latest AI News</h2>"));
        assert!(html.contains("Sunday, 1 February 2026"));
        assert!(html.contains("<ul>\n</ul>"));

        let html = DigestComposer::compose(&[], Locale::Fr, date());
        assert!(html.contains("<html lang=\"fr\">"));
        assert!(html.contains("<h2>Actualités IA</h2>"));
        assert!(html.contains("01/02/2026"));
    }

    #[test]
    fn test_compose_escapes_title_url_and_summary() {
        let pairs = vec![pair(
            "Apple & <Google>",
            "https://a.example/?q=\"x\"&y=1",
            Summary::Generated("Uses <script>alert(1)</script>".to_string()),
        )];
        let html = DigestComposer::compose(&pairs, Locale::En, date());

        assert!(html.contains("Apple &amp; &lt;Google&gt;"));
        let href = "href=\"https://a.example/?q=&quot;x&quot;&amp;y=1\"";
        assert!(html.contains(href));
        assert!(html.contains("Uses &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_plain_text_keeps_titles_and_summaries() {
        let pairs = vec![pair(
            "Robots fold laundry",
            "https://a.example",
            Summary::Generated("A lab trained a robot.".to_string()),
        )];
        let html = DigestComposer::compose(&pairs, Locale::En, date());
        let text = DigestComposer::to_plain_text(&html).unwrap();

        assert!(text.contains("Robots fold laundry"));
        assert!(text.contains("A lab trained a robot."));
        assert!(!text.contains("<li>"));
    }
}
