//! Best-effort markdown to HTML conversion for article display.
//!
//! Handles the constrained subset the text model is prompted to emit: `#`
//! headers, `**bold**`/`*italic*`, `[label](url)` links, and flat `-`/`*`/`1.`
//! lists. Nested lists, code blocks, tables, and blockquotes are out of scope
//! and pass through as literal text. Output is a single
//! `<div class="article-content">` fragment ready for direct display.

/// Convert a markdown string into an HTML fragment.
///
/// Empty input yields an empty string with no wrapper. Conversion is pure:
/// the same input always produces byte-identical output.
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let mut out = String::from("<div class=\"article-content\">");
    let mut in_list = false;
    let mut in_paragraph = false;

    for line in markdown.lines() {
        if line.trim().is_empty() {
            close_blocks(&mut out, &mut in_list, &mut in_paragraph);
            continue;
        }
        if let Some((level, text)) = header_text(line) {
            close_blocks(&mut out, &mut in_list, &mut in_paragraph);
            out.push_str(&format!("<h{}>{}</h{}>", level, inline(text), level));
            continue;
        }
        if let Some(item) = list_item_text(line) {
            if in_paragraph {
                out.push_str("</p>");
                in_paragraph = false;
            }
            // Adjacent items share one container; only the first opens it.
            if !in_list {
                out.push_str("<ul>");
                in_list = true;
            }
            out.push_str("<li>");
            out.push_str(&inline(item));
            out.push_str("</li>");
            continue;
        }
        if in_list {
            out.push_str("</ul>");
            in_list = false;
        }
        if in_paragraph {
            out.push_str("<br>");
        } else {
            out.push_str("<p>");
            in_paragraph = true;
        }
        out.push_str(&inline(line));
    }

    close_blocks(&mut out, &mut in_list, &mut in_paragraph);
    out.push_str("</div>");
    out
}

fn close_blocks(out: &mut String, in_list: &mut bool, in_paragraph: &mut bool) {
    if *in_list {
        out.push_str("</ul>");
        *in_list = false;
    }
    if *in_paragraph {
        out.push_str("</p>");
        *in_paragraph = false;
    }
}

fn header_text(line: &str) -> Option<(u8, &str)> {
    if let Some(rest) = line.strip_prefix("### ") {
        return Some((3, rest));
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Some((2, rest));
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Some((1, rest));
    }
    None
}

/// Returns the item text when the line is a `-`, `*`, or `N.` list marker
/// followed by whitespace.
fn list_item_text(line: &str) -> Option<&str> {
    let s = line.trim_start();
    let rest = if let Some(r) = s.strip_prefix('-').or_else(|| s.strip_prefix('*')) {
        r
    } else {
        let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        s[digits..].strip_prefix('.')?
    };
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

/// Inline markup: bold before italic (`**` contains `*`), then links.
fn inline(text: &str) -> String {
    let bolded = convert_pairs(text, "**", "strong");
    let emphasized = convert_pairs(&bolded, "*", "em");
    convert_links(&emphasized)
}

/// Wrap text between balanced `marker` pairs in `<tag>`. An unpaired trailing
/// marker is left as literal text.
fn convert_pairs(text: &str, marker: &str, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(marker) {
        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else { break };
        out.push_str(&rest[..start]);
        out.push('<');
        out.push_str(tag);
        out.push('>');
        out.push_str(&after[..end]);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        rest = &after[end + marker.len()..];
    }
    out.push_str(rest);
    out
}

fn convert_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        match parse_link(&rest[open + 1..]) {
            Some((label, url, consumed)) => {
                out.push_str(&rest[..open]);
                out.push_str("<a href=\"");
                out.push_str(url);
                out.push_str("\" target=\"_blank\">");
                out.push_str(label);
                out.push_str("</a>");
                rest = &rest[open + 1 + consumed..];
            }
            None => {
                out.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parses `label](url)` given the text following a `[`. Returns the label,
/// the url, and the byte length consumed. Labels may not contain `]`, urls
/// may not contain `)`, and neither may be empty.
fn parse_link(after_open: &str) -> Option<(&str, &str, usize)> {
    let label_end = after_open.find(']')?;
    let label = &after_open[..label_end];
    if label.is_empty() {
        return None;
    }
    let url_body = after_open[label_end + 1..].strip_prefix('(')?;
    let url_end = url_body.find(')')?;
    let url = &url_body[..url_end];
    if url.is_empty() {
        return None;
    }
    Some((label, url, label_end + url_end + 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn output_is_deterministic() {
        let input = "# Title\n\nSome **bold** text\n- one\n- two";
        assert_eq!(render(input), render(input));
    }

    #[test]
    fn wraps_content_in_single_container() {
        let html = render("# Title\n\nBody text\n\n- item");
        assert!(html.starts_with("<div class=\"article-content\">"));
        assert!(html.ends_with("</div>"));
        assert_eq!(html.matches("<div").count(), 1);
    }

    #[test]
    fn converts_headers_by_level() {
        assert_eq!(
            render("# One\n## Two\n### Three"),
            "<div class=\"article-content\"><h1>One</h1><h2>Two</h2><h3>Three</h3></div>"
        );
    }

    #[test]
    fn bold_resolves_before_italic() {
        let html = render("**strong** and *soft*");
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<em>soft</em>"));
    }

    #[test]
    fn links_open_in_new_context() {
        assert_eq!(
            render("See [the docs](https://example.com) now"),
            "<div class=\"article-content\"><p>See <a href=\"https://example.com\" target=\"_blank\">the docs</a> now</p></div>"
        );
    }

    #[test]
    fn adjacent_list_items_share_one_container() {
        let html = render("- one\n- two\n* three\n1. four");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("</ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 4);
    }

    #[test]
    fn separated_lists_get_separate_containers() {
        let html = render("- one\n\ntext between\n\n- two");
        assert_eq!(html.matches("<ul>").count(), 2);
    }

    #[test]
    fn numbered_markers_require_dot_and_space() {
        let html = render("3.14 is not a list");
        assert!(!html.contains("<li>"));
        assert!(html.contains("<p>3.14 is not a list</p>"));
    }

    #[test]
    fn blank_lines_split_paragraphs_and_newlines_break() {
        assert_eq!(
            render("first line\nsecond line\n\nnext block"),
            "<div class=\"article-content\"><p>first line<br>second line</p><p>next block</p></div>"
        );
    }

    #[test]
    fn unclosed_emphasis_passes_through() {
        let html = render("a *lonely marker");
        assert!(html.contains("a *lonely marker"));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn malformed_link_passes_through() {
        let html = render("[label without url]");
        assert!(html.contains("[label without url]"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn list_item_with_inline_markup() {
        let html = render("- has **bold** and [a link](https://x.test)");
        assert!(html.contains(
            "<li>has <strong>bold</strong> and <a href=\"https://x.test\" target=\"_blank\">a link</a></li>"
        ));
    }

    #[test]
    fn header_markers_mid_line_are_literal() {
        let html = render("not a # header");
        assert!(html.contains("<p>not a # header</p>"));
    }
}
