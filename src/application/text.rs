//! Plain-text helpers for metadata and structured data.

const ELLIPSIS: char = '…';

/// Drop markup, decode the handful of entities the editor emits and collapse
/// whitespace runs into single spaces.
///
/// Tag boundaries count as whitespace so `<p>a</p><p>b</p>` reads `a b`.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c => text.push(c),
        }
    }

    collapse_whitespace(&decode_entities(&text))
}

/// Sanitize editor HTML for embedding in a page; `None` when nothing remains.
pub fn sanitize_html(html: &str) -> Option<String> {
    let cleaned = ammonia::clean(html);
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn decode_entities(text: &str) -> String {
    // `&amp;` last, so `&amp;lt;` stays the literal `&lt;`.
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `max` characters, cutting at the last word
/// boundary and appending `…`.
///
/// Text that already fits is returned untouched. A single word longer than
/// `max` is cut hard.
pub fn truncate_at_word(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut_at = text
        .char_indices()
        .nth(max)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut_at];
    let next_is_boundary = text[cut_at..].starts_with(char::is_whitespace);

    let kept = if next_is_boundary {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) if !head[..idx].trim().is_empty() => &head[..idx],
            _ => head,
        }
    };

    let mut out = kept
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
        .to_string();
    out.push(ELLIPSIS);
    out
}

/// `strip_html` followed by `truncate_at_word`; `None` when nothing remains.
pub fn plain_summary(html: &str, max: usize) -> Option<String> {
    let plain = strip_html(html);
    if plain.is_empty() {
        None
    } else {
        Some(truncate_at_word(&plain, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_html_drops_scripts_and_keeps_markup() {
        assert_eq!(
            sanitize_html("<p>Pasaport</p><script>alert(1)</script>").as_deref(),
            Some("<p>Pasaport</p>")
        );
        assert_eq!(sanitize_html("  <script>x</script> "), None);
    }

    #[test]
    fn strip_html_removes_tags_and_collapses_whitespace() {
        let html = "<p>Fransa   vizesi</p>\n<p><strong>Schengen</strong> bölgesi</p>";
        assert_eq!(strip_html(html), "Fransa vizesi Schengen bölgesi");
    }

    #[test]
    fn strip_html_decodes_common_entities() {
        assert_eq!(
            strip_html("Tom&nbsp;&amp;&nbsp;Jerry &lt;3 &quot;ok&quot;"),
            "Tom & Jerry <3 \"ok\""
        );
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strip_html_of_markup_only_is_empty() {
        assert_eq!(strip_html("<p> </p><br/>"), "");
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_at_word("Fransa Vizesi", 60), "Fransa Vizesi");
    }

    #[test]
    fn short_text_keeps_surrounding_whitespace() {
        assert_eq!(truncate_at_word("  Fransa  ", 60), "  Fransa  ");
    }

    #[test]
    fn long_text_is_cut_at_word_boundary() {
        let text = "Almanya vizesi için gerekli belgeler ve başvuru süreci";
        let cut = truncate_at_word(text, 20);
        assert_eq!(cut, "Almanya vizesi için…");
        assert!(cut.chars().count() <= 21);
    }

    #[test]
    fn boundary_exactly_at_limit_keeps_whole_word() {
        assert_eq!(truncate_at_word("abc def ghi", 7), "abc def…");
    }

    #[test]
    fn single_long_word_is_cut_hard() {
        assert_eq!(truncate_at_word("Donaudampfschifffahrt", 5), "Donau…");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let cut = truncate_at_word("çğıöşü çğıöşü", 8);
        assert_eq!(cut, "çğıöşü…");
    }

    #[test]
    fn plain_summary_skips_empty_markup() {
        assert_eq!(plain_summary("<p></p>", 155), None);
        assert_eq!(
            plain_summary("<p>Kısa</p>", 155).as_deref(),
            Some("Kısa")
        );
    }
}
