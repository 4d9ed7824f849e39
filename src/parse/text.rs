use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::Error;

/// Collapses every run of whitespace (including newlines) into a single space and trims the ends.
pub fn normalize_whitespace(s: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s+").expect("regex should be valid"));
    let trimmed = s.trim();
    if trimmed.contains(|c: char| c.is_whitespace() && c != ' ') || trimmed.contains("  ") {
        Cow::Owned(re.replace_all(trimmed, " ").into_owned())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Returns the first non-blank text node of the first element matching `selector`.
pub fn first_text_from_selection<'a>(
    selector: &Selector,
    element: ElementRef<'a>,
    parent_label: &str,
    child_label: &str,
) -> Result<&'a str, Error> {
    let child = element.select(selector).next().ok_or_else(|| {
        Error::HtmlParse(format!(
            "Every {parent_label} element should have a {child_label}."
        ))
    })?;
    child
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .ok_or_else(|| Error::TextNodeParse(format!("{child_label} should have text inside.")))
}

/// Text that appears in `element` before its first child element.
pub fn leading_text<'a>(element: ElementRef<'a>, text_label: &str) -> Result<&'a str, Error> {
    element
        .children()
        .map_while(|node| node.value().as_text())
        .map(|text| &**text)
        .find(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            Error::TextNodeParse(format!(
                "{text_label} should start with text before any nested element."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  sonka  "), "sonka");
        assert_eq!(
            normalize_whitespace("füstölt\n   sajt\t"),
            Cow::<str>::Owned("füstölt sajt".into())
        );
        assert!(matches!(normalize_whitespace(" kukorica"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_first_text_skips_blank_nodes() {
        let html = Html::parse_fragment("<div><h3>\n  <span> Songoku </span></h3></div>");
        let sel = Selector::parse("h3").unwrap();
        let text = first_text_from_selection(&sel, html.root_element(), "pizza", "name");
        assert_eq!(text, Ok("Songoku"));
    }

    #[test]
    fn test_first_text_missing_child() {
        let html = Html::parse_fragment("<div><p>only a paragraph</p></div>");
        let sel = Selector::parse("h3").unwrap();
        let err = first_text_from_selection(&sel, html.root_element(), "pizza", "name");
        assert!(matches!(err, Err(Error::HtmlParse(_))));
    }

    #[test]
    fn test_leading_text() {
        let html = Html::parse_fragment("<p>(sonka, gomba)<br>32 cm</p><p><b>x</b> y</p>");
        let sel = Selector::parse("p").unwrap();
        let mut ps = html.select(&sel);
        assert_eq!(
            leading_text(ps.next().unwrap(), "toppings"),
            Ok("(sonka, gomba)")
        );
        assert!(leading_text(ps.next().unwrap(), "toppings").is_err());
    }
}
