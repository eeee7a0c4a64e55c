//! Short string rendering of DOM elements

use crate::raw::ElementInfo;

/// Upper bound, in characters, of a rendered element
pub const MAX_ELEMENT_STRING_LEN: usize = 200;

fn tag_of(element: &ElementInfo) -> Option<String> {
    element
        .local_name
        .as_deref()
        .or(element.tag_name.as_deref())
        .map(str::to_lowercase)
}

/// Render an element as `<tag id="..." class='...'>text</tag>`.
///
/// `body` and tagless elements render as an empty string. The result is
/// cut to [`MAX_ELEMENT_STRING_LEN`] characters.
pub fn element_as_string(element: &ElementInfo) -> String {
    let Some(tag) = tag_of(element) else {
        return String::new();
    };
    if tag == "body" {
        return String::new();
    }

    let id = element
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| format!(" id=\"{}\"", id))
        .unwrap_or_default();
    let class = element
        .class_name
        .as_deref()
        .filter(|class| !class.is_empty())
        .map(|class| format!(" class='{}'", class))
        .unwrap_or_default();
    let text = element.inner_text.as_deref().unwrap_or("");

    truncate(format!("<{tag}{id}{class}>{text}</{tag}>"), MAX_ELEMENT_STRING_LEN)
}

fn truncate(rendered: String, max_chars: usize) -> String {
    if rendered.chars().count() <= max_chars {
        return rendered;
    }
    let mut cut: String = rendered.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_id_class_and_text() {
        let button = ElementInfo::element("BUTTON")
            .with_id("save")
            .with_class("btn primary")
            .with_text("Save");
        assert_eq!(
            element_as_string(&button),
            "<button id=\"save\" class='btn primary'>Save</button>"
        );
    }

    #[test]
    fn body_renders_empty() {
        assert_eq!(element_as_string(&ElementInfo::element("body")), "");
    }

    #[test]
    fn long_text_is_bounded() {
        let text = "é".repeat(500);
        let div = ElementInfo::element("div").with_text(&text);
        let rendered = element_as_string(&div);
        assert_eq!(rendered.chars().count(), MAX_ELEMENT_STRING_LEN);
        assert!(rendered.ends_with("..."));
    }
}
