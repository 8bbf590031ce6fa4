use crate::dom::css::parse_inline_style;
use crate::dom::{ElementId, Page};
use scraper::{ElementRef, Html, Node};

/// Tags whose children should be stripped (invisible/script content)
const SKIP_CHILDREN: &[&str] = &["script", "style", "noscript", "svg", "head"];

/// Parse raw HTML into a mutable [`Page`].
pub fn parse_html(html: &str, url: &str) -> Page {
    let document = Html::parse_document(html);

    let title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let mut page = Page::new(url);
    page.title = title.trim().to_string();
    let root = page.root();
    convert_element(&mut page, root, document.root_element());
    log::debug!("parsed {} nodes from {}", page.node_count(), url);
    page
}

fn convert_element(page: &mut Page, parent: ElementId, el: ElementRef<'_>) {
    let tag = el.value().name.local.as_ref().to_lowercase();
    let id = page.create_element(&tag);

    for (k, v) in el.value().attrs() {
        match k {
            "class" => {
                for class in v.split_whitespace() {
                    page.add_class(id, class);
                }
            }
            "style" => {
                if let Some(node) = page.get_mut(id) {
                    node.style = parse_inline_style(v);
                }
            }
            _ => page.set_attr(id, k, v),
        }
    }
    page.append_child(parent, id);

    if SKIP_CHILDREN.contains(&tag.as_str()) {
        return;
    }

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    convert_element(page, id, child_el);
                }
            }
            Node::Text(t) => {
                let s = collapse_whitespace(&t.text);
                if !s.trim().is_empty() {
                    let text = page.create_text(&s);
                    page.append_child(id, text);
                }
            }
            _ => {}
        }
    }

    init_form_value(page, id, &tag);
}

/// Seed `value`/`default_value` of form controls from the markup.
fn init_form_value(page: &mut Page, id: ElementId, tag: &str) {
    let initial = match tag {
        "input" => page.attr(id, "value").unwrap_or_default().to_string(),
        "textarea" => page.text_content(id),
        _ => return,
    };
    if let Some(node) = page.get_mut(id) {
        node.value = initial.clone();
        node.default_value = initial;
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_html() {
        let html = r#"
        <html>
            <head><title>Cyber Portfolio</title></head>
            <body>
                <h1 class="glitch hero-title">Hello, <span id="typed-text"></span></h1>
                <p>Content paragraph</p>
            </body>
        </html>
        "#;

        let page = parse_html(html, "file:///index.html");
        assert_eq!(page.title, "Cyber Portfolio");
        let h1 = page.query_selector("h1.hero-title").unwrap();
        assert!(page.has_class(h1, "glitch"));
        assert!(page.get_element_by_id("typed-text").is_some());
        assert!(page.text_content(page.body()).contains("Content paragraph"));
    }

    #[test]
    fn strips_script_children() {
        let html = r#"
        <html><body>
            <p>Visible</p>
            <script>alert("hidden");</script>
        </body></html>
        "#;

        let page = parse_html(html, "file:///index.html");
        let text = page.text_content(page.root());
        assert!(text.contains("Visible"));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn form_controls_keep_defaults() {
        let html = r#"<body><form id="contact-form">
            <input name="name" value="anon">
            <textarea name="message">hi</textarea>
        </form></body>"#;
        let page = parse_html(html, "file:///index.html");
        let form = page.get_element_by_id("contact-form").unwrap();
        assert_eq!(page.form_field(form, "name").as_deref(), Some("anon"));
        assert_eq!(page.form_field(form, "message").as_deref(), Some("hi"));
    }

    #[test]
    fn inline_style_is_parsed() {
        let html = r#"<body><div class="skill-progress" data-width="90" style="width: 0%"></div></body>"#;
        let page = parse_html(html, "file:///index.html");
        let bar = page.query_selector(".skill-progress").unwrap();
        assert_eq!(page.style(bar, "width"), Some("0%"));
        assert_eq!(page.attr(bar, "data-width"), Some("90"));
    }
}
