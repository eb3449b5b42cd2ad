use std::fmt::Write;

use crate::domain::Place;
use crate::i18n::{Labels, capitalize};

/// Everything that shapes a popup besides the place itself
#[derive(Debug, Clone, Copy)]
pub struct PopupStyle<'a> {
    pub labels: &'a Labels,
    /// HTML snippet printed before a price, e.g. `&euro;`
    pub price_unit: &'a str,
}

/// Escape text for use inside HTML element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

/// Build the popup body for one place.
///
/// The name, website, price and availability are escaped; `info` is emitted
/// as-is so documents can carry their own markup.
pub fn popup_html(name: &str, place: &Place, style: &PopupStyle<'_>) -> String {
    let labels = style.labels;
    let mut html = format!("<b>{}</b><br>", escape_html(name));

    // write! into a String cannot fail
    if let Some(website) = &place.website {
        let _ = write!(
            html,
            r#"<a href="{}" target="_blank">{}</a><br>"#,
            escape_html(website),
            labels.website
        );
    }

    if let Some(price) = &place.price {
        if price.is_free() {
            let _ = write!(html, "{}: {}<br>", capitalize(labels.price), labels.free);
        } else {
            let _ = write!(
                html,
                "{}: {} {}<br>",
                capitalize(labels.price),
                style.price_unit,
                escape_html(&price.to_string())
            );
        }
    }

    if let Some(info) = &place.info {
        let _ = write!(html, "{}<br>", info);
    }

    if !place.availability.is_empty() {
        let items: String = place
            .availability
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(item)))
            .collect();
        let _ = write!(
            html,
            "{}: <ul>{}</ul>",
            capitalize(labels.availability),
            items
        );
    }

    html
}
