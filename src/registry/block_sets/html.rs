use crate::error::RegistryError;
use crate::registry::{
    BlockContext, BlockKind, CommentStyle, DataInput, IndentStyle, Registry, body, escape_markup,
};

/// Renders ` name="value"` pairs for the non-blank attribute fields.
fn attributes(b: &BlockContext<'_>, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| {
            let value = b.field(name);
            (!value.trim().is_empty()).then(|| format!(" {}=\"{}\"", name, escape_markup(&value)))
        })
        .collect()
}

fn tag_name(b: &BlockContext<'_>, field: &str, fallback: &str) -> String {
    let tag = b.field(field);
    let tag = tag.trim();
    if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        tag.to_ascii_lowercase()
    } else {
        fallback.to_string()
    }
}

pub(super) fn registry() -> Result<Registry, RegistryError> {
    Registry::new("html")
        .with_comment_style(CommentStyle::Markup)
        .with_indent_style(IndentStyle::Markup)
        .with_null_literal("")
        .with_kind(
            BlockKind::builder("start")
                .label("Document")
                .category("structure")
                .flow_out()
                .statement(|_| "<!DOCTYPE html>".to_string())
                .build(),
        )?
        .with_kind(
            BlockKind::builder("element")
                .label("Element")
                .category("structure")
                .sequential()
                .container("children")
                .field("tag", "div")
                .field("id", "")
                .field("class", "")
                .nested(|b, slots| {
                    let tag = tag_name(b, "tag", "div");
                    format!(
                        "<{}{}>\n{}</{}>",
                        tag,
                        attributes(b, &["id", "class"]),
                        body(&slots[0]),
                        tag
                    )
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("heading")
                .label("Heading")
                .category("text")
                .sequential()
                .field("level", 1.0)
                .field("text", "Title")
                .data_input(DataInput::new("text"))
                .statement(|b| {
                    let level = match b.field("level").trim().parse::<u8>() {
                        Ok(n @ 1..=6) => n,
                        _ => 1,
                    };
                    format!("<h{}>{}</h{}>", level, b.input("text"), level)
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("paragraph")
                .label("Paragraph")
                .category("text")
                .sequential()
                .field("text", "")
                .data_input(DataInput::new("text"))
                .statement(|b| format!("<p>{}</p>", b.input("text")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("link")
                .label("Link")
                .category("text")
                .sequential()
                .field("href", "#")
                .field("text", "link")
                .data_input(DataInput::new("text"))
                .statement(|b| {
                    format!(
                        "<a{}>{}</a>",
                        attributes(b, &["href"]),
                        b.input("text")
                    )
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("image")
                .label("Image")
                .category("media")
                .sequential()
                .field("src", "")
                .field("alt", "")
                .statement(|b| format!("<img{}>", attributes(b, &["src", "alt"])))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("list")
                .label("List")
                .category("structure")
                .sequential()
                .container("children")
                .field("ordered", false)
                .nested(|b, slots| {
                    let tag = if b.field("ordered").trim() == "true" {
                        "ol"
                    } else {
                        "ul"
                    };
                    format!("<{}>\n{}</{}>", tag, body(&slots[0]), tag)
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("list_item")
                .label("List item")
                .category("structure")
                .sequential()
                .field("text", "")
                .data_input(DataInput::new("text"))
                .statement(|b| format!("<li>{}</li>", b.input("text")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("script")
                .label("Script")
                .category("embed")
                .sequential()
                .field("code", "")
                .statement(|b| format!("<script>\n{}</script>", body(&b.field("code"))))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("html_comment")
                .label("Comment")
                .category("misc")
                .sequential()
                .field("text", "")
                .statement(|b| format!("<!-- {} -->", b.field("text")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("text_value")
                .label("Text")
                .category("values")
                .field("text", "")
                .data_output("value")
                .value(|b| escape_markup(&b.field("text")))
                .build(),
        )
}
