use crate::error::RegistryError;
use crate::registry::{BlockKind, CommentStyle, DataInput, IndentStyle, Registry, body, quote};

pub(super) fn registry() -> Result<Registry, RegistryError> {
    Registry::new("css")
        .with_comment_style(CommentStyle::Block)
        .with_indent_style(IndentStyle::Braces)
        .with_null_literal("initial")
        .with_kind(
            BlockKind::builder("start")
                .label("Stylesheet")
                .category("structure")
                .flow_out()
                .statement(|_| "/* Stylesheet */".to_string())
                .build(),
        )?
        .with_kind(
            BlockKind::builder("import")
                .label("Import")
                .category("structure")
                .sequential()
                .field("url", "")
                .statement(|b| format!("@import url({});", quote(&b.field("url"))))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("rule")
                .label("Rule")
                .category("rules")
                .sequential()
                .container("children")
                .field("selector", "body")
                .nested(|b, slots| format!("{} {{\n{}}}", b.field("selector"), body(&slots[0])))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("property")
                .label("Property")
                .category("declarations")
                .sequential()
                .field("name", "color")
                .field("value", "black")
                .data_input(DataInput::new("value").default("initial"))
                .statement(|b| format!("{}: {};", b.field("name"), b.input("value")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("custom_property")
                .label("Variable")
                .category("declarations")
                .sequential()
                .field("name", "main-color")
                .field("value", "")
                .data_input(DataInput::new("value").default("initial"))
                .statement(|b| {
                    let name = b.field("name");
                    format!("--{}: {};", name.trim_start_matches('-'), b.input("value"))
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("media_query")
                .label("Media query")
                .category("rules")
                .sequential()
                .container("children")
                .field("query", "(max-width: 600px)")
                .nested(|b, slots| format!("@media {} {{\n{}}}", b.field("query"), body(&slots[0])))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("keyframes")
                .label("Animation")
                .category("rules")
                .sequential()
                .container("children")
                .field("name", "fade")
                .nested(|b, slots| {
                    format!("@keyframes {} {{\n{}}}", b.field("name"), body(&slots[0]))
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("keyframe")
                .label("Keyframe")
                .category("rules")
                .sequential()
                .container("children")
                .field("offset", "from")
                .nested(|b, slots| format!("{} {{\n{}}}", b.field("offset"), body(&slots[0])))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("color_value")
                .label("Color")
                .category("values")
                .field("color", "#333333")
                .data_output("value")
                .value(|b| b.field("color"))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("length_value")
                .label("Length")
                .category("values")
                .field("amount", 16.0)
                .field("unit", "px")
                .data_output("value")
                .value(|b| format!("{}{}", b.field("amount"), b.field("unit")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("var_reference")
                .label("Use variable")
                .category("values")
                .field("name", "main-color")
                .data_output("value")
                .value(|b| format!("var(--{})", b.field("name").trim_start_matches('-')))
                .build(),
        )
}
