use crate::error::RegistryError;
use crate::registry::{BlockKind, CommentStyle, DataInput, IndentStyle, Registry, body, quote};

/// Helper for kinds whose whole template is "open construct, nested body, close".
fn braced(head: String, code: &str) -> String {
    format!("{} {{\n{}}}", head, body(code))
}

pub(super) fn registry() -> Result<Registry, RegistryError> {
    let registry = Registry::new("javascript")
        .with_comment_style(CommentStyle::Line)
        .with_indent_style(IndentStyle::Braces)
        .with_null_literal("null");

    let registry = structure(registry)?;
    let registry = control(registry)?;
    let registry = definitions(registry)?;
    values(registry)
}

fn structure(registry: Registry) -> Result<Registry, RegistryError> {
    registry
        .with_kind(
            BlockKind::builder("start")
                .label("When program starts")
                .category("events")
                .flow_out()
                .statement(|_| "// Program start".to_string())
                .build(),
        )?
        .with_kind(
            BlockKind::builder("log_message")
                .label("Log message")
                .category("output")
                .sequential()
                .field("message", "Hello, world!")
                .data_input(DataInput::new("message").quoted().default("\"\""))
                .statement(|b| format!("console.log({});", b.input("message")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("declare_variable")
                .label("Declare variable")
                .category("variables")
                .sequential()
                .field("keyword", "let")
                .field("name", "value")
                .field("value", "")
                .data_input(DataInput::new("value").default("undefined"))
                .statement(|b| {
                    let keyword = match b.field("keyword").trim() {
                        "const" => "const",
                        "var" => "var",
                        _ => "let",
                    };
                    format!("{} {} = {};", keyword, b.field("name"), b.input("value"))
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("assign_variable")
                .label("Set variable")
                .category("variables")
                .sequential()
                .field("name", "value")
                .field("value", "")
                .data_input(DataInput::new("value").default("undefined"))
                .statement(|b| format!("{} = {};", b.field("name"), b.input("value")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("call_function")
                .label("Call function")
                .category("functions")
                .sequential()
                .field("name", "doSomething")
                .field("args", "")
                .data_input(DataInput::new("args"))
                .statement(|b| format!("{}({});", b.field("name"), b.input("args")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("comment")
                .label("Comment")
                .category("misc")
                .sequential()
                .field("text", "")
                .statement(|b| format!("// {}", b.field("text")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("raw_code")
                .label("Code")
                .category("misc")
                .sequential()
                .field("code", "")
                .statement(|b| b.field("code"))
                .build(),
        )
}

fn control(registry: Registry) -> Result<Registry, RegistryError> {
    registry
        .with_kind(
            BlockKind::builder("if_condition")
                .label("If")
                .category("control")
                .sequential()
                .branch("true")
                .field("condition", "")
                .data_input(DataInput::new("condition").default("true"))
                .nested(|b, slots| braced(format!("if ({})", b.input("condition")), &slots[0]))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("if_else")
                .label("If / else")
                .category("control")
                .sequential()
                .branch("true")
                .branch("false")
                .field("condition", "")
                .data_input(DataInput::new("condition").default("true"))
                .nested(|b, slots| {
                    format!(
                        "if ({}) {{\n{}}} else {{\n{}}}",
                        b.input("condition"),
                        body(&slots[0]),
                        body(&slots[1])
                    )
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("while_loop")
                .label("While")
                .category("control")
                .sequential()
                .branch("body")
                .field("condition", "")
                .data_input(DataInput::new("condition").default("false"))
                .nested(|b, slots| braced(format!("while ({})", b.input("condition")), &slots[0]))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("for_loop")
                .label("Repeat")
                .category("control")
                .sequential()
                .branch("body")
                .field("variable", "i")
                .field("from", "0")
                .field("to", "10")
                .field("step", "1")
                .data_input(DataInput::new("from").default("0"))
                .data_input(DataInput::new("to").default("0"))
                .nested(|b, slots| {
                    let var = b.field("variable");
                    let step = match b.field("step").trim() {
                        "" | "1" => format!("{}++", var),
                        step => format!("{} += {}", var, step),
                    };
                    let head = format!(
                        "for (let {} = {}; {} < {}; {})",
                        var,
                        b.input("from"),
                        var,
                        b.input("to"),
                        step
                    );
                    braced(head, &slots[0])
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("for_each")
                .label("For each")
                .category("control")
                .sequential()
                .branch("body")
                .field("item", "item")
                .field("items", "items")
                .data_input(DataInput::new("items").default("[]"))
                .nested(|b, slots| {
                    let head = format!("for (const {} of {})", b.field("item"), b.input("items"));
                    braced(head, &slots[0])
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("try_catch")
                .label("Try / catch / finally")
                .category("control")
                .sequential()
                .branch("try")
                .branch("catch")
                .branch("finally")
                .field("error", "error")
                .nested(|b, slots| {
                    let mut code = format!(
                        "try {{\n{}}} catch ({}) {{\n{}}}",
                        body(&slots[0]),
                        b.field("error"),
                        body(&slots[1])
                    );
                    if !slots[2].trim().is_empty() {
                        code.push_str(&format!(" finally {{\n{}}}", body(&slots[2])));
                    }
                    code
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("break")
                .label("Break")
                .category("control")
                .flow_in()
                .statement(|_| "break;".to_string())
                .build(),
        )?
        .with_kind(
            BlockKind::builder("continue")
                .label("Continue")
                .category("control")
                .flow_in()
                .statement(|_| "continue;".to_string())
                .build(),
        )?
        .with_kind(
            BlockKind::builder("return")
                .label("Return")
                .category("functions")
                .flow_in()
                .field("value", "")
                .data_input(DataInput::new("value"))
                .statement(|b| match b.input("value").trim() {
                    "" => "return;".to_string(),
                    value => format!("return {};", value),
                })
                .build(),
        )
}

fn definitions(registry: Registry) -> Result<Registry, RegistryError> {
    registry
        .with_kind(
            BlockKind::builder("function_definition")
                .label("Define function")
                .category("functions")
                .sequential()
                .container("children")
                .field("name", "myFunction")
                .field("params", "")
                .nested(|b, slots| {
                    let head = format!("function {}({})", b.field("name"), b.field("params"));
                    braced(head, &slots[0])
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("class_definition")
                .label("Define class")
                .category("classes")
                .sequential()
                .container("children")
                .partition(&["class_property", "class_method"])
                .field("name", "MyClass")
                .field("extends", "")
                .nested(|b, slots| {
                    let head = match b.field("extends").trim() {
                        "" => format!("class {}", b.field("name")),
                        parent => format!("class {} extends {}", b.field("name"), parent),
                    };
                    braced(head, &slots[0])
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("class_property")
                .label("Class property")
                .category("classes")
                .sequential()
                .field("name", "property")
                .field("value", "")
                .data_input(DataInput::new("value").default("null"))
                .statement(|b| format!("{} = {};", b.field("name"), b.input("value")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("class_method")
                .label("Class method")
                .category("classes")
                .sequential()
                .container("children")
                .field("name", "method")
                .field("params", "")
                .nested(|b, slots| {
                    let head = format!("{}({})", b.field("name"), b.field("params"));
                    braced(head, &slots[0])
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("add_event_listener")
                .label("When element is clicked")
                .category("events")
                .sequential()
                .container("children")
                .field("selector", "#button")
                .field("event", "click")
                .nested(|b, slots| {
                    format!(
                        "document.querySelector({}).addEventListener({}, (event) => {{\n{}}});",
                        quote(&b.field("selector")),
                        quote(&b.field("event")),
                        body(&slots[0])
                    )
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("set_timeout")
                .label("After delay")
                .category("events")
                .sequential()
                .container("children")
                .field("delay", "1000")
                .nested(|b, slots| {
                    format!(
                        "setTimeout(() => {{\n{}}}, {});",
                        body(&slots[0]),
                        b.field("delay")
                    )
                })
                .build(),
        )
}

fn values(registry: Registry) -> Result<Registry, RegistryError> {
    registry
        .with_kind(
            BlockKind::builder("text_value")
                .label("Text")
                .category("values")
                .field("text", "")
                .data_output("value")
                .value(|b| quote(&b.field("text")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("number_value")
                .label("Number")
                .category("values")
                .field("number", 0.0)
                .data_output("value")
                .value(|b| match b.field("number").trim() {
                    "" => "0".to_string(),
                    n => n.to_string(),
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("boolean_value")
                .label("True / false")
                .category("values")
                .field("value", true)
                .data_output("value")
                .value(|b| match b.field("value").trim() {
                    "false" => "false".to_string(),
                    _ => "true".to_string(),
                })
                .build(),
        )?
        .with_kind(
            BlockKind::builder("variable")
                .label("Variable")
                .category("variables")
                .field("name", "value")
                .data_output("value")
                .value(|b| b.field("name"))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("compare")
                .label("Compare")
                .category("logic")
                .field("a", "a")
                .field("operator", "===")
                .field("b", "b")
                .data_input(DataInput::new("a").default("null"))
                .data_input(DataInput::new("b").default("null"))
                .data_output("result")
                .value(|b| format!("{} {} {}", b.input("a"), b.field("operator"), b.input("b")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("math")
                .label("Arithmetic")
                .category("math")
                .field("a", "0")
                .field("operator", "+")
                .field("b", "0")
                .data_input(DataInput::new("a").default("0"))
                .data_input(DataInput::new("b").default("0"))
                .data_output("result")
                .value(|b| format!("({} {} {})", b.input("a"), b.field("operator"), b.input("b")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("logic")
                .label("And / or")
                .category("logic")
                .field("a", "true")
                .field("operator", "&&")
                .field("b", "true")
                .data_input(DataInput::new("a").default("false"))
                .data_input(DataInput::new("b").default("false"))
                .data_output("result")
                .value(|b| format!("({} {} {})", b.input("a"), b.field("operator"), b.input("b")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("not")
                .label("Not")
                .category("logic")
                .field("value", "")
                .data_input(DataInput::new("value").default("false"))
                .data_output("result")
                .value(|b| format!("!({})", b.input("value")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("call_expression")
                .label("Function result")
                .category("functions")
                .field("name", "compute")
                .field("args", "")
                .data_input(DataInput::new("args"))
                .data_output("result")
                .value(|b| format!("{}({})", b.field("name"), b.input("args")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("array_literal")
                .label("List")
                .category("values")
                .field("items", "")
                .data_output("value")
                .value(|b| format!("[{}]", b.field("items")))
                .build(),
        )?
        .with_kind(
            BlockKind::builder("get_element")
                .label("Find element")
                .category("values")
                .field("selector", "#app")
                .data_output("element")
                .value(|b| format!("document.querySelector({})", quote(&b.field("selector"))))
                .build(),
        )
}
