//! Integration tests for code generation across the bundled block sets.
mod common;
use common::*;
use kumiki::prelude::*;

#[test]
fn test_start_then_log() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let log = add_with(&mut graph, &registry, "log_message", "message", "hello");
    then(&mut graph, &registry, start, log);

    let result = generate(&graph, &registry);

    assert!(result.had_entry_point);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.text, "// Program start\nconsole.log(\"hello\");\n");
}

#[test]
fn test_if_with_nested_return() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let branch = add_with(&mut graph, &registry, "if_condition", "condition", "x > 0");
    let ret = add_with(&mut graph, &registry, "return", "value", "1");
    then(&mut graph, &registry, start, branch);
    nest(&mut graph, &registry, branch, "true", ret);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\nif (x > 0) {\n  return 1;\n}\n"
    );
}

#[test]
fn test_compare_feeds_if_condition() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let branch = add(&mut graph, &registry, "if_condition");
    let compare = add(&mut graph, &registry, "compare");
    then(&mut graph, &registry, start, branch);
    feed(&mut graph, &registry, compare, "result", branch, "condition");

    let result = generate(&graph, &registry);

    assert!(result.text.contains("if (a === b) {"));
    assert!(!result.text.contains("if (true)"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_nested_producers_resolve_recursively() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let log = add(&mut graph, &registry, "log_message");
    let math = add(&mut graph, &registry, "math");
    let x = add_with(&mut graph, &registry, "variable", "name", "x");
    then(&mut graph, &registry, start, log);
    feed(&mut graph, &registry, math, "result", log, "message");
    feed(&mut graph, &registry, x, "value", math, "a");
    graph.set_field(math, "b", "2").unwrap();

    let result = generate(&graph, &registry);

    assert!(result.text.contains("console.log((x + 2));"));
}

#[test]
fn test_shared_producer_is_not_a_cycle() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let branch = add(&mut graph, &registry, "if_condition");
    let compare = add(&mut graph, &registry, "compare");
    let x = add_with(&mut graph, &registry, "variable", "name", "x");
    then(&mut graph, &registry, start, branch);
    feed(&mut graph, &registry, compare, "result", branch, "condition");
    feed(&mut graph, &registry, x, "value", compare, "a");
    feed(&mut graph, &registry, x, "value", compare, "b");

    let result = generate(&graph, &registry);

    assert!(result.text.contains("if (x === x) {"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_literal_fallbacks() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let empty = add_with(&mut graph, &registry, "log_message", "message", "");
    let quoted = add_with(&mut graph, &registry, "log_message", "message", "say \"hi\"");
    let ret = add(&mut graph, &registry, "return");
    then(&mut graph, &registry, start, empty);
    then(&mut graph, &registry, empty, quoted);
    then(&mut graph, &registry, quoted, ret);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\nconsole.log(\"\");\nconsole.log(\"say \\\"hi\\\"\");\nreturn;\n"
    );
}

#[test]
fn test_no_entry_point() {
    let registry = javascript();
    let mut graph = Graph::new();
    add(&mut graph, &registry, "log_message");

    let result = generate(&graph, &registry);

    assert!(!result.had_entry_point);
    assert_eq!(
        result.text,
        "// No start block found. Add a start block to generate code.\n"
    );
}

#[test]
fn test_multiple_entry_points_in_creation_order() {
    let registry = javascript();
    let mut graph = Graph::new();
    let first = add(&mut graph, &registry, "start");
    let one = add_with(&mut graph, &registry, "log_message", "message", "one");
    let second = add(&mut graph, &registry, "start");
    let two = add_with(&mut graph, &registry, "log_message", "message", "two");
    then(&mut graph, &registry, second, two);
    then(&mut graph, &registry, first, one);

    let generator = Generator::new(&registry);
    assert_eq!(generator.entry_points(&graph), vec![first, second]);

    let result = generator.generate(&graph);
    assert_eq!(
        result.text,
        "// Program start\nconsole.log(\"one\");\n\n// --- next entry point ---\n\n// Program start\nconsole.log(\"two\");\n"
    );
}

#[test]
fn test_trunk_continues_after_branching_block() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let branch = add_with(&mut graph, &registry, "if_condition", "condition", "ready");
    let inner = add_with(&mut graph, &registry, "log_message", "message", "go");
    let after = add_with(&mut graph, &registry, "log_message", "message", "done");
    then(&mut graph, &registry, start, branch);
    nest(&mut graph, &registry, branch, "true", inner);
    then(&mut graph, &registry, branch, after);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\nif (ready) {\n  console.log(\"go\");\n}\nconsole.log(\"done\");\n"
    );
}

#[test]
fn test_if_else_arms() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let branch = add_with(&mut graph, &registry, "if_else", "condition", "ok");
    let yes = add_with(&mut graph, &registry, "log_message", "message", "yes");
    let no = add_with(&mut graph, &registry, "log_message", "message", "no");
    then(&mut graph, &registry, start, branch);
    nest(&mut graph, &registry, branch, "false", no);
    nest(&mut graph, &registry, branch, "true", yes);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\nif (ok) {\n  console.log(\"yes\");\n} else {\n  console.log(\"no\");\n}\n"
    );
}

#[test]
fn test_try_catch_omits_empty_finally() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let block = add(&mut graph, &registry, "try_catch");
    let attempt = add_with(&mut graph, &registry, "log_message", "message", "t");
    let recover = add_with(&mut graph, &registry, "log_message", "message", "c");
    then(&mut graph, &registry, start, block);
    nest(&mut graph, &registry, block, "try", attempt);
    nest(&mut graph, &registry, block, "catch", recover);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\ntry {\n  console.log(\"t\");\n} catch (error) {\n  console.log(\"c\");\n}\n"
    );
}

#[test]
fn test_nested_containers_with_custom_indent() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let function = add_with(&mut graph, &registry, "function_definition", "name", "main");
    let timer = add(&mut graph, &registry, "set_timeout");
    let tick = add_with(&mut graph, &registry, "log_message", "message", "tick");
    then(&mut graph, &registry, start, function);
    nest(&mut graph, &registry, function, "children", timer);
    nest(&mut graph, &registry, timer, "children", tick);

    let result = Generator::builder(&registry)
        .indent("    ")
        .build()
        .generate(&graph);

    assert_eq!(
        result.text,
        "// Program start\nfunction main() {\n    setTimeout(() => {\n        console.log(\"tick\");\n    }, 1000);\n}\n"
    );
}

#[test]
fn test_class_members_come_before_statements() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let class = add(&mut graph, &registry, "class_definition");
    let note = add_with(&mut graph, &registry, "comment", "text", "note");
    let property = add_with(&mut graph, &registry, "class_property", "name", "count");
    graph.set_field(property, "value", "0").unwrap();
    let method = add_with(&mut graph, &registry, "class_method", "name", "run");
    then(&mut graph, &registry, start, class);
    nest(&mut graph, &registry, class, "children", note);
    then(&mut graph, &registry, note, property);
    then(&mut graph, &registry, property, method);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\nclass MyClass {\n  count = 0;\n  run() {\n  }\n  // note\n}\n"
    );
}

#[test]
fn test_flow_fan_out_emits_every_target() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let a = add_with(&mut graph, &registry, "log_message", "message", "a");
    let b = add_with(&mut graph, &registry, "log_message", "message", "b");
    then(&mut graph, &registry, start, b);
    then(&mut graph, &registry, start, a);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// Program start\nconsole.log(\"b\");\nconsole.log(\"a\");\n"
    );
}

#[test]
fn test_flow_cycle_terminates() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let log = add_with(&mut graph, &registry, "log_message", "message", "a");
    then(&mut graph, &registry, start, log);

    let one = add_with(&mut graph, &registry, "comment", "text", "one");
    let two = add_with(&mut graph, &registry, "comment", "text", "two");
    then(&mut graph, &registry, one, two);
    then(&mut graph, &registry, two, one);

    let result = generate(&graph, &registry);
    assert_eq!(result.text, "// Program start\nconsole.log(\"a\");\n");

    let (code, diagnostics) = Generator::new(&registry).emit_from(&graph, one);
    assert_eq!(code, "// one\n// two");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_block_nested_inside_itself_is_cut() {
    let registry = javascript();
    let mut graph = Graph::new();
    let branch = add(&mut graph, &registry, "if_condition");
    let inner = add_with(&mut graph, &registry, "comment", "text", "b");
    nest(&mut graph, &registry, branch, "true", inner);
    then(&mut graph, &registry, inner, branch);

    let (code, diagnostics) = Generator::new(&registry).emit_from(&graph, branch);

    assert_eq!(
        code,
        "if (true) {\n// b\n// [flow-cycle] block #1: block is nested inside itself, cycle cut here\n}"
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::FlowCycle);
    assert_eq!(diagnostics[0].block, Some(branch));
}

#[test]
fn test_missing_start_block_degrades() {
    let registry = javascript();
    let graph = Graph::new();

    let (code, diagnostics) = Generator::new(&registry).emit_from(&graph, BlockId(99));

    assert_eq!(code, "// [missing-block] block #99: block does not exist");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingBlock);
    assert_eq!(diagnostics[0].block, Some(BlockId(99)));
}

#[test]
fn test_long_chain_does_not_recurse_per_block() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let mut previous = start;
    for _ in 0..5000 {
        let step = add_with(&mut graph, &registry, "comment", "text", "step");
        then(&mut graph, &registry, previous, step);
        previous = step;
    }

    let result = generate(&graph, &registry);

    assert!(result.had_entry_point);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.text.lines().count(), 5001);
    assert_eq!(result.text.lines().last(), Some("// step"));
}

#[test]
fn test_data_cycle_degrades_to_null() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let branch = add(&mut graph, &registry, "if_condition");
    let first = add(&mut graph, &registry, "not");
    let second = add(&mut graph, &registry, "not");
    then(&mut graph, &registry, start, branch);
    feed(&mut graph, &registry, first, "result", branch, "condition");
    feed(&mut graph, &registry, first, "result", second, "value");
    feed(&mut graph, &registry, second, "result", first, "value");

    let result = generate(&graph, &registry);

    assert_eq!(result.text, "// Program start\nif (!(!(null))) {\n}\n");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::DataCycle);
    assert_eq!(result.diagnostics[0].block, Some(first));
}

#[test]
fn test_unknown_kind_becomes_inline_comment() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let log = add(&mut graph, &registry, "log_message");
    then(&mut graph, &registry, start, log);

    let other = degraded_registry();
    let result = generate(&graph, &other);

    assert_eq!(
        result.text,
        "// begin\n// [unknown-kind] block #2: unknown block kind 'log_message'\n"
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnknownKind);
    assert_eq!(result.diagnostics[0].block, Some(log));
}

#[test]
fn test_inline_diagnostics_can_be_disabled() {
    let registry = javascript();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let log = add(&mut graph, &registry, "log_message");
    then(&mut graph, &registry, start, log);

    let other = degraded_registry();
    let result = Generator::builder(&other)
        .inline_diagnostics(false)
        .build()
        .generate(&graph);

    assert_eq!(result.text, "// begin\n");
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_missing_template_and_shape_mismatch_do_not_stop_generation() {
    let registry = degraded_registry();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let silent = add(&mut graph, &registry, "silent");
    let broken = add(&mut graph, &registry, "broken");
    let log = add_with(&mut graph, &registry, "log", "message", "x");
    then(&mut graph, &registry, start, silent);
    then(&mut graph, &registry, silent, broken);
    then(&mut graph, &registry, broken, log);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "// begin\n\
         // [missing-template] block #2: block kind 'silent' has no code template\n\
         // [shape-mismatch] block #3: block kind 'broken' has a branching shape but a template for another shape\n\
         log(\"x\");\n"
    );
    let kinds: Vec<DiagnosticKind> = result.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::MissingTemplate, DiagnosticKind::ShapeMismatch]
    );
}

#[test]
fn test_producer_without_value_template() {
    let registry = degraded_registry();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let log = add(&mut graph, &registry, "log");
    let sensor = add(&mut graph, &registry, "sensor");
    then(&mut graph, &registry, start, log);
    feed(&mut graph, &registry, sensor, "value", log, "message");

    let result = generate(&graph, &registry);

    assert_eq!(result.text, "// begin\nlog(null);\n");
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MissingValue);
    assert_eq!(result.diagnostics[0].block, Some(sensor));
}

#[test]
fn test_custom_entry_separator() {
    let registry = javascript();
    let mut graph = Graph::new();
    add(&mut graph, &registry, "start");
    add(&mut graph, &registry, "start");

    let result = Generator::builder(&registry)
        .entry_separator("section")
        .build()
        .generate(&graph);

    assert_eq!(
        result.text,
        "// Program start\n\n// section\n\n// Program start\n"
    );
}

#[test]
fn test_html_document() {
    let registry = BlockSet::Html.load().unwrap();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let div = add_with(&mut graph, &registry, "element", "class", "box");
    let para = add(&mut graph, &registry, "paragraph");
    let text = add_with(&mut graph, &registry, "text_value", "text", "a<b");
    then(&mut graph, &registry, start, div);
    nest(&mut graph, &registry, div, "children", para);
    feed(&mut graph, &registry, text, "value", para, "text");

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "<!DOCTYPE html>\n<div class=\"box\">\n  <p>a&lt;b</p>\n</div>\n"
    );
}

#[test]
fn test_html_empty_message_uses_markup_comment() {
    let registry = BlockSet::Html.load().unwrap();
    let result = generate(&Graph::new(), &registry);
    assert_eq!(
        result.text,
        "<!-- No start block found. Add a start block to generate code. -->\n"
    );
}

#[test]
fn test_css_stylesheet() {
    let registry = BlockSet::Css.load().unwrap();
    let mut graph = Graph::new();
    let start = add(&mut graph, &registry, "start");
    let rule = add_with(&mut graph, &registry, "rule", "selector", ".card");
    let color = add_with(&mut graph, &registry, "property", "value", "red");
    then(&mut graph, &registry, start, rule);
    nest(&mut graph, &registry, rule, "children", color);

    let result = generate(&graph, &registry);

    assert_eq!(
        result.text,
        "/* Stylesheet */\n.card {\n  color: red;\n}\n"
    );
}
