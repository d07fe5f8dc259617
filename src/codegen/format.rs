//! Textual re-indentation of the assembled document.
//!
//! This is a balance counter, not a parser: a line starting with a closer is
//! dedented one level, and a line that opens more than it closes (ignoring its
//! leading closer) indents the following lines one level. Hand-written field
//! text with unbalanced or multi-line brackets can come out misindented.

use crate::registry::IndentStyle;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Balance {
    leading_closer: bool,
    opens: usize,
    closes: usize,
}

/// Re-indents `text` with `unit` per nesting level, trims trailing whitespace,
/// collapses runs of blank lines and ends the document with a single newline.
pub fn reindent(text: &str, style: IndentStyle, unit: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut depth: usize = 0;
    let mut scanner = BraceScanner::default();
    let mut pending_blank = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }

        let balance = match style {
            IndentStyle::Braces => scanner.scan(line),
            IndentStyle::Markup => markup_balance(line),
        };

        if balance.leading_closer {
            depth = depth.saturating_sub(1);
        }
        for _ in 0..depth {
            out.push_str(unit);
        }
        out.push_str(line);
        out.push('\n');

        let closes = balance
            .closes
            .saturating_sub(usize::from(balance.leading_closer));
        if balance.opens > closes {
            depth += 1;
        }
    }

    out
}

/// Counts brackets outside string literals and comments. Block comments may
/// span lines, so the scanner keeps that one bit of state between lines.
#[derive(Debug, Default)]
struct BraceScanner {
    in_block_comment: bool,
}

impl BraceScanner {
    fn scan(&mut self, line: &str) -> Balance {
        let chars: Vec<char> = line.chars().collect();
        let mut balance = Balance {
            leading_closer: !self.in_block_comment
                && matches!(chars.first(), Some('}' | ']' | ')')),
            ..Balance::default()
        };
        let mut quote: Option<char> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if self.in_block_comment {
                if c == '*' && next == Some('/') {
                    self.in_block_comment = false;
                    i += 1;
                }
            } else if let Some(q) = quote {
                if c == '\\' {
                    i += 1;
                } else if c == q {
                    quote = None;
                }
            } else {
                match c {
                    '"' | '\'' | '`' => quote = Some(c),
                    '/' if next == Some('*') => {
                        self.in_block_comment = true;
                        i += 1;
                    }
                    // `//` after a colon is most likely a URL scheme, not a comment.
                    '/' if next == Some('/') && (i == 0 || chars[i - 1] != ':') => break,
                    '{' | '[' | '(' => balance.opens += 1,
                    '}' | ']' | ')' => balance.closes += 1,
                    _ => {}
                }
            }
            i += 1;
        }

        balance
    }
}

/// Counts open and close tags on one line of markup.
fn markup_balance(line: &str) -> Balance {
    let mut balance = Balance {
        leading_closer: line.starts_with("</"),
        ..Balance::default()
    };
    let mut rest = line;

    while let Some(start) = rest.find('<') {
        rest = &rest[start..];
        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => rest = &rest[end + 3..],
                None => break,
            }
            continue;
        }
        let Some(end) = rest.find('>') else {
            break;
        };
        let tag = &rest[1..end];
        rest = &rest[end + 1..];

        if tag.starts_with('!') || tag.starts_with('?') || tag.ends_with('/') {
            continue;
        }
        if let Some(name) = tag.strip_prefix('/') {
            if !is_void(name) {
                balance.closes += 1;
            }
            continue;
        }
        let name = tag.split_whitespace().next().unwrap_or("");
        if !name.is_empty() && !is_void(name) {
            balance.opens += 1;
        }
    }

    balance
}

fn is_void(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    VOID_ELEMENTS.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braces_nesting() {
        let text = "if (x > 0) {\nreturn 1;\n}";
        assert_eq!(
            reindent(text, IndentStyle::Braces, "  "),
            "if (x > 0) {\n  return 1;\n}\n"
        );
    }

    #[test]
    fn test_else_line_stays_at_construct_level() {
        let text = "if (a) {\nf();\n} else {\ng();\n}";
        assert_eq!(
            reindent(text, IndentStyle::Braces, "    "),
            "if (a) {\n    f();\n} else {\n    g();\n}\n"
        );
    }

    #[test]
    fn test_callback_closing_with_arguments() {
        let text = "setTimeout(() => {\nrun();\n}, 1000);\ndone();";
        assert_eq!(
            reindent(text, IndentStyle::Braces, "  "),
            "setTimeout(() => {\n  run();\n}, 1000);\ndone();\n"
        );
    }

    #[test]
    fn test_brackets_in_strings_and_comments_are_ignored() {
        let text = "console.log(\"{\");\n// {\n/* { */\nnext();";
        assert_eq!(
            reindent(text, IndentStyle::Braces, "  "),
            "console.log(\"{\");\n// {\n/* { */\nnext();\n"
        );
    }

    #[test]
    fn test_existing_indentation_is_normalized() {
        let text = "      function f() {\n\t\t\treturn;\n        }";
        assert_eq!(
            reindent(text, IndentStyle::Braces, "  "),
            "function f() {\n  return;\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let text = "a();\n\n\n\nb();\n\n";
        assert_eq!(reindent(text, IndentStyle::Braces, "  "), "a();\n\nb();\n");
    }

    #[test]
    fn test_markup_nesting() {
        let text = "<!DOCTYPE html>\n<div class=\"box\">\n<p>hi</p>\n<img src=\"a.png\">\n<br/>\n</div>";
        assert_eq!(
            reindent(text, IndentStyle::Markup, "  "),
            "<!DOCTYPE html>\n<div class=\"box\">\n  <p>hi</p>\n  <img src=\"a.png\">\n  <br/>\n</div>\n"
        );
    }

    #[test]
    fn test_markup_comments_do_not_nest() {
        let text = "<ul>\n<!-- <li> -->\n<li>x</li>\n</ul>";
        assert_eq!(
            reindent(text, IndentStyle::Markup, "  "),
            "<ul>\n  <!-- <li> -->\n  <li>x</li>\n</ul>\n"
        );
    }
}
