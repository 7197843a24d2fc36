use std::ops::Range;

use markdown::mdast::{Code, Node};
use serde::{Deserialize, Serialize};

/// Removes exactly one trailing `\n`, if any.
///
/// Leading whitespace and every other character are left alone, so a block
/// ending in `"\n\n"` keeps one of them.
pub fn trim_trailing_newline(code: &str) -> &str {
    code.strip_suffix('\n').unwrap_or(code)
}

/// Preprocessing step run on the raw text of every fenced code block before
/// it reaches the highlighter.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CodeTransform {
    TrimTrailingNewline,
}

impl CodeTransform {
    pub fn apply<'a>(&self, code: &'a str) -> &'a str {
        match self {
            CodeTransform::TrimTrailingNewline => trim_trailing_newline(code),
        }
    }
}

/// Runs the transforms in order.
pub fn apply_transforms<'a>(transforms: &[CodeTransform], code: &'a str) -> &'a str {
    transforms.iter().fold(code, |code, transform| transform.apply(code))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub lang: Option<&'a str>,
    pub meta: Option<&'a str>,
    /// Raw text between the fences, line breaks included.
    pub code: &'a str,
}

fn walk<'a>(node: &'a Node, visit: &mut impl FnMut(&'a Node)) {
    visit(node);
    if let Some(children) = node.children() {
        for child in children {
            walk(child, visit);
        }
    }
}

/// Fenced and indented code blocks of a parsed document, in document order.
pub fn code_blocks(tree: &Node) -> Vec<&Code> {
    let mut blocks = vec![];
    walk(tree, &mut |node| {
        if let Node::Code(code) = node {
            blocks.push(code);
        }
    });
    blocks
}

/// Source byte ranges taken by code blocks and inline code spans, in order.
pub fn code_ranges(tree: &Node) -> Vec<Range<usize>> {
    let mut ranges = vec![];
    walk(tree, &mut |node| {
        if let Node::Code(_) | Node::InlineCode(_) = node {
            if let Some(position) = node.position() {
                ranges.push(position.start.offset..position.end.offset);
            }
        }
    });
    ranges
}

#[cfg(test)]
mod tests {
    use markdown::ParseOptions;

    use super::*;

    #[test]
    fn test_trim_without_trailing_break() {
        for s in ["", "abc", "  indented", "fn main() {}", "a\nb", "tail\r"] {
            assert_eq!(trim_trailing_newline(s), s);
        }
    }

    #[test]
    fn test_trim_single_trailing_break() {
        for t in ["", "abc", "  indented", "a\nb"] {
            let s = format!("{}\n", t);
            assert_eq!(trim_trailing_newline(&s), t);
        }
    }

    #[test]
    fn test_trim_removes_only_one_break() {
        assert_eq!(trim_trailing_newline("code\n\n"), "code\n");
        assert_eq!(trim_trailing_newline(trim_trailing_newline("code\n")), "code");
        assert_eq!(trim_trailing_newline("\n"), "");
    }

    #[test]
    fn test_apply_transforms() {
        let transforms = [CodeTransform::TrimTrailingNewline];
        assert_eq!(apply_transforms(&transforms, "let x = 1;\n"), "let x = 1;");
        assert_eq!(apply_transforms(&[], "let x = 1;\n"), "let x = 1;\n");
    }

    fn parse(body: &str) -> Node {
        markdown::to_mdast(body, &ParseOptions::gfm()).unwrap()
    }

    #[test]
    fn test_code_blocks_in_order() {
        let tree = parse("Intro\n\n```rust title=\"main.rs\"\nfn main() {}\n```\n\n    indented\n\n- item\n\n  ~~~\n  plain\n  ~~~\n");
        let blocks = code_blocks(&tree);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].lang.as_deref(), Some("rust"));
        assert_eq!(blocks[0].meta.as_deref(), Some("title=\"main.rs\""));
        assert_eq!(blocks[0].value, "fn main() {}");
        assert_eq!(blocks[1].value, "indented");
        assert_eq!(blocks[2].lang, None);
        assert_eq!(blocks[2].value, "plain");
    }

    #[test]
    fn test_code_ranges_cover_blocks_and_spans() {
        let body = "Use `class=\"a\"` here.\n\n```html\n<b class=\"x\"></b>\n```\n\nDone.\n";
        let ranges = code_ranges(&parse(body));
        let covered: Vec<&str> = ranges.iter().map(|r| &body[r.clone()]).collect();
        assert_eq!(covered, vec!["`class=\"a\"`", "```html\n<b class=\"x\"></b>\n```"]);
    }

    #[test]
    fn test_no_code() {
        let tree = parse("Just *prose*.\n");
        assert!(code_blocks(&tree).is_empty());
        assert!(code_ranges(&tree).is_empty());
    }
}
