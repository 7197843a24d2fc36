use quick_xml::escape::escape;

use crate::config::Markdown;
use crate::render::code_block::{apply_transforms, CodeBlock, CodeTransform};

const DEFAULT_LANGUAGE: &str = "plaintext";

/// Frames code blocks for the configured highlighter.
///
/// Token coloring belongs to the highlighter itself; this only produces the
/// themed `<pre>` wrapper with one `<span class="line">` per source line,
/// after the configured transforms ran.
pub struct Highlighter<'a> {
    pub name: &'a str,
    pub theme: &'a str,
    pub transforms: &'a [CodeTransform],
}

impl<'a> Highlighter<'a> {
    pub fn from_config(markdown: &'a Markdown) -> Self {
        Highlighter {
            name: &markdown.highlighter,
            theme: &markdown.theme,
            transforms: &markdown.code_transforms,
        }
    }

    pub fn render(&self, block: &CodeBlock) -> String {
        let code = apply_transforms(self.transforms, block.code);
        let lang = block.lang.unwrap_or(DEFAULT_LANGUAGE);

        let mut buf = String::new();
        buf.push_str(&format!(
            r#"<pre class="{} {}" data-language="{}" tabindex="0"><code>"#,
            escape(self.name),
            escape(self.theme),
            escape(lang),
        ));

        let lines: Vec<String> = code
            .split('\n')
            .map(|line| format!(r#"<span class="line">{}</span>"#, escape(line)))
            .collect();
        buf.push_str(&lines.join("\n"));

        buf.push_str("</code></pre>");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(code: &str) -> CodeBlock<'_> {
        CodeBlock {
            lang: Some("rust"),
            meta: None,
            code,
        }
    }

    #[test]
    fn test_render_trimmed() {
        let transforms = [CodeTransform::TrimTrailingNewline];
        let highlighter = Highlighter {
            name: "shiki",
            theme: "github-dark",
            transforms: &transforms,
        };
        let html = highlighter.render(&block("let a = 1;\nlet b = a < 2;\n"));
        assert_eq!(html, concat!(
            r#"<pre class="shiki github-dark" data-language="rust" tabindex="0"><code>"#,
            r#"<span class="line">let a = 1;</span>"#, "\n",
            r#"<span class="line">let b = a &lt; 2;</span>"#,
            "</code></pre>",
        ));
    }

    #[test]
    fn test_render_untrimmed_keeps_empty_line() {
        let highlighter = Highlighter {
            name: "shiki",
            theme: "nord",
            transforms: &[],
        };
        let html = highlighter.render(&CodeBlock { lang: None, meta: None, code: "x\n" });
        assert_eq!(html, concat!(
            r#"<pre class="shiki nord" data-language="plaintext" tabindex="0"><code>"#,
            r#"<span class="line">x</span>"#, "\n",
            r#"<span class="line"></span>"#,
            "</code></pre>",
        ));
    }
}
