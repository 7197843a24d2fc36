use std::ops::Range;

use markdown::mdast::Code;
use markdown::{Options, ParseOptions};
use quick_xml::escape::unescape;
use thiserror::Error;

use crate::config::Config;
use crate::content::EntryFormat;
use crate::css::CssConfig;
use crate::render::code_block::{code_blocks, code_ranges, CodeBlock};
use crate::render::highlight::Highlighter;

const PRE_OPEN: &str = "<pre><code";
const PRE_CLOSE: &str = "</code></pre>";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("MDX entry found but the mdx integration is not enabled")]
    MdxDisabled,
    #[error("invalid MDX: {0}")]
    Mdx(String),
    #[error("markdown error: {0}")]
    Markdown(String),
}

/// Turns an entry body into HTML.
///
/// The whole body goes through the `markdown` crate with GFM options, then
/// every `<pre><code>` it produced is replaced by the [`Highlighter`] frame.
/// CSS transformers only see prose, never code.
pub struct BodyRenderer<'a> {
    highlighter: Highlighter<'a>,
    css: &'a CssConfig,
    mdx_enabled: bool,
}

impl<'a> BodyRenderer<'a> {
    pub fn new(config: &'a Config, css: &'a CssConfig) -> Self {
        BodyRenderer {
            highlighter: Highlighter::from_config(&config.markdown),
            css,
            mdx_enabled: config.mdx_enabled(),
        }
    }

    pub fn render(&self, format: EntryFormat, body: &str) -> Result<String, RenderError> {
        if format == EntryFormat::Mdx {
            self.check_mdx(body)?;
        }

        let tree = match markdown::to_mdast(body, &ParseOptions::gfm()) {
            Ok(tree) => tree,
            Err(e) => return Err(RenderError::Markdown(e.reason)),
        };

        let body = self.transform_prose(body, &code_ranges(&tree));
        let html = Self::render_markdown(&body)?;
        self.highlight(&html, &code_blocks(&tree))
    }

    fn check_mdx(&self, body: &str) -> Result<(), RenderError> {
        if !self.mdx_enabled {
            return Err(RenderError::MdxDisabled);
        }
        match markdown::to_mdast(body, &ParseOptions::mdx()) {
            Ok(_) => Ok(()),
            Err(e) => Err(RenderError::Mdx(e.reason)),
        }
    }

    // Code ranges are sorted and never overlap
    fn transform_prose(&self, body: &str, code: &[Range<usize>]) -> String {
        let mut out = String::with_capacity(body.len());
        let mut last = 0;
        for range in code {
            out.push_str(&self.css.apply_transformers(&body[last..range.start]));
            out.push_str(&body[range.clone()]);
            last = range.end;
        }
        out.push_str(&self.css.apply_transformers(&body[last..]));
        out
    }

    fn render_markdown(md_text: &str) -> Result<String, RenderError> {
        match markdown::to_html_with_options(md_text, &Options::gfm()) {
            Ok(x) => Ok(x),
            Err(e) => Err(RenderError::Markdown(e.reason)),
        }
    }

    /// Swaps each rendered code block for the highlighter frame. Blocks show up
    /// in the HTML in the same order as in the tree.
    fn highlight(&self, html: &str, blocks: &[&Code]) -> Result<String, RenderError> {
        let mut out = String::with_capacity(html.len());
        let mut blocks = blocks.iter();
        let mut rest = html;

        while let Some(start) = rest.find(PRE_OPEN) {
            let Some(len) = rest[start..].find(PRE_CLOSE) else {
                break;
            };
            let inner = &rest[start + PRE_OPEN.len()..start + len];
            let content = inner.split_once('>').map_or(inner, |(_, content)| content);
            let code = unescape(content).map_err(|e| RenderError::Markdown(e.to_string()))?;

            let node = blocks.next();
            let block = CodeBlock {
                lang: node.and_then(|c| c.lang.as_deref()),
                meta: node.and_then(|c| c.meta.as_deref()),
                code: &code,
            };

            out.push_str(&rest[..start]);
            out.push_str(&self.highlighter.render(&block));
            rest = &rest[start + len + PRE_CLOSE.len()..];
        }

        out.push_str(rest);
        Ok(out)
    }
}
