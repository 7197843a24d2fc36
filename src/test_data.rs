#[cfg(test)]
pub const SITE_CONFIG: &str = r#"
[site]
url = "https://dane.computer"
output = "static"
image_service = "passthrough"

[markdown]
highlighter = "shiki"
theme = "github-dark"
code_transforms = ["trim_trailing_newline"]

[[integration]]
kind = "unocss"
inject_reset = true

[[integration]]
kind = "sitemap"

[[integration]]
kind = "mdx"

[log]
level = "Info"
log_to_console = true
"#;

#[cfg(test)]
pub const CSS_CONFIG: &str = r#"
presets = [
  { kind = "uno" },
  { kind = "web_fonts", fonts = { sans = "Asap:100,300,400,600,700" } },
  { kind = "icons" },
  { kind = "typography" },
]
transformers = ["variant_group"]
"#;

#[cfg(test)]
pub const CONTENT_CONFIG: &str = r#"
[[collection]]
name = "blog"
schema = "blog_post"
loader = { kind = "glob", pattern = "**/*.mdx", base = "src/data/blog" }

[[collection]]
name = "documents"
loader = { kind = "remote", repo = "did:plc:qttsv4e7pu2jl3ilanfgc3zn" }
"#;

#[cfg(test)]
pub const BLOG_POST_YAML: &str = "---
title: Hello
description: World
year: 2021
published_at: 2021-06-01
author:
---

Hello from the body.

```rust
fn main() {}
```
";

#[cfg(test)]
pub const BLOG_POST_TOML: &str = "+++
title = \"Hello\"
description = \"World\"
published_at = 2021-06-01
+++
Body
";
