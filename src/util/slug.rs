use std::path::Path;

/// Lowercase, ASCII-folded slug. Whitespace becomes `-`, anything that is not
/// alphanumeric, `-` or `_` is dropped and separators never repeat.
pub fn slugify(text: &str) -> String {
    let ascii = unidecode::unidecode(text);

    let mut slug = String::with_capacity(ascii.len());
    let mut prev_char = None;
    for c in ascii.chars() {
        let c = match c {
            c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
            '-' | '_' => c,
            c if c.is_whitespace() => '-',
            _ => continue,
        };

        if c == '-' && prev_char == Some('-') {
            continue;
        }
        slug.push(c);
        prev_char = Some(c);
    }

    slug.trim_matches('-').to_string()
}

/// Slug of a relative path, one segment per component, joined with `/`.
pub fn slugify_path(path: &Path) -> String {
    path.iter()
        .map(|component| slugify(&component.to_string_lossy()))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
