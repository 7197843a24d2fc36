/// Expands variant groups in a class list.
///
/// `hover:(bg-gray-400 font-medium) font-light` becomes
/// `hover:bg-gray-400 hover:font-medium font-light`. Groups nest, and the
/// prefix is glued as written, so `text-(red sm)` gives `text-red text-sm`.
/// A list with unbalanced parentheses is returned unchanged.
pub fn expand_variant_groups(classes: &str) -> String {
    if !classes.contains('(') {
        return classes.to_string();
    }

    let chars: Vec<char> = classes.chars().collect();
    let mut pos = 0;
    let mut out = vec![];
    match expand_list(&chars, &mut pos, "", &mut out, false) {
        Some(()) => out.join(" "),
        None => classes.to_string(),
    }
}

fn expand_list(chars: &[char], pos: &mut usize, prefix: &str, out: &mut Vec<String>, nested: bool) -> Option<()> {
    loop {
        while *pos < chars.len() && chars[*pos].is_whitespace() {
            *pos += 1;
        }

        if *pos == chars.len() {
            return if nested { None } else { Some(()) };
        }

        if chars[*pos] == ')' {
            if !nested {
                return None;
            }
            *pos += 1;
            return Some(());
        }

        let start = *pos;
        while *pos < chars.len() && !chars[*pos].is_whitespace() && chars[*pos] != '(' && chars[*pos] != ')' {
            *pos += 1;
        }
        let token: String = chars[start..*pos].iter().collect();

        if *pos < chars.len() && chars[*pos] == '(' {
            *pos += 1;
            let group_prefix = format!("{}{}", prefix, token);
            expand_list(chars, pos, &group_prefix, out, true)?;
        } else {
            out.push(format!("{}{}", prefix, token));
        }
    }
}
