//! Shared text-rewrite helpers used by every language transformer.

use regex::Regex;

use crate::rename::inside_string_heuristic;

/// Compiles a pattern that is known-good at build time.
///
/// Rewrite rules are string constants; a typo shows up in the unit tests that
/// exercise the rule, so failing loudly here is the right behavior.
pub fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("bad rewrite pattern {pattern:?}: {e}"))
}

/// Inserts an import line after the last existing import, or at the top of the
/// file, unless it is already present.
pub fn ensure_import(code: &str, import_line: &str) -> String {
    if code.contains(import_line) {
        return code.to_string();
    }
    let lines: Vec<&str> = code.lines().collect();
    let mut insert_at = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") || trimmed.starts_with("from ") || trimmed.starts_with("using ") {
            insert_at = i + 1;
        } else if !trimmed.is_empty() && !trimmed.starts_with('#') && !trimmed.starts_with("//") {
            break;
        }
    }
    let mut out: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
    out.insert(insert_at, import_line.to_string());
    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Applies a regex replacement only on lines that are neither comments nor
/// (heuristically) inside string literals.
pub fn safe_replace(code: &str, pattern: &str, replacement: &str, comment_marker: &str) -> String {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return code.to_string(),
    };
    let mut out = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(comment_marker) || inside_string_heuristic(line) {
            out.push(line.to_string());
        } else {
            out.push(re.replace_all(line, replacement).into_owned());
        }
    }
    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Drops whole lines matching the pattern (used for removed imports).
pub fn drop_lines_matching(code: &str, pattern: &str) -> String {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return code.to_string(),
    };
    let mut out: Vec<&str> = Vec::new();
    for line in code.lines() {
        if !re.is_match(line) {
            out.push(line);
        }
    }
    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Leading whitespace of the line containing byte offset `pos`.
pub fn indent_at(code: &str, pos: usize) -> String {
    let line_start = code[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    code[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Finds the matching close paren for the open paren at `open_pos`.
/// Returns the byte offset of the close paren, or `None` if unbalanced.
pub fn matching_paren(text: &str, open_pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_pos) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;
    for (i, &b) in bytes.iter().enumerate().skip(open_pos) {
        match b {
            b'\'' if !in_double => in_single = !in_single,
            b'"' if !in_single => in_double = !in_double,
            b'(' if !in_single && !in_double => depth += 1,
            b')' if !in_single && !in_double => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// All call sites of `<ident>.<method>(...)`, with the full argument span
/// resolved via balanced parens. Returned in reverse source order so callers
/// can splice replacements without invalidating earlier offsets.
pub struct CallSite {
    pub start: usize,
    /// Byte just past the closing paren.
    pub end: usize,
    pub receiver: String,
    pub args: String,
    pub indent: String,
}

pub fn find_call_sites(code: &str, method: &str) -> Vec<CallSite> {
    let re = rule(&format!(r"(\w+)\s*\.\s*{}\s*\(", regex::escape(method)));
    let mut sites = Vec::new();
    for caps in re.captures_iter(code) {
        let whole = caps.get(0).unwrap();
        let open = whole.end() - 1;
        if let Some(close) = matching_paren(code, open) {
            sites.push(CallSite {
                start: whole.start(),
                end: close + 1,
                receiver: caps[1].to_string(),
                args: code[open + 1..close].to_string(),
                indent: indent_at(code, whole.start()),
            });
        }
    }
    sites.reverse();
    sites
}

/// Replaces a block header line (e.g. a `for ...:` line) with a comment and
/// dedents the block body one level so the emitted Python stays well-formed.
pub fn unwrap_block(code: &str, header_pattern: &str, comment: &str) -> String {
    let re = match Regex::new(header_pattern) {
        Ok(re) => re,
        Err(_) => return code.to_string(),
    };
    let lines: Vec<&str> = code.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if !re.is_match(line) {
            out.push(line.to_string());
            i += 1;
            continue;
        }
        let header_indent = line.len() - line.trim_start().len();
        out.push(format!("{}{}", &line[..header_indent], comment));
        i += 1;
        // Body indent taken from the first non-empty body line.
        let mut body_indent = None;
        while i < lines.len() {
            let body = lines[i];
            if body.trim().is_empty() {
                out.push(body.to_string());
                i += 1;
                continue;
            }
            let indent = body.len() - body.trim_start().len();
            if indent <= header_indent {
                break;
            }
            let shift = *body_indent.get_or_insert(indent - header_indent);
            let strip = shift.min(indent - header_indent);
            out.push(body[strip..].to_string());
            i += 1;
        }
    }
    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Like [`find_call_sites`], but anchored on the method alone so chained
/// receivers (`a.b(x).method(...)`) match too. `start` points at the dot.
pub struct MethodSite {
    pub start: usize,
    pub end: usize,
    pub args: String,
}

pub fn find_method_sites(code: &str, method: &str) -> Vec<MethodSite> {
    let re = rule(&format!(r"\.\s*{}\s*\(", regex::escape(method)));
    let mut sites = Vec::new();
    for m in re.find_iter(code) {
        let open = m.end() - 1;
        if let Some(close) = matching_paren(code, open) {
            sites.push(MethodSite {
                start: m.start(),
                end: close + 1,
                args: code[open + 1..close].to_string(),
            });
        }
    }
    sites.reverse();
    sites
}

/// Extracts the expression assigned to a `Keyword=` argument, e.g.
/// `keyword_arg("Bucket=b, Key=k", "Key")` -> `Some("k")`.
pub fn keyword_arg(args: &str, keyword: &str) -> Option<String> {
    let re = rule(&format!(r"\b{}\s*=\s*", regex::escape(keyword)));
    let m = re.find(args)?;
    let rest = &args[m.end()..];
    let mut depth = 0i32;
    let mut in_single = false;
    let mut in_double = false;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '(' | '[' | '{' if !in_single && !in_double => depth += 1,
            ')' | ']' | '}' if !in_single && !in_double => {
                if depth == 0 {
                    end = i;
                    break;
                }
                depth -= 1;
            }
            ',' if depth == 0 && !in_single && !in_double => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let value = rest[..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_import_after_existing_imports() {
        let code = "import os\nimport json\n\nx = 1\n";
        let out = ensure_import(code, "from google.cloud import storage");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "from google.cloud import storage");
    }

    #[test]
    fn test_ensure_import_idempotent() {
        let code = "from google.cloud import storage\nx = 1\n";
        assert_eq!(ensure_import(code, "from google.cloud import storage"), code);
    }

    #[test]
    fn test_ensure_import_empty_file_prepends() {
        let out = ensure_import("x = 1\n", "import os");
        assert!(out.starts_with("import os\n"));
    }

    #[test]
    fn test_keyword_arg_extraction() {
        assert_eq!(keyword_arg("Bucket='b', Key='k'", "Key"), Some("'k'".into()));
        assert_eq!(keyword_arg("Bucket=name", "Bucket"), Some("name".into()));
        assert_eq!(
            keyword_arg("Item={'id': {'S': '1'}}, TableName=t", "Item"),
            Some("{'id': {'S': '1'}}".into())
        );
        assert_eq!(keyword_arg("Bucket=b", "Key"), None);
    }

    #[test]
    fn test_matching_paren_nested() {
        let text = "call(a, f(b), 'c)')";
        assert_eq!(matching_paren(text, 4), Some(text.len() - 1));
    }

    #[test]
    fn test_unwrap_block_dedents_body() {
        let code = "def f(data, context):\n    for r in records:\n        a = r['x']\n        b = r['y']\n    done()\n";
        let out = unwrap_block(code, r"^\s*for\s+\w+\s+in\s+records\s*:", "# single event");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "    # single event");
        assert_eq!(lines[2], "    a = r['x']");
        assert_eq!(lines[3], "    b = r['y']");
        assert_eq!(lines[4], "    done()");
    }

    #[test]
    fn test_find_call_sites_reverse_order() {
        let code = "a.send(1)\nb.send(f(2))\n";
        let sites = find_call_sites(code, "send");
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].receiver, "b");
        assert_eq!(sites[0].args, "f(2)");
        assert_eq!(sites[1].receiver, "a");
    }
}
