use super::types::{LineKind, Scope};

/// Commands that Poryscript accepts without parentheses.
pub const BARE_COMMANDS: &[&str] = &[
    "lock",
    "lockall",
    "release",
    "releaseall",
    "end",
    "return",
    "waitmessage",
    "waitmovement",
    "closemessage",
    "faceplayer",
    "hidebox",
    "showbox",
];

const COMMENT_MARKERS: &[&str] = &["//", "/*", "@", "#"];

pub fn is_bare_command(word: &str) -> bool {
    BARE_COMMANDS.contains(&word)
}

/// Cut a trailing `@ ...` or `// ...` comment, ignoring markers inside quotes.
pub fn strip_trailing_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_quotes => escaped = true,
            b'"' => in_quotes = !in_quotes,
            b'@' if !in_quotes => return line[..i].trim_end(),
            b'/' if !in_quotes && bytes.get(i + 1) == Some(&b'/') => {
                return line[..i].trim_end();
            }
            _ => {}
        }
    }
    line.trim_end()
}

fn is_label_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Length of the identifier (`[A-Za-z_][A-Za-z0-9_]*`) at the start of `s`.
fn identifier_len(s: &str) -> usize {
    let mut len = 0;
    for (i, b) in s.bytes().enumerate() {
        let ok = if i == 0 {
            b.is_ascii_alphabetic() || b == b'_'
        } else {
            b.is_ascii_alphanumeric() || b == b'_'
        };
        if !ok {
            break;
        }
        len = i + 1;
    }
    len
}

/// Classify one physical line of the event script dialect.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    for &marker in COMMENT_MARKERS {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return LineKind::Comment {
                marker,
                text: rest.trim().to_string(),
            };
        }
    }

    let s = strip_trailing_comment(trimmed);

    if let Some(name) = s.strip_suffix("::") {
        if is_label_name(name) {
            return LineKind::Label {
                name: name.to_string(),
                scope: Scope::Global,
            };
        }
    } else if let Some(name) = s.strip_suffix(':') {
        if is_label_name(name) {
            return LineKind::Label {
                name: name.to_string(),
                scope: Scope::Local,
            };
        }
    }

    if let Some(rest) = s.strip_prefix('.') {
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        return LineKind::Directive {
            name: name.to_string(),
            args: args.to_string(),
        };
    }

    let ident = identifier_len(s);
    if ident == 0 {
        return LineKind::Other(s.to_string());
    }

    let (command, rest) = s.split_at(ident);
    if rest.is_empty() {
        LineKind::Bare(command.to_string())
    } else if rest.starts_with(char::is_whitespace) {
        LineKind::Call {
            command: command.to_string(),
            args: rest.trim().to_string(),
        }
    } else {
        LineKind::Other(s.to_string())
    }
}

/// Split a comma-separated argument list, honoring quotes and parentheses.
pub fn split_args(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_quotes = false;

    for ch in args.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth -= 1,
            ',' if !in_quotes && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    if !current.trim().is_empty() || !parts.is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Payload of a `.string "..."` directive, without the quotes.
pub fn string_payload(kind: &LineKind) -> Option<&str> {
    match kind {
        LineKind::Directive { name, args } if name == "string" => {
            let inner = args.strip_prefix('"')?.strip_suffix('"')?;
            Some(inner)
        }
        _ => None,
    }
}
