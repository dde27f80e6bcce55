//! One-shot repair of near-valid JSON objects.
//!
//! Generative services often emit JavaScript-ish or Python-ish objects: bare
//! keys, bare string values, single-quoted strings, trailing commas.
//! [`repair`] rewrites those defects in a single string-aware pass and leaves
//! everything else untouched.

/// What the scanner expects to see next outside of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Value,
    Other,
}

/// Quotes bare object keys, quotes bare scalar values, turns single-quoted
/// keys and values into JSON strings, and strips trailing commas before `}`
/// or `]`. Text inside double-quoted string literals is never modified.
pub fn repair(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut containers: Vec<char> = Vec::new();
    let mut expect = Expect::Other;
    let mut in_string = false;
    let mut escape_next = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                expect = Expect::Other;
                out.push(c);
            }
            '{' => {
                containers.push('{');
                expect = Expect::Key;
                out.push(c);
            }
            '[' => {
                containers.push('[');
                expect = Expect::Value;
                out.push(c);
            }
            '}' | ']' => {
                containers.pop();
                expect = Expect::Other;
                out.push(c);
            }
            ':' => {
                expect = Expect::Value;
                out.push(c);
            }
            ',' => {
                if matches!(next_significant(&chars, i + 1), Some('}') | Some(']') | None) {
                    // trailing comma: drop it
                } else {
                    out.push(c);
                    expect = match containers.last() {
                        Some('{') => Expect::Key,
                        Some('[') => Expect::Value,
                        _ => Expect::Other,
                    };
                }
            }
            c if c.is_whitespace() => out.push(c),
            _ => match expect {
                Expect::Key | Expect::Value => {
                    let quoted = if c == '\'' { single_quoted(&chars, i) } else { None };
                    i = match quoted {
                        Some((inner, end)) => {
                            push_quoted(&mut out, &inner);
                            end
                        }
                        None => {
                            let end = bare_end(&chars, i, expect);
                            let token: String = chars[i..end].iter().collect();
                            push_bare(&mut out, &token, expect, next_significant(&chars, end));
                            end
                        }
                    };
                    expect = Expect::Other;
                    continue;
                }
                Expect::Other => out.push(c),
            },
        }
        i += 1;
    }

    out
}

/// End of a bare key or value starting at `from`.
fn bare_end(chars: &[char], from: usize, expect: Expect) -> usize {
    if expect == Expect::Key {
        scan_while(chars, from, |c| {
            !c.is_whitespace() && !matches!(c, ':' | ',' | '{' | '}' | '[' | ']' | '"')
        })
    } else {
        scan_while(chars, from, |c| !matches!(c, ',' | '}' | ']' | '\n' | '\r'))
    }
}

/// Writes a bare token. Keys are quoted only when a `:` follows; values keep
/// trailing whitespace outside the quotes and JSON literals stay unquoted.
fn push_bare(out: &mut String, raw: &str, expect: Expect, after: Option<char>) {
    if expect == Expect::Key {
        if after == Some(':') {
            push_quoted(out, raw);
        } else {
            out.push_str(raw);
        }
        return;
    }
    let token = raw.trim_end();
    if is_json_literal(token) {
        out.push_str(token);
    } else {
        push_quoted(out, token);
    }
    out.push_str(&raw[token.len()..]);
}

/// Reads a `'...'` literal starting at `from` and returns its unescaped text
/// and the index after the closing quote.
///
/// The closing quote is the first unescaped `'` followed by a delimiter
/// (`:`, `,`, `}`, `]`, or the end), so apostrophes inside words survive.
fn single_quoted(chars: &[char], from: usize) -> Option<(String, usize)> {
    let mut inner = String::new();
    let mut i = from + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                match chars[i + 1] {
                    '\'' => inner.push('\''),
                    '"' => inner.push('"'),
                    '\\' => inner.push('\\'),
                    'n' => inner.push('\n'),
                    't' => inner.push('\t'),
                    other => {
                        inner.push('\\');
                        inner.push(other);
                    }
                }
                i += 2;
                continue;
            }
            '\'' if matches!(
                next_significant(chars, i + 1),
                Some(':' | ',' | '}' | ']') | None
            ) =>
            {
                return Some((inner, i + 1));
            }
            c => inner.push(c),
        }
        i += 1;
    }
    None
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

fn scan_while(chars: &[char], from: usize, keep: impl Fn(char) -> bool) -> usize {
    let mut end = from;
    while end < chars.len() && keep(chars[end]) {
        end += 1;
    }
    end
}

fn push_quoted(out: &mut String, token: &str) {
    out.push('"');
    for c in token.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// True for tokens JSON accepts unquoted: numbers, booleans, null.
fn is_json_literal(token: &str) -> bool {
    if matches!(token, "true" | "false" | "null") {
        return true;
    }
    let starts_numeric = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    starts_numeric && serde_json::from_str::<serde_json::Number>(token).is_ok()
}
