//! Brace templates for display strings, e.g. `"{district_code}th District"`.
//!
//! Fields follow `str.format` syntax: `{name}` takes a keyword argument, `{0}`
//! a positional one and `{}` the next positional one. A field may carry a
//! conversion (`{name!r}`) and a format spec (`{name:>3}`, `{name:02d}`,
//! `{name:.1f}`). `{{` and `}}` produce literal braces.
//!
//! Values render as Python's `str()` would: strings as-is, `True`/`False`,
//! `None`, and lists or mappings in their repr form.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::compile::object::Attributes;
use crate::error::{CompileError, Result};

static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();

fn field_regex() -> &'static Regex {
    FIELD_REGEX.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("field pattern is a valid regex")
    })
}

/// Substitute `args` and `kwargs` into `format_str`.
///
/// Fails with [`CompileError::FormatKey`] naming the key, the template and
/// both argument sets if any field has no matching argument, and with
/// [`CompileError::FormatSpec`] if a field's conversion or spec is not
/// supported for its value.
pub fn easy_format(format_str: &str, args: &[Value], kwargs: &Attributes) -> Result<String> {
    let mut out = String::with_capacity(format_str.len());
    let mut last = 0;
    let mut next_auto = 0;

    for caps in field_regex().captures_iter(format_str) {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let start = caps.get(0).map_or(last, |m| m.start());
        out.push_str(&format_str[last..start]);
        last = start + whole.len();

        let field = match (whole, caps.get(1)) {
            ("{{", _) => {
                out.push('{');
                continue;
            }
            ("}}", _) => {
                out.push('}');
                continue;
            }
            (_, Some(field)) => field.as_str(),
            (_, None) => continue,
        };

        let (key, conversion, spec) = split_field(field);
        let value = if key.is_empty() {
            next_auto += 1;
            args.get(next_auto - 1)
        } else if let Ok(index) = key.parse::<usize>() {
            args.get(index)
        } else {
            kwargs.get(key)
        };

        let Some(value) = value else {
            return Err(CompileError::FormatKey {
                key: key.to_string(),
                format_str: format_str.to_string(),
                args: Value::Array(args.to_vec()).to_string(),
                kwargs: Value::Object(kwargs.clone()).to_string(),
            });
        };

        let unsupported = || CompileError::FormatSpec {
            field: field.to_string(),
            spec: spec.to_string(),
            format_str: format_str.to_string(),
        };
        let value = match conversion {
            None => value.clone(),
            Some('s') => Value::String(py_str(value)),
            Some('r') | Some('a') => Value::String(py_repr(value)),
            Some(_) => return Err(unsupported()),
        };
        let spec = FormatSpec::parse(spec).ok_or_else(unsupported)?;
        out.push_str(&spec.apply(&value).ok_or_else(unsupported)?);
    }

    out.push_str(&format_str[last..]);
    Ok(out)
}

/// Split a field into its name, conversion character and format spec.
fn split_field(field: &str) -> (&str, Option<char>, &str) {
    let name_end = field.find(|c| c == ':' || c == '!').unwrap_or(field.len());
    let (name, rest) = field.split_at(name_end);

    match rest.strip_prefix('!') {
        Some(conversion) => {
            let (flag, spec) = conversion.split_once(':').unwrap_or((conversion, ""));
            let mut chars = flag.chars();
            // `{x!}` and `{x!sr}` name no single conversion
            let flag = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => '?',
            };
            (name, Some(flag), spec)
        }
        None => (name, None, rest.strip_prefix(':').unwrap_or(rest)),
    }
}

/// The supported subset of the format spec mini-language:
/// `[[fill]align][sign][0][width][.precision][type]` with type `s`, `d` or `f`.
#[derive(Debug, Default, PartialEq)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<char>,
    sign: Option<char>,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    kind: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let is_align = |c: char| matches!(c, '<' | '>' | '^' | '=');
        let mut parsed = FormatSpec::default();
        let mut i = 0;

        if chars.len() >= 2 && is_align(chars[1]) {
            parsed.fill = Some(chars[0]);
            parsed.align = Some(chars[1]);
            i = 2;
        } else if chars.first().is_some_and(|&c| is_align(c)) {
            parsed.align = Some(chars[0]);
            i = 1;
        }

        if let Some(&c @ ('+' | '-' | ' ')) = chars.get(i) {
            parsed.sign = Some(c);
            i += 1;
        }
        if chars.get(i) == Some(&'0') {
            parsed.zero = true;
            i += 1;
        }

        parsed.width = take_number(&chars, &mut i).unwrap_or(0);
        if chars.get(i) == Some(&'.') {
            i += 1;
            parsed.precision = Some(take_number(&chars, &mut i)?);
        }

        if let Some(&c @ ('s' | 'd' | 'f')) = chars.get(i) {
            parsed.kind = Some(c);
            i += 1;
        }

        (i == chars.len()).then_some(parsed)
    }

    /// Render `value` under this spec, or `None` if the spec does not apply to it.
    fn apply(&self, value: &Value) -> Option<String> {
        if *self == FormatSpec::default() {
            return Some(py_str(value));
        }

        let (body, numeric) = match (value, self.kind) {
            (Value::String(text), None | Some('s')) => {
                if self.sign.is_some() || self.align == Some('=') {
                    return None;
                }
                let text = match self.precision {
                    Some(precision) => text.chars().take(precision).collect(),
                    None => text.clone(),
                };
                (text, false)
            }
            (Value::Number(number), None | Some('d')) if self.precision.is_none() => {
                if let Some(n) = number.as_i64() {
                    (n.to_string(), true)
                } else if let Some(n) = number.as_u64() {
                    (n.to_string(), true)
                } else if self.kind.is_none() {
                    (number.to_string(), true)
                } else {
                    return None;
                }
            }
            (Value::Bool(flag), Some('d')) => (u8::from(*flag).to_string(), true),
            (Value::Number(number), Some('f')) => {
                let n = number.as_f64()?;
                (format!("{:.*}", self.precision.unwrap_or(6), n), true)
            }
            _ => return None,
        };

        let (sign, digits) = if numeric {
            match body.strip_prefix('-') {
                Some(digits) => ("-".to_string(), digits.to_string()),
                None => match self.sign {
                    Some('+') => ("+".to_string(), body),
                    Some(' ') => (" ".to_string(), body),
                    _ => (String::new(), body),
                },
            }
        } else {
            (String::new(), body)
        };

        let (fill, align) = match (self.fill, self.align) {
            (fill, Some(align)) => (fill.unwrap_or(' '), align),
            (_, None) if self.zero => ('0', if numeric { '=' } else { '<' }),
            (_, None) => (' ', if numeric { '>' } else { '<' }),
        };

        let len = sign.chars().count() + digits.chars().count();
        let padding = self.width.saturating_sub(len);
        let pad = |n: usize| fill.to_string().repeat(n);

        Some(match align {
            '<' => format!("{sign}{digits}{}", pad(padding)),
            '^' => format!("{}{sign}{digits}{}", pad(padding / 2), pad(padding - padding / 2)),
            '=' => format!("{sign}{}{digits}", pad(padding)),
            _ => format!("{}{sign}{digits}", pad(padding)),
        })
    }
}

/// Consume a run of ASCII digits starting at `*i`.
fn take_number(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(char::is_ascii_digit) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

/// A value as Python's `str()` renders it.
fn py_str(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => py_repr(other),
    }
}

/// A value as Python's `repr()` renders it.
fn py_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => quote(text),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(py_repr).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", quote(key), py_repr(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}
