//! Message and advice template expansion
//!
//! `{name}` is replaced by the captured value of `name`; `{{` and `}}`
//! are literal braces. Every captured local is available, including the
//! ones hidden from the `Locals:` section.

use crate::error::TemplateError;
use crate::locals::LocalsSnapshot;

/// Expand `template` against captured locals
///
/// # Errors
/// Returns [`TemplateError::UndefinedName`] if a placeholder names a local
/// that was not captured, and [`TemplateError::Malformed`] for unbalanced
/// braces or placeholders that are not identifiers
pub fn expand(template: &str, locals: &LocalsSnapshot) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }

                let mut end = None;
                for (j, d) in chars.by_ref() {
                    match d {
                        '}' => {
                            end = Some(j);
                            break;
                        }
                        '{' => return Err(malformed(template, i, "nested '{' in placeholder")),
                        _ => {}
                    }
                }
                let end = end.ok_or_else(|| malformed(template, i, "unclosed '{'"))?;

                let name = &template[i + 1..end];
                if !is_identifier(name) {
                    return Err(malformed(template, i, "placeholder is not an identifier"));
                }
                let value = locals.get(name).ok_or_else(|| TemplateError::UndefinedName {
                    name: name.to_string(),
                    template: template.to_string(),
                })?;
                out.push_str(value);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(malformed(template, i, "single '}'"));
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn malformed(template: &str, position: usize, reason: &'static str) -> TemplateError {
    TemplateError::Malformed {
        template: template.to_string(),
        position,
        reason,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
