// Shared prompt utilities.
// Each document type defines its own templates in generation::prompts.
// This file contains the renderer they all go through.

/// Fills `{name}` placeholders in `template` with the matching value from `vars`.
///
/// Single pass: substituted values are copied verbatim and never re-scanned, so
/// caller text containing `{jd_text}` or stray braces cannot change the prompt.
/// Brace sequences that don't name a known variable (JSON skeletons, etc.) are
/// left as they are.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match substituted {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
