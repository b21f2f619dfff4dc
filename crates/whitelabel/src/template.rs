//! Output-name templating.
//!
//! Variant chunk names come from a small `{placeholder}` pattern language:
//! `{name}` is the logical entry name, `{override}` the variant tag. This
//! is a pure substitution; unknown or unclosed placeholders are typed
//! errors, never panics.

/// Placeholder every output pattern must contain so variants map to
/// distinct outputs.
pub const OVERRIDE_PLACEHOLDER: &str = "override";

/// Errors from rendering an output pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The pattern names a placeholder no value was supplied for.
    #[error("unknown placeholder {{{name}}} in output pattern \"{template}\"")]
    UnknownPlaceholder { name: String, template: String },

    /// A `{` without a matching `}`.
    #[error("unclosed placeholder in output pattern \"{template}\"")]
    Unclosed { template: String },
}

/// Substitute `{key}` placeholders in `template` with the paired values.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(TemplateError::Unclosed {
                template: template.to_string(),
            });
        };
        let name = &after[..end];
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                return Err(TemplateError::UnknownPlaceholder {
                    name: name.to_string(),
                    template: template.to_string(),
                });
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Whether `template` contains the `{name}` placeholder for `name`.
pub fn has_placeholder(template: &str, name: &str) -> bool {
    template.contains(&format!("{{{name}}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_both_placeholders() {
        let rendered = substitute(
            "{name}/{override}",
            &[("name", "main"), ("override", "brandA")],
        )
        .expect("valid pattern");
        assert_eq!(rendered, "main/brandA");
    }

    #[test]
    fn literal_text_passes_through() {
        let rendered = substitute(
            "dist-{override}-bundle",
            &[("name", "main"), ("override", "brandB")],
        )
        .expect("valid pattern");
        assert_eq!(rendered, "dist-brandB-bundle");
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let error = substitute("{name}/{chunkhash}", &[("name", "main")])
            .expect_err("unknown placeholder");
        assert_eq!(
            error,
            TemplateError::UnknownPlaceholder {
                name: "chunkhash".to_string(),
                template: "{name}/{chunkhash}".to_string(),
            }
        );
    }

    #[test]
    fn unclosed_placeholder_is_an_error() {
        let error = substitute("{name}/{override", &[("name", "m"), ("override", "a")])
            .expect_err("unclosed");
        assert!(matches!(error, TemplateError::Unclosed { .. }));
    }

    #[test]
    fn detects_required_placeholder() {
        assert!(has_placeholder("{name}/{override}", OVERRIDE_PLACEHOLDER));
        assert!(!has_placeholder("{name}/bundle", OVERRIDE_PLACEHOLDER));
    }
}
