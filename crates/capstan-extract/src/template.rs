//! Path-template parsing and structural validation.
//!
//! A template is a `/`-rooted string with zero or more `{name}`
//! placeholders, each name a legal bare identifier. Validation runs once at
//! registration time; the parsed template is immutable afterwards.

use crate::error::PathTemplateError;

/// A validated path template.
///
/// # Example
///
/// ```rust
/// use capstan_extract::PathTemplate;
///
/// let template = PathTemplate::parse("/users/{user_id}/posts/{post_id}").unwrap();
/// assert_eq!(template.param_names(), ["user_id", "post_id"]);
/// assert!(template.has_param("user_id"));
///
/// assert!(PathTemplate::parse("users").is_err());
/// assert!(PathTemplate::parse("/users/{user_id").is_err());
/// assert!(PathTemplate::parse("/users/{user-id}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    params: Vec<String>,
}

impl PathTemplate {
    /// Parses and validates a template.
    pub fn parse(template: &str) -> Result<Self, PathTemplateError> {
        if !template.starts_with('/') {
            return Err(PathTemplateError::MissingLeadingSlash {
                template: template.to_string(),
            });
        }

        let mut params = Vec::new();
        let mut current: Option<String> = None;

        for ch in template.chars() {
            match ch {
                '{' => {
                    if current.is_some() {
                        return Err(PathTemplateError::UnbalancedBraces {
                            template: template.to_string(),
                        });
                    }
                    current = Some(String::new());
                }
                '}' => {
                    let Some(name) = current.take() else {
                        return Err(PathTemplateError::UnbalancedBraces {
                            template: template.to_string(),
                        });
                    };
                    if name.is_empty() {
                        return Err(PathTemplateError::EmptyPlaceholder {
                            template: template.to_string(),
                        });
                    }
                    if !is_identifier(&name) {
                        return Err(PathTemplateError::InvalidPlaceholderName {
                            template: template.to_string(),
                            name,
                        });
                    }
                    params.push(name);
                }
                other => {
                    if let Some(name) = current.as_mut() {
                        name.push(other);
                    }
                }
            }
        }

        if current.is_some() {
            return Err(PathTemplateError::UnbalancedBraces {
                template: template.to_string(),
            });
        }

        Ok(Self {
            raw: template.to_string(),
            params,
        })
    }

    /// The template string as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names, in order of appearance.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    /// True when the template declares the named placeholder.
    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
