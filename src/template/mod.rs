//! Template spec-block parsing.
//!
//! Component templates carry an informal YAML-dialect header: a `spec:` block
//! with an `inputs:` map of typed parameters, optionally a `description:`,
//! followed by a `---` separator and the pipeline job definitions proper.
//! Only the header may be scanned for parameter declarations - job-level
//! `variables:` blocks after the separator must never leak into the parsed
//! parameter list.
//!
//! The dialect is parsed by an explicit line-oriented state machine rather
//! than a YAML library: real-world templates contain per-line malformations
//! that must be skipped individually, never failing the document as a whole.
//! [`parse_template`] always returns at minimum an empty parameter list.
//!
//! Indentation is measured relative to the `inputs:` line, which accepts both
//! the 2-space and 4-space parameter levels seen in the wild.
//!
//! # Examples
//!
//! ```rust
//! use cicat_cli::template::parse_template;
//!
//! let spec = parse_template(
//!     "spec:\n  inputs:\n    env:\n      default: \"prod\"\n---\njob: {}\n",
//! );
//! assert_eq!(spec.parameters.len(), 1);
//! assert_eq!(spec.parameters[0].name, "env");
//! ```

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Parameter, ParameterDefault, ParameterType};

/// Parsed header of one template file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSpec {
    /// Description declared in the spec block, or derived from a leading
    /// comment. README-based fallbacks happen in the catalog fetcher.
    pub description: Option<String>,
    /// Declared inputs, in declaration order.
    pub parameters: Vec<Parameter>,
}

/// Parser states for the inputs block, driven by measured leading whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Not inside a `spec:` block.
    OutsideSpec,
    /// Inside `spec:`, scanning its direct children.
    InSpec,
    /// Inside `spec.inputs:`, before the first parameter line.
    InInputs,
    /// A parameter line was seen; deeper lines bind to it.
    InParameter,
}

/// A parameter being assembled; finalized when the next parameter starts or
/// the block ends.
#[derive(Debug)]
struct PendingParameter {
    name: String,
    description: Option<String>,
    raw_default: Option<String>,
    param_type: ParameterType,
    required: bool,
}

impl PendingParameter {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            raw_default: None,
            param_type: ParameterType::String,
            required: false,
        }
    }

    fn finalize(self) -> Parameter {
        let mut parameter = Parameter::new(self.name);
        if let Some(description) = self.description {
            parameter.description = description;
        }
        // Coercion happens here, not at the `default:` line, because the
        // `type:` property may appear after it.
        parameter.default_value =
            self.raw_default.map(|raw| ParameterDefault::coerce(&raw, &self.param_type));
        parameter.param_type = self.param_type;
        parameter.required = self.required;
        parameter
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z0-9_][\w.-]*):(.*)$").unwrap())
}

/// Splits a line body into `(key, value-after-colon)` if it has key shape.
fn key_of(body: &str) -> Option<(&str, &str)> {
    key_pattern().captures(body).map(|caps| {
        let key = caps.get(1).unwrap().as_str();
        let rest = caps.get(2).unwrap().as_str().trim();
        (key, rest)
    })
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Strips one matching pair of surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Whether a scalar is usable as a single-line value (not a block indicator).
fn is_inline_scalar(rest: &str) -> bool {
    !rest.is_empty() && rest != "|" && rest != ">"
}

/// Returns the portion of `text` before the first line that is exactly `---`.
///
/// Content after the separator is pipeline job definitions and must never be
/// scanned for declarations.
fn leading_section(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return &text[..offset];
        }
        offset += line.len();
    }
    text
}

/// First top-of-file comment line that does not mention the platform name.
///
/// A crude heuristic: license banners and "GitLab CI template" boilerplate
/// are skipped; the header ends at the first non-comment content.
fn leading_comment_description(section: &str) -> Option<String> {
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(comment) = trimmed.strip_prefix('#') else {
            return None;
        };
        let comment = comment.trim();
        if comment.is_empty() || comment.to_lowercase().contains("gitlab") {
            continue;
        }
        return Some(comment.to_string());
    }
    None
}

/// Result of scanning the `spec:` block.
struct SpecBlock {
    description: Option<String>,
    parameters: Vec<Parameter>,
    inputs_found: bool,
}

fn parse_spec_block(section: &str) -> SpecBlock {
    let mut state = State::OutsideSpec;
    let mut description: Option<String> = None;
    let mut parameters: Vec<Parameter> = Vec::new();
    let mut pending: Option<PendingParameter> = None;
    let mut inputs_found = false;

    let mut spec_child_indent: Option<usize> = None;
    let mut inputs_indent = 0usize;
    let mut param_indent: Option<usize> = None;

    for raw_line in section.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_width(line);
        let body = line.trim_start();

        // Any key at column 0 terminates whatever block we were in.
        if indent == 0 {
            if let Some(p) = pending.take() {
                parameters.push(p.finalize());
            }
            state = match key_of(body) {
                Some(("spec", rest)) if rest.is_empty() => {
                    spec_child_indent = None;
                    State::InSpec
                }
                _ => State::OutsideSpec,
            };
            continue;
        }

        // Dedent out of the inputs block back to a direct spec child
        // (e.g. a `description:` declared after `inputs:`).
        if matches!(state, State::InInputs | State::InParameter) && indent <= inputs_indent {
            if let Some(p) = pending.take() {
                parameters.push(p.finalize());
            }
            state = State::InSpec;
        }

        match state {
            State::OutsideSpec => {}
            State::InSpec => {
                let child_indent = *spec_child_indent.get_or_insert(indent);
                if indent != child_indent {
                    continue;
                }
                match key_of(body) {
                    Some(("inputs", rest)) if rest.is_empty() => {
                        inputs_found = true;
                        inputs_indent = indent;
                        param_indent = None;
                        state = State::InInputs;
                    }
                    Some(("description", rest))
                        if is_inline_scalar(rest) && description.is_none() =>
                    {
                        description = Some(strip_quotes(rest).to_string());
                    }
                    _ => {}
                }
            }
            State::InInputs => {
                // First child of inputs: establishes the parameter level,
                // whether the template uses 2- or 4-space steps.
                if let Some((key, rest)) = key_of(body)
                    && rest.is_empty()
                {
                    param_indent = Some(indent);
                    pending = Some(PendingParameter::new(key));
                    state = State::InParameter;
                }
            }
            State::InParameter => {
                let level = param_indent.unwrap_or(indent);
                if indent == level {
                    if let Some(p) = pending.take() {
                        parameters.push(p.finalize());
                    }
                    if let Some((key, rest)) = key_of(body)
                        && rest.is_empty()
                    {
                        pending = Some(PendingParameter::new(key));
                    } else {
                        // Not a parameter shape; wait for the next one.
                        state = State::InInputs;
                    }
                } else if indent > level
                    && let Some(p) = pending.as_mut()
                    && let Some((key, rest)) = key_of(body)
                {
                    match key {
                        "description" if is_inline_scalar(rest) => {
                            p.description = Some(strip_quotes(rest).to_string());
                        }
                        "default" if !rest.is_empty() => {
                            p.raw_default = Some(strip_quotes(rest).to_string());
                        }
                        "type" if !rest.is_empty() => {
                            p.param_type = ParameterType::parse(strip_quotes(rest));
                        }
                        "required" => {
                            p.required = strip_quotes(rest).parse::<bool>().unwrap_or(false);
                        }
                        _ => {}
                    }
                }
                // Indent between inputs and parameter level: unknown shape,
                // skipped like any other unexpected line.
            }
        }
    }

    if let Some(p) = pending.take() {
        parameters.push(p.finalize());
    }

    SpecBlock {
        description,
        parameters,
        inputs_found,
    }
}

/// Legacy fallback: a flat top-level `variables:` block in the header.
///
/// Each properly indented `KEY: value` child becomes a string parameter with
/// the trimmed value as its default (no default when empty).
fn parse_variables_block(section: &str) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let mut in_variables = false;
    let mut var_indent: Option<usize> = None;

    for raw_line in section.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_width(line);
        let body = line.trim_start();

        if indent == 0 {
            in_variables = matches!(key_of(body), Some(("variables", rest)) if rest.is_empty());
            var_indent = None;
            continue;
        }
        if !in_variables || body.starts_with('#') {
            continue;
        }
        let child_indent = *var_indent.get_or_insert(indent);
        if indent != child_indent {
            continue;
        }
        if let Some((key, rest)) = key_of(body) {
            let mut parameter = Parameter::new(key);
            let value = strip_quotes(rest);
            if !value.is_empty() {
                parameter.default_value = Some(ParameterDefault::Str(value.to_string()));
            }
            parameters.push(parameter);
        }
    }

    parameters
}

/// Parses a template file's header into a description and parameter list.
///
/// Never fails: malformed or absent sections degrade to `None` / empty, and
/// unrecognized lines are skipped individually without discarding the rest
/// of the block.
#[must_use]
pub fn parse_template(text: &str) -> TemplateSpec {
    let section = leading_section(text);

    let spec_block = parse_spec_block(section);
    let description = spec_block.description.or_else(|| leading_comment_description(section));

    let parameters = if spec_block.inputs_found {
        spec_block.parameters
    } else {
        parse_variables_block(section)
    };

    TemplateSpec {
        description,
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_properties_to_current_parameter() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\n      description: \"Target env\"\n      default: \"prod\"\n      type: string\n  description: \"Deploys\"\n",
        );

        assert_eq!(spec.description.as_deref(), Some("Deploys"));
        assert_eq!(spec.parameters.len(), 1);
        let p = &spec.parameters[0];
        assert_eq!(p.name, "env");
        assert_eq!(p.description, "Target env");
        assert_eq!(p.default_value, Some(ParameterDefault::Str("prod".to_string())));
        assert_eq!(p.param_type, ParameterType::String);
        assert!(!p.required);
    }

    #[test]
    fn content_after_separator_never_scanned() {
        let spec = parse_template(
            "spec:\n  description: header only\n---\nvariables:\n  LEAKED: value\n  OTHER: x\n",
        );
        assert!(spec.parameters.is_empty());
        assert_eq!(spec.description.as_deref(), Some("header only"));
    }

    #[test]
    fn job_inputs_after_separator_ignored() {
        let spec = parse_template(
            "spec:\n  inputs:\n    real:\n---\nspec:\n  inputs:\n    fake:\n",
        );
        assert_eq!(spec.parameters.len(), 1);
        assert_eq!(spec.parameters[0].name, "real");
    }

    #[test]
    fn multiple_parameters_in_order() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\n      default: prod\n    replicas:\n      type: number\n      default: 3\n    dry-run:\n      type: boolean\n      default: false\n",
        );
        let names: Vec<&str> = spec.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["env", "replicas", "dry-run"]);
        assert_eq!(
            spec.parameters[1].default_value,
            Some(ParameterDefault::Num(3.0))
        );
        assert_eq!(
            spec.parameters[2].default_value,
            Some(ParameterDefault::Bool(false))
        );
    }

    #[test]
    fn type_after_default_still_coerces() {
        let spec = parse_template(
            "spec:\n  inputs:\n    replicas:\n      default: 3\n      type: number\n",
        );
        assert_eq!(
            spec.parameters[0].default_value,
            Some(ParameterDefault::Num(3.0))
        );
    }

    #[test]
    fn two_space_legacy_indent() {
        let spec = parse_template(
            "spec:\n inputs:\n  env:\n   description: legacy\n",
        );
        assert_eq!(spec.parameters.len(), 1);
        assert_eq!(spec.parameters[0].description, "legacy");
    }

    #[test]
    fn description_after_inputs_block() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\n  description: after inputs\n",
        );
        assert_eq!(spec.description.as_deref(), Some("after inputs"));
        assert_eq!(spec.parameters.len(), 1);
    }

    #[test]
    fn top_level_key_terminates_inputs() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\nstages:\n    fake-param:\n",
        );
        assert_eq!(spec.parameters.len(), 1);
        assert_eq!(spec.parameters[0].name, "env");
    }

    #[test]
    fn parameter_description_not_mistaken_for_spec_description() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\n      description: param doc\n",
        );
        assert!(spec.description.is_none());
        assert_eq!(spec.parameters[0].description, "param doc");
    }

    #[test]
    fn leading_comment_fallback_skips_brand_mentions() {
        let spec = parse_template(
            "# This template is for GitLab CI usage\n# Deploys a service to kubernetes\nspec:\n  inputs:\n    env:\n",
        );
        assert_eq!(
            spec.description.as_deref(),
            Some("Deploys a service to kubernetes")
        );
    }

    #[test]
    fn spec_description_beats_leading_comment() {
        let spec = parse_template(
            "# A comment description\nspec:\n  description: declared\n  inputs:\n    env:\n",
        );
        assert_eq!(spec.description.as_deref(), Some("declared"));
    }

    #[test]
    fn variables_fallback_without_inputs() {
        let spec = parse_template(
            "variables:\n  DEPLOY_ENV: \"staging\"\n  EMPTY_VAR:\n  # a comment\n  COUNT: 2\n",
        );
        assert_eq!(spec.parameters.len(), 3);
        assert_eq!(
            spec.parameters[0].default_value,
            Some(ParameterDefault::Str("staging".to_string()))
        );
        assert!(spec.parameters[1].default_value.is_none());
        assert_eq!(
            spec.parameters[2].default_value,
            Some(ParameterDefault::Str("2".to_string()))
        );
        assert!(spec.parameters.iter().all(|p| p.param_type == ParameterType::String));
        assert!(spec.parameters.iter().all(|p| !p.required));
    }

    #[test]
    fn inputs_present_suppresses_variables_fallback() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\nvariables:\n  NOT_A_PARAM: x\n",
        );
        assert_eq!(spec.parameters.len(), 1);
        assert_eq!(spec.parameters[0].name, "env");
    }

    #[test]
    fn malformed_lines_skipped_not_fatal() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\n      description: ok\n    ???garbage\n    region:\n      default: us-east-1\n",
        );
        let names: Vec<&str> = spec.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["env", "region"]);
    }

    #[test]
    fn required_property_parses() {
        let spec = parse_template(
            "spec:\n  inputs:\n    env:\n      required: true\n    region:\n",
        );
        assert!(spec.parameters[0].required);
        assert!(!spec.parameters[1].required);
    }

    #[test]
    fn quoted_scalars_stripped() {
        let spec = parse_template(
            "spec:\n  description: 'single quoted'\n  inputs:\n    env:\n      default: \"double\"\n",
        );
        assert_eq!(spec.description.as_deref(), Some("single quoted"));
        assert_eq!(
            spec.parameters[0].default_value,
            Some(ParameterDefault::Str("double".to_string()))
        );
    }

    #[test]
    fn block_scalar_description_ignored() {
        let spec = parse_template("spec:\n  description: |\n    folded text\n  inputs:\n    env:\n");
        // A block scalar is not a single inline value; fall through to other
        // description sources (none here).
        assert!(spec.description.is_none());
    }

    #[test]
    fn empty_and_garbage_input() {
        assert_eq!(parse_template(""), TemplateSpec::default());
        let spec = parse_template("not yaml at all\n\t\x07junk");
        assert!(spec.parameters.is_empty());
        assert!(spec.description.is_none());
    }

    #[test]
    fn crlf_separator_recognized() {
        let spec = parse_template("spec:\r\n  inputs:\r\n    env:\r\n---\r\nvariables:\r\n  X: y\r\n");
        assert_eq!(spec.parameters.len(), 1);
        assert_eq!(spec.parameters[0].name, "env");
    }
}
