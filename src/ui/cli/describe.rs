use std::fmt::Write;

use anyhow::{Context, Result};
use serde_json::Value;
use strum::EnumMessage;

use crate::ui::cli::args::{DescribeArgs, parse_kind};
use crate::ui::types::choices::{
    EvaluatorChoice, FieldSpec, LearnerChoice, StreamChoice, UIChoice, specs_for_kind,
};

/// Human-readable parameter listing for whichever kind `args` names.
pub fn describe(args: &DescribeArgs) -> Result<String> {
    match (&args.learner, &args.stream, &args.evaluator) {
        (Some(kind), _, _) => describe_kind::<LearnerChoice>(kind),
        (_, Some(kind), _) => describe_kind::<StreamChoice>(kind),
        (_, _, Some(kind)) => describe_kind::<EvaluatorChoice>(kind),
        (None, None, None) => Ok(String::new()),
    }
}

pub fn describe_kind<C: UIChoice>(raw: &str) -> Result<String> {
    let kind = parse_kind::<C::Kind>(raw).with_context(|| format!("unknown kind '{raw}'"))?;
    let key: &'static str = kind.into();
    let specs = specs_for_kind(&C::schema(), key)?;
    let defaults = C::default_params(kind);

    let mut out = String::new();
    let _ = writeln!(out, "{}", kind.get_message().unwrap_or(key));
    if let Some(detail) = kind.get_detailed_message() {
        let _ = writeln!(out, "  {detail}");
    }
    if specs.is_empty() {
        let _ = writeln!(out, "\n  (no parameters)");
        return Ok(out);
    }

    let _ = writeln!(out);
    for spec in &specs {
        let _ = writeln!(out, "  {}", field_line(spec, defaults.get(&spec.name)));
    }
    let _ = writeln!(out, "\ndefaults: {}", serde_json::to_string(&defaults)?);
    Ok(out)
}

fn field_line(spec: &FieldSpec, default: Option<&Value>) -> String {
    let mut line = format!("{:<24} {:?}", spec.name, spec.kind);
    match (spec.min, spec.max) {
        (Some(lo), Some(hi)) => line.push_str(&format!(" [{lo}, {hi}]")),
        (Some(lo), None) => line.push_str(&format!(" [{lo}, ..)")),
        (None, Some(hi)) => line.push_str(&format!(" (.., {hi}]")),
        (None, None) => {}
    }
    if let Some(d) = default.or(spec.default.as_ref()) {
        line.push_str(&format!(" = {d}"));
    }
    if let Some(desc) = &spec.description {
        line.push_str(&format!("  {}: {desc}", spec.title));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensemble_description_lists_config_fields() {
        let text = describe_kind::<LearnerChoice>("adaptive-ensemble").unwrap();
        assert!(text.starts_with("Adaptive Ensemble\n"));
        assert!(text.contains("pool_size"));
        assert!(text.contains("active_count"));
        assert!(text.contains("reselection_period"));
        assert!(text.contains("\"pool_size\":10"));
    }

    #[test]
    fn unit_learner_has_no_parameters() {
        let text = describe_kind::<LearnerChoice>("NaiveBayes").unwrap();
        assert!(text.contains("(no parameters)"));
    }

    #[test]
    fn describe_dispatches_on_the_given_flag() {
        let args = DescribeArgs {
            learner: None,
            stream: Some("sea-generator".into()),
            evaluator: None,
        };
        let text = describe(&args).unwrap();
        assert!(text.contains("function_id"));
        assert!(text.contains("Integer [1, 4] = 2"));
    }

    #[test]
    fn unknown_kind_is_reported() {
        assert!(describe_kind::<StreamChoice>("agrawal").is_err());
    }
}
