use anyhow::{Context, Result, bail};
use schemars::Schema;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    /// Nested parameter block, such as a tagged sub-enum.
    Object,
}

/// One parameter of a choice variant, as read back from its JSON schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Parameters of the variant tagged `kind_key` in a `{"type", "params"}` enum
/// schema, in schema order.
pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;

    let branches = root_obj
        .get("oneOf")
        .or_else(|| root_obj.get("anyOf"))
        .and_then(Value::as_array)
        .context("missing oneOf/anyOf")?;

    let branch = branches
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|b| b.get("properties").and_then(Value::as_object))
        .find(|props| discriminant_matches(props, kind_key));
    let Some(props) = branch else {
        bail!("no branch found for type={kind_key}");
    };

    let Some(params) = props
        .get("params")
        .and_then(Value::as_object)
        .and_then(|p| resolve_ref(root_obj, p))
    else {
        return Ok(Vec::new());
    };
    let Some(fields) = params.get("properties").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let required: Vec<&str> = params
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut out = Vec::with_capacity(fields.len());
    for (name, field) in fields {
        let raw = field.as_object().context("field schema not object")?;
        let resolved = resolve_ref(root_obj, raw)
            .with_context(|| format!("failed to resolve field $ref for '{name}'"))?;

        let Some(kind) = field_kind(resolved) else {
            continue;
        };
        // annotations sit next to a `$ref`, not inside the target
        let annotation = |key: &str| raw.get(key).or_else(|| resolved.get(key));
        let bound = |keys: [&str; 2]| {
            keys.iter()
                .find_map(|k| annotation(*k))
                .and_then(Value::as_f64)
        };

        out.push(FieldSpec {
            name: name.clone(),
            title: annotation("title")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            description: annotation("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            required: required.contains(&name.as_str()),
            kind,
            default: annotation("default").cloned(),
            min: bound(["minimum", "exclusiveMinimum"]),
            max: bound(["maximum", "exclusiveMaximum"]),
        });
    }
    Ok(out)
}

fn discriminant_matches(props: &Map<String, Value>, kind_key: &str) -> bool {
    let Some(tag) = props.get("type").and_then(Value::as_object) else {
        return false;
    };
    if tag.get("const").and_then(Value::as_str) == Some(kind_key) {
        return true;
    }
    matches!(
        tag.get("enum").and_then(Value::as_array).map(Vec::as_slice),
        Some([only]) if only.as_str() == Some(kind_key)
    )
}

/// Follows a local `$ref` such as `#/$defs/SeaParameters`; objects without one
/// resolve to themselves.
fn resolve_ref<'a>(
    root: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    let Some(reference) = obj.get("$ref") else {
        return Some(obj);
    };
    let path = reference.as_str()?.strip_prefix("#/")?;
    let mut cur = root;
    for raw in path.split('/') {
        let seg = raw.replace("~1", "/").replace("~0", "~");
        cur = cur.get(&seg)?.as_object()?;
    }
    Some(cur)
}

fn field_kind(schema: &Map<String, Value>) -> Option<FieldKind> {
    let from_name = |s: &str| match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        "array" => Some(FieldKind::Array),
        "object" => Some(FieldKind::Object),
        _ => None,
    };
    match schema.get("type") {
        Some(Value::String(s)) => from_name(s),
        // nullable unions like ["integer", "null"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).find_map(from_name),
        Some(_) => None,
        None if schema.contains_key("oneOf") || schema.contains_key("anyOf") => {
            Some(FieldKind::Object)
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{LearnerChoice, StreamChoice, UIChoice};
    use serde_json::json;

    fn spec<'a>(specs: &'a [FieldSpec], name: &str) -> &'a FieldSpec {
        specs
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no field {name}"))
    }

    #[test]
    fn field_kind_handles_primitives_and_nullable_unions() {
        let kind = |v: Value| field_kind(v.as_object().unwrap());
        assert_eq!(kind(json!({"type": "integer"})), Some(FieldKind::Integer));
        assert_eq!(kind(json!({"type": ["null", "number"]})), Some(FieldKind::Number));
        assert_eq!(kind(json!({"oneOf": []})), Some(FieldKind::Object));
        assert_eq!(kind(json!({})), None);
    }

    #[test]
    fn refs_are_followed_and_unescaped() {
        let root = json!({"$defs": {"a~b": {"inner/seg": {"type": "number"}}}});
        let obj = json!({"$ref": "#/$defs/a~0b/inner~1seg"});
        let out = resolve_ref(root.as_object().unwrap(), obj.as_object().unwrap()).unwrap();
        assert_eq!(out.get("type").and_then(Value::as_str), Some("number"));
    }

    #[test]
    fn discriminant_matches_const_and_single_enum() {
        let c = json!({"type": {"const": "knn"}});
        let e = json!({"type": {"enum": ["knn"]}});
        assert!(discriminant_matches(c.as_object().unwrap(), "knn"));
        assert!(discriminant_matches(e.as_object().unwrap(), "knn"));
        assert!(!discriminant_matches(c.as_object().unwrap(), "naive-bayes"));
    }

    #[test]
    fn sea_fields_carry_ranges() {
        let specs = specs_for_kind(&StreamChoice::schema(), "sea-generator").unwrap();
        let fid = spec(&specs, "function_id");
        assert_eq!(fid.kind, FieldKind::Integer);
        assert_eq!(fid.min, Some(1.0));
        assert_eq!(fid.max, Some(4.0));
        assert_eq!(spec(&specs, "noise_pct").kind, FieldKind::Number);
    }

    #[test]
    fn ensemble_fields_include_flattened_config() {
        let specs = specs_for_kind(&LearnerChoice::schema(), "adaptive-ensemble").unwrap();
        assert_eq!(spec(&specs, "pool_size").kind, FieldKind::Integer);
        assert_eq!(spec(&specs, "active_count").title, "Active Count");
        assert_eq!(spec(&specs, "base_learners").kind, FieldKind::Array);
        assert!(specs.iter().any(|s| s.name == "voting"));
    }

    #[test]
    fn unit_params_have_no_fields() {
        let specs = specs_for_kind(&LearnerChoice::schema(), "naive-bayes").unwrap();
        assert!(specs.is_empty());
    }

    #[test]
    fn unknown_kind_errors() {
        let err = specs_for_kind(&StreamChoice::schema(), "does-not-exist").unwrap_err();
        assert!(err.to_string().contains("no branch found"));
    }
}
