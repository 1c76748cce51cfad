//! Builders for Mapbox style expressions.
//!
//! Expressions are plain JSON arrays (`["get", "mag"]`); these helpers keep
//! the call sites readable and the array shapes in one place.

use serde_json::{json, Value};

/// `["get", property]`
pub fn get(property: &str) -> Value {
    json!(["get", property])
}

/// `["has", property]`
pub fn has(property: &str) -> Value {
    json!(["has", property])
}

/// `["!", expression]`
pub fn not(expression: Value) -> Value {
    json!(["!", expression])
}

/// `["zoom"]`
pub fn zoom() -> Value {
    json!(["zoom"])
}

/// `["heatmap-density"]`
pub fn heatmap_density() -> Value {
    json!(["heatmap-density"])
}

/// `["step", input, base, threshold₁, value₁, ...]`
pub fn step(input: Value, base: impl Into<Value>, stops: &[(f64, Value)]) -> Value {
    let mut expression = vec![json!("step"), input, base.into()];
    for (threshold, output) in stops {
        expression.push(json!(threshold));
        expression.push(output.clone());
    }
    Value::Array(expression)
}

/// `["interpolate", ["linear"], input, stop₁, value₁, ...]`
pub fn interpolate_linear(input: Value, stops: &[(f64, Value)]) -> Value {
    let mut expression = vec![json!("interpolate"), json!(["linear"]), input];
    for (stop, output) in stops {
        expression.push(json!(stop));
        expression.push(output.clone());
    }
    Value::Array(expression)
}

/// `["match", input, label₁, output₁, ..., fallback]`
pub fn match_labels<I>(input: Value, arms: I, fallback: impl Into<Value>) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut expression = vec![json!("match"), input];
    for (label, output) in arms {
        expression.push(Value::String(label));
        expression.push(output);
    }
    expression.push(fallback.into());
    Value::Array(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step() {
        let expr = step(get("point_count"), 20, &[(1.0, json!(40)), (2.0, json!(60))]);
        assert_eq!(
            expr,
            json!(["step", ["get", "point_count"], 20, 1.0, 40, 2.0, 60])
        );
    }

    #[test]
    fn test_interpolate_linear() {
        let expr = interpolate_linear(zoom(), &[(7.0, json!(1)), (9.0, json!(0))]);
        assert_eq!(
            expr,
            json!(["interpolate", ["linear"], ["zoom"], 7.0, 1, 9.0, 0])
        );
    }

    #[test]
    fn test_match_without_arms_is_just_fallback() {
        let expr = match_labels(get("iso"), Vec::new(), "none");
        assert_eq!(expr, json!(["match", ["get", "iso"], "none"]));
    }

    #[test]
    fn test_not_has() {
        assert_eq!(not(has("point_count")), json!(["!", ["has", "point_count"]]));
    }
}
