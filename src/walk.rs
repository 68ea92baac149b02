//! Numeric leaf discovery in decoded message trees.
//!
//! A message payload is walked depth-first. Every number found at any depth
//! is emitted under the slash-joined path of keys and indices leading to it,
//! rooted at the message's type tag. Booleans count as numbers and plot as
//! 0 or 1:
//!
//! ```text
//! carState { vEgo: 3.2, wheelSpeeds: { fl: 3.1 }, cruiseState: { enabled: true } }
//!
//!   carState/vEgo                 3.2
//!   carState/wheelSpeeds/fl       3.1
//!   carState/cruiseState/enabled  1.0
//!   (strings and nulls are skipped)
//! ```

use serde_json::Value;

/// A named scalar found in a message tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarPoint {
    pub path: String,
    pub value: f64,
}

/// Join a parent path and a child key.
pub fn join_path(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, key)
}

/// Walk `value`, calling `emit` with the path and value of every numeric or
/// boolean leaf.
///
/// Maps are visited in their stored order and sequences in index order. The
/// first error returned by `emit` stops the walk.
pub fn walk<E, F>(value: &Value, path: &str, emit: &mut F) -> Result<(), E>
where
    F: FnMut(&str, f64) -> Result<(), E>,
{
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => emit(path, v),
            None => Ok(()),
        },
        Value::Bool(b) => emit(path, if *b { 1.0 } else { 0.0 }),
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, &join_path(path, key), emit)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &join_path(path, &index.to_string()), emit)?;
            }
            Ok(())
        }
        // Not plottable
        Value::Null | Value::String(_) => Ok(()),
    }
}

/// Collect every numeric leaf of `value` rooted at `path`.
pub fn scalar_points(value: &Value, path: &str) -> Vec<ScalarPoint> {
    let mut points = Vec::new();
    let _ = walk(value, path, &mut |path: &str, value: f64| {
        points.push(ScalarPoint {
            path: path.to_string(),
            value,
        });
        Ok::<(), std::convert::Infallible>(())
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(points: &[ScalarPoint]) -> Vec<&str> {
        let mut paths: Vec<&str> = points.iter().map(|p| p.path.as_str()).collect();
        paths.sort_unstable();
        paths
    }

    #[test]
    fn test_flat_map() {
        let mut points = scalar_points(&json!({ "vEgo": 3.5, "aEgo": -1 }), "carState");
        points.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            points,
            vec![
                ScalarPoint {
                    path: "carState/aEgo".to_string(),
                    value: -1.0
                },
                ScalarPoint {
                    path: "carState/vEgo".to_string(),
                    value: 3.5
                },
            ]
        );
    }

    #[test]
    fn test_nested_maps_and_sequences() {
        let value = json!({
            "wheelSpeeds": { "fl": 1.0, "fr": 2.0 },
            "position": { "x": [1, 2, 3] },
            "leads": [ { "dRel": 10.0 }, { "dRel": 20.0, "prob": [0.5] } ],
            "matrix": [[1, 2], [3]]
        });

        let points = scalar_points(&value, "modelV2");
        assert_eq!(
            paths(&points),
            vec![
                "modelV2/leads/0/dRel",
                "modelV2/leads/1/dRel",
                "modelV2/leads/1/prob/0",
                "modelV2/matrix/0/0",
                "modelV2/matrix/0/1",
                "modelV2/matrix/1/0",
                "modelV2/position/x/0",
                "modelV2/position/x/1",
                "modelV2/position/x/2",
                "modelV2/wheelSpeeds/fl",
                "modelV2/wheelSpeeds/fr",
            ]
        );
    }

    #[test]
    fn test_non_numeric_leaves_skipped() {
        let value = json!({
            "name": "honda",
            "missing": null,
            "events": ["a", null],
            "empty": {},
            "none": []
        });
        assert!(scalar_points(&value, "carParams").is_empty());
    }

    #[test]
    fn test_booleans_plot_as_zero_or_one() {
        let value = json!({
            "vEgo": 1.0,
            "brakePressed": true,
            "cruiseState": { "enabled": false },
            "events": ["a", true]
        });
        let mut points = scalar_points(&value, "carState");
        points.sort_by(|a, b| a.path.cmp(&b.path));

        let expected = [
            ("carState/brakePressed", 1.0),
            ("carState/cruiseState/enabled", 0.0),
            ("carState/events/1", 1.0),
            ("carState/vEgo", 1.0),
        ];
        assert_eq!(points.len(), expected.len());
        for (point, (path, value)) in points.iter().zip(expected) {
            assert_eq!(point.path, path);
            assert_eq!(point.value, value);
        }
    }

    #[test]
    fn test_one_point_per_numeric_leaf() {
        let value = json!({
            "a": 1,
            "b": [2, "x", { "c": 3, "d": null }],
            "e": { "f": { "g": 4.25, "h": true } }
        });
        let points = scalar_points(&value, "t");
        assert_eq!(points.len(), 5);
        let sum: f64 = points.iter().map(|p| p.value).sum();
        assert_eq!(sum, 11.25);
    }

    #[test]
    fn test_deterministic_paths() {
        let value = json!({ "z": [1, { "y": 2 }], "a": 3 });
        assert_eq!(scalar_points(&value, "m"), scalar_points(&value, "m"));
    }

    #[test]
    fn test_numeric_root() {
        let points = scalar_points(&json!(42), "userFlag");
        assert_eq!(paths(&points), vec!["userFlag"]);
    }

    #[test]
    fn test_large_integers() {
        let points = scalar_points(&json!({ "t": u64::MAX }), "clocks");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, u64::MAX as f64);
    }

    #[test]
    fn test_emit_error_stops_walk() {
        let value = json!({ "a": 1, "b": 2, "c": 3 });
        let mut seen = 0;
        let result = walk(&value, "m", &mut |_: &str, _: f64| {
            seen += 1;
            if seen == 2 {
                Err("full")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("full"));
        assert_eq!(seen, 2);
    }
}
