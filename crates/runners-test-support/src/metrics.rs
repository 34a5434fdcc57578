//! Helpers for asserting on Prometheus text exposition output.

use std::collections::BTreeMap;

/// Collect samples of a `(folder_name, folder_id)`-labelled gauge.
///
/// Returns a map keyed by `(folder_name, folder_id)`; samples missing either
/// label are skipped.
#[must_use]
pub fn gauge_samples(rendered: &str, metric: &str) -> BTreeMap<(String, String), i64> {
    let prefix = format!("{metric}{{");
    rendered
        .lines()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .filter_map(|rest| {
            let (labels, value) = rest.rsplit_once("} ")?;
            let labels = parse_labels(labels);
            let value = value.trim().parse::<f64>().ok()?;
            #[allow(clippy::cast_possible_truncation)]
            let value = value as i64;
            Some((
                (
                    labels.get("folder_name")?.clone(),
                    labels.get("folder_id")?.clone(),
                ),
                value,
            ))
        })
        .collect()
}

fn parse_labels(raw: &str) -> BTreeMap<String, String> {
    raw.split("\",")
        .filter_map(|pair| {
            let (key, value) = pair.split_once("=\"")?;
            Some((key.trim().to_string(), value.trim_end_matches('"').to_string()))
        })
        .collect()
}
