//! Re-merging of curved or segmented surfaces.
//!
//! Engines split a curved surface into planar pieces and report one column
//! per piece (`WALL-01_0`, `WALL-01_1`, ...) or repeat the same name. The
//! pieces are folded back into one logical surface before the hour loop.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SeriesError, SeriesResult};
use crate::series::HourlySeries;

/// How pieces of one logical surface combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    #[default]
    Average,
    Sum,
}

/// Strip a trailing `_<digits>` piece suffix.
fn base_name(name: &str) -> Option<&str> {
    let (base, suffix) = name.rsplit_once('_')?;
    if !base.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
        Some(base)
    } else {
        None
    }
}

/// Logical name of a series given the surfaces the geometry knows about.
///
/// A piece suffix is only stripped when the full name is unknown and the base
/// name is known, so surfaces legitimately named `X_1` are left alone.
fn logical_name(name: &str, known: &dyn Fn(&str) -> bool) -> String {
    if known(name) {
        return name.to_string();
    }
    match base_name(name) {
        Some(base) if known(base) => base.to_string(),
        _ => name.to_string(),
    }
}

/// Merge series sharing a logical surface name.
///
/// Output keeps the order in which logical names first appear.
pub fn merge_pieces(
    series: &[HourlySeries],
    known: impl Fn(&str) -> bool,
    policy: MergePolicy,
) -> SeriesResult<Vec<(String, Vec<f64>)>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (Vec<f64>, usize)> = HashMap::new();

    for s in series {
        let name = logical_name(&s.name(), &known);
        match groups.get_mut(&name) {
            Some((acc, count)) => {
                if acc.len() != s.values.len() {
                    return Err(SeriesError::Length {
                        what: name,
                        expected: acc.len(),
                        actual: s.values.len(),
                    });
                }
                for (a, v) in acc.iter_mut().zip(&s.values) {
                    *a += v;
                }
                *count += 1;
            }
            None => {
                order.push(name.clone());
                groups.insert(name, (s.values.clone(), 1));
            }
        }
    }

    let merged = order
        .into_iter()
        .filter_map(|name| {
            let (mut values, count) = groups.remove(&name)?;
            if count > 1 {
                debug!(surface = %name, pieces = count, ?policy, "merged surface pieces");
                if policy == MergePolicy::Average {
                    let n = count as f64;
                    values.iter_mut().for_each(|v| *v /= n);
                }
            }
            Some((name, values))
        })
        .collect();
    Ok(merged)
}
