//! Expansion of repeat rules into sibling parts.

use crate::definition::{Definition, Vector, zero_vector};
use serde_json::Number;

/// Replace `definition`'s repeat rule with a composite of `times` clones.
///
/// Clone `j` (counting from zero) is offset by `j × delta` on position and
/// rotation. A delta whose length differs from the clone's vector is
/// skipped for that vector and the clone keeps its original values. A
/// definition without a rule is returned unchanged.
pub fn expand_repeat(mut definition: Definition) -> Definition {
    let Some(rule) = definition.repeat.take() else {
        return definition;
    };

    let parts = (0..rule.times)
        .map(|step| {
            let mut part = definition.clone();
            let position = part.position.get_or_insert_with(zero_vector);
            if let Some(delta) = &rule.position {
                apply_offset(position, delta, step);
            }
            let rotation = part.rotation.get_or_insert_with(zero_vector);
            if let Some(delta) = &rule.rotation {
                apply_offset(rotation, delta, step);
            }
            part
        })
        .collect();

    Definition::composite(parts)
}

fn apply_offset(vector: &mut Vector, delta: &Vector, step: u64) {
    if vector.len() != delta.len() {
        return;
    }
    for (component, delta) in vector.iter_mut().zip(delta) {
        *component = offset_component(component, delta, step);
    }
}

/// `base + step × delta`, kept integral when both operands are integers.
fn offset_component(base: &Number, delta: &Number, step: u64) -> Number {
    if step == 0 {
        return base.clone();
    }
    if let (Some(base), Some(delta), Ok(step)) = (base.as_i64(), delta.as_i64(), i64::try_from(step))
        && let Some(sum) = delta.checked_mul(step).and_then(|d| base.checked_add(d))
    {
        return Number::from(sum);
    }
    let base_f = base.as_f64().unwrap_or(0.0);
    let delta_f = delta.as_f64().unwrap_or(0.0);
    Number::from_f64(base_f + step as f64 * delta_f).unwrap_or_else(|| base.clone())
}
