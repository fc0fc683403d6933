//! Field-wise diffing of row images
//!
//! Classifies each field of an update's `after` image against the
//! `before` image. Comparison is structural equality on the decoded JSON
//! values: no type coercion (`"5"` != `5`), no numeric tolerance, and a
//! field absent in `before` is unequal to any present value in `after`,
//! including an explicit null.

use crate::event::RowImage;
use serde::Serialize;
use serde_json::Value;

/// How a field changed between the before and after images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChange {
    /// Present in both images with equal values
    Unchanged,
    /// Value differs from `before`, or the field is new in `after`
    Changed,
    /// Present only in `before`; emitted only under
    /// [`DiffPolicy::include_removed`]
    Removed,
}

/// Diff classification for a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    /// Field name
    pub name: String,
    /// The field's value in `after` (or in `before` for [`FieldChange::Removed`])
    pub value: Value,
    /// Change classification
    pub change: FieldChange,
}

impl FieldDiff {
    /// Check if this field differs from the prior image.
    pub fn changed(&self) -> bool {
        self.change != FieldChange::Unchanged
    }
}

/// Policy knobs for diffing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffPolicy {
    /// Also report fields the update dropped (present only in `before`),
    /// appended after the `after` walk and tagged [`FieldChange::Removed`].
    ///
    /// Off by default: only `after`'s keys are visited, matching the
    /// upstream envelope semantics where a dropped field is not shown.
    pub include_removed: bool,
}

impl DiffPolicy {
    /// Policy that emits `Removed` entries for dropped fields.
    pub fn with_removed() -> Self {
        Self {
            include_removed: true,
        }
    }
}

/// Compute the per-field change classification between two row images.
///
/// An absent image is treated as an empty mapping, so the diff is
/// well-defined for every image combination. Output order follows
/// `after`'s field order.
///
/// Callers use the event's operation kind to decide whether a diff is
/// meaningful to display; this function is intended for `update` events
/// (an empty-`before` diff marks every field changed, which is correct
/// but uninteresting for creates and snapshot reads).
pub fn diff_rows(
    before: Option<&RowImage>,
    after: Option<&RowImage>,
    policy: DiffPolicy,
) -> Vec<FieldDiff> {
    let empty = RowImage::new();
    let before = before.unwrap_or(&empty);
    let after = after.unwrap_or(&empty);

    let mut diffs = Vec::with_capacity(after.len());
    for (name, value) in after {
        let change = match before.get(name) {
            Some(prior) if prior == value => FieldChange::Unchanged,
            _ => FieldChange::Changed,
        };
        diffs.push(FieldDiff {
            name: name.clone(),
            value: value.clone(),
            change,
        });
    }

    if policy.include_removed {
        for (name, value) in before {
            if !after.contains_key(name) {
                diffs.push(FieldDiff {
                    name: name.clone(),
                    value: value.clone(),
                    change: FieldChange::Removed,
                });
            }
        }
    }

    diffs
}
