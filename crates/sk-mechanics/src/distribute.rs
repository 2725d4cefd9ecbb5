//! Die-result distribution.
//!
//! Rewrites the faces of already-rolled dice so that they add up to a
//! desired total. Every die is first dropped to 1, then the remaining pips
//! are handed out in a shuffled order so no single die is always the one
//! that gets inflated.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::dice::DieSlot;

/// Redistribute the faces of `slots` so they sum to `desired_total`.
///
/// The total is clamped to what the dice can show: at least one pip per
/// die, at most every die on its highest face. Returns the total actually
/// reached, or `None` when there are no dice to work with (the caller has
/// to apply the total at the aggregate level).
pub fn redistribute_dice<'a, I>(slots: I, desired_total: i64, rng: &mut StdRng) -> Option<i64>
where
    I: IntoIterator<Item = &'a mut DieSlot>,
{
    let mut slots: Vec<&mut DieSlot> = slots.into_iter().collect();
    if slots.is_empty() {
        return None;
    }

    let min_total = slots.len() as i64;
    let max_total: i64 = slots.iter().map(|s| i64::from(s.faces.max(1))).sum();
    let clamped = desired_total.clamp(min_total, max_total);
    let mut remaining = clamped - min_total;

    for slot in slots.iter_mut() {
        slot.faces = slot.faces.max(1);
        slot.value = 1;
    }

    slots.shuffle(rng);
    for slot in slots.iter_mut() {
        if remaining == 0 {
            break;
        }
        let add = remaining.min(i64::from(slot.faces - 1));
        slot.value += add as u32;
        remaining -= add;
    }

    Some(clamped)
}
