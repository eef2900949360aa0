//! Fair-share ("water-filling") distribution.
//!
//! Everything that hands out space in this crate funnels through
//! [`fair_share`]: multi-cell spans growing their blocks, maximum spans
//! capping them, and the reconciler stretching an axis toward the available
//! size. The allocator splits an amount as evenly as its capacity limits
//! allow, re-levelling whenever a recipient saturates.

use crate::axis::AxisBlock;
use crate::{SizeBound, MAX_SIZE};

/// Distribute `amount` across recipients limited by `caps`.
///
/// Runs equal-share rounds: each round computes `ceil(remaining / active)`
/// and hands every recipient with room at most that much, visiting
/// recipients from the highest index down to the lowest. The visiting
/// order is a contract pinned by tests: when a remainder cannot be split
/// evenly, the higher indices are served in full first.
///
/// The allocations never sum above `amount`, and reach it exactly whenever
/// the total capacity suffices. A round either hands out the full remainder
/// or saturates at least one recipient, so the loop runs at most
/// `caps.len() + 1` times.
pub(crate) fn fair_share(amount: u32, caps: &[SizeBound]) -> Vec<u32> {
    let mut out = vec![0u32; caps.len()];
    let mut remaining = amount;
    while remaining > 0 {
        let active = caps
            .iter()
            .zip(&out)
            .filter(|(cap, used)| room(**cap, **used, remaining) > 0)
            .count() as u32;
        if active == 0 {
            break;
        }
        let share = remaining.div_ceil(active);
        let mut progressed = false;
        for index in (0..caps.len()).rev() {
            let step = room(caps[index], out[index], remaining)
                .min(share)
                .min(remaining);
            if step == 0 {
                continue;
            }
            out[index] += step;
            remaining -= step;
            progressed = true;
            if remaining == 0 {
                break;
            }
        }
        if !progressed {
            break;
        }
    }
    out
}

fn room(cap: SizeBound, used: u32, remaining: u32) -> u32 {
    match cap {
        SizeBound::Px(limit) => limit.saturating_sub(used),
        SizeBound::Unbounded => remaining,
    }
}

/// Raise the spanned blocks' values until they sum to at least `target`,
/// honouring each block's own maximum.
///
/// Unset values count as zero and every block comes out settled, so later
/// spans over the same cells see concrete values. A shortfall remains when
/// all blocks saturate first; a value never moves down and never passes a
/// bounded maximum.
pub(crate) fn grow_line(values: &mut [Option<u32>], rules: &[AxisBlock], target: u32) {
    let current = values
        .iter()
        .fold(0u32, |acc, v| acc.saturating_add(v.unwrap_or(0)));
    let deficit = target.saturating_sub(current);
    let extra = if deficit > 0 {
        let caps: Vec<SizeBound> = values
            .iter()
            .zip(rules)
            .map(|(value, rule)| match rule.max() {
                SizeBound::Unbounded => SizeBound::Unbounded,
                SizeBound::Px(_) => {
                    SizeBound::Px(rule.max_px().saturating_sub(value.unwrap_or(0)))
                }
            })
            .collect();
        fair_share(deficit, &caps)
    } else {
        vec![0; values.len()]
    };
    for (value, add) in values.iter_mut().zip(extra) {
        *value = Some(value.unwrap_or(0).saturating_add(add).min(MAX_SIZE));
    }
}

/// Cap the spanned blocks so they sum to at most `target`, flooring each at
/// its own minimum.
///
/// Blocks without a value yet split whatever budget the settled ones leave
/// (their axis maximum limiting each share); settled blocks are only pulled
/// back when the line still overshoots afterwards.
pub(crate) fn shrink_line(values: &mut [Option<u32>], rules: &[AxisBlock], target: u32) {
    if values.iter().any(Option::is_none) {
        let settled = values
            .iter()
            .fold(0u32, |acc, v| acc.saturating_add(v.unwrap_or(0)));
        let budget = target.saturating_sub(settled);
        let caps: Vec<SizeBound> = values
            .iter()
            .zip(rules)
            .map(|(value, rule)| match value {
                Some(_) => SizeBound::Px(0),
                None => rule.max(),
            })
            .collect();
        let fill = fair_share(budget, &caps);
        for (value, add) in values.iter_mut().zip(fill) {
            if value.is_none() {
                *value = Some(add.min(MAX_SIZE));
            }
        }
    }

    let current = values
        .iter()
        .fold(0u32, |acc, v| acc.saturating_add(v.unwrap_or(0)));
    let excess = current.saturating_sub(target);
    if excess == 0 {
        return;
    }
    let caps: Vec<SizeBound> = values
        .iter()
        .zip(rules)
        .map(|(value, rule)| SizeBound::Px(value.unwrap_or(0).saturating_sub(rule.min_px())))
        .collect();
    let cut = fair_share(excess, &caps);
    for (value, sub) in values.iter_mut().zip(cut) {
        *value = Some(value.unwrap_or(0).saturating_sub(sub));
    }
}
