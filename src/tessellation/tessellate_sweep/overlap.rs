use tracing::trace;

use super::centerline::CenterPoint;
use super::cross_section::EdgePoint;

/// Result of [`filter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct FilterOutcome {
    pub removed: usize,
    pub iterations: usize,
}

/// Splices `index` out of its chain and marks it removed.
fn remove_point(points: &mut [EdgePoint], index: usize) {
    let prev = points[index].prev_point;
    let next = points[index].next_point;
    points[prev].next_point = next;
    points[next].prev_point = prev;
    points[index].removed = true;
}

/// First point of `slot` that is still live, in arena order.
pub(super) fn first_live(points: &[EdgePoint], slot: usize, radial: usize) -> Option<usize> {
    (slot..points.len())
        .step_by(radial.max(1))
        .find(|&index| !points[index].removed)
}

/// Thins consecutive pairs of opposite-side points in each chain.
///
/// Walking forward, a pair from two different smooth center points is
/// removed and the walk skips three links past it, so the two ribbon sides
/// end up staggered. Pairs touching a hard corner or an open end are kept.
/// Returns the number of points removed.
pub(super) fn interleave(
    points: &mut [EdgePoint],
    centers: &[CenterPoint],
    radial: usize,
) -> usize {
    let mut removed = 0;
    for slot in 0..radial {
        let Some(mut current) = first_live(points, slot, radial) else {
            continue;
        };
        let mut last_index = current;
        let mut steps = 0;
        while points[current].next_point > last_index && steps < points.len() {
            steps += 1;
            let next = points[current].next_point;
            last_index = next;
            if points[current].removed || points[next].removed {
                break;
            }

            let a = points[current].source_index;
            let b = points[next].source_index;
            let protected = centers[a].no_interleave || centers[b].no_interleave;
            // Removing both would leave fewer than two points in the chain.
            let too_short = points[next].next_point == current
                || points[next].next_point == points[current].prev_point;
            if protected || a == b || too_short {
                current = next;
                continue;
            }

            remove_point(points, current);
            remove_point(points, next);
            removed += 2;

            current = points[next].next_point;
            current = points[current].next_point;
            current = points[current].next_point;
        }
    }
    removed
}

/// Removes points whose same-side successor moves against the centerline.
///
/// Each pass marks both ends of every reversed same-side link, then removes
/// the marked points that are not protected. Passes repeat until one removes
/// nothing, so calling this again on its own output removes nothing.
pub(super) fn filter(
    points: &mut [EdgePoint],
    centers: &[CenterPoint],
    radial: usize,
    closed: bool,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    loop {
        outcome.iterations += 1;
        for slot in 0..radial {
            mark_reversed(points, centers, slot, radial, closed);
        }
        let removed = remove_marked(points, centers);
        trace!(iteration = outcome.iterations, removed, "overlap filter pass");
        outcome.removed += removed;
        if removed == 0 {
            break;
        }
    }
    outcome
}

fn mark_reversed(
    points: &mut [EdgePoint],
    centers: &[CenterPoint],
    slot: usize,
    radial: usize,
    closed: bool,
) {
    let Some(mut point) = first_live(points, slot, radial) else {
        return;
    };
    let mut next = points[point].next_point;
    let mut last: Option<usize> = None;
    let budget = 2 * points.len() + 2;
    let mut steps = 0;

    while last.is_none_or(|l| point > l) && steps < budget {
        steps += 1;
        if next < point && !closed {
            break;
        }
        if next == point {
            break;
        }

        if points[next].edge == points[point].edge {
            let center_dir = centers[points[next].source_index].position
                - centers[points[point].source_index].position;
            let edge_dir = points[next].position - points[point].position;
            if edge_dir.dot(&center_dir) < 0.0 {
                points[point].filter = true;
                points[next].filter = true;
            }
            last = Some(point);
            point = points[point].next_point;
            next = points[point].next_point;
        } else {
            next = points[next].next_point;
        }
    }
}

fn remove_marked(points: &mut [EdgePoint], centers: &[CenterPoint]) -> usize {
    let mut removed = 0;
    for index in 0..points.len() {
        if !points[index].filter {
            continue;
        }
        points[index].filter = false;
        let point = points[index];
        if point.removed
            || centers[point.source_index].no_interleave
            || point.next_point == point.prev_point
        {
            continue;
        }
        remove_point(points, index);
        removed += 1;
    }
    removed
}
