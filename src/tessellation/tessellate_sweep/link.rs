use super::cross_section::EdgePoint;

/// Threads every radial slot into a cyclic chain.
///
/// Point `i` links forward to `i + radial`, and the last ring wraps to the
/// first. For flat and cross profiles a slot therefore alternates between
/// the two ribbon sides. On open curves the wrap still exists so every chain
/// stays cyclic, but the first ring is marked as not connected backwards and
/// the last ring as not connected forwards.
pub(super) fn link(points: &mut [EdgePoint], radial: usize, edge_count: usize, closed: bool) {
    let len = points.len();
    if radial == 0 || len < radial {
        return;
    }

    for index in radial..len {
        points[index].prev_point = index - radial;
        points[index - radial].next_point = index;
    }

    for slot in 0..radial {
        let last = len - radial + slot;
        points[last].next_point = slot;
        points[slot].prev_point = last;

        if !closed {
            for edge in 0..edge_count {
                points[slot + edge * radial].prev_connected = false;
                points[len - (edge_count - edge) * radial + slot].next_connected = false;
            }
        }
    }
}
