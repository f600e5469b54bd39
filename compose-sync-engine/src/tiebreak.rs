//! Choosing one remote project among several sharing a name.

use compose_sync_core::RemoteProject;

/// The candidate with the most recent activity timestamp.
///
/// Activity is `updatedAt`, falling back to `createdAt`. Candidates with no
/// parsable timestamp are never preferred over one that has one. Ties, and
/// the all-unknown case, keep the earliest candidate in listing order.
pub fn select_preferred(candidates: &[RemoteProject]) -> Option<&RemoteProject> {
    let mut iter = candidates.iter();
    let first = iter.next()?;
    let mut best = (first, first.last_activity());

    for candidate in iter {
        let Some(stamp) = candidate.last_activity() else {
            continue;
        };
        let newer = match best.1 {
            Some(current) => stamp > current,
            None => true,
        };
        if newer {
            best = (candidate, Some(stamp));
        }
    }

    Some(best.0)
}
