use std::collections::HashMap;

use rand::seq::SliceRandom;
use ricah_model::{MediaId, MediaObject};

/// Reconcile the live object set with the persisted order list.
///
/// Ids in `order` come first, in list order; ids with no matching object are
/// skipped. Objects the list never mentions follow, newest first. Every input
/// object appears exactly once in the output, and repeated ids in `order`
/// resolve to their first occurrence.
pub fn display_sequence(
    objects: Vec<MediaObject>,
    order: &[MediaId],
) -> Vec<MediaObject> {
    let mut by_id: HashMap<MediaId, MediaObject> = objects
        .into_iter()
        .map(|object| (object.id.clone(), object))
        .collect();

    let mut sequence: Vec<MediaObject> = order
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect();

    let mut unlisted: Vec<MediaObject> = by_id.into_values().collect();
    unlisted.sort_by(|a, b| {
        // Recency first; id as tiebreak so repeated calls stay stable.
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    sequence.extend(unlisted);
    sequence
}

/// Append `id` to the end of the order unless it is already listed.
pub fn append(mut order: Vec<MediaId>, id: MediaId) -> Vec<MediaId> {
    if !order.contains(&id) {
        order.push(id);
    }
    order
}

/// Remove all occurrences of `id` from the order.
pub fn remove(mut order: Vec<MediaId>, id: &MediaId) -> Vec<MediaId> {
    order.retain(|listed| listed != id);
    order
}

/// A uniformly random permutation of the object set, independent of any
/// persisted order. Never written back.
pub fn shuffled(mut objects: Vec<MediaObject>) -> Vec<MediaObject> {
    objects.shuffle(&mut rand::rng());
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ricah_model::MediaKind;

    fn object(id: &str, created_secs: i64) -> MediaObject {
        MediaObject::new(
            id,
            format!("/media/{id}"),
            MediaKind::Image,
            id,
            Utc.timestamp_opt(created_secs, 0).unwrap(),
        )
    }

    fn ids(raw: &[&str]) -> Vec<MediaId> {
        raw.iter().map(|id| MediaId::from(*id)).collect()
    }

    fn sequence_ids(sequence: &[MediaObject]) -> Vec<&str> {
        sequence.iter().map(|object| object.id.as_str()).collect()
    }

    #[test]
    fn listed_ids_lead_in_list_order() {
        let objects = vec![object("a", 1), object("b", 2)];
        let sequence = display_sequence(objects, &ids(&["b", "a"]));
        assert_eq!(sequence_ids(&sequence), vec!["b", "a"]);
    }

    #[test]
    fn unlisted_objects_follow_by_recency() {
        let objects = vec![object("a", 1), object("b", 2), object("c", 3)];
        let sequence = display_sequence(objects, &ids(&["b"]));
        // c is newer than a, so it comes first among the unlisted.
        assert_eq!(sequence_ids(&sequence), vec!["b", "c", "a"]);
    }

    #[test]
    fn empty_order_falls_back_to_creation_desc() {
        let objects = vec![object("old", 1), object("new", 9), object("mid", 5)];
        let sequence = display_sequence(objects, &[]);
        assert_eq!(sequence_ids(&sequence), vec!["new", "mid", "old"]);
    }

    #[test]
    fn stale_ids_are_skipped_silently() {
        let objects = vec![object("a", 1)];
        let sequence = display_sequence(objects, &ids(&["x"]));
        assert_eq!(sequence_ids(&sequence), vec!["a"]);
    }

    #[test]
    fn every_object_appears_exactly_once() {
        let objects = vec![
            object("a", 1),
            object("b", 2),
            object("c", 3),
            object("d", 4),
        ];
        let order = ids(&["c", "x", "a", "c"]);
        let sequence = display_sequence(objects, &order);

        assert_eq!(sequence.len(), 4);
        let mut seen: Vec<&str> = sequence_ids(&sequence);
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "b", "c", "d"]);
        // Repeated "c" resolves to its first occurrence only.
        assert_eq!(sequence_ids(&sequence)[0], "c");
    }

    #[test]
    fn repeated_calls_are_stable() {
        let objects = vec![
            object("same-time-1", 7),
            object("same-time-2", 7),
            object("listed", 1),
        ];
        let order = ids(&["listed"]);
        let first = display_sequence(objects.clone(), &order);
        let second = display_sequence(objects, &order);
        assert_eq!(first, second);
    }

    #[test]
    fn append_is_idempotent() {
        let order = ids(&["a", "b"]);
        let once = append(order.clone(), MediaId::from("c"));
        let twice = append(once.clone(), MediaId::from("c"));
        assert_eq!(once, ids(&["a", "b", "c"]));
        assert_eq!(once, twice);
    }

    #[test]
    fn append_then_remove_restores_original() {
        let order = ids(&["a", "b"]);
        let appended = append(order.clone(), MediaId::from("c"));
        let restored = remove(appended, &MediaId::from("c"));
        assert_eq!(restored, order);
    }

    #[test]
    fn remove_drops_all_occurrences() {
        let order = ids(&["a", "b", "a"]);
        let removed = remove(order, &MediaId::from("a"));
        assert_eq!(removed, ids(&["b"]));
    }

    #[test]
    fn shuffled_is_a_permutation() {
        let objects: Vec<MediaObject> =
            (0..16).map(|i| object(&format!("m{i}"), i)).collect();
        let shuffled = shuffled(objects.clone());

        assert_eq!(shuffled.len(), objects.len());
        let mut expected = sequence_ids(&objects);
        let mut actual = sequence_ids(&shuffled);
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(expected, actual);
    }
}
