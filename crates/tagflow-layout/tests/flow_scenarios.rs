//! End-to-end packing scenarios with tags and the size cache.

use std::collections::HashSet;

use tagflow_core::geometry::Size;
use tagflow_core::tag::{Tag, TagId};
use tagflow_layout::{Flow, SizeCache};

fn tag(id: u64, name: &str) -> Tag {
    Tag::new(TagId::new(id), name)
}

fn pack_with_cache(tags: &[Tag], cache: &mut SizeCache, width: f64, spacing: f64) -> Vec<Vec<u64>> {
    let layout = Flow::new(width).spacing(spacing).split(tags, |t| {
        cache
            .lookup(t.id(), t.content_fingerprint())
            .map_or(width, |s| s.width)
    });
    layout
        .iter_rows(tags)
        .map(|row| row.iter().map(|t| t.id().get()).collect())
        .collect()
}

fn measure(cache: &mut SizeCache, t: &Tag, width: f64) -> bool {
    cache.record(t.id(), t.content_fingerprint(), Size::new(width, 20.0))
}

#[test]
fn three_items_two_rows() {
    let tags = [tag(1, "A"), tag(2, "B"), tag(3, "C")];
    let mut cache = SizeCache::new();
    for (t, w) in tags.iter().zip([30.0, 40.0, 50.0]) {
        measure(&mut cache, t, w);
    }
    assert_eq!(pack_with_cache(&tags, &mut cache, 100.0, 10.0), vec![vec![1, 2], vec![3]]);
}

#[test]
fn oversized_item_alone() {
    let tags = [tag(4, "D")];
    let mut cache = SizeCache::new();
    measure(&mut cache, &tags[0], 500.0);
    assert_eq!(pack_with_cache(&tags, &mut cache, 100.0, 10.0), vec![vec![4]]);
}

#[test]
fn empty_list_has_no_rows() {
    let mut cache = SizeCache::new();
    assert!(pack_with_cache(&[], &mut cache, 100.0, 10.0).is_empty());
}

#[test]
fn placeholder_then_real_size_converges() {
    let tags = [tag(1, "A"), tag(2, "B"), tag(3, "new")];
    let mut cache = SizeCache::new();
    measure(&mut cache, &tags[0], 20.0);
    measure(&mut cache, &tags[1], 20.0);

    // Pass 1: the unmeasured tag takes a full-width row of its own.
    let pass1 = pack_with_cache(&tags, &mut cache, 100.0, 8.0);
    assert_eq!(pass1, vec![vec![1, 2], vec![3]]);

    // Its real size arrives and is narrow enough to join its neighbours.
    assert!(measure(&mut cache, &tags[2], 20.0));
    let pass2 = pack_with_cache(&tags, &mut cache, 100.0, 8.0);
    assert_eq!(pass2, vec![vec![1, 2, 3]]);

    // Same inputs, same partition.
    assert_eq!(pack_with_cache(&tags, &mut cache, 100.0, 8.0), pass2);
}

#[test]
fn placeholder_isolates_item_mid_list() {
    let tags = [tag(1, "A"), tag(2, "new"), tag(3, "C")];
    let mut cache = SizeCache::new();
    measure(&mut cache, &tags[0], 20.0);
    measure(&mut cache, &tags[2], 20.0);
    assert_eq!(
        pack_with_cache(&tags, &mut cache, 100.0, 8.0),
        vec![vec![1], vec![2], vec![3]]
    );
}

#[test]
fn renamed_tag_reverts_to_placeholder() {
    let original = [tag(1, "A"), tag(2, "B")];
    let mut cache = SizeCache::new();
    for t in &original {
        measure(&mut cache, t, 20.0);
    }
    assert_eq!(pack_with_cache(&original, &mut cache, 100.0, 8.0), vec![vec![1, 2]]);

    let renamed = [tag(1, "A"), tag(2, "B but much longer")];
    assert_eq!(
        pack_with_cache(&renamed, &mut cache, 100.0, 8.0),
        vec![vec![1], vec![2]]
    );
}

#[test]
fn pruning_after_removal_leaves_no_orphans() {
    let tags = [tag(1, "A"), tag(2, "B"), tag(3, "C")];
    let mut cache = SizeCache::new();
    for t in &tags {
        measure(&mut cache, t, 20.0);
    }
    let remaining = [tags[0].clone(), tags[2].clone()];
    let live: HashSet<TagId> = remaining.iter().map(Tag::id).collect();
    cache.prune(|id| live.contains(&id));
    assert!(!cache.contains(TagId::new(2)));
    assert_eq!(cache.len(), 2);
}

#[test]
fn narrowing_the_container_rewraps() {
    let tags: Vec<Tag> = (1..=6).map(|i| tag(i, "x")).collect();
    let mut cache = SizeCache::new();
    for t in &tags {
        measure(&mut cache, t, 20.0);
    }
    // 28 per item including spacing.
    assert_eq!(pack_with_cache(&tags, &mut cache, 200.0, 8.0).len(), 1);
    assert_eq!(pack_with_cache(&tags, &mut cache, 84.0, 8.0).len(), 2);
    assert_eq!(pack_with_cache(&tags, &mut cache, 56.0, 8.0).len(), 3);
    assert_eq!(pack_with_cache(&tags, &mut cache, 10.0, 8.0).len(), 6);
}
