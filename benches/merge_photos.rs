use std::collections::HashSet;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use splashfeed::domain::{Photo, PhotoSet, PhotoSize};

fn make_photo(id: usize) -> Photo {
    Photo {
        id: format!("photo-{id}"),
        size: PhotoSize::new(1024, 768),
        created_at: None,
        description: Some(format!("photo number {id}")),
        thumb_url: format!("https://images.example.com/{id}/thumb"),
        full_url: format!("https://images.example.com/{id}/full"),
        is_liked: false,
    }
}

/// A feed of `existing` photos plus a batch of `batch` photos overlapping
/// the tail by `overlap`.
fn make_fixture(existing: usize, batch: usize, overlap: usize) -> (Vec<Photo>, Vec<Photo>) {
    let feed: Vec<Photo> = (0..existing).map(make_photo).collect();
    let start = existing - overlap;
    let incoming: Vec<Photo> = (start..start + batch).map(make_photo).collect();
    (feed, incoming)
}

/// Rebuilds the id set from the list on every batch, the way a plain
/// `Vec<Photo>` store has to.
fn merge_rebuild_set(feed: &mut Vec<Photo>, incoming: Vec<Photo>) -> usize {
    let existing: HashSet<&str> = feed.iter().map(|photo| photo.id.as_str()).collect();
    let unique: Vec<Photo> = incoming
        .into_iter()
        .filter(|photo| !existing.contains(photo.id.as_str()))
        .collect();
    let appended = unique.len();
    feed.extend(unique);
    appended
}

/// Incremental merge via the maintained index in `PhotoSet`.
fn merge_photo_set(feed: &mut PhotoSet, incoming: Vec<Photo>) -> usize {
    feed.extend_unique(incoming)
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("rebuild-set", |b| {
        b.iter(|| {
            let (mut feed, incoming) = make_fixture(black_box(900), black_box(30), black_box(10));
            merge_rebuild_set(&mut feed, incoming)
        })
    });

    c.bench_function("photo-set", |b| {
        b.iter(|| {
            let (feed, incoming) = make_fixture(black_box(900), black_box(30), black_box(10));
            let mut feed: PhotoSet = feed.into_iter().collect();
            merge_photo_set(&mut feed, incoming)
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
