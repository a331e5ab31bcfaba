use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use storefront_catalog::{CATEGORIES, CatalogView, FilterPatch, PriceBucket, ProductRecord, SortKey};
use storefront_core::{Price, ProductId};

fn synthetic_catalog(len: usize) -> Vec<ProductRecord> {
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..len)
        .map(|i| {
            ProductRecord::new(
                ProductId::new(i as u64 + 1),
                format!("Product {:05}", (i * 7919) % len),
                CATEGORIES[i % CATEGORIES.len()],
                Price::from_minor(((i * 373) % 20_000) as u64),
                (i % 4) as u32,
                epoch + Duration::minutes(((i * 31) % 10_000) as i64),
            )
            .with_description("Comfortable and stylish, made from premium materials.")
        })
        .collect()
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_recompute");

    for len in [100usize, 1_000, 10_000] {
        let catalog = synthetic_catalog(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("sort_only", len), &catalog, |b, catalog| {
            let mut view = CatalogView::default();
            view.replace_catalog(catalog.clone()).unwrap();
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let key = if flip { SortKey::PriceAscending } else { SortKey::NameAscending };
                black_box(view.set_sort(key).total_count);
            });
        });

        group.bench_with_input(BenchmarkId::new("search_and_bucket", len), &catalog, |b, catalog| {
            let mut view = CatalogView::default();
            view.replace_catalog(catalog.clone()).unwrap();
            b.iter(|| {
                let patch = FilterPatch::new()
                    .search(black_box("premium"))
                    .price_range(PriceBucket::From25To50)
                    .in_stock_only(true);
                black_box(view.set_filter(patch).total_count);
            });
        });
    }

    group.finish();
}

fn bench_page_walk(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000);
    let mut view = CatalogView::default();
    view.replace_catalog(catalog).unwrap();
    let pages = view.view().total_pages;

    c.bench_function("page_walk_10k", |b| {
        b.iter(|| {
            for page in 1..=pages.min(50) {
                black_box(view.set_page(page).items.len());
            }
        });
    });
}

criterion_group!(benches, bench_recompute, bench_page_walk);
criterion_main!(benches);
