//! Catalog query engine: filter, sort and paginate a catalog snapshot.
//!
//! The engine is a pure function over borrowed data. Each filter stage
//! narrows every item's variants and then drops items left without any, so
//! an item surfaces only if at least one variant passes every active stage.
//! The snapshot itself is never modified; the result holds clones.

use crate::error::{CatalogError, CatalogResult};
use crate::models::{AdditionalFeature, CatalogItem, CatalogPage, DoorPurpose, FilterCriteria, Variant};

type Predicate = Box<dyn Fn(&Variant) -> bool>;

/// Runs `criteria` against `items`.
///
/// Fails with [`CatalogError::InvalidArgument`] if `offset` or `limit` is
/// negative; nothing else is evaluated in that case.
pub fn query(items: &[CatalogItem], criteria: &FilterCriteria) -> CatalogResult<CatalogPage> {
    if criteria.offset < 0 {
        return Err(CatalogError::InvalidArgument(format!(
            "offset must be non-negative, got {}",
            criteria.offset
        )));
    }
    if criteria.limit < 0 {
        return Err(CatalogError::InvalidArgument(format!(
            "limit must be non-negative, got {}",
            criteria.limit
        )));
    }

    let mut view: Vec<CatalogItem> = items
        .iter()
        .filter(|item| !item.variants.is_empty())
        .cloned()
        .collect();

    for stage in stages(criteria) {
        apply_stage(&mut view, stage.as_ref());
    }

    if criteria.filter_by_min_price {
        sort_by_min_price(&mut view);
    }
    if criteria.filter_by_max_price {
        sort_by_max_price(&mut view);
    }

    Ok(paginate(view, criteria.offset, criteria.limit))
}

/// Active filter stages in evaluation order.
fn stages(criteria: &FilterCriteria) -> Vec<Predicate> {
    let mut stages: Vec<Predicate> = Vec::new();

    // An unchecked size panel means "any size", same as all_sizes.
    let sizes: Vec<(i32, i32)> = criteria
        .checked_sizes()
        .into_iter()
        .map(|bucket| bucket.dimensions())
        .collect();
    if !criteria.all_sizes && !sizes.is_empty() {
        stages.push(Box::new(move |v: &Variant| sizes.contains(&(v.width, v.height))));
    }

    if criteria.for_apartment || criteria.for_home {
        let (apartment, home) = (criteria.for_apartment, criteria.for_home);
        stages.push(Box::new(move |v: &Variant| match v.target {
            DoorPurpose::Apartment => apartment,
            DoorPurpose::Home => home,
        }));
    }

    if criteria.left_opening || criteria.right_opening {
        let (left, right) = (criteria.left_opening, criteria.right_opening);
        stages.push(Box::new(move |v: &Variant| {
            if v.opening_direction { right } else { left }
        }));
    }

    if criteria.mirror {
        stages.push(Box::new(|v: &Variant| v.mirror));
    }

    if criteria.outdated_model || criteria.showcase_sample {
        let (outdated, showcase) = (criteria.outdated_model, criteria.showcase_sample);
        stages.push(Box::new(move |v: &Variant| match v.additional_features {
            Some(AdditionalFeature::Outdated) => outdated,
            Some(AdditionalFeature::Showcase) => showcase,
            None => false,
        }));
    }

    if criteria.without_defect {
        stages.push(Box::new(|v: &Variant| !v.is_defect));
    }

    stages
}

fn apply_stage(view: &mut Vec<CatalogItem>, keep: &dyn Fn(&Variant) -> bool) {
    for item in view.iter_mut() {
        item.variants.retain(|v| keep(v));
    }
    view.retain(|item| !item.variants.is_empty());
}

// Every item in the view has at least one variant, so the price helpers
// always return Some here.
fn sort_by_min_price(view: &mut [CatalogItem]) {
    for item in view.iter_mut() {
        item.variants.sort_by_key(|v| v.price);
    }
    view.sort_by_key(|item| item.min_variant_price().unwrap_or(i64::MAX));
}

fn sort_by_max_price(view: &mut [CatalogItem]) {
    for item in view.iter_mut() {
        item.variants.sort_by(|a, b| b.price.cmp(&a.price));
    }
    view.sort_by(|a, b| b.max_variant_price().cmp(&a.max_variant_price()));
}

fn paginate(view: Vec<CatalogItem>, offset: i64, limit: i64) -> CatalogPage {
    let total = view.len();
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    if offset >= total {
        return CatalogPage::empty();
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let end = offset.saturating_add(limit).min(total);
    let items: Vec<CatalogItem> = view.into_iter().skip(offset).take(end - offset).collect();

    CatalogPage {
        count: items.len(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn variant(price: i64) -> Variant {
        Variant {
            id: Uuid::now_v7(),
            item_id: Uuid::nil(),
            title: format!("article {price}"),
            width: 800,
            height: 2030,
            target: DoorPurpose::Apartment,
            opening_direction: false,
            mirror: false,
            additional_features: None,
            is_defect: false,
            price,
            images: vec![],
        }
    }

    fn item(title: &str, variants: Vec<Variant>) -> CatalogItem {
        let id = Uuid::now_v7();
        CatalogItem {
            id,
            title: title.to_string(),
            image_entry: "entry.png".to_string(),
            image_exit: "exit.png".to_string(),
            variants: variants
                .into_iter()
                .map(|v| Variant { item_id: id, ..v })
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now() - Duration::seconds(1),
        }
    }

    fn titles(page: &CatalogPage) -> Vec<&str> {
        page.items.iter().map(|i| i.title.as_str()).collect()
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria {
            limit: 100,
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn test_min_price_sort_with_limit() {
        let items = vec![
            item("a", vec![variant(500)]),
            item("b", vec![variant(200)]),
            item("c", vec![variant(800)]),
        ];
        let page = query(
            &items,
            &FilterCriteria {
                filter_by_min_price: true,
                offset: 0,
                limit: 2,
                ..FilterCriteria::default()
            },
        )
        .unwrap();

        assert_eq!(page.count, 2);
        let prices: Vec<i64> = page.items.iter().filter_map(|i| i.min_variant_price()).collect();
        assert_eq!(prices, vec![200, 500]);
    }

    #[test]
    fn test_without_defect_drops_item_with_only_defective_variant() {
        let mut defective = variant(100);
        defective.is_defect = true;
        let items = vec![item("broken", vec![defective]), item("fine", vec![variant(300)])];

        let page = query(
            &items,
            &FilterCriteria {
                without_defect: true,
                ..criteria()
            },
        )
        .unwrap();

        assert_eq!(titles(&page), vec!["fine"]);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let items: Vec<_> = (0..5).map(|i| item(&i.to_string(), vec![variant(i)])).collect();
        let page = query(
            &items,
            &FilterCriteria {
                offset: 10,
                limit: 3,
                ..FilterCriteria::default()
            },
        )
        .unwrap();

        assert_eq!(page, CatalogPage::empty());
    }

    #[test]
    fn test_negative_pagination_rejected() {
        let items = vec![item("a", vec![variant(1)])];

        let err = query(&items, &FilterCriteria { offset: -1, ..criteria() }).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));

        let err = query(&items, &FilterCriteria { limit: -1, ..criteria() }).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn test_items_without_variants_never_surface() {
        let items = vec![item("empty", vec![]), item("full", vec![variant(10)])];
        let page = query(&items, &criteria()).unwrap();
        assert_eq!(titles(&page), vec!["full"]);
    }

    #[test]
    fn test_all_sizes_disables_size_stage() {
        let mut odd = variant(10);
        odd.width = 700;
        odd.height = 1900;
        let items = vec![item("odd", vec![odd]), item("std", vec![variant(20)])];

        let with_all = query(
            &items,
            &FilterCriteria {
                all_sizes: true,
                size_800_on_2030: true,
                ..criteria()
            },
        )
        .unwrap();
        assert_eq!(with_all.count, 2);

        let narrowed = query(
            &items,
            &FilterCriteria {
                size_800_on_2030: true,
                ..criteria()
            },
        )
        .unwrap();
        assert_eq!(titles(&narrowed), vec!["std"]);
    }

    #[test]
    fn test_no_checked_size_keeps_everything() {
        let mut odd = variant(10);
        odd.width = 700;
        let items = vec![item("odd", vec![odd]), item("std", vec![variant(20)])];

        let page = query(&items, &criteria()).unwrap();
        assert_eq!(page.count, 2);
    }

    #[test]
    fn test_stages_narrow_variants_not_just_items() {
        let mut mirrored = variant(900);
        mirrored.mirror = true;
        let items = vec![item("mixed", vec![variant(100), mirrored])];

        let page = query(&items, &FilterCriteria { mirror: true, ..criteria() }).unwrap();
        assert_eq!(page.items[0].variants.len(), 1);
        assert_eq!(page.items[0].variants[0].price, 900);
        assert_eq!(items[0].variants.len(), 2);
    }

    #[test]
    fn test_purpose_opening_and_feature_groups_are_or() {
        let mut home_right = variant(1);
        home_right.target = DoorPurpose::Home;
        home_right.opening_direction = true;
        home_right.additional_features = Some(AdditionalFeature::Showcase);
        let mut apartment_left = variant(2);
        apartment_left.additional_features = Some(AdditionalFeature::Outdated);
        let plain = variant(3);

        let items = vec![
            item("home_right", vec![home_right]),
            item("apartment_left", vec![apartment_left]),
            item("plain", vec![plain]),
        ];

        let both_purposes = query(
            &items,
            &FilterCriteria {
                for_apartment: true,
                for_home: true,
                ..criteria()
            },
        )
        .unwrap();
        assert_eq!(both_purposes.count, 3);

        let right_only = query(
            &items,
            &FilterCriteria {
                right_opening: true,
                ..criteria()
            },
        )
        .unwrap();
        assert_eq!(titles(&right_only), vec!["home_right"]);

        let features = query(
            &items,
            &FilterCriteria {
                outdated_model: true,
                showcase_sample: true,
                ..criteria()
            },
        )
        .unwrap();
        assert_eq!(titles(&features), vec!["home_right", "apartment_left"]);
    }

    #[test]
    fn test_min_sort_orders_variants_and_adjacent_items() {
        let items = vec![
            item("x", vec![variant(700), variant(50)]),
            item("y", vec![variant(300)]),
            item("z", vec![variant(90), variant(10_000)]),
        ];

        let page = query(
            &items,
            &FilterCriteria {
                filter_by_min_price: true,
                ..criteria()
            },
        )
        .unwrap();

        assert_eq!(titles(&page), vec!["x", "z", "y"]);
        assert_eq!(page.items[0].variants[0].price, 50);
        for pair in page.items.windows(2) {
            assert!(pair[0].min_variant_price() <= pair[1].min_variant_price());
        }
    }

    #[test]
    fn test_max_sort_is_descending_and_stable() {
        let items = vec![
            item("first", vec![variant(400), variant(100)]),
            item("second", vec![variant(400)]),
            item("top", vec![variant(50), variant(900)]),
        ];

        let page = query(
            &items,
            &FilterCriteria {
                filter_by_max_price: true,
                ..criteria()
            },
        )
        .unwrap();

        assert_eq!(titles(&page), vec!["top", "first", "second"]);
        assert_eq!(page.items[0].variants[0].price, 900);
    }

    #[test]
    fn test_min_sort_keeps_input_order_on_ties() {
        let items = vec![
            item("a", vec![variant(5), variant(9)]),
            item("b", vec![variant(5)]),
            item("c", vec![variant(1)]),
            item("d", vec![variant(5), variant(5)]),
        ];

        let page = query(
            &items,
            &FilterCriteria {
                filter_by_min_price: true,
                ..criteria()
            },
        )
        .unwrap();

        assert_eq!(titles(&page), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_both_sorts_end_ordered_by_max() {
        let items = vec![
            item("cheap_low_max", vec![variant(10), variant(20)]),
            item("pricey_high_max", vec![variant(500), variant(600)]),
        ];

        let page = query(
            &items,
            &FilterCriteria {
                filter_by_min_price: true,
                filter_by_max_price: true,
                ..criteria()
            },
        )
        .unwrap();

        assert_eq!(titles(&page), vec!["pricey_high_max", "cheap_low_max"]);
    }

    #[test]
    fn test_count_matches_window() {
        let items: Vec<_> = (0..7).map(|i| item(&i.to_string(), vec![variant(i)])).collect();

        for (offset, limit, expected) in [(0, 3, 3), (5, 3, 2), (6, 10, 1), (7, 1, 0), (2, 0, 0)] {
            let page = query(
                &items,
                &FilterCriteria {
                    offset,
                    limit,
                    ..FilterCriteria::default()
                },
            )
            .unwrap();
            assert_eq!(page.count, expected, "offset {offset} limit {limit}");
            assert_eq!(page.items.len(), expected);
        }
    }

    #[test]
    fn test_query_is_deterministic() {
        let items = vec![
            item("a", vec![variant(5), variant(5)]),
            item("b", vec![variant(5)]),
            item("c", vec![variant(1)]),
        ];
        let criteria = FilterCriteria {
            filter_by_min_price: true,
            ..criteria()
        };

        assert_eq!(query(&items, &criteria).unwrap(), query(&items, &criteria).unwrap());
    }
}
