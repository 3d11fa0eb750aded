//! Normalization of registry payloads into domain records
//!
//! [`resolve_items`] is the single place where the item-or-array ambiguity is
//! resolved. Everything else works on plain vectors.

use super::models::{scalar_text, Items, RawImage, RawIntro, RawPlace, ResponseBody};
use crate::domain::{OperatingInfo, PlacePage, PoiId, PoiImage, PointOfInterest};
use std::collections::BTreeMap;

/// Flattens the `items.item` slot into a list
///
/// Absent yields an empty list, a single object a one-element list and an
/// array is used as-is with `null` slots dropped.
pub fn resolve_items<T>(items: Items<T>) -> Vec<T> {
    match items {
        Items::Absent => Vec::new(),
        Items::Single(item) => vec![item],
        Items::Many(slots) => slots.into_iter().flatten().collect(),
    }
}

/// Normalizes a list body into domain records
///
/// Records without a usable id are dropped.
pub fn normalize(items: Items<RawPlace>) -> Vec<PointOfInterest> {
    resolve_items(items)
        .into_iter()
        .filter_map(normalize_place)
        .collect()
}

/// Normalizes a list body together with its paging metadata
///
/// `requested_page` and `requested_size` fill in metadata the registry left out.
/// A missing `totalCount` is reported as 0; the size of one page is never a
/// stand-in for the total.
pub fn normalize_page(
    body: ResponseBody<RawPlace>,
    requested_page: u32,
    requested_size: u32,
) -> PlacePage {
    let records = normalize(body.items);
    let total_count = body.total_count.unwrap_or(0);

    PlacePage {
        records,
        total_count,
        page_number: body
            .page_no
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(requested_page),
        page_size: body
            .num_of_rows
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(requested_size),
    }
}

/// Converts a single raw record; `None` if it has no id
pub fn normalize_place(raw: RawPlace) -> Option<PointOfInterest> {
    let id = PoiId::new(raw.contentid?).ok()?;

    let mut place = PointOfInterest::new(id, raw.title.unwrap_or_default());
    if let Some(category) = raw.contenttypeid {
        place = place.with_category(category);
    }
    match (raw.addr1, raw.addr2) {
        (Some(primary), secondary) => place = place.with_address(primary, secondary),
        (None, Some(secondary)) => place = place.with_address(secondary, None),
        (None, None) => {}
    }
    if let (Some(x), Some(y)) = (raw.mapx, raw.mapy) {
        place = place.with_raw_coordinates(x, y);
    }
    place.images = [raw.firstimage, raw.firstimage2]
        .into_iter()
        .flatten()
        .fold(Vec::new(), |mut images, url| {
            if !images.contains(&url) {
                images.push(url);
            }
            images
        });
    place.phone = raw.tel;
    place.last_modified = raw.modifiedtime;
    place.overview = raw.overview;

    Some(place)
}

/// Converts a `detailIntro` record
///
/// Blank values are dropped; the id and category keys become struct fields.
pub fn normalize_intro(raw: RawIntro, requested_category: &str) -> Option<OperatingInfo> {
    let mut fields: BTreeMap<String, String> = raw
        .fields
        .iter()
        .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
        .collect();

    let id = PoiId::new(fields.remove("contentid")?).ok()?;
    let category_id = fields
        .remove("contenttypeid")
        .unwrap_or_else(|| requested_category.to_string());

    Some(OperatingInfo {
        id,
        category_id,
        fields,
    })
}

/// Converts a `detailImage` record; `None` without an origin URL
pub fn normalize_image(raw: RawImage) -> Option<PoiImage> {
    Some(PoiImage {
        origin_url: raw.originimgurl?,
        thumbnail_url: raw.smallimageurl,
        name: raw.imgname,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawPlace {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_items_normalize_to_empty() {
        assert!(normalize(Items::Absent).is_empty());
    }

    #[test]
    fn test_single_and_one_element_array_are_identical() {
        let record = raw(json!({
            "contentid": "126508",
            "contenttypeid": "12",
            "title": "경복궁",
            "addr1": "서울특별시 종로구 사직로 161",
            "mapx": "1269770162",
            "mapy": "375788407",
            "firstimage": "http://tong.visitkorea.or.kr/a.jpg",
            "modifiedtime": "20240301000000"
        }));

        let single = normalize(Items::Single(record.clone()));
        let many = normalize(Items::Many(vec![Some(record)]));
        assert_eq!(single, many);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let items = Items::Many(vec![
            Some(raw(json!({"contentid": "1", "title": "A"}))),
            Some(raw(json!({"contentid": "  ", "title": "blank id"}))),
            Some(raw(json!({"title": "no id"}))),
            None,
        ]);
        let records = normalize(items);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "1");
    }

    #[test]
    fn test_place_fields() {
        let place = normalize_place(raw(json!({
            "contentid": "2733967",
            "contenttypeid": "39",
            "title": "광장시장",
            "addr1": "서울특별시 종로구 창경궁로 88",
            "addr2": "(예지동)",
            "mapx": 1269996000,
            "mapy": 375700000,
            "firstimage": "http://img/1.jpg",
            "firstimage2": "http://img/1.jpg",
            "tel": "02-2267-0291"
        })))
        .unwrap();

        assert_eq!(place.category_id, "39");
        assert_eq!(place.address.secondary.as_deref(), Some("(예지동)"));
        assert_eq!(place.images, vec!["http://img/1.jpg".to_string()]);
        assert_eq!(place.phone.as_deref(), Some("02-2267-0291"));
        let coords = place.coordinates.unwrap();
        assert_eq!(coords.raw_x, 1_269_996_000);
        assert_eq!(coords.lat, 37.57);
        assert!(place.last_modified.is_none());
    }

    #[test]
    fn test_missing_coordinate_half_means_no_coordinates() {
        let place = normalize_place(raw(json!({"contentid": "1", "mapx": "1270000000"}))).unwrap();
        assert!(place.coordinates.is_none());
    }

    #[test]
    fn test_page_metadata_comes_from_body() {
        let body: ResponseBody<RawPlace> = serde_json::from_value(json!({
            "items": {"item": {"contentid": "1", "title": "A"}},
            "totalCount": 45,
            "pageNo": 3,
            "numOfRows": 21
        }))
        .unwrap();

        let page = normalize_page(body, 1, 12);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total_count, 45);
        assert_eq!(page.page_number, 3);
        assert_eq!(page.page_size, 21);
    }

    #[test]
    fn test_missing_total_count_is_not_the_page_length() {
        let body: ResponseBody<RawPlace> = serde_json::from_value(json!({
            "items": {"item": [
                {"contentid": "1", "title": "A"},
                {"contentid": "2", "title": "B"}
            ]}
        }))
        .unwrap();

        let page = normalize_page(body, 2, 12);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, 12);
    }

    #[test]
    fn test_intro_fields() {
        let intro: RawIntro = serde_json::from_value(json!({
            "contentid": "126508",
            "contenttypeid": "12",
            "usetime": "09:00~18:00",
            "restdate": "화요일",
            "parking": ""
        }))
        .unwrap();

        let info = normalize_intro(intro, "12").unwrap();
        assert_eq!(info.id.as_str(), "126508");
        assert_eq!(info.opening_hours(), Some("09:00~18:00"));
        assert_eq!(info.parking(), None);
        assert!(!info.fields.contains_key("contentid"));
    }

    #[test]
    fn test_image_requires_origin_url() {
        assert!(normalize_image(RawImage::default()).is_none());
        let image = normalize_image(RawImage {
            originimgurl: Some("http://img/o.jpg".to_string()),
            smallimageurl: None,
            imgname: Some("정면".to_string()),
        })
        .unwrap();
        assert_eq!(image.origin_url, "http://img/o.jpg");
    }
}
