//! Response parsing.
//!
//! The delta response looks like:
//!
//! ```json
//! {
//!   "@delta.token": "aTE09NjM1...",
//!   "@odata.nextLink": "https://.../view.delta?token=...",
//!   "value": [
//!     {
//!       "id": "A",
//!       "name": "doc.txt",
//!       "lastModifiedDateTime": "2020-01-01T00:00:00Z",
//!       "parentReference": { "id": "F" },
//!       "file": {}
//!     }
//!   ]
//! }
//! ```
//!
//! `folder` and `deleted` facets are detected by presence. Each entry of
//! `value` is validated on its own; a bad entry is reported in
//! [`DeltaPage::rejected`] and does not affect its neighbours.

use crate::delta::{DeltaItem, DeltaPage, ItemError};
use crate::error::{ProtocolError, ProtocolResult};
use crate::time::utc_to_display_time;
use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Deserialize)]
struct RawDeltaResponse {
    #[serde(rename = "@delta.token")]
    delta_token: Option<String>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
    #[serde(default)]
    value: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "lastModifiedDateTime")]
    last_modified: Option<String>,
    folder: Option<Value>,
    deleted: Option<Value>,
    #[serde(rename = "parentReference")]
    parent_reference: Option<RawParentReference>,
}

#[derive(Debug, Deserialize)]
struct RawParentReference {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDriveItem {
    id: Option<String>,
}

/// Parses a delta response body, converting timestamps to local time.
///
/// # Errors
///
/// Returns an error if the body is not a JSON object or lacks `@delta.token`.
/// Individual malformed records do not fail the page.
pub fn parse_delta_page(body: &[u8]) -> ProtocolResult<DeltaPage> {
    parse_delta_page_in(body, &Local)
}

/// Parses a delta response body, converting timestamps into `tz`.
///
/// # Errors
///
/// Returns an error if the body is not a JSON object or lacks `@delta.token`.
pub fn parse_delta_page_in<Tz>(body: &[u8], tz: &Tz) -> ProtocolResult<DeltaPage>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw: RawDeltaResponse =
        serde_json::from_slice(body).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    let next_token = raw
        .delta_token
        .ok_or(ProtocolError::MissingField("@delta.token"))?;

    let mut page = DeltaPage {
        next_token,
        items: Vec::with_capacity(raw.value.len()),
        rejected: Vec::new(),
        has_more: raw.next_link.is_some(),
    };

    for (index, value) in raw.value.into_iter().enumerate() {
        match parse_item(value, tz) {
            Ok(item) => page.items.push(item),
            Err((file_id, reason)) => {
                tracing::warn!(index, ?file_id, %reason, "rejecting delta record");
                page.rejected.push(ItemError {
                    index,
                    file_id,
                    reason,
                });
            }
        }
    }

    Ok(page)
}

fn parse_item<Tz>(value: Value, tz: &Tz) -> Result<DeltaItem, (Option<String>, ProtocolError)>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw: RawItem = serde_json::from_value(value)
        .map_err(|e| (None, ProtocolError::InvalidJson(e.to_string())))?;

    let file_id = raw.id.ok_or((None, ProtocolError::MissingField("id")))?;
    let is_delete = raw.deleted.is_some();

    // Tombstones are only matched by id; their timestamp is never displayed.
    let last_modified = match raw.last_modified {
        Some(ts) => utc_to_display_time(&ts, tz).map_err(|e| (Some(file_id.clone()), e))?,
        None if is_delete => String::new(),
        None => {
            return Err((
                Some(file_id),
                ProtocolError::MissingField("lastModifiedDateTime"),
            ))
        }
    };

    Ok(DeltaItem {
        file_id,
        file_name: raw.name,
        parent_id: raw.parent_reference.and_then(|p| p.id),
        is_folder: raw.folder.is_some(),
        is_delete,
        last_modified,
    })
}

/// Parses the app-folder lookup response and returns the folder's ID.
///
/// # Errors
///
/// Returns an error if the body is not JSON or has no `id`.
pub fn parse_folder_id(body: &[u8]) -> ProtocolResult<String> {
    let raw: RawDriveItem =
        serde_json::from_slice(body).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;
    raw.id.ok_or(ProtocolError::MissingField("id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use serde_json::json;

    fn parse(body: Value) -> ProtocolResult<DeltaPage> {
        parse_delta_page_in(body.to_string().as_bytes(), &Utc)
    }

    #[test]
    fn parses_file_folder_and_delete() {
        let page = parse(json!({
            "@delta.token": "T1",
            "value": [
                {
                    "id": "A",
                    "name": "doc.txt",
                    "lastModifiedDateTime": "2020-01-01T00:00:00Z",
                    "parentReference": { "id": "F", "path": "/drive/root:/Apps/OneAPI" },
                    "file": { "mimeType": "text/plain" }
                },
                {
                    "id": "B",
                    "name": "Photos",
                    "lastModifiedDateTime": "2020-01-02T10:30:00Z",
                    "parentReference": { "id": "F" },
                    "folder": { "childCount": 0 }
                },
                {
                    "id": "C",
                    "lastModifiedDateTime": "2020-01-03T00:00:00Z",
                    "parentReference": { "id": "F" },
                    "deleted": {}
                }
            ]
        }))
        .unwrap();

        assert_eq!(page.next_token, "T1");
        assert!(!page.has_more);
        assert!(page.rejected.is_empty());
        assert_eq!(
            page.items,
            vec![
                DeltaItem::file("A", "doc.txt", "F", "2020-01-01 00:00:00"),
                DeltaItem::folder("B", "Photos", "F", "2020-01-02 10:30:00"),
                DeltaItem::deleted("C", "F", "2020-01-03 00:00:00"),
            ]
        );
    }

    #[test]
    fn root_item_has_no_parent() {
        let page = parse(json!({
            "@delta.token": "T1",
            "value": [
                { "id": "root", "name": "root", "lastModifiedDateTime": "2020-01-01T00:00:00Z", "folder": {} }
            ]
        }))
        .unwrap();
        assert_eq!(page.items[0].parent_id, None);
    }

    #[test]
    fn next_link_sets_has_more() {
        let page = parse(json!({
            "@delta.token": "T2",
            "@odata.nextLink": "https://api.example.com/drive/root/view.delta?token=T2",
            "value": []
        }))
        .unwrap();
        assert!(page.has_more);
        assert!(page.items.is_empty());
    }

    #[test]
    fn missing_value_is_empty_page() {
        let page = parse(json!({ "@delta.token": "T3" })).unwrap();
        assert_eq!(page, DeltaPage::new("T3", vec![]));
    }

    #[test]
    fn missing_token_fails_page() {
        let err = parse(json!({ "value": [] })).unwrap_err();
        assert_eq!(err, ProtocolError::MissingField("@delta.token"));
    }

    #[test]
    fn invalid_json_fails_page() {
        let err = parse_delta_page(b"<html>").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));

        let err = parse_delta_page(b"[1, 2]").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn bad_records_are_isolated() {
        let page = parse(json!({
            "@delta.token": "T1",
            "value": [
                { "name": "no-id.txt", "lastModifiedDateTime": "2020-01-01T00:00:00Z" },
                { "id": "B", "name": "no-time.txt", "parentReference": { "id": "F" } },
                { "id": "C", "name": "bad-time.txt", "lastModifiedDateTime": "soon", "parentReference": { "id": "F" } },
                "not an object",
                { "id": "D", "name": "ok.txt", "lastModifiedDateTime": "2020-01-01T00:00:00Z", "parentReference": { "id": "F" } }
            ]
        }))
        .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].file_id, "D");

        let reasons: Vec<_> = page
            .rejected
            .iter()
            .map(|r| (r.index, r.file_id.clone(), r.reason.clone()))
            .collect();
        assert_eq!(reasons[0], (0, None, ProtocolError::MissingField("id")));
        assert_eq!(
            reasons[1],
            (
                1,
                Some("B".into()),
                ProtocolError::MissingField("lastModifiedDateTime")
            )
        );
        assert_eq!(
            reasons[2],
            (
                2,
                Some("C".into()),
                ProtocolError::InvalidTimestamp("soon".into())
            )
        );
        assert_eq!(reasons[3].0, 3);
        assert!(matches!(reasons[3].2, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn tombstone_without_timestamp_is_accepted() {
        let page = parse(json!({
            "@delta.token": "T1",
            "value": [ { "id": "A", "parentReference": { "id": "F" }, "deleted": { "state": "deleted" } } ]
        }))
        .unwrap();
        assert_eq!(page.items, vec![DeltaItem::deleted("A", "F", "")]);
    }

    #[test]
    fn nameless_update_is_passed_through() {
        // Name validation belongs to the reconciler, which knows whether the
        // record is in scope.
        let page = parse(json!({
            "@delta.token": "T1",
            "value": [ { "id": "A", "lastModifiedDateTime": "2020-01-01T00:00:00Z", "parentReference": { "id": "F" } } ]
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].file_name.is_none());
    }

    #[test]
    fn folder_id() {
        assert_eq!(
            parse_folder_id(br#"{"id": "F!123", "name": "OneAPI"}"#).unwrap(),
            "F!123"
        );
        assert_eq!(
            parse_folder_id(br#"{"name": "OneAPI"}"#),
            Err(ProtocolError::MissingField("id"))
        );
        assert!(matches!(
            parse_folder_id(b""),
            Err(ProtocolError::InvalidJson(_))
        ));
    }

    proptest! {
        #[test]
        fn parse_never_panics(body in prop::collection::vec(any::<u8>(), 0..512)) {
            let _ = parse_delta_page_in(&body, &Utc);
        }

        #[test]
        fn parse_keeps_every_record_accounted(
            names in prop::collection::vec(prop::option::of("[a-z]{1,8}"), 0..10)
        ) {
            let value: Vec<Value> = names
                .iter()
                .enumerate()
                .map(|(i, name)| json!({
                    "id": format!("I{}", i),
                    "name": name,
                    "lastModifiedDateTime": "2016-03-01T10:00:00Z",
                    "parentReference": {"id": "F"}
                }))
                .collect();
            let page = parse(json!({"@delta.token": "T", "value": value})).unwrap();
            prop_assert_eq!(page.items.len() + page.rejected.len(), names.len());
        }
    }
}
