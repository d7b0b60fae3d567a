//! JSON snapshot document parser.
//!
//! The document is read leniently: each group, user and application entry
//! is walked on its own, and an entry with the wrong shape is skipped with
//! a warning instead of failing the whole load. Field names match in any
//! ASCII case, and when an entry repeats a field under several spellings
//! the first accepted spelling wins.

use crate::error::{ParseErrorKind, PermViewError, Result};
use crate::model::{is_reserved_key, AppPermission, GrantFlag, Group, Snapshot, User};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Accepted spellings per field, in precedence order. Matching ignores
/// ASCII case, so `Name` and `name` are the same spelling.
const GROUP_NAME: &[&str] = &["name", "groupName"];
const GROUP_DOMAIN: &[&str] = &["domainName", "domain"];
const GROUP_SID: &[&str] = &["secureId", "sid"];
const USER_ID: &[&str] = &["samAccountName", "identifier"];

type EntryResult<T> = std::result::Result<T, String>;

/// Parse a snapshot document from a string.
///
/// Fails only when the text is not JSON or the root is not an object;
/// everything below the root degrades to omission.
pub fn parse_snapshot_str(content: &str) -> Result<Snapshot> {
    let root: Value = serde_json::from_str(content)?;
    parse_snapshot_value(root)
}

/// Parse a snapshot from an already-decoded JSON value.
pub fn parse_snapshot_value(root: Value) -> Result<Snapshot> {
    let kind = json_kind(&root);
    let Value::Object(mut root) = root else {
        return Err(PermViewError::parse(
            "document root",
            ParseErrorKind::UnexpectedRoot(kind.to_string()),
        ));
    };

    let data_updated = take_key(&mut root, "DataUpdated").and_then(|v| parse_timestamp(&v));

    let groups = match take_key(&mut root, "groups") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| parse_group(idx, entry))
            .collect(),
        Some(other) => {
            tracing::warn!("'groups' is {}, expected an array; loading no groups", json_kind(&other));
            Vec::new()
        }
    };

    let snapshot = Snapshot {
        data_updated,
        groups,
    };
    tracing::info!(
        groups = snapshot.groups.len(),
        memberships = snapshot.membership_count(),
        "snapshot parsed"
    );
    Ok(snapshot)
}

fn parse_group(idx: usize, entry: Value) -> Option<Group> {
    read_group(entry)
        .map_err(|reason| tracing::warn!("Skipping malformed group #{idx}: {reason}"))
        .ok()
}

fn read_group(entry: Value) -> EntryResult<Group> {
    let mut fields = into_object(entry)?;
    let name = text_field(&mut fields, GROUP_NAME)?.unwrap_or_default();

    let users = list_field(&mut fields, "users")?
        .into_iter()
        .enumerate()
        .filter_map(|(pos, v)| parse_user(&name, pos, v))
        .collect();
    let app_permissions = list_field(&mut fields, "appPermissions")?
        .into_iter()
        .enumerate()
        .filter_map(|(pos, v)| parse_app(&name, pos, v))
        .collect();

    Ok(Group {
        domain: text_field(&mut fields, GROUP_DOMAIN)?.unwrap_or_default(),
        description: text_field(&mut fields, &["description"])?.unwrap_or_default(),
        sid: text_field(&mut fields, GROUP_SID)?.unwrap_or_default(),
        sam_account_name: text_field(&mut fields, &["samAccountName"])?,
        name,
        users,
        app_permissions,
    })
}

fn parse_user(group: &str, pos: usize, entry: Value) -> Option<User> {
    read_user(entry)
        .map_err(|reason| {
            tracing::warn!("Skipping malformed user #{pos} in group '{group}': {reason}");
        })
        .ok()
}

fn read_user(entry: Value) -> EntryResult<User> {
    let mut fields = into_object(entry)?;
    Ok(User {
        identifier: text_field(&mut fields, USER_ID)?.unwrap_or_default(),
        name: text_field(&mut fields, &["name"])?.unwrap_or_default(),
        email: text_field(&mut fields, &["email"])?.unwrap_or_default(),
        department: text_field(&mut fields, &["department"])?.unwrap_or_default(),
        title: text_field(&mut fields, &["title"])?.unwrap_or_default(),
        manager: take_field(&mut fields, &["manager"]),
    })
}

fn parse_app(group: &str, pos: usize, entry: Value) -> Option<AppPermission> {
    let kind = json_kind(&entry);
    let Value::Object(fields) = entry else {
        tracing::warn!(
            "Skipping application entry #{pos} in group '{group}': expected an object, found {kind}"
        );
        return None;
    };

    let mut app = AppPermission::default();
    let mut flags = IndexMap::new();
    for (key, value) in fields {
        if key.eq_ignore_ascii_case("appName") {
            app.app_name = scalar_text(&value).unwrap_or_default();
        } else if key.eq_ignore_ascii_case("appId") {
            app.app_id = scalar_text(&value);
        } else if is_reserved_key(&key) {
            continue;
        } else {
            flags.insert(key, GrantFlag::from_json(&value));
        }
    }
    app.flags = flags;
    Some(app)
}

/// Remove a key from an object, matching case-insensitively.
fn take_key(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    if let Some(v) = map.remove(key) {
        return Some(v);
    }
    let actual = map.keys().find(|k| k.eq_ignore_ascii_case(key))?.clone();
    map.remove(&actual)
}

/// Remove every spelling of a field and keep the first non-null value.
///
/// Spellings are tried in order, so an entry carrying both
/// `samAccountName` and `identifier` resolves to the former.
fn take_field(map: &mut Map<String, Value>, spellings: &[&str]) -> Option<Value> {
    let mut found = None;
    for spelling in spellings {
        while let Some(value) = take_key(map, spelling) {
            if found.is_none() && !value.is_null() {
                found = Some(value);
            }
        }
    }
    found
}

fn text_field(map: &mut Map<String, Value>, spellings: &[&str]) -> EntryResult<Option<String>> {
    match take_field(map, spellings) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(format!(
            "'{}' is {}, expected a string",
            spellings[0],
            json_kind(&other)
        )),
    }
}

fn list_field(map: &mut Map<String, Value>, key: &str) -> EntryResult<Vec<Value>> {
    match take_field(map, &[key]) {
        None => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries),
        Some(other) => Err(format!("'{key}' is {}, expected an array", json_kind(&other))),
    }
}

fn into_object(entry: Value) -> EntryResult<Map<String, Value>> {
    match entry {
        Value::Object(fields) => Ok(fields),
        other => Err(format!("expected an object, found {}", json_kind(&other))),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    let Value::String(text) = value else {
        if !value.is_null() {
            tracing::warn!("Ignoring non-string DataUpdated value");
        }
        return None;
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(text.trim()) {
        return Some(ts);
    }
    match NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc().fixed_offset()),
        Err(e) => {
            tracing::warn!("Ignoring unparseable DataUpdated '{text}': {e}");
            None
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TELLERS: &str = r#"{
        "DataUpdated": "2024-03-01T08:30:00+00:00",
        "groups": [
            {
                "name": "Tellers",
                "domainName": "BANK",
                "description": "Front desk",
                "secureId": "S-1-5-21-1",
                "users": [
                    {"samAccountName": "T001", "name": "Tina Teller", "email": "tina@bank", "department": "Retail", "title": "Teller"}
                ],
                "appPermissions": [
                    {"appName": "Teller App", "appId": "TA", "userId": "x", "permPrint": "1", "permOCR": "0"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_basic_document() {
        let snapshot = parse_snapshot_str(TELLERS).unwrap();

        assert!(snapshot.data_updated.is_some());
        assert_eq!(snapshot.groups.len(), 1);

        let group = &snapshot.groups[0];
        assert_eq!(group.name, "Tellers");
        assert_eq!(group.domain, "BANK");
        assert_eq!(group.sid, "S-1-5-21-1");
        assert_eq!(group.users[0].identifier, "T001");

        let app = &group.app_permissions[0];
        assert_eq!(app.app_name, "Teller App");
        assert_eq!(app.app_id.as_deref(), Some("TA"));
        let codes: Vec<_> = app.flags.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["permPrint", "permOCR"]);
        assert_eq!(app.flags["permPrint"], GrantFlag::Granted);
        assert_eq!(app.flags["permOCR"], GrantFlag::Revoked);
    }

    #[test]
    fn test_identifier_alias() {
        let doc = r#"{"groups": [{"name": "G", "users": [{"identifier": "jadmin"}]}]}"#;
        let snapshot = parse_snapshot_str(doc).unwrap();
        assert_eq!(snapshot.groups[0].users[0].identifier, "jadmin");
    }

    #[test]
    fn test_repeated_spellings_keep_the_entry() {
        let doc = r#"{"groups": [{
            "name": "Tellers", "Name": "Tellers",
            "domainName": "BANK", "DomainName": "BANK",
            "users": [
                {"identifier": "T001", "samAccountName": "T001", "name": "Tina Teller"},
                {"identifier": "ignored", "SamAccountName": "T002"},
                {"samAccountName": null, "identifier": "T003"}
            ]
        }]}"#;
        let snapshot = parse_snapshot_str(doc).unwrap();

        assert_eq!(snapshot.groups.len(), 1);
        let group = &snapshot.groups[0];
        assert_eq!(group.name, "Tellers");
        assert_eq!(group.domain, "BANK");
        let ids: Vec<&str> = group.users.iter().map(|u| u.identifier.as_str()).collect();
        assert_eq!(ids, vec!["T001", "T002", "T003"]);
    }

    #[test]
    fn test_non_perm_prefixed_keys_are_codes() {
        let doc = r#"{"groups": [{"name": "G", "appPermissions": [
            {"appName": "A", "canExport": "1", "flagNull": null, "flagYes": "yes"}
        ]}]}"#;
        let snapshot = parse_snapshot_str(doc).unwrap();
        let app = &snapshot.groups[0].app_permissions[0];

        assert_eq!(app.flags["canExport"], GrantFlag::Granted);
        assert_eq!(app.flags["flagNull"], GrantFlag::Invalid);
        assert_eq!(app.flags["flagYes"], GrantFlag::Invalid);
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let doc = r#"{"groups": [
            "not a group",
            {"name": 42},
            {"name": "Good",
             "users": [17, {"samAccountName": "u1", "name": "One"}, {"name": ["bad"]}],
             "appPermissions": [null, {"appName": "App"}]}
        ]}"#;
        let snapshot = parse_snapshot_str(doc).unwrap();

        assert_eq!(snapshot.groups.len(), 1);
        let group = &snapshot.groups[0];
        assert_eq!(group.users.len(), 1);
        assert_eq!(group.app_permissions.len(), 1);
    }

    #[test]
    fn test_absent_lists_are_empty() {
        let snapshot = parse_snapshot_str(r#"{"groups": [{"name": "Lonely", "users": null}]}"#)
            .unwrap();
        assert!(snapshot.groups[0].users.is_empty());
        assert!(snapshot.groups[0].app_permissions.is_empty());

        let empty = parse_snapshot_str("{}").unwrap();
        assert!(empty.groups.is_empty());
        assert!(empty.data_updated.is_none());
    }

    #[test]
    fn test_root_must_be_object() {
        let err = parse_snapshot_str("[1, 2]").unwrap_err();
        assert!(matches!(
            err,
            PermViewError::Parse {
                source: ParseErrorKind::UnexpectedRoot(_),
                ..
            }
        ));
        assert!(parse_snapshot_str("not json").is_err());
    }

    #[test]
    fn test_naive_timestamp_accepted() {
        let snapshot =
            parse_snapshot_str(r#"{"DataUpdated": "2024-03-01T08:30:00", "groups": []}"#).unwrap();
        assert!(snapshot.data_updated.is_some());

        let bad = parse_snapshot_str(r#"{"DataUpdated": "yesterday", "groups": []}"#).unwrap();
        assert!(bad.data_updated.is_none());
    }
}
