use serde_json::{Map, Value};

/// A semi-structured entity as returned by the search API
pub type Record = Map<String, Value>;

/// Suffix that marks hyperlink fields; those never reach a sink
const LINK_SUFFIX: &str = "url";

/// Repository-only field dropped before persistence
const PERMISSIONS: &str = "permissions";

/// Separator used when collapsing the topic list
pub const TOPIC_SEPARATOR: &str = ", ";

/// Integer surrogate key of a record, if it has one
pub fn record_id(record: &Record) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

fn is_link_field(key: &str) -> bool {
    key.ends_with(LINK_SUFFIX)
}

/// Shape an owning account: everything except hyperlink fields
pub fn shape_account(account: &Record) -> Record {
    account
        .iter()
        .filter(|(key, _)| !is_link_field(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Shape a repository for persistence.
///
/// - `owner` becomes the owner's bare id
/// - `license` becomes the license key (null stays null)
/// - `topics` becomes one `", "`-joined string
/// - hyperlink fields and `permissions` are dropped
///
/// Fields that are already in their shaped form pass through untouched, so
/// shaping a shaped record is a no-op. Key order is preserved.
pub fn shape_repository(repository: &Record) -> Record {
    let mut shaped = Record::new();

    for (key, value) in repository {
        if is_link_field(key) || key == PERMISSIONS {
            continue;
        }

        let value = match key.as_str() {
            "owner" => match value {
                Value::Object(owner) => match owner.get("id") {
                    Some(id) => id.clone(),
                    None => continue,
                },
                Value::Null => continue,
                other => other.clone(),
            },
            "license" => match value {
                Value::Object(license) => license.get("key").cloned().unwrap_or(Value::Null),
                other => other.clone(),
            },
            "topics" => match value {
                Value::Array(topics) => Value::String(join_topics(topics)),
                other => other.clone(),
            },
            _ => value.clone(),
        };

        shaped.insert(key.clone(), value);
    }

    shaped
}

fn join_topics(topics: &[Value]) -> String {
    topics
        .iter()
        .map(|topic| match topic {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(TOPIC_SEPARATOR)
}
