//! Typed resources and the schema checks applied to raw responses.
//!
//! Collection endpoints wrap their items in an object under a named field
//! (`{"agents": [...], "count": 3}`); single resources are the object itself.
//! Anything else is rejected as [`ApiError::Schema`] so that a malformed body
//! never reaches a view.

pub mod ordering;
pub mod types;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiError;

pub use ordering::{AGENT_PREVIEW_LIMIT, parse_timestamp, sort_newest_first, visible_agents};
pub use types::{
    Acknowledgement, Agent, AgentStatus, CreateTaskRequest, MemorySearch, MemorySize,
    MemorySnapshot, MemoryStats, Task, TaskAgent, TaskCreated, TaskDetail, TaskStatus,
    ThinkRequest, ThinkResponse,
};

/// A value that can be validated out of a raw JSON response.
///
/// Parsing is pure: the same payload always yields an equal value.
pub trait Resource: Sized + Clone + Send + Sync + 'static {
    fn parse(raw: Value) -> Result<Self, ApiError>;
}

/// Extract and validate the array stored under `field`.
///
/// An empty array is a valid, empty collection. A missing field, a non-array
/// field, or any invalid item fails the whole collection.
pub fn parse_collection<T: DeserializeOwned>(raw: Value, field: &str) -> Result<Vec<T>, ApiError> {
    let mut map = match raw {
        Value::Object(map) => map,
        other => {
            return Err(ApiError::Schema {
                message: format!(
                    "expected an object with a '{}' array, got {}",
                    field,
                    value_kind(&other)
                ),
            });
        }
    };

    match map.remove(field) {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| ApiError::Schema {
                    message: format!("{}[{}]: {}", field, index, e),
                })
            })
            .collect(),
        Some(other) => Err(ApiError::Schema {
            message: format!("'{}' is {}, expected an array", field, value_kind(&other)),
        }),
        None => Err(ApiError::Schema {
            message: format!("missing '{}' field", field),
        }),
    }
}

/// Validate a single-object resource.
pub fn parse_object<T: DeserializeOwned>(raw: Value) -> Result<T, ApiError> {
    if !raw.is_object() {
        return Err(ApiError::Schema {
            message: format!("expected an object, got {}", value_kind(&raw)),
        });
    }
    serde_json::from_value(raw).map_err(|e| ApiError::Schema {
        message: e.to_string(),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Resource for Value {
    fn parse(raw: Value) -> Result<Self, ApiError> {
        Ok(raw)
    }
}

impl Resource for Vec<Agent> {
    fn parse(raw: Value) -> Result<Self, ApiError> {
        parse_collection(raw, "agents")
    }
}

impl Resource for Vec<Task> {
    fn parse(raw: Value) -> Result<Self, ApiError> {
        parse_collection(raw, "tasks")
    }
}

impl Resource for MemorySnapshot {
    /// The memory endpoint answers `200 {"error": "..."}` when no agent is
    /// active; that is a failure, not an empty snapshot.
    fn parse(raw: Value) -> Result<Self, ApiError> {
        if raw.get("size").is_none()
            && let Some(message) = raw.get("error").and_then(|e| e.as_str())
        {
            return Err(ApiError::Server {
                message: message.to_string(),
            });
        }
        parse_object(raw)
    }
}

macro_rules! object_resource {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Resource for $ty {
                fn parse(raw: Value) -> Result<Self, ApiError> {
                    parse_object(raw)
                }
            }
        )*
    };
}

object_resource!(
    Agent,
    TaskDetail,
    AgentStatus,
    MemorySearch,
    TaskCreated,
    ThinkResponse,
    Acknowledgement,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent_json(id: &str) -> Value {
        json!({
            "id": id,
            "name": id.to_uppercase(),
            "emoji": "🤖",
            "role": "Specialist",
            "description": "Does things",
            "specialties": ["one"],
            "personality_traits": ["calm"],
            "preferred_tools": ["web_search"],
            "task_count": 0
        })
    }

    #[test]
    fn test_collection_extracts_named_field() {
        let raw = json!({"agents": [agent_json("soshie"), agent_json("penn")], "count": 2});
        let agents = Vec::<Agent>::parse(raw).unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[1].id, "penn");
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let tasks = Vec::<Task>::parse(json!({"tasks": [], "count": 0})).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_collection_rejects_missing_or_wrong_field() {
        let err = Vec::<Agent>::parse(json!({"count": 0})).unwrap_err();
        assert_eq!(
            err,
            ApiError::Schema {
                message: "missing 'agents' field".to_string()
            }
        );

        let err = Vec::<Agent>::parse(json!({"agents": null})).unwrap_err();
        assert!(err.to_string().contains("'agents' is null"));

        let err = Vec::<Agent>::parse(json!([agent_json("a")])).unwrap_err();
        assert!(err.to_string().contains("got an array"));
    }

    #[test]
    fn test_collection_rejects_invalid_item() {
        let raw = json!({"agents": [agent_json("ok"), {"id": "broken"}]});
        let err = Vec::<Agent>::parse(raw).unwrap_err();
        assert!(err.to_string().contains("agents[1]"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = json!({"agents": [agent_json("dexter")], "count": 1});
        let first = Vec::<Agent>::parse(raw.clone()).unwrap();
        let second = Vec::<Agent>::parse(raw.clone()).unwrap();
        assert_eq!(first, second);
        assert_eq!(raw["count"], 1);
    }

    #[test]
    fn test_memory_snapshot_error_shape() {
        let err = MemorySnapshot::parse(json!({"error": "Aucun agent actif"})).unwrap_err();
        assert_eq!(err.user_message(), "Aucun agent actif");

        let snapshot = MemorySnapshot::parse(json!({
            "size": {"working": 1, "episodic": 2, "semantic": 0},
            "stats": {"tasks_stored": 2, "knowledge_items": 1, "total_retrievals": 4},
            "recent_memories": [{"id": "m1"}]
        }))
        .unwrap();
        assert_eq!(snapshot.size.total(), 3);
        assert_eq!(snapshot.stats.total_retrievals, 4);
    }

    #[test]
    fn test_object_rejects_non_object() {
        let err = AgentStatus::parse(json!("ok")).unwrap_err();
        assert!(err.to_string().contains("expected an object, got a string"));
    }
}
