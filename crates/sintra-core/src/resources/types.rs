//! Wire types for the resources served by the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A specialized agent as listed in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub role: String,
    pub description: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub preferred_tools: Vec<String>,
    #[serde(default)]
    pub task_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether the task has finished and will not change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "⏳",
            TaskStatus::Running => "⚙️",
            TaskStatus::Completed => "✅",
            TaskStatus::Failed => "❌",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

/// The agent a task was routed to. `id` is `"auto"` when the server picked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAgent {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub emoji: String,
}

/// Entry of the task history (`GET /tasks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    /// ISO-8601 timestamp as sent by the server (usually without offset).
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub agent: Option<TaskAgent>,
}

/// Status of a single task (`GET /tasks/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub task_id: String,
    pub status: TaskStatus,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySize {
    #[serde(default)]
    pub working: u64,
    #[serde(default)]
    pub episodic: u64,
    #[serde(default)]
    pub semantic: u64,
}

impl MemorySize {
    pub fn total(&self) -> u64 {
        self.working + self.episodic + self.semantic
    }
}

/// Core agent status shown in the dashboard header (`GET /agent/status`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub name: String,
    pub model: String,
    pub is_running: bool,
    pub tasks_completed: u64,
    #[serde(default)]
    pub memory_size: MemorySize,
    #[serde(default)]
    pub current_task: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub tasks_stored: u64,
    #[serde(default)]
    pub knowledge_items: u64,
    #[serde(default)]
    pub total_retrievals: u64,
}

/// Memory overview (`GET /memory`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub size: MemorySize,
    #[serde(default)]
    pub stats: MemoryStats,
    #[serde(default)]
    pub recent_memories: Vec<Value>,
}

/// Memory search results (`GET /memory/search`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySearch {
    pub query: String,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub count: u64,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub autonomous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Specialized agent to route to; `None` lets the server choose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.trim().to_string(),
            context: None,
            autonomous: true,
            model: None,
            agent_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCreated {
    pub task_id: String,
    pub status: TaskStatus,
    pub created_at: String,
}

/// Body of `POST /think`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ThinkRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.trim().to_string(),
            context: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub prompt: String,
    pub response: String,
}

/// Reply of `DELETE /tasks/{id}` and `POST /agent/reset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_roundtrip_strings() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<TaskStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_create_task_request_omits_unset_fields() {
        let mut request = CreateTaskRequest::new("  Optimise ma page produit  ");
        request.agent_id = Some("seomi".to_string());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "description": "Optimise ma page produit",
                "autonomous": true,
                "agent_id": "seomi"
            })
        );
    }

    #[test]
    fn test_task_accepts_server_shape() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "task_1_20240105101500",
            "description": "Crée 5 posts Instagram",
            "context": null,
            "status": "pending",
            "created_at": "2024-01-05T10:15:00.123456",
            "updated_at": "2024-01-05T10:15:00.123456",
            "agent": {"id": "auto", "name": "Soshie", "emoji": "📱"}
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.agent.unwrap().id.as_deref(), Some("auto"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_think_request_trims_prompt() {
        let json = serde_json::to_value(ThinkRequest::new("  Pourquoi le SEO ?  ")).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "Pourquoi le SEO ?"}));
    }

    #[test]
    fn test_memory_size_total() {
        let size = MemorySize {
            working: 2,
            episodic: 3,
            semantic: 4,
        };
        assert_eq!(size.total(), 9);
    }
}
