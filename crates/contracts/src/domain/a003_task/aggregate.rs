use serde::{Deserialize, Serialize};

/// Kind of task tracked for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Requirement,
    Complaint,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Requirement => "requirement",
            TaskType::Complaint => "complaint",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "requirement" => Some(TaskType::Requirement),
            "complaint" => Some(TaskType::Complaint),
            _ => None,
        }
    }
}

/// Workflow status; the backend stores the display strings verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    Assigned,
    #[serde(rename = "Work In Progress")]
    WorkInProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Assigned,
        TaskStatus::WorkInProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Assigned => "Assigned",
            TaskStatus::WorkInProgress => "Work In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Payload for `POST /task/create` and `PUT /task/updateTask`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpsert {
    pub task_title: String,
    pub task_description: String,
    pub due_date: String,
    pub assignment_date: String,
    pub status: TaskStatus,
    pub priority: String,
    pub task_type: TaskType,
    pub store_id: i64,
    pub assigned_to_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by_id: Option<i64>,
}

pub const TASK_PRIORITIES: &[&str] = &["low", "medium", "high"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TaskStatus::WorkInProgress).unwrap();
        assert_eq!(json, "\"Work In Progress\"");
        assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_task_type_parse() {
        assert_eq!(TaskType::parse(" Complaint "), Some(TaskType::Complaint));
        assert_eq!(TaskType::parse(""), None);
    }
}
