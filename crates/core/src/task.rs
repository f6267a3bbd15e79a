//! Task catalog shown on the home page.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Available,
    Completed,
}

/// A task users can complete for a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub reward: &'static str,
    pub difficulty: Difficulty,
    pub category: &'static str,
    pub status: TaskStatus,
}

/// Fixed sample catalog.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Follow on Twitter",
            description: "Follow our Twitter account and retweet the pinned post",
            reward: "1.5 EC",
            difficulty: Difficulty::Easy,
            category: "social",
            status: TaskStatus::Available,
        },
        Task {
            id: 2,
            title: "Telegram Community",
            description: "Join our Telegram community",
            reward: "2.0 EC",
            difficulty: Difficulty::Easy,
            category: "social",
            status: TaskStatus::Available,
        },
        Task {
            id: 3,
            title: "Bug Bounty",
            description: "Find vulnerabilities in our smart contract",
            reward: "100 EC",
            difficulty: Difficulty::Hard,
            category: "development",
            status: TaskStatus::Available,
        },
        Task {
            id: 4,
            title: "Content Creation",
            description: "Record a video review of the platform",
            reward: "50 EC",
            difficulty: Difficulty::Medium,
            category: "content",
            status: TaskStatus::Completed,
        },
    ]
}
