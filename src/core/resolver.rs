// resolvers - anything that can turn a conversation into a reply

use crate::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

// serialises as {"content": ..., "role": ...}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub role: Role,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: Role::User,
        }
    }
}

// query returns every reply in order, callers usually take the first
#[async_trait]
pub trait Resolver: Send + Sync {
    // model name, for display
    fn model(&self) -> &str;

    async fn query(&self, history: &[Message]) -> Result<Vec<String>, Error>;
}
