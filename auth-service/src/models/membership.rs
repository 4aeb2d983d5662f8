//! Membership model - assignment of a role to a user for a resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entity class a membership's resource id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Company,
    Board,
    Column,
    User,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Company => "company",
            ResourceType::Board => "board",
            ResourceType::Column => "column",
            ResourceType::User => "user",
        }
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "company" => Ok(ResourceType::Company),
            "board" => Ok(ResourceType::Board),
            "column" => Ok(ResourceType::Column),
            "user" => Ok(ResourceType::User),
            _ => Err(format!("Invalid resource type: {}", s)),
        }
    }
}

/// Role assignment of a user on one resource. At most one role per
/// (user, resource, resource type); duplicate rows are a data-integrity
/// violation the stores tolerate by treating the first match as
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub resource_id: Uuid,
    pub resource_type: ResourceType,
    pub role_id: Uuid,
    pub created_utc: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: Uuid, resource_id: Uuid, resource_type: ResourceType, role_id: Uuid) -> Self {
        Self {
            membership_id: Uuid::new_v4(),
            user_id,
            resource_id,
            resource_type,
            role_id,
            created_utc: Utc::now(),
        }
    }
}
