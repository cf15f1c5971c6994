use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityType {
    Scholarship,
    Internship,
    Workshop,
    Mentorship,
    #[serde(rename = "Entry Level Job")]
    EntryLevelJob,
    Apprenticeship,
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OpportunityType::Scholarship => "Scholarship",
            OpportunityType::Internship => "Internship",
            OpportunityType::Workshop => "Workshop",
            OpportunityType::Mentorship => "Mentorship",
            OpportunityType::EntryLevelJob => "Entry Level Job",
            OpportunityType::Apprenticeship => "Apprenticeship",
        };
        f.write_str(label)
    }
}

impl FromStr for OpportunityType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Scholarship" => Ok(OpportunityType::Scholarship),
            "Internship" => Ok(OpportunityType::Internship),
            "Workshop" => Ok(OpportunityType::Workshop),
            "Mentorship" => Ok(OpportunityType::Mentorship),
            "Entry Level Job" => Ok(OpportunityType::EntryLevelJob),
            "Apprenticeship" => Ok(OpportunityType::Apprenticeship),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    #[serde(rename = "Arts & Design")]
    ArtsDesign,
    #[serde(rename = "Skilled Trades")]
    SkilledTrades,
    Academic,
    #[serde(rename = "Community Service")]
    CommunityService,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Technology => "Technology",
            Category::ArtsDesign => "Arts & Design",
            Category::SkilledTrades => "Skilled Trades",
            Category::Academic => "Academic",
            Category::CommunityService => "Community Service",
        };
        f.write_str(label)
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Technology" => Ok(Category::Technology),
            "Arts & Design" => Ok(Category::ArtsDesign),
            "Skilled Trades" => Ok(Category::SkilledTrades),
            "Academic" => Ok(Category::Academic),
            "Community Service" => Ok(Category::CommunityService),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: i64,
    pub title: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub category: Category,
    pub location: String,
    pub is_remote: bool,
    pub stipend_amount: u32, // 0 if unpaid
    pub deadline: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub posted_at: Option<NaiveDate>,
    pub posted_by_user_id: Option<i64>, // links the posting to a company/admin account
}

/// A partial predicate over catalog fields. An unset field places no
/// constraint on that dimension; `is_remote` is three-state (unset, true,
/// false), never collapsed to a bare bool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub kind: Option<OpportunityType>,
    pub category: Option<Category>,
    pub is_remote: Option<bool>,
    pub min_stipend: Option<u32>,
    pub keyword: Option<String>,
    pub poster_user_id: Option<i64>,
}

/// What the query interpreter hands back: a displayable synthesized query,
/// the structured filters it stands for, and a line of explanation for the
/// user. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretedQuery {
    pub synthesized_query: String,
    pub filters: FilterCriteria,
    pub explanation: String,
}

/// The result contract handed back to the caller after a search runs.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub synthesized_query: String,
    pub results: Vec<Opportunity>,
    pub execution_time_ms: u64,
    /// Reserved for executors that can fail; the in-memory scan never
    /// populates it.
    #[allow(dead_code)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Seeker,
    Admin,
    Company,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub has_seen_onboarding: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
    pub experience: Vec<ExperienceEntry>,
}

/// A partial profile update: unset fields leave the stored value untouched.
/// Also the shape the AI resume parser extracts, so a parsed resume can be
/// applied directly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub resume_url: Option<String>,
    pub experience: Option<Vec<ExperienceEntry>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    #[serde(rename = "Under Review")]
    Reviewing,
    Interview,
    Offer,
    #[serde(rename = "Not Selected")]
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Reviewing => "Under Review",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Not Selected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub opportunity_id: i64,
    pub user_id: i64,
    pub applicant_name: Option<String>, // enriched for admin/company views
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub kind: NotificationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_round_trip() {
        for kind in [
            OpportunityType::Scholarship,
            OpportunityType::Internship,
            OpportunityType::Workshop,
            OpportunityType::Mentorship,
            OpportunityType::EntryLevelJob,
            OpportunityType::Apprenticeship,
        ] {
            assert_eq!(kind.to_string().parse::<OpportunityType>(), Ok(kind));
        }
        for cat in [
            Category::Technology,
            Category::ArtsDesign,
            Category::SkilledTrades,
            Category::Academic,
            Category::CommunityService,
        ] {
            assert_eq!(cat.to_string().parse::<Category>(), Ok(cat));
        }
    }

    #[test]
    fn test_enum_parse_rejects_unknown() {
        assert!("Volunteering".parse::<OpportunityType>().is_err());
        assert!("Sports".parse::<Category>().is_err());
        assert!("".parse::<OpportunityType>().is_err());
    }

    #[test]
    fn test_multiword_wire_names() {
        let json = serde_json::to_string(&OpportunityType::EntryLevelJob).unwrap();
        assert_eq!(json, "\"Entry Level Job\"");
        let json = serde_json::to_string(&Category::ArtsDesign).unwrap();
        assert_eq!(json, "\"Arts & Design\"");
    }

    #[test]
    fn test_unset_criteria_is_default() {
        let criteria = FilterCriteria::default();
        assert!(criteria.kind.is_none());
        assert!(criteria.is_remote.is_none());
        assert!(criteria.keyword.is_none());
    }
}
