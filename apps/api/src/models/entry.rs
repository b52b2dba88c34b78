use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::dates;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Idea,
    Work,
    Outcome,
    Job,
    Education,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Idea => "idea",
            EntryType::Work => "work",
            EntryType::Outcome => "outcome",
            EntryType::Job => "job",
            EntryType::Education => "education",
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idea" => Ok(EntryType::Idea),
            "work" => Ok(EntryType::Work),
            "outcome" => Ok(EntryType::Outcome),
            "job" => Ok(EntryType::Job),
            "education" => Ok(EntryType::Education),
            other => Err(format!("Unknown entry type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IdeaStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Abandoned,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::New => "new",
            IdeaStatus::InProgress => "in-progress",
            IdeaStatus::Completed => "completed",
            IdeaStatus::Abandoned => "abandoned",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDetails {
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetails {
    #[serde(default)]
    pub what_was_done: String,
    #[serde(default)]
    pub tools_used: Vec<String>,
    /// Hours invested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_invested: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeDetails {
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub learned: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_do_differently: Option<String>,
}

/// Situation / Task / Action / Result note attached to a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StarRecord {
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(deserialize_with = "dates::day")]
    pub start_date: NaiveDate,
    /// `None` means the position is current.
    #[serde(
        default,
        deserialize_with = "dates::day_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub star_entries: Vec<StarRecord>,
    #[serde(default)]
    pub skills_developed: Vec<String>,
    #[serde(default)]
    pub key_achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EducationDetails {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(deserialize_with = "dates::day")]
    pub start_date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "dates::day_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notable_projects: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Variant-specific payload of an entry, discriminated by `type`.
/// Persisted as-is in the `data` JSONB column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Idea(IdeaDetails),
    Work(WorkDetails),
    Outcome(OutcomeDetails),
    Job(JobDetails),
    Education(EducationDetails),
}

impl EntryKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryKind::Idea(_) => EntryType::Idea,
            EntryKind::Work(_) => EntryType::Work,
            EntryKind::Outcome(_) => EntryType::Outcome,
            EntryKind::Job(_) => EntryType::Job,
            EntryKind::Education(_) => EntryType::Education,
        }
    }
}

/// A single knowledge-base record.
///
/// `related_to` holds weak references: ids are never checked against the store
/// on write, and references to deleted entries are dropped when read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub related_to: Vec<Uuid>,
    #[serde(flatten)]
    pub kind: EntryKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn entry_type(&self) -> EntryType {
        self.kind.entry_type()
    }

    /// Start date for job and education entries.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match &self.kind {
            EntryKind::Job(job) => Some(job.start_date),
            EntryKind::Education(edu) => Some(edu.start_date),
            _ => None,
        }
    }

    /// Every text field covered by substring search.
    #[cfg(test)]
    pub fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.content.as_str(),
            self.category.as_str(),
        ];
        fields.extend(self.tags.iter().map(String::as_str));
        match &self.kind {
            EntryKind::Idea(idea) => fields.extend(idea.notes.as_deref()),
            EntryKind::Work(work) => {
                fields.push(&work.what_was_done);
                fields.extend(work.tools_used.iter().map(String::as_str));
            }
            EntryKind::Outcome(outcome) => {
                fields.push(&outcome.impact);
                fields.push(&outcome.learned);
            }
            EntryKind::Job(job) => {
                fields.push(&job.company_name);
                fields.push(&job.job_title);
            }
            EntryKind::Education(edu) => {
                fields.push(&edu.institution);
                fields.push(&edu.qualification);
            }
        }
        fields
    }
}

/// Request body for creating or fully replacing an entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "dates::timestamp_opt")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub related_to: Vec<Uuid>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl NewEntry {
    pub fn into_entry(self, id: Uuid, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Entry {
        Entry {
            id,
            title: self.title,
            content: self.content,
            date: self.date.unwrap_or(now),
            category: self.category,
            tags: self.tags,
            images: self.images,
            related_to: self.related_to,
            kind: self.kind,
            created_at,
            updated_at: now,
        }
    }
}

/// Row shape of the `entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub entry_type: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub related_to: Vec<Uuid>,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EntryRow> for Entry {
    type Error = serde_json::Error;

    /// Fails when the payload is malformed or its `type` tag disagrees with
    /// the `entry_type` column.
    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let kind: EntryKind = serde_json::from_value(row.data)?;
        if kind.entry_type().as_str() != row.entry_type {
            return Err(serde::de::Error::custom(format!(
                "entry_type column '{}' does not match payload type '{}'",
                row.entry_type,
                kind.entry_type().as_str()
            )));
        }

        Ok(Entry {
            id: row.id,
            title: row.title,
            content: row.content,
            date: row.date,
            category: row.category,
            tags: row.tags,
            images: row.images,
            related_to: row.related_to,
            kind,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job_json() -> Value {
        json!({
            "id": "6f1c2f0e-3b55-4a55-9a8e-2a4f0b1f8c11",
            "type": "job",
            "title": "Backend Engineer",
            "content": "Built the ingestion pipeline",
            "date": "2024-03-01T00:00:00Z",
            "category": "software",
            "tags": ["go", "kafka"],
            "images": [],
            "relatedTo": [],
            "companyName": "Acme",
            "jobTitle": "Backend Engineer",
            "startDate": "2021-01-04",
            "starEntries": [
                {"situation": "s", "task": "t", "action": "a", "result": "r"}
            ],
            "skillsDeveloped": ["Go", "Kafka"],
            "keyAchievements": [],
            "createdAt": "2024-03-01T00:00:00Z",
            "updatedAt": "2024-03-01T00:00:00Z"
        })
    }

    #[test]
    fn test_job_entry_deserializes_into_job_variant() {
        let entry: Entry = serde_json::from_value(job_json()).unwrap();
        assert_eq!(entry.entry_type(), EntryType::Job);
        match &entry.kind {
            EntryKind::Job(job) => {
                assert_eq!(job.company_name, "Acme");
                assert_eq!(job.end_date, None);
                assert_eq!(job.star_entries.len(), 1);
                assert_eq!(job.skills_developed, vec!["Go", "Kafka"]);
            }
            other => panic!("expected job, got {other:?}"),
        }
        assert_eq!(entry.start_date(), NaiveDate::from_ymd_opt(2021, 1, 4));
    }

    #[test]
    fn test_entry_serializes_type_tag_and_camel_case_fields() {
        let entry: Entry = serde_json::from_value(job_json()).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "job");
        assert_eq!(value["companyName"], "Acme");
        assert!(value.get("relatedTo").is_some());
        assert!(value.get("endDate").is_none());
    }

    #[test]
    fn test_kind_payload_survives_row_conversion() {
        let entry: Entry = serde_json::from_value(job_json()).unwrap();
        let row = EntryRow {
            id: entry.id,
            entry_type: entry.entry_type().as_str().to_string(),
            title: entry.title.clone(),
            content: entry.content.clone(),
            date: entry.date,
            category: entry.category.clone(),
            tags: entry.tags.clone(),
            images: entry.images.clone(),
            related_to: entry.related_to.clone(),
            data: serde_json::to_value(&entry.kind).unwrap(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        };
        let restored = Entry::try_from(row).unwrap();
        assert_eq!(restored, entry);
    }

    #[test]
    fn test_row_with_mismatched_type_column_is_rejected() {
        let entry: Entry = serde_json::from_value(job_json()).unwrap();
        let row = EntryRow {
            id: entry.id,
            entry_type: "idea".to_string(),
            title: entry.title.clone(),
            content: entry.content.clone(),
            date: entry.date,
            category: entry.category.clone(),
            tags: vec![],
            images: vec![],
            related_to: vec![],
            data: serde_json::to_value(&entry.kind).unwrap(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        };
        let err = Entry::try_from(row).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_idea_status_defaults_to_new_and_uses_kebab_case() {
        let kind: EntryKind = serde_json::from_value(json!({"type": "idea"})).unwrap();
        assert_eq!(kind, EntryKind::Idea(IdeaDetails::default()));

        let kind: EntryKind =
            serde_json::from_value(json!({"type": "idea", "status": "in-progress"})).unwrap();
        match kind {
            EntryKind::Idea(idea) => assert_eq!(idea.status, IdeaStatus::InProgress),
            other => panic!("expected idea, got {other:?}"),
        }
    }

    #[test]
    fn test_entry_type_parses_query_values() {
        assert_eq!("job".parse::<EntryType>(), Ok(EntryType::Job));
        assert_eq!("outcome".parse::<EntryType>(), Ok(EntryType::Outcome));
        assert!("Job".parse::<EntryType>().is_err());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<EntryKind, _> = serde_json::from_value(json!({"type": "recipe"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_entry_defaults_date_to_now() {
        let new_entry: NewEntry = serde_json::from_value(json!({
            "type": "work",
            "title": "Refactor",
            "content": "Split the parser",
            "category": "software",
            "whatWasDone": "Moved lexer into its own module",
            "timeInvested": 3
        }))
        .unwrap();
        let now = Utc::now();
        let entry = new_entry.into_entry(Uuid::new_v4(), now, now);
        assert_eq!(entry.date, now);
        assert_eq!(entry.created_at, now);
        match entry.kind {
            EntryKind::Work(work) => assert_eq!(work.time_invested, Some(3.0)),
            other => panic!("expected work, got {other:?}"),
        }
    }

    #[test]
    fn test_searchable_fields_include_variant_text() {
        let entry: Entry = serde_json::from_value(job_json()).unwrap();
        let fields = entry.searchable_fields();
        assert!(fields.contains(&"Acme"));
        assert!(fields.contains(&"kafka"));
    }
}
