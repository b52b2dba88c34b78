//! Shared fixtures for unit tests: entry builders, a scripted LLM stub and an
//! in-memory `AppState`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::llm_client::{CompletionProvider, ContentBlock, LlmError, LlmResponse, Usage};
use crate::models::entry::{
    EducationDetails, Entry, EntryKind, IdeaDetails, JobDetails, OutcomeDetails, WorkDetails,
};
use crate::state::AppState;
use crate::store::memory::InMemoryEntryStore;
use crate::store::EntryStore;

pub fn make_entry(title: &str, content: &str, category: &str, tags: &[&str], kind: EntryKind) -> Entry {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Entry {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: content.to_string(),
        date: ts,
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        images: vec![],
        related_to: vec![],
        kind,
        created_at: ts,
        updated_at: ts,
    }
}

pub fn idea_kind() -> EntryKind {
    EntryKind::Idea(IdeaDetails::default())
}

pub fn work_kind(what_was_done: &str, tools: &[&str]) -> EntryKind {
    EntryKind::Work(WorkDetails {
        what_was_done: what_was_done.to_string(),
        tools_used: tools.iter().map(|t| t.to_string()).collect(),
        time_invested: None,
    })
}

pub fn outcome_kind() -> EntryKind {
    EntryKind::Outcome(OutcomeDetails {
        impact: "Cut build times".to_string(),
        learned: "Cache aggressively".to_string(),
        would_do_differently: None,
    })
}

pub fn job_kind(company: &str, job_title: &str, skills: &[&str]) -> EntryKind {
    EntryKind::Job(JobDetails {
        company_name: company.to_string(),
        job_title: job_title.to_string(),
        start_date: NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
        end_date: None,
        star_entries: vec![],
        skills_developed: skills.iter().map(|s| s.to_string()).collect(),
        key_achievements: vec![],
    })
}

pub fn education_kind(institution: &str, qualification: &str) -> EntryKind {
    EntryKind::Education(EducationDetails {
        institution: institution.to_string(),
        qualification: qualification.to_string(),
        start_date: NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2019, 6, 30),
        notable_projects: vec![],
        achievements: vec![],
    })
}

enum StubBehavior {
    Reply(String),
    NoText,
    Fail,
    Hang,
}

/// Scripted `CompletionProvider` that records every call.
pub struct StubLlm {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_max_tokens: Mutex<Option<u32>>,
}

impl StubLlm {
    fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_max_tokens: Mutex::new(None),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(StubBehavior::Reply(text.to_string()))
    }

    /// Replies with only non-text content blocks.
    pub fn without_text() -> Self {
        Self::new(StubBehavior::NoText)
    }

    pub fn failing() -> Self {
        Self::new(StubBehavior::Fail)
    }

    pub fn hanging() -> Self {
        Self::new(StubBehavior::Hang)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_max_tokens(&self) -> Option<u32> {
        *self.last_max_tokens.lock().unwrap()
    }
}

#[async_trait]
impl CompletionProvider for StubLlm {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_max_tokens.lock().unwrap() = Some(max_tokens);

        match &self.behavior {
            StubBehavior::Reply(text) => Ok(LlmResponse {
                content: vec![ContentBlock {
                    block_type: "text".to_string(),
                    text: Some(text.clone()),
                }],
                usage: Usage::default(),
            }),
            StubBehavior::NoText => Ok(LlmResponse {
                content: vec![ContentBlock {
                    block_type: "tool_use".to_string(),
                    text: None,
                }],
                usage: Usage::default(),
            }),
            StubBehavior::Fail => Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            }),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::Timeout(Duration::from_secs(3600)))
            }
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/freebird_test".to_string(),
        s3_bucket: "freebird-test".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_public_url: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        anthropic_api_key: None,
        llm_timeout: Duration::from_secs(5),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(
    store: Arc<InMemoryEntryStore>,
    llm: Option<Arc<dyn CompletionProvider>>,
) -> AppState {
    let config = test_config();
    let s3_config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "freebird-test"))
        .endpoint_url(&config.s3_endpoint)
        .force_path_style(true)
        .build();

    AppState {
        store: store as Arc<dyn EntryStore>,
        llm,
        s3: aws_sdk_s3::Client::from_conf(s3_config),
        config,
    }
}
