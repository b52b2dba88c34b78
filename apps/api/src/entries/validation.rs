use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::entry::{EntryKind, NewEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: "is required".to_string(),
        }
    }
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field));
    }
}

fn check_date_range(errors: &mut Vec<FieldError>, start: NaiveDate, end: Option<NaiveDate>) {
    if let Some(end) = end {
        if end < start {
            errors.push(FieldError {
                field: "endDate".to_string(),
                message: format!("must not be before startDate ({start})"),
            });
        }
    }
}

/// Validates a create/replace request.
///
/// FAIL conditions:
/// - Blank title, content or category
/// - Blank variant-specific required text (whatWasDone, impact, learned,
///   companyName, jobTitle, institution, qualification, every STAR field)
/// - endDate before startDate
/// - Negative or non-finite timeInvested
pub fn validate_entry(entry: &NewEntry) -> Vec<FieldError> {
    let mut errors = Vec::new();

    require(&mut errors, "title", &entry.title);
    require(&mut errors, "content", &entry.content);
    require(&mut errors, "category", &entry.category);

    match &entry.kind {
        EntryKind::Idea(_) => {}
        EntryKind::Work(work) => {
            require(&mut errors, "whatWasDone", &work.what_was_done);
            if let Some(hours) = work.time_invested {
                if !hours.is_finite() || hours < 0.0 {
                    errors.push(FieldError {
                        field: "timeInvested".to_string(),
                        message: "must be a non-negative number of hours".to_string(),
                    });
                }
            }
        }
        EntryKind::Outcome(outcome) => {
            require(&mut errors, "impact", &outcome.impact);
            require(&mut errors, "learned", &outcome.learned);
        }
        EntryKind::Job(job) => {
            require(&mut errors, "companyName", &job.company_name);
            require(&mut errors, "jobTitle", &job.job_title);
            check_date_range(&mut errors, job.start_date, job.end_date);
            for (i, star) in job.star_entries.iter().enumerate() {
                for (name, value) in [
                    ("situation", &star.situation),
                    ("task", &star.task),
                    ("action", &star.action),
                    ("result", &star.result),
                ] {
                    require(&mut errors, &format!("starEntries[{i}].{name}"), value);
                }
            }
        }
        EntryKind::Education(edu) => {
            require(&mut errors, "institution", &edu.institution);
            require(&mut errors, "qualification", &edu.qualification);
            check_date_range(&mut errors, edu.start_date, edu.end_date);
        }
    }

    errors
}

/// Converts validation failures into a single `AppError::Validation`.
pub fn ensure_valid(entry: &NewEntry) -> Result<(), AppError> {
    let errors = validate_entry(entry);
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(AppError::Validation(message))
}
