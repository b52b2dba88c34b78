// Prompt constants for related-entry ranking.

/// Related-entries prompt template.
/// Replace: {current_entry}, {candidate_entries}
pub const RELATED_PROMPT_TEMPLATE: &str = r#"You are analyzing a personal knowledge base entry. Your task is to find the most related entries based on topic similarity, shared skills, related outcomes, or thematic connections.

CURRENT ENTRY:
{current_entry}

CANDIDATE ENTRIES:
{candidate_entries}

Identify the top 5 most related entries by index number. Consider:
- Topical similarity
- Shared technologies/tools
- Related projects or outcomes
- Thematic connections
- Complementary skills

Respond ONLY with a JSON array of index numbers, like: [2, 5, 12, 7, 9]
If fewer than 5 are related, include only those that are truly relevant."#;
