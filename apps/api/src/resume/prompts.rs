// Prompt constants for resume enhancement.

/// Resume enhancement prompt template.
/// Replace: {entry_type}, {context}
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer. Based on the following {entry_type} entry, write a compelling, professional description suitable for a resume/CV. Focus on achievements, impact, and professional growth. Use action verbs and quantify results where possible. Keep it concise (2-4 sentences) and professional.

{context}

Provide only the enhanced description, no additional commentary."#;
