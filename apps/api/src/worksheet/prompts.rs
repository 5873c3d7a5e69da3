// Prompt constants for worksheet generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::PLAIN_MARKDOWN_OUTPUT;

/// System prompt. Replace `{topic}` and `{grade_level}` before sending.
pub const WORKSHEET_SYSTEM_TEMPLATE: &str = r#"You are an AI assistant that generates structured worksheets for students.
Generate a worksheet in **Markdown format** with a variety of question types
(MCQs, short answers, and fill-in-the-blanks) on the topic **'{topic}'**
for **Grade {grade_level}** students.

Ensure:
- Questions are clear, engaging, and age-appropriate.
- Use proper markdown formatting for better readability.

Example Markdown Format:
```
# Topic: Fractions
## Grade: 5

### 1. Multiple Choice Question:
**What is 1/2 + 1/4?**
- a) 3/4
- b) 1/2
- c) 2/4
- d) 1

### 2. Short Answer:
**Explain the difference between proper and improper fractions.**

### 3. Fill in the Blank:
**3/5 + __ = 1**
```

Now generate a worksheet in markdown format."#;

/// User turn. Replace `{topic}` and `{grade_level}` before sending.
pub const WORKSHEET_PROMPT_TEMPLATE: &str = "Generate a worksheet on {topic} for Grade {grade_level}.";

/// Heading drawn once at the top of the first PDF page.
pub const WORKSHEET_TITLE_TEMPLATE: &str = "Worksheet: {topic} (Grade {grade_level})";

// Grade is substituted first so a topic containing a literal "{grade_level}" is left alone.
fn fill(template: &str, topic: &str, grade_level: u32) -> String {
    template
        .replace("{grade_level}", &grade_level.to_string())
        .replace("{topic}", topic)
}

pub fn build_system_prompt(topic: &str, grade_level: u32) -> String {
    format!(
        "{}\n\n{}",
        fill(WORKSHEET_SYSTEM_TEMPLATE, topic, grade_level),
        PLAIN_MARKDOWN_OUTPUT
    )
}

pub fn build_user_prompt(topic: &str, grade_level: u32) -> String {
    fill(WORKSHEET_PROMPT_TEMPLATE, topic, grade_level)
}

pub fn build_title(topic: &str, grade_level: u32) -> String {
    fill(WORKSHEET_TITLE_TEMPLATE, topic, grade_level)
}
