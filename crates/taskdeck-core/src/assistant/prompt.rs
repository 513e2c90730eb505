//! Prompt construction.
//!
//! A pure function from (system instruction, user context, chronological
//! history, new message) to the two-entry role sequence sent to the
//! completion API. No I/O, fully deterministic, which is what makes it
//! unit-testable independent of the remote provider.

use taskdeck_types::context::{HistoryEntry, UserContext};
use taskdeck_types::llm::{MessageRole, PromptMessage};

/// The fixed system instruction for the productivity-assistant persona.
pub const SYSTEM_PROMPT: &str = "You are a proactive Productivity Assistant. \
You have access to the user's current task list and help them organize, \
prioritize, and manage their time.";

/// History entries longer than this are truncated before rendering.
const HISTORY_CONTENT_PREVIEW_CHARS: usize = 200;

/// Build the prompt for one chat turn.
///
/// Produces exactly two entries: the system instruction verbatim, and a
/// single assembled user block containing (in order) the task list, the
/// category list, the conversation history, and the new message. Empty
/// sections are skipped entirely rather than rendered as empty headers.
pub fn build_prompt(
    system_prompt: &str,
    context: &UserContext,
    history: &[HistoryEntry],
    new_message: &str,
) -> Vec<PromptMessage> {
    let mut parts: Vec<String> = Vec::new();

    if !context.tasks.is_empty() {
        let task_lines: Vec<String> = context
            .tasks
            .iter()
            .map(|task| {
                let mut line = format!("- {} (Priority: {}", task.title, task.priority);
                if let Some(category) = &task.category {
                    line.push_str(&format!(", Category: {category}"));
                }
                if let Some(due) = &task.due_date {
                    line.push_str(&format!(", Due: {due}"));
                }
                line.push(')');
                line
            })
            .collect();

        parts.push("USER TASKS:".to_string());
        parts.push(task_lines.join("\n"));
        parts.push(String::new());
    }

    if !context.categories.is_empty() {
        parts.push("USER CATEGORIES:".to_string());
        parts.push(context.categories.join(", "));
        parts.push(String::new());
    }

    if !history.is_empty() {
        parts.push("CONVERSATION HISTORY (most recent at the end):".to_string());
        for (idx, entry) in history.iter().enumerate() {
            let preview = truncate_content(&entry.content);
            parts.push(format!(
                "  [{}] {}: {}",
                idx + 1,
                entry.role.to_string().to_uppercase(),
                preview
            ));
        }
        parts.push(String::new());
    }

    parts.push(format!("CURRENT REQUEST: {new_message}"));

    vec![
        PromptMessage {
            role: MessageRole::System,
            content: system_prompt.to_string(),
        },
        PromptMessage {
            role: MessageRole::User,
            content: parts.join("\n"),
        },
    ]
}

/// Truncate history content to the first 200 characters plus an ellipsis
/// marker, to bound prompt size. Character-based, so multi-byte content
/// never splits mid-codepoint.
fn truncate_content(content: &str) -> String {
    if content.chars().count() > HISTORY_CONTENT_PREVIEW_CHARS {
        let truncated: String = content.chars().take(HISTORY_CONTENT_PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use taskdeck_types::context::TaskSummary;

    use super::*;

    fn entry(role: MessageRole, content: &str) -> HistoryEntry {
        HistoryEntry {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_two_entries_system_then_user() {
        let prompt = build_prompt(SYSTEM_PROMPT, &UserContext::default(), &[], "Hello");
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].role, MessageRole::System);
        assert_eq!(prompt[0].content, SYSTEM_PROMPT);
        assert_eq!(prompt[1].role, MessageRole::User);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let prompt = build_prompt(SYSTEM_PROMPT, &UserContext::default(), &[], "Plan my day");
        let block = &prompt[1].content;
        assert!(!block.contains("USER TASKS"));
        assert!(!block.contains("USER CATEGORIES"));
        assert!(!block.contains("CONVERSATION HISTORY"));
        assert!(block.contains("CURRENT REQUEST: Plan my day"));
    }

    #[test]
    fn test_task_line_format() {
        let context = UserContext {
            tasks: vec![
                TaskSummary {
                    title: "Write report".to_string(),
                    priority: "high".to_string(),
                    category: Some("work".to_string()),
                    due_date: Some("2026-09-01T12:00:00+00:00".to_string()),
                },
                TaskSummary {
                    title: "Buy milk".to_string(),
                    priority: "medium".to_string(),
                    category: None,
                    due_date: None,
                },
            ],
            categories: vec![],
        };

        let prompt = build_prompt(SYSTEM_PROMPT, &context, &[], "hi");
        let block = &prompt[1].content;
        assert!(block.contains(
            "- Write report (Priority: high, Category: work, Due: 2026-09-01T12:00:00+00:00)"
        ));
        assert!(block.contains("- Buy milk (Priority: medium)"));
    }

    #[test]
    fn test_categories_comma_joined() {
        let context = UserContext {
            tasks: vec![],
            categories: vec!["work".to_string(), "home".to_string()],
        };
        let prompt = build_prompt(SYSTEM_PROMPT, &context, &[], "hi");
        let block = &prompt[1].content;
        assert!(block.contains("USER CATEGORIES:\nwork, home"));
        assert!(!block.contains("USER TASKS"));
    }

    #[test]
    fn test_history_rendering_preserves_order_and_uppercases_role() {
        let history = vec![
            entry(MessageRole::User, "first question"),
            entry(MessageRole::Assistant, "first answer"),
        ];
        let prompt = build_prompt(SYSTEM_PROMPT, &UserContext::default(), &history, "next");
        let block = &prompt[1].content;
        assert!(block.contains("  [1] USER: first question"));
        assert!(block.contains("  [2] ASSISTANT: first answer"));
        let user_pos = block.find("[1] USER").unwrap();
        let assistant_pos = block.find("[2] ASSISTANT").unwrap();
        assert!(user_pos < assistant_pos);
    }

    #[test]
    fn test_long_history_content_truncated() {
        let long = "x".repeat(250);
        let history = vec![entry(MessageRole::User, &long)];
        let prompt = build_prompt(SYSTEM_PROMPT, &UserContext::default(), &history, "hi");
        let block = &prompt[1].content;

        let expected = format!("{}...", "x".repeat(200));
        assert!(block.contains(&expected));
        assert!(!block.contains(&"x".repeat(201)));
    }

    #[test]
    fn test_exactly_200_chars_not_truncated() {
        let exact = "y".repeat(200);
        let history = vec![entry(MessageRole::User, &exact)];
        let prompt = build_prompt(SYSTEM_PROMPT, &UserContext::default(), &history, "hi");
        assert!(prompt[1].content.contains(&exact));
        assert!(!prompt[1].content.contains(&format!("{exact}...")));
    }

    #[test]
    fn test_deterministic() {
        let context = UserContext {
            tasks: vec![TaskSummary {
                title: "t".to_string(),
                priority: "low".to_string(),
                category: None,
                due_date: None,
            }],
            categories: vec!["c".to_string()],
        };
        let a = build_prompt(SYSTEM_PROMPT, &context, &[], "msg");
        let b = build_prompt(SYSTEM_PROMPT, &context, &[], "msg");
        assert_eq!(a, b);
    }
}
