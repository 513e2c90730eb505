//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Maps `async-openai`'s [`ChatCompletionResponseStream`] chunks to the
//! provider-agnostic [`StreamEvent`] enum defined in `taskdeck-types`.
//!
//! Tool call arguments arrive as partial JSON fragments across multiple
//! streaming chunks (keyed by tool call index). These are accumulated and
//! emitted as [`StreamEvent::ToolCall`] when a tool-call finish_reason is
//! received.

use std::collections::HashMap;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use async_openai::types::chat::{ChatCompletionResponseStream, FinishReason};

use taskdeck_types::llm::{LlmError, StreamEvent};

/// Accumulates partial JSON fragments for a tool call during streaming.
struct ToolCallAccumulator {
    id: String,
    name: String,
    json_buffer: String,
}

/// Map an async-openai [`ChatCompletionResponseStream`] to a stream of [`StreamEvent`]s.
///
/// The returned stream emits events in this order:
/// 1. `TextDelta` -- for each text content chunk
/// 2. `ToolCall` -- when tool call JSON is fully assembled
/// 3. `Done` -- at the end of the stream
pub fn map_openai_stream(
    stream: ChatCompletionResponseStream,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        let mut tool_accumulators: HashMap<u32, ToolCallAccumulator> = HashMap::new();
        let mut stream = stream;

        while let Some(result) = stream.next().await {
            let chunk = result.map_err(|e| LlmError::Stream(e.to_string()))?;

            // Process each choice in the chunk (typically just one).
            let choices_len = chunk.choices.len();
            for i in 0..choices_len {
                let choice = &chunk.choices[i];

                // Text content delta
                if let Some(text) = choice.delta.content.clone() {
                    if !text.is_empty() {
                        yield StreamEvent::TextDelta { text };
                    }
                }

                // Tool call deltas -- accumulate fragments
                if let Some(tool_calls) = choice.delta.tool_calls.clone() {
                    for tc in &tool_calls {
                        let tc_index: u32 = tc.index;
                        let tc_id: String = tc.id.clone().unwrap_or_default();
                        let tc_name: String = tc
                            .function
                            .as_ref()
                            .and_then(|f| f.name.clone())
                            .unwrap_or_default();

                        let acc = tool_accumulators
                            .entry(tc_index)
                            .or_insert_with(|| ToolCallAccumulator {
                                id: tc_id.clone(),
                                name: tc_name.clone(),
                                json_buffer: String::new(),
                            });

                        // Update id/name if provided in this chunk (first chunk has them)
                        if !tc_id.is_empty() {
                            acc.id = tc_id;
                        }
                        if !tc_name.is_empty() {
                            acc.name = tc_name;
                        }
                        let func_args: String = tc
                            .function
                            .as_ref()
                            .and_then(|f| f.arguments.clone())
                            .unwrap_or_default();
                        acc.json_buffer.push_str(&func_args);
                    }
                }

                // On a tool-call finish, emit the assembled proposals in
                // index order.
                if matches!(choice.finish_reason, Some(FinishReason::ToolCalls)) {
                    let mut indices: Vec<u32> = tool_accumulators.keys().copied().collect();
                    indices.sort();
                    for idx in indices {
                        if let Some(acc) = tool_accumulators.remove(&idx) {
                            let arguments: serde_json::Value = if acc.json_buffer.is_empty() {
                                serde_json::Value::Object(Default::default())
                            } else {
                                serde_json::from_str(&acc.json_buffer).map_err(|e| {
                                    LlmError::Deserialization(format!(
                                        "tool call JSON for '{}': {e}",
                                        acc.name
                                    ))
                                })?
                            };
                            yield StreamEvent::ToolCall {
                                id: acc.id,
                                name: acc.name,
                                arguments,
                            };
                        }
                    }
                }
            }
        }

        yield StreamEvent::Done;
    })
}
