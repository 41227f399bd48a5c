use serde_json::{json, Value};

/// Canned completion API bodies.
pub struct MockCompletion;

impl MockCompletion {
    pub fn text(content: &str) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": content.split_whitespace().count(),
                "total_tokens": 10 + content.split_whitespace().count()
            }
        })
    }

    pub fn without_choices() -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo"
        })
    }

    pub fn error(message: &str) -> Value {
        json!({
            "error": {
                "message": message,
                "type": "invalid_request_error",
                "code": null
            }
        })
    }
}
