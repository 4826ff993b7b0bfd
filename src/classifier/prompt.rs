//! Prompt builders for the model-backed classification paths, plus the
//! scanner that pulls the first JSON value out of free-form model output.

use crate::types::Intent;

/// Generate the primary classification prompt: the fixed taxonomy, the
/// expected payload schema, the conversation history, and the query
pub fn classification_prompt(query: &str, history: &[String], payload_schema: &str) -> String {
    let history_block = if history.is_empty() {
        "(none)".to_string()
    } else {
        history
            .iter()
            .rev()
            .take(6)
            .rev()
            .map(|turn| format!("- {}", turn))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an intent classifier for a travel-planning assistant.\n\
        Classify the user's message into exactly one of these intents:\n{}\n\n\
        Respond with a single JSON object matching this schema (no prose, no markdown):\n{}\n\n\
        Set `confidence` between 0 and 1. Extract only entities actually present in the message.\n\n\
        Recent conversation:\n{}\n\nUser message: {}",
        Intent::all_tags().join(", "),
        payload_schema,
        history_block,
        query
    )
}

/// Generate the category-augmentation prompt: a second, independent call
/// whose only job is to rank catalog categories for the raw query
pub fn categories_prompt(query: &str, catalog: &[&str]) -> String {
    format!(
        "Pick up to 5 place categories that best match this travel request, \
        ordered most relevant first. Only use categories from this list:\n{}\n\n\
        Respond with a JSON array of strings and nothing else.\n\nRequest: {}",
        catalog.join(", "),
        query
    )
}

/// Generate the place-name extraction prompt used by the orchestrator when
/// the classifier produced no usable place name
pub fn extraction_prompt(query: &str) -> String {
    format!(
        "Extract the name of the place the user wants added to their itinerary.\n\
        Return only the place name, nothing else. No punctuation, no explanation.\n\n\
        Message: {}",
        query
    )
}

/// Find the first JSON object embedded in free-form text.
///
/// The trigger is the first `{`; from there the scan balances braces while
/// honoring string literals and escapes, so prose containing stray braces
/// after the object does not break extraction. Returns the object substring.
pub fn first_json_object(text: &str) -> Option<&str> {
    first_json_value(text, '{', '}')
}

/// Same scan for a top-level JSON array
pub fn first_json_array(text: &str) -> Option<&str> {
    first_json_value(text, '[', ']')
}

fn first_json_value(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_json_object_ignores_surrounding_prose() {
        let text = "Sure! Here is the classification:\n{\"intent\": \"add_activity\"}\nHope that helps.";
        assert_eq!(
            first_json_object(text),
            Some("{\"intent\": \"add_activity\"}")
        );
    }

    #[test]
    fn test_first_json_object_handles_nesting_and_strings() {
        let text = r#"{"a": {"b": "} tricky {"}, "c": 1} {"second": true}"#;
        let found = first_json_object(text).unwrap();
        assert_eq!(found, r#"{"a": {"b": "} tricky {"}, "c": 1}"#);
        // it is the FIRST object that wins
        assert!(!found.contains("second"));
    }

    #[test]
    fn test_first_json_object_handles_escaped_quotes() {
        let text = r#"noise {"msg": "she said \"hi\" {"} tail"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"msg": "she said \"hi\" {"}"#)
        );
    }

    #[test]
    fn test_no_object_found() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object("{unterminated"), None);
    }

    #[test]
    fn test_first_json_array() {
        let text = "Categories: [\"museum\", \"park\"] done";
        assert_eq!(first_json_array(text), Some("[\"museum\", \"park\"]"));
    }

    #[test]
    fn test_prompts_embed_inputs() {
        let prompt = classification_prompt("add the Louvre", &["hi".to_string()], "{}");
        assert!(prompt.contains("add_activity"));
        assert!(prompt.contains("casual_chat"));
        assert!(prompt.contains("add the Louvre"));
        assert!(prompt.contains("- hi"));

        let prompt = categories_prompt("something artsy", &["art_gallery", "museum"]);
        assert!(prompt.contains("art_gallery, museum"));

        let prompt = extraction_prompt("please add the Eiffel Tower");
        assert!(prompt.contains("only the place name"));
    }
}
