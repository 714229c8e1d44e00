//! Prompt construction for the language-model "explain" and "enhance"
//! actions. The HTTP call itself lives in `devsnippet-client`.

use crate::item::{Item, ItemPayload};
use crate::registry::ValueName;

/// Shown when the model returns no text for an explanation.
pub const EXPLAIN_FALLBACK: &str = "Unable to generate an explanation.";

/// Request text asking the model to rewrite a prompt.
pub fn enhance_prompt_request(prompt: &str) -> String {
    format!(
        "Improve the following prompt to be more precise, structured, and effective for an LLM. \
         Return ONLY the improved prompt text without markdown backticks or explanations:\n\n{prompt}"
    )
}

/// Request text asking the model to explain an item, worded per category.
pub fn explain_request(item: &Item) -> String {
    match item.payload() {
        ItemPayload::Code { language } => format!(
            "Explain what the following {} snippet does clearly and concisely:\n\n{}",
            language.unwrap_or("code"),
            item.content
        ),
        ItemPayload::Registry(entry) => {
            let name = match entry.name {
                ValueName::Default => "(Default)",
                ValueName::Named(name) => name,
            };
            format!(
                "Explain what this Windows Registry key does and the potential risks of modifying it:\n\
                 Path: {}\nName: {name}\nValue: {}\nType: {}",
                entry.path, entry.raw, entry.value_type
            )
        }
        ItemPayload::Note => format!(
            "Summarize the following markdown note and list any action items it contains:\n\n{}",
            item.content
        ),
        ItemPayload::Prompt => format!(
            "Analyze this prompt and suggest what kind of output an AI would generate from it:\n\n{}",
            item.content
        ),
    }
}

/// Model reply for an enhance request: the trimmed text, or the original
/// prompt when the model returned nothing.
pub fn enhanced_or_original(reply: Option<&str>, original: &str) -> String {
    reply
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(original)
        .to_string()
}

/// Model reply for an explain request, or [`EXPLAIN_FALLBACK`].
pub fn explanation_or_fallback(reply: Option<&str>) -> String {
    reply
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(EXPLAIN_FALLBACK)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn item(category: Category) -> Item {
        Item {
            id: "1".into(),
            title: "Title".into(),
            content: "body".into(),
            description: None,
            category,
            tags: vec![],
            created_at: 0,
            updated_at: 0,
            language: None,
            registry_path: Some(r"HKEY_CURRENT_USER\Software\App".into()),
            registry_name: Some("@".into()),
            registry_type: Some("DWORD".into()),
        }
    }

    #[test]
    fn code_request_names_language_or_defaults() {
        let mut code = item(Category::Code);
        assert!(explain_request(&code).starts_with("Explain what the following code snippet"));
        code.language = Some("rust".into());
        assert!(explain_request(&code).starts_with("Explain what the following rust snippet"));
    }

    #[test]
    fn registry_request_includes_path_and_normalized_type() {
        let text = explain_request(&item(Category::Registry));
        assert!(text.contains(r"Path: HKEY_CURRENT_USER\Software\App"));
        assert!(text.contains("Name: (Default)"));
        assert!(text.contains("Type: REG_DWORD"));
    }

    #[test]
    fn prompt_request_embeds_content() {
        assert!(explain_request(&item(Category::Prompt)).ends_with("\n\nbody"));
        assert!(enhance_prompt_request("be brief").ends_with("\n\nbe brief"));
    }

    #[test]
    fn empty_replies_fall_back() {
        assert_eq!(enhanced_or_original(Some("  "), "orig"), "orig");
        assert_eq!(enhanced_or_original(Some(" better \n"), "orig"), "better");
        assert_eq!(explanation_or_fallback(None), EXPLAIN_FALLBACK);
        assert_eq!(explanation_or_fallback(Some("It sets X")), "It sets X");
    }
}
