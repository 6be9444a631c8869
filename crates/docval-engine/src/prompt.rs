//! Judge prompts for context setup and requirement scoring

use docval_domain::Requirement;

/// Reply the context prompt asks the judge to give
pub const CONTEXT_ACKNOWLEDGEMENT: &str = "Document structure received and ready for validation.";

const CONTEXT_INSTRUCTIONS: &str = "I will provide you with a document structure to analyze. \
After I provide the document, I will ask you a series of validation questions about it. \
Please analyze and remember this document structure.";

const RESPONSE_FORMAT: &str = r#"Does the document meet this requirement? Respond with:
1. "PASS" or "FAIL"
2. A confidence score between 0.0 and 1.0
3. A brief explanation of your reasoning

Format your response as:
Result: PASS/FAIL
Confidence: 0.0-1.0
Reasoning: Your explanation here"#;

/// Framing prompt that hands the whole structure to the judge once
pub fn context_prompt(structure_json: &str) -> String {
    format!(
        "{}\n\nDocument Structure:\n{}\n\nPlease confirm you have received and understood \
the document structure by responding with: \"{}\"\n",
        CONTEXT_INSTRUCTIONS, structure_json, CONTEXT_ACKNOWLEDGEMENT
    )
}

/// Scoring prompt for context mode; relies on the structure already in history
pub fn requirement_prompt(requirement: &Requirement) -> String {
    let mut prompt = String::from("Now validate this requirement:\n\n");
    push_requirement(&mut prompt, requirement);
    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt.push('\n');
    prompt
}

/// Self-contained scoring prompt for fallback mode
pub fn standalone_prompt(requirement: &Requirement, structure_json: &str) -> String {
    let mut prompt = String::from(
        "Analyze the following document structure and determine if it meets this requirement:\n\n",
    );
    push_requirement(&mut prompt, requirement);
    prompt.push_str("\nDocument Structure:\n");
    prompt.push_str(structure_json);
    prompt.push_str("\n\n");
    prompt.push_str(RESPONSE_FORMAT);
    prompt.push('\n');
    prompt
}

fn push_requirement(prompt: &mut String, requirement: &Requirement) {
    prompt.push_str(&format!("Requirement Name: {}\n", requirement.name));
    prompt.push_str(&format!("Description: {}\n", requirement.description));
    if let Some(category) = &requirement.category {
        prompt.push_str(&format!("Category: {}\n", category));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_prompt_embeds_structure() {
        let prompt = context_prompt("{\"k\": 1}");
        assert!(prompt.contains("Document Structure:\n{\"k\": 1}"));
        assert!(prompt.contains(CONTEXT_ACKNOWLEDGEMENT));
    }

    #[test]
    fn test_requirement_prompt() {
        let requirement = Requirement::new("Has Title", "Must have a title").with_category("meta");
        let prompt = requirement_prompt(&requirement);

        assert!(prompt.starts_with("Now validate this requirement:"));
        assert!(prompt.contains("Requirement Name: Has Title\n"));
        assert!(prompt.contains("Description: Must have a title\n"));
        assert!(prompt.contains("Category: meta\n"));
        assert!(prompt.contains("Result: PASS/FAIL"));
        assert!(!prompt.contains("Document Structure"));
    }

    #[test]
    fn test_category_omitted_when_absent() {
        let prompt = requirement_prompt(&Requirement::new("A", "B"));
        assert!(!prompt.contains("Category:"));
    }

    #[test]
    fn test_standalone_prompt_embeds_structure() {
        let prompt = standalone_prompt(&Requirement::new("A", "B"), "{\"k\": 1}");
        assert!(prompt.contains("Requirement Name: A\n"));
        assert!(prompt.contains("Document Structure:\n{\"k\": 1}"));
        assert!(prompt.contains("Confidence: 0.0-1.0"));
    }
}
