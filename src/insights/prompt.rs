use crate::crawler::truncate_chars;

const RESPONSE_SHAPE: &str = r#"{
  "aiVisibilityScore": number 0-100,
  "semanticClarity": number 0-100,
  "aiSummary": string,
  "optimizedTitle": string (at most 60 characters),
  "optimizedDescription": string (at most 155 characters),
  "suggestedFaqs": [{"question": string, "answer": string}],
  "contentSuggestions": [string],
  "sampleRewrite": string (one paragraph of the page rewritten for clarity)
}"#;

/// Builds the summarizer prompt for one page
///
/// The page text is cut to `max_chars` characters so the prompt stays within
/// the model's input budget.
pub fn build_prompt(url: &str, text: &str, keywords: &[String], max_chars: usize) -> String {
    let keywords = if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords.join(", ")
    };

    format!(
        "You are an SEO analyst. Assess how well the following web page can be \
         understood, summarized and cited by AI assistants and search engines.\n\n\
         URL: {url}\n\
         Target keywords: {keywords}\n\n\
         Page text:\n\"\"\"\n{text}\n\"\"\"\n\n\
         Respond with a single JSON object of exactly this shape and nothing else:\n\
         {shape}\n",
        url = url,
        keywords = keywords,
        text = truncate_chars(text, max_chars),
        shape = RESPONSE_SHAPE,
    )
}
