//! Search queries and LLM prompts for title summarization.

/// Summary used when nothing notable could be found.
pub const UNKNOWN: &str = "unknown";

pub const SYSTEM_PROMPT: &str = "\
You are an expert at identifying notable academic and professional titles.

The user will provide the full text extracted from several web pages about a person.
Write a SHORT summary (1-2 sentences, ideally under 120 chars) listing ONLY their \
most impressive / noteworthy titles.

Include things like:
- Institutional affiliation & academic rank  (e.g. \"Professor at Stanford\")
- Lab / centre leadership  (e.g. \"Director of XXX Lab\")
- Society fellowships  (e.g. \"ACM Fellow, IEEE Fellow\")
- Academy memberships  (e.g. \"Member of Chinese Academy of Sciences\")
- Major awards  (e.g. \"Turing Award laureate\")

Rules:
- Output ONLY the summary text, no JSON, no markdown, no preamble.
- Be concise: drop generic info, keep only the impressive stuff.
- If nothing notable is found, output exactly: unknown
- Use English.
";

/// A fetched page handed to the LLM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub url: String,
    pub text: String,
}

/// The two queries issued per person.
#[must_use]
pub fn search_queries(name: &str) -> [String; 2] {
    [
        format!("\"{name}\" professor university"),
        format!("\"{name}\" fellow OR homepage OR \"google scholar\""),
    ]
}

#[must_use]
pub fn build_user_prompt(name: &str, pages: &[PageText]) -> String {
    let mut parts = vec![format!("Summarize the notable titles for: {name}\n")];
    for (i, page) in pages.iter().enumerate() {
        parts.push(format!("--- Page {}: {} ---", i + 1, page.url));
        parts.push(page.text.clone());
        parts.push(String::new());
    }
    parts.join("\n")
}

/// Strip quotes and whitespace from an LLM reply; empty becomes [`UNKNOWN`].
#[must_use]
pub fn clean_summary(reply: &str) -> String {
    let cleaned = reply.trim().trim_matches('"').trim();
    if cleaned.is_empty() { UNKNOWN.to_string() } else { cleaned.to_string() }
}
