use std::fmt::Write;

use crate::search::SearchHit;

/// Placeholder in [`ResponseTemplate::intro`] replaced by the user's query.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Fixed texts used to compose bot answers.
///
/// The steps are static: every answer carries the same list, whatever the
/// query or the hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTemplate {
    pub apology: String,
    pub intro: String,
    pub steps: Vec<String>,
    pub citations_heading: String,
}

impl Default for ResponseTemplate {
    fn default() -> Self {
        Self {
            apology: "Xin lỗi, tôi không tìm thấy thông tin phù hợp trong tài liệu. Vui lòng thử câu hỏi khác!".to_string(),
            intro: "Đây là hướng dẫn cho câu hỏi \"{query}\":".to_string(),
            steps: vec![
                "Truy cập dashboard OptiSigns.".to_string(),
                "Chọn playlist hoặc screen.".to_string(),
                "Nhấn Add Content → chọn YouTube.".to_string(),
                "Dán link video và lưu.".to_string(),
            ],
            citations_heading: "Chi tiết tham khảo:".to_string(),
        }
    }
}

impl ResponseTemplate {
    /// Compose the bot answer for `query`, or the apology when nothing matched.
    pub fn format(&self, hits: &[SearchHit], query: &str) -> String {
        if hits.is_empty() {
            return self.apology.clone();
        }

        let mut answer = self.intro.replace(QUERY_PLACEHOLDER, query);
        answer.push_str("\n\n");

        if !self.steps.is_empty() {
            answer.push_str(&self.steps_block());
            answer.push('\n');
        }

        answer.push_str(&self.citations_heading);
        answer.push('\n');
        for (index, hit) in hits.iter().enumerate() {
            let _ = writeln!(answer, "- **Article {}:** {}", index + 1, hit.title);
            let _ = writeln!(answer, "  **Article URL:** {}", hit.url);
            answer.push('\n');
        }

        answer
    }

    /// The step block exactly as it appears inside a formatted answer.
    pub fn steps_block(&self) -> String {
        self.steps.iter().map(|step| format!("- {step}\n")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseTemplate;
    use crate::SearchHit;

    #[test]
    fn query_with_braces_is_inserted_verbatim() {
        let template = ResponseTemplate {
            intro: "Q: {query}".to_string(),
            steps: Vec::new(),
            ..ResponseTemplate::default()
        };
        let hit = SearchHit {
            title: "T".to_string(),
            url: "https://example.com".to_string(),
            snippet: String::new(),
        };
        let out = template.format(&[hit], "{query} {x}");
        assert!(out.starts_with("Q: {query} {x}\n\n"));
    }
}
