//! Draft text and the web-search toggle

/// A draft handed off for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub web_search_enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputController {
    draft: String,
    web_search_enabled: bool,
}

impl InputController {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn web_search_enabled(&self) -> bool {
        self.web_search_enabled
    }

    pub fn set_web_search(&mut self, enabled: bool) {
        self.web_search_enabled = enabled;
    }

    /// Flip the toggle and return the new value
    pub fn toggle_web_search(&mut self) -> bool {
        self.web_search_enabled = !self.web_search_enabled;
        self.web_search_enabled
    }

    /// Take the trimmed draft, clearing it. Blank drafts stay put.
    pub fn dispatch(&mut self) -> Option<Submission> {
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }

        let submission = Submission {
            text: text.to_string(),
            web_search_enabled: self.web_search_enabled,
        };
        self.draft.clear();
        Some(submission)
    }
}
