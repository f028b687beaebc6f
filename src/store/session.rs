use chrono::{DateTime, Local};

/// One successful exchange in the current interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub timestamp: DateTime<Local>,
    pub function_type: String,
    pub style: String,
    pub query: String,
    pub response: String,
}

/// In-memory, per-process history. Nothing here survives the session.
#[derive(Debug, Default)]
pub struct SessionHistory {
    entries: Vec<SessionEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, function_type: &str, style: &str, query: &str, response: &str) {
        self.entries.push(SessionEntry {
            timestamp: Local::now(),
            function_type: function_type.to_string(),
            style: style.to_string(),
            query: query.to_string(),
            response: response.to_string(),
        });
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut history = SessionHistory::new();
        assert!(history.is_empty());
        history.record("question_answering", "factual", "first", "a");
        history.record("creative_generation", "innovative", "second", "b");
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].query, "first");
        assert_eq!(history.entries()[1].style, "innovative");
        assert!(history.entries()[0].timestamp <= history.entries()[1].timestamp);
    }
}
