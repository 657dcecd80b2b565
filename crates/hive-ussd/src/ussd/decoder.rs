/// Separator the gateway places between the answers of consecutive screens.
pub const FIELD_DELIMITER: char = '*';

/// Answers submitted so far, oldest first. Index 0 is always the language selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    entries: Vec<String>,
}

impl SessionHistory {
    /// Current menu depth: the number of answers already submitted.
    pub fn level(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Joins the history back into the gateway's wire encoding.
    pub fn to_wire(&self) -> String {
        self.entries.join(&FIELD_DELIMITER.to_string())
    }

    /// History as it will look once the caller submits `input` on the current screen.
    pub fn extended(&self, input: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.push(input.trim().to_string());
        Self { entries }
    }
}

/// Splits the cumulative gateway text into per-screen answers. Never fails: malformed
/// fields are passed through untouched for validation to reject later.
pub fn decode(raw_text: &str) -> SessionHistory {
    if raw_text.is_empty() {
        return SessionHistory::default();
    }

    let entries = raw_text
        .split(FIELD_DELIMITER)
        .map(|field| field.trim().to_string())
        .collect();

    SessionHistory { entries }
}
