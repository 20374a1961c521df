/// Category tag the destination catalog puts on its own best guess
pub const TOP_RESULT: &str = "Top result";

/// One item of a destination search response.
///
/// Lives only while a single track is being matched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCandidate {
    /// destination-native id, nothing can be liked without it
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
}

impl SearchCandidate {
    pub fn is_top_result(&self) -> bool {
        self.category.as_deref() == Some(TOP_RESULT)
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.title.as_deref() == Some(title)
    }
}
