/// ID3 tag metadata for one session.
///
/// Applied to the engine exactly once, before parameter finalization, and
/// never mutated afterward. A field left `None` is not written at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub comment: Option<String>,
}

impl TagMetadata {
    /// Whether no field is set. Engines skip tag initialization entirely
    /// for empty metadata.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.year.is_none()
            && self.comment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(TagMetadata::default().is_empty());
    }

    #[test]
    fn any_field_makes_it_non_empty() {
        let tags = TagMetadata {
            comment: Some("demo".into()),
            ..Default::default()
        };
        assert!(!tags.is_empty());
    }
}
