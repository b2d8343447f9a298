//! Literal segments of a tag-mode call.
//!
//! A [`Template`] is an ordered sequence of literal strings together with
//! their raw (as-written) form. Carrying the raw form is what marks a call to
//! [`build`](crate::build) as tag mode.

use std::sync::Arc;

/// The literal parts of a template, split at each `{}` slot marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Arc<[String]>,
    raw: Arc<[String]>,
}

impl Template {
    /// Build a template from already-split literal segments.
    ///
    /// The raw form is the segments themselves.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Arc<[String]> = segments.into_iter().map(Into::into).collect();
        Self {
            raw: Arc::clone(&segments),
            segments,
        }
    }

    /// Split `template` at every `{}` marker.
    ///
    /// `{{` and `}}` stand for literal braces in the cooked segments and are
    /// kept as written in [`Template::raw`]. A template with `n` markers
    /// always has `n + 1` segments.
    ///
    /// ```ignore
    /// let t = Template::parse("SELECT * FROM cars WHERE name = {}");
    /// assert_eq!(t.segments(), ["SELECT * FROM cars WHERE name = ", ""]);
    /// ```
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut raw = Vec::new();
        let mut cooked = String::new();
        let mut start = 0;
        let bytes = template.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            match (bytes[i], bytes.get(i + 1)) {
                (b'{', Some(b'{')) => {
                    cooked.push('{');
                    i += 2;
                }
                (b'}', Some(b'}')) => {
                    cooked.push('}');
                    i += 2;
                }
                (b'{', Some(b'}')) => {
                    segments.push(std::mem::take(&mut cooked));
                    raw.push(template[start..i].to_string());
                    i += 2;
                    start = i;
                }
                _ => {
                    // Braces and ASCII are single bytes; copy whole chars otherwise.
                    let ch_len = template[i..].chars().next().map_or(1, char::len_utf8);
                    cooked.push_str(&template[i..i + ch_len]);
                    i += ch_len;
                }
            }
        }
        segments.push(cooked);
        raw.push(template[start..].to_string());

        Self {
            segments: segments.into(),
            raw: raw.into(),
        }
    }

    /// Cooked literal segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Literal segments as written, before brace unescaping.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Number of slots this template expects.
    pub fn slot_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub(crate) fn shared_segments(&self) -> Arc<[String]> {
        Arc::clone(&self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_markers() {
        let t = Template::parse("SELECT * FROM {} WHERE id = {}");
        assert_eq!(t.segments(), ["SELECT * FROM ", " WHERE id = ", ""]);
        assert_eq!(t.slot_count(), 2);
    }

    #[test]
    fn no_markers_is_one_segment() {
        let t = Template::parse("SELECT 1");
        assert_eq!(t.segments(), ["SELECT 1"]);
        assert_eq!(t.slot_count(), 0);
    }

    #[test]
    fn escaped_braces_are_cooked_but_raw_is_kept() {
        let t = Template::parse("SELECT '{{}}' || {}");
        assert_eq!(t.segments(), ["SELECT '{}' || ", ""]);
        assert_eq!(t.raw(), ["SELECT '{{}}' || ", ""]);
    }

    #[test]
    fn adjacent_markers_produce_empty_segments() {
        let t = Template::parse("{}{}");
        assert_eq!(t.segments(), ["", "", ""]);
    }

    #[test]
    fn keeps_multibyte_text() {
        let t = Template::parse("SELECT 'héllo' = {}");
        assert_eq!(t.segments(), ["SELECT 'héllo' = ", ""]);
    }

    #[test]
    fn new_uses_segments_as_raw() {
        let t = Template::new(["a", "b"]);
        assert_eq!(t.raw(), t.segments());
    }
}
