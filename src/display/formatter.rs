use crate::models::TrackInfo;

/// What the strip shows when no media session is active.
pub const NOTHING_PLAYING: &str = "Nothing playing";

/// Build the touch-strip label for a track: "Artist – Title".
///
/// Falls back to the title alone when the artist is unknown, and to
/// [`NOTHING_PLAYING`] for the empty snapshot. Deterministic: the updater
/// compares rendered state by re-running this function.
pub fn strip_label(track: &TrackInfo) -> String {
    if track.is_empty() {
        return NOTHING_PLAYING.to_string();
    }

    let title = clean(&track.title);
    let artist = clean(&track.artist);

    if artist.is_empty() {
        title
    } else if title.is_empty() {
        artist
    } else {
        format!("{artist} – {title}")
    }
}

/// Collapse control characters (some players ship titles with embedded
/// newlines) and trim surrounding whitespace.
fn clean(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_label_artist_and_title() {
        let track = TrackInfo::new("Bohemian Rhapsody", "Queen");
        assert_eq!(strip_label(&track), "Queen – Bohemian Rhapsody");
    }

    #[test]
    fn test_strip_label_title_only() {
        let track = TrackInfo::new("Untitled Demo", "");
        assert_eq!(strip_label(&track), "Untitled Demo");
    }

    #[test]
    fn test_strip_label_artist_only() {
        let track = TrackInfo::new("", "Aphex Twin");
        assert_eq!(strip_label(&track), "Aphex Twin");
    }

    #[test]
    fn test_strip_label_nothing_playing() {
        assert_eq!(strip_label(&TrackInfo::default()), NOTHING_PLAYING);
    }

    #[test]
    fn test_strip_label_is_deterministic() {
        let track = TrackInfo::new("Song A", "Artist A");
        assert_eq!(strip_label(&track), strip_label(&track.clone()));
    }

    #[test]
    fn test_clean_strips_control_chars() {
        let track = TrackInfo::new("Line\nBreak\tTitle", "  Padded Artist  ");
        assert_eq!(strip_label(&track), "Padded Artist – Line Break Title");
    }

    #[test]
    fn test_whitespace_only_fields_treated_as_missing() {
        // "   " is not empty by is_empty(), but cleans down to nothing; the
        // label should not end up with a dangling separator.
        let track = TrackInfo::new("Song", "   ");
        assert_eq!(strip_label(&track), "Song");
    }

    #[test]
    fn test_unicode_preserved() {
        let track = TrackInfo::new("さくら", "宇多田ヒカル");
        assert_eq!(strip_label(&track), "宇多田ヒカル – さくら");
    }
}
