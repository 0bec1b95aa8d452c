/// Snapshot of the active media session at one poll.
///
/// The default value is the "nothing playing" snapshot. Display identity is
/// title + artist; artwork is tracked separately because it can change
/// without the text changing (and vice versa).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    pub artwork: Option<Vec<u8>>,
}

impl TrackInfo {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            artwork: None,
        }
    }

    /// True for the "nothing playing" snapshot.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty()
    }

    /// Same title + artist, ignoring artwork.
    pub fn same_display(&self, other: &TrackInfo) -> bool {
        self.title == other.title && self.artist == other.artist
    }

    /// Same raw artwork bytes (presence and identity, never decoded content).
    pub fn same_artwork(&self, other: &TrackInfo) -> bool {
        self.artwork == other.artwork
    }

    /// One line for the favorites log: `<title> - <artist>`, title alone
    /// when the artist is unknown.
    pub fn favorites_line(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}
