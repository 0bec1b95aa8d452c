use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_POLL_MS: u64 = 250;
const DEFAULT_ART_KEY: u8 = 6;
const DEFAULT_FAVORITE_KEY: u8 = 5;
const DEFAULT_FAVORITES_PATH: &str = "favorites.txt";
const DEFAULT_BRIGHTNESS: u8 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub poll_interval: Duration,
    pub album_art_key: u8,
    pub favorite_key: u8,
    pub strip_segment: u8,
    pub favorites_path: PathBuf,
    pub font_path: Option<PathBuf>,
    pub brightness: u8,
}

impl Config {
    pub fn from_env() -> Self {
        let poll_ms = parse_env("TRACKDECK_POLL_MS", DEFAULT_POLL_MS).max(50);

        Self {
            poll_interval: Duration::from_millis(poll_ms),
            album_art_key: parse_env("TRACKDECK_ART_KEY", DEFAULT_ART_KEY),
            favorite_key: parse_env("TRACKDECK_FAVORITE_KEY", DEFAULT_FAVORITE_KEY),
            // The strip is addressed as four 200px segments; 0 = full width
            strip_segment: parse_env("TRACKDECK_STRIP_SEGMENT", 0u8).min(3),
            favorites_path: std::env::var("TRACKDECK_FAVORITES")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_FAVORITES_PATH)),
            font_path: std::env::var("TRACKDECK_FONT").ok().map(PathBuf::from),
            brightness: parse_env("TRACKDECK_BRIGHTNESS", DEFAULT_BRIGHTNESS).min(100),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests don't interfere with each other
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "TRACKDECK_POLL_MS",
        "TRACKDECK_ART_KEY",
        "TRACKDECK_FAVORITE_KEY",
        "TRACKDECK_STRIP_SEGMENT",
        "TRACKDECK_FAVORITES",
        "TRACKDECK_FONT",
        "TRACKDECK_BRIGHTNESS",
    ];

    fn clear_vars() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_from_env_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_vars();

        let config = Config::from_env();
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.album_art_key, 6);
        assert_eq!(config.favorite_key, 5);
        assert_eq!(config.strip_segment, 0);
        assert_eq!(config.favorites_path, PathBuf::from("favorites.txt"));
        assert!(config.font_path.is_none());
        assert_eq!(config.brightness, 50);
    }

    #[test]
    fn test_from_env_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_vars();

        std::env::set_var("TRACKDECK_POLL_MS", "1000");
        std::env::set_var("TRACKDECK_ART_KEY", "7");
        std::env::set_var("TRACKDECK_FAVORITE_KEY", "0");
        std::env::set_var("TRACKDECK_STRIP_SEGMENT", "1");
        std::env::set_var("TRACKDECK_FAVORITES", "/tmp/favs.txt");
        std::env::set_var("TRACKDECK_FONT", "/tmp/font.ttf");
        std::env::set_var("TRACKDECK_BRIGHTNESS", "80");

        let config = Config::from_env();
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
        assert_eq!(config.album_art_key, 7);
        assert_eq!(config.favorite_key, 0);
        assert_eq!(config.strip_segment, 1);
        assert_eq!(config.favorites_path, PathBuf::from("/tmp/favs.txt"));
        assert_eq!(config.font_path, Some(PathBuf::from("/tmp/font.ttf")));
        assert_eq!(config.brightness, 80);

        clear_vars();
    }

    #[test]
    fn test_from_env_clamps_out_of_range() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_vars();

        std::env::set_var("TRACKDECK_POLL_MS", "1");
        std::env::set_var("TRACKDECK_STRIP_SEGMENT", "9");
        std::env::set_var("TRACKDECK_BRIGHTNESS", "250");

        let config = Config::from_env();
        // A 1ms poll would hammer the HID transport; floor at 50ms
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.strip_segment, 3);
        assert_eq!(config.brightness, 100);

        clear_vars();
    }

    #[test]
    fn test_from_env_ignores_malformed_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_vars();

        std::env::set_var("TRACKDECK_POLL_MS", "soon");
        std::env::set_var("TRACKDECK_ART_KEY", "-3");

        let config = Config::from_env();
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.album_art_key, 6);

        clear_vars();
    }
}
