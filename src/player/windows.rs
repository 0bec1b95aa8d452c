use anyhow::{Context, Result};
use tracing::debug;
use windows::Media::Control::{
    GlobalSystemMediaTransportControlsSessionManager,
    GlobalSystemMediaTransportControlsSessionMediaProperties,
};
use windows::Storage::Streams::{DataReader, IRandomAccessStreamReference, InputStreamOptions};

use super::MediaSource;
use crate::models::TrackInfo;

const THUMBNAIL_CHUNK: u32 = 64 * 1024;

/// Media source backed by the Windows global media transport controls
/// (the same sessions the system media overlay shows).
pub struct SystemMediaSource {
    manager: GlobalSystemMediaTransportControlsSessionManager,
}

impl SystemMediaSource {
    pub fn new() -> Result<Self> {
        let manager = GlobalSystemMediaTransportControlsSessionManager::RequestAsync()
            .context("failed to request media session manager")?
            .get()
            .context("media session manager unavailable")?;

        Ok(Self { manager })
    }
}

impl MediaSource for SystemMediaSource {
    fn now_playing(&mut self) -> Result<Option<TrackInfo>> {
        // No current session is the normal "nothing playing" state.
        let session = match self.manager.GetCurrentSession() {
            Ok(session) => session,
            Err(_) => return Ok(None),
        };

        let props = session
            .TryGetMediaPropertiesAsync()
            .context("failed to query media properties")?
            .get()
            .context("failed to read media properties")?;

        let title = props
            .Title()
            .map(|s| s.to_string_lossy().trim().to_string())
            .unwrap_or_default();
        let artist = props
            .Artist()
            .map(|s| s.to_string_lossy().trim().to_string())
            .unwrap_or_default();

        if title.is_empty() && artist.is_empty() {
            return Ok(None);
        }

        let artwork = match load_thumbnail(&props) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("failed to read thumbnail stream: {e:?}");
                None
            }
        };

        Ok(Some(TrackInfo {
            title,
            artist,
            artwork,
        }))
    }
}

/// Drain the session's thumbnail stream into a byte buffer, if present.
fn load_thumbnail(
    props: &GlobalSystemMediaTransportControlsSessionMediaProperties,
) -> windows::core::Result<Option<Vec<u8>>> {
    let reference: IRandomAccessStreamReference = match props.Thumbnail() {
        Ok(reference) => reference,
        Err(_) => return Ok(None),
    };

    let stream = reference.OpenReadAsync()?.get()?;
    let input_stream = stream.GetInputStreamAt(0)?;
    let reader = DataReader::CreateDataReader(&input_stream)?;
    reader.SetInputStreamOptions(InputStreamOptions::Partial)?;

    let mut buffer = Vec::new();
    loop {
        let loaded = reader.LoadAsync(THUMBNAIL_CHUNK)?.get()?;
        if loaded == 0 {
            break;
        }
        let mut chunk = vec![0u8; loaded as usize];
        reader.ReadBytes(&mut chunk)?;
        buffer.extend_from_slice(&chunk);
        if loaded < THUMBNAIL_CHUNK {
            break;
        }
    }

    Ok((!buffer.is_empty()).then_some(buffer))
}
