//! ID3 tag enrichment for downloaded tracks
//!
//! After a payload is written and before the record persists, the download
//! worker hands the file here to get title/artist/album tags and, when the
//! track has artwork, an embedded front cover. Failures are the worker's to
//! log and swallow; nothing here touches the archive record.

use crate::api::Client;
use crate::error::Result;
use crate::types::Track;
use id3::frame::{Content, Picture, PictureType};
use id3::{Frame, Tag, TagLike, Version};
use std::path::Path;

/// Album name written to every archived track
const ALBUM: &str = "Soundcloud Tracks";

/// Write ID3 tags (and artwork, if any) into a downloaded track file
pub async fn tag_track_file(client: &Client, track_file: &Path, track: &Track) -> Result<()> {
    // Start from existing tags when the payload already carries some
    let mut tag = Tag::read_from_path(track_file).unwrap_or_else(|_| Tag::new());

    tag.set_title(&track.title);
    tag.set_artist(&track.username);
    tag.set_album(ALBUM);

    if let Some(artwork_url) = &track.artwork_url {
        // The API's default artwork variant is 100x100; ask for 500x500
        let artwork_url = artwork_url.replace("-large.jpg", "-t500x500.jpg");
        match client.fetch_artwork(&artwork_url).await {
            Ok(data) => {
                tag.add_frame(Frame::with_content(
                    "APIC",
                    Content::Picture(Picture {
                        mime_type: "image/jpeg".to_string(),
                        picture_type: PictureType::CoverFront,
                        description: String::new(),
                        data,
                    }),
                ));
            }
            Err(e) => {
                tracing::warn!(
                    track_id = %track.id,
                    url = %artwork_url,
                    error = %e,
                    "failed to fetch artwork, tagging without it"
                );
            }
        }
    }

    // Tag writing is blocking file I/O; fine for these file sizes
    tag.write_to_path(track_file, Version::Id3v24)?;
    Ok(())
}
