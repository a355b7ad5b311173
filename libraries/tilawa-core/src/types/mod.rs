mod chapter;
mod download;
mod ids;
mod reciter;

pub use chapter::{ChapterInfo, RevelationType, CHAPTER_COUNT};
pub use download::{DownloadedTrack, StoredTrack};
pub use ids::{ReciterId, TrackKey};
pub use reciter::{single_file_url, ReciterInfo, ReciterSource};
