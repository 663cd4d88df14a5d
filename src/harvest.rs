//! Search pages for a word and save every matching photo.

use std::{
    borrow::Cow,
    fmt, fs,
    ops::{AddAssign, Range},
    path::Path,
};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    config::word_dir_name,
    flickr::{Client, LicenseFilter, Photo, PhotoPage, Result, SearchPage, SearchQuery, Size},
};

/// Flickr caps `per_page` at this value.
pub const MAX_PER_PAGE: u32 = 500;

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub license: LicenseFilter,
    pub per_page: u32,
    pub start_page: u32,
    pub max_pages: u32,
    pub size: Size,
    /// Also write every result page as `<word>_<page>.json` and its
    /// image URLs as `<word>_<page>_url.json`.
    pub dump_json: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            license: LicenseFilter::default(),
            per_page: MAX_PER_PAGE,
            start_page: 1,
            max_pages: 8,
            size: Size::Medium,
            dump_json: false,
        }
    }
}

impl HarvestOptions {
    /// Page numbers to request, before the API cuts the run short.
    pub fn pages(&self) -> Range<u32> {
        let start = self.start_page.max(1);

        start..start.saturating_add(self.max_pages)
    }
}

/// One entry of the `<word>_<page>_url.json` listing.
#[derive(Debug, Serialize)]
struct PhotoUrls<'a> {
    key: &'a str,
    url_m: Option<Cow<'a, str>>,
    url_o: Option<Cow<'a, str>>,
}

impl<'a> From<&'a Photo> for PhotoUrls<'a> {
    fn from(photo: &'a Photo) -> Self {
        Self {
            key: photo.id(),
            url_m: photo.file_url(Size::Medium),
            url_o: photo.file_url(Size::Original),
        }
    }
}

/// Counters for one word or a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub pages: u32,
    pub downloaded: u32,
    /// Rejected by the license filter.
    pub filtered: u32,
    /// No URL for the requested size, or an id unusable as a file name.
    pub unavailable: u32,
    pub failed: u32,
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Self) {
        self.pages += other.pages;
        self.downloaded += other.downloaded;
        self.filtered += other.filtered;
        self.unavailable += other.unavailable;
        self.failed += other.failed;
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages, {} downloaded, {} filtered by license, {} without url, {} failed",
            self.pages, self.downloaded, self.filtered, self.unavailable, self.failed
        )
    }
}

#[derive(Debug, Clone)]
pub struct Harvester {
    client: Client,
    options: HarvestOptions,
}

impl Harvester {
    pub fn new(client: Client, options: HarvestOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &HarvestOptions {
        &self.options
    }

    /// Runs every word into its own sub-directory of `root`.
    pub async fn harvest_words<S: AsRef<str>>(&self, words: &[S], root: &Path) -> Result<Stats> {
        let mut stats = Stats::default();

        for word in words {
            let word = word.as_ref();
            let dir = root.join(word_dir_name(word));

            stats += self.harvest_word(word, &dir).await?;
        }

        info!(words = words.len(), "finished: {stats}");

        Ok(stats)
    }

    /// Pages through the results for `word`, saving photos into `dir`.
    ///
    /// Stops after `max_pages` pages, on the last page the API reports,
    /// or on an empty page. A failed search aborts; a failed download
    /// is logged and skipped.
    pub async fn harvest_word(&self, word: &str, dir: &Path) -> Result<Stats> {
        fs::create_dir_all(dir)?;

        let mut stats = Stats::default();

        for page in self.options.pages() {
            info!(word, page, "start download");

            let query = SearchQuery {
                text: word,
                license: &self.options.license,
                per_page: self.options.per_page,
                page,
            };
            let search = self.client.search(&query).await?;
            let result = search.photos();
            stats.pages += 1;

            if self.options.dump_json {
                dump_page(&search, dir, &word_dir_name(word), page)?;
            }

            stats += self.download_page(result, dir).await;

            if result.photos().is_empty() {
                debug!(word, page, "empty page, stopping");
                break;
            }
            if result.is_last() {
                debug!(word, page, pages = result.pages(), "last page reached");
                break;
            }
        }

        info!(word, "{stats}");

        Ok(stats)
    }

    async fn download_page(&self, page: &PhotoPage, dir: &Path) -> Stats {
        let mut stats = Stats::default();
        let total = page.photos().len();

        for (index, photo) in page.photos().iter().enumerate() {
            if !self.options.license.allows(photo) {
                debug!(id = photo.id(), license = ?photo.license(), "license not allowed");
                stats.filtered += 1;
                continue;
            }

            let Some(url) = photo.file_url(self.options.size) else {
                warn!(id = photo.id(), size = ?self.options.size, "no url for photo");
                stats.unavailable += 1;
                continue;
            };

            let Some(file_name) = photo.file_name(&url) else {
                warn!(id = photo.id(), "photo id is not a usable file name");
                stats.unavailable += 1;
                continue;
            };
            let path = dir.join(file_name);

            info!("downloading {url} {}/{total}", index + 1);
            match self.save_photo(&url, &path).await {
                Ok(()) => stats.downloaded += 1,
                Err(err) => {
                    error!(id = photo.id(), %url, "download failed: {err}");
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    async fn save_photo(&self, url: &str, path: &Path) -> Result<()> {
        let data = self.client.download_photo(url).await?;

        fs::write(path, &data)?;

        Ok(())
    }
}

fn dump_page(search: &SearchPage, dir: &Path, prefix: &str, page: u32) -> Result<()> {
    let path = dir.join(format!("{prefix}_{page}.json"));
    fs::write(&path, serde_json::to_string_pretty(search.raw())?)?;

    let urls: Vec<PhotoUrls<'_>> = search.photos().photos().iter().map(PhotoUrls::from).collect();
    let path = dir.join(format!("{prefix}_{page}_url.json"));
    fs::write(&path, serde_json::to_string_pretty(&urls)?)?;

    Ok(())
}
