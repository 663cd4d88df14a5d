use std::borrow::Cow;

use serde::Deserialize;

use super::de;

const STATIC_HOST: &str = "https://live.staticflickr.com";
const DEFAULT_EXTENSION: &str = "jpg";

/// Which rendition of a photo to download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Size {
    Original,
    #[default]
    Medium,
}

impl Size {
    /// The `extras` field Flickr fills with the URL of this size.
    pub fn extra(self) -> &'static str {
        match self {
            Self::Original => "url_o",
            Self::Medium => "url_m",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    id: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    secret: String,
    #[serde(default)]
    server: String,
    #[serde(default)]
    title: String,
    #[serde(default, deserialize_with = "de::optional_number")]
    license: Option<u32>,
    #[serde(default)]
    originalsecret: Option<String>,
    #[serde(default)]
    originalformat: Option<String>,
    #[serde(default)]
    url_o: Option<String>,
    #[serde(default)]
    url_m: Option<String>,
}

impl Photo {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn license(&self) -> Option<u32> {
        self.license
    }

    /// URL of the requested size. The URL extra wins; otherwise it is
    /// rebuilt from the server and secret tokens.
    pub fn file_url(&self, size: Size) -> Option<Cow<'_, str>> {
        match size {
            Size::Original => self.url_o.as_deref().map(Cow::Borrowed).or_else(|| {
                let secret = non_empty(self.originalsecret.as_deref())?;
                let format = non_empty(self.originalformat.as_deref())?;
                let server = non_empty(Some(self.server.as_str()))?;

                Some(Cow::Owned(format!(
                    "{STATIC_HOST}/{server}/{}_{secret}_o.{format}",
                    self.id
                )))
            }),

            Size::Medium => self.url_m.as_deref().map(Cow::Borrowed).or_else(|| {
                let secret = non_empty(Some(self.secret.as_str()))?;
                let server = non_empty(Some(self.server.as_str()))?;

                Some(Cow::Owned(format!(
                    "{STATIC_HOST}/{server}/{}_{secret}.jpg",
                    self.id
                )))
            }),
        }
    }

    /// `<id>.<ext>`, with the extension taken from `url`.
    ///
    /// `None` when the id is not plain ASCII alphanumerics, so two ids
    /// never share a file name.
    pub fn file_name(&self, url: &str) -> Option<String> {
        if self.id.is_empty() || !self.id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        Some(format!(
            "{}.{}",
            self.id,
            extension(url).unwrap_or(DEFAULT_EXTENSION)
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;

    let valid = !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric());

    valid.then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(json: serde_json::Value) -> Photo {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn prefers_url_extras() {
        let photo = photo(serde_json::json!({
            "id": "53011",
            "server": "65535",
            "secret": "abc",
            "url_o": "https://live.staticflickr.com/65535/53011_zz_o.png",
            "url_m": "https://live.staticflickr.com/65535/53011_abc.jpg",
        }));

        assert_eq!(
            photo.file_url(Size::Original).as_deref(),
            Some("https://live.staticflickr.com/65535/53011_zz_o.png")
        );
        assert_eq!(
            photo.file_url(Size::Medium).as_deref(),
            Some("https://live.staticflickr.com/65535/53011_abc.jpg")
        );
    }

    #[test]
    fn builds_urls_from_tokens() {
        let photo = photo(serde_json::json!({
            "id": "42",
            "owner": "12@N00",
            "server": "7",
            "secret": "s3cr3t",
            "originalsecret": "0r1g",
            "originalformat": "png",
        }));

        assert_eq!(
            photo.file_url(Size::Medium).as_deref(),
            Some("https://live.staticflickr.com/7/42_s3cr3t.jpg")
        );
        assert_eq!(
            photo.file_url(Size::Original).as_deref(),
            Some("https://live.staticflickr.com/7/42_0r1g_o.png")
        );
    }

    #[test]
    fn original_needs_original_secret() {
        let photo = photo(serde_json::json!({
            "id": "42",
            "server": "7",
            "secret": "s3cr3t",
        }));

        assert!(photo.file_url(Size::Original).is_none());
        assert!(photo.file_url(Size::Medium).is_some());
    }

    #[test]
    fn license_accepts_string_or_number() {
        let quoted = photo(serde_json::json!({ "id": "1", "license": "4" }));
        let bare = photo(serde_json::json!({ "id": "2", "license": 9 }));
        let missing = photo(serde_json::json!({ "id": "3" }));

        assert_eq!(quoted.license(), Some(4));
        assert_eq!(bare.license(), Some(9));
        assert_eq!(missing.license(), None);
    }

    #[test]
    fn file_name_uses_id_and_url_extension() {
        let photo = photo(serde_json::json!({ "id": "53011" }));

        assert_eq!(
            photo
                .file_name("https://live.staticflickr.com/65535/53011_zz_o.png")
                .as_deref(),
            Some("53011.png")
        );
        assert_eq!(
            photo.file_name("http://127.0.0.1:8080/img/53011?x=1.y").as_deref(),
            Some("53011.jpg")
        );
        assert_eq!(
            photo.file_name("http://host/53011.jpeg?size=m").as_deref(),
            Some("53011.jpeg")
        );
    }

    #[test]
    fn file_name_never_escapes_directory() {
        let photo = photo(serde_json::json!({ "id": "../../etc/passwd" }));

        assert_eq!(photo.file_name("http://host/a.gif"), None);
    }

    #[test]
    fn distinct_ids_never_share_a_file_name() {
        let dashed = photo(serde_json::json!({ "id": "a-b" }));
        let underscored = photo(serde_json::json!({ "id": "a_b" }));
        let empty = photo(serde_json::json!({ "id": "" }));

        assert_eq!(dashed.file_name("http://host/x.jpg"), None);
        assert_eq!(underscored.file_name("http://host/x.jpg"), None);
        assert_eq!(empty.file_name("http://host/x.jpg"), None);
    }
}
