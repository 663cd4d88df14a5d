use std::{fmt, str::FromStr};

use super::Photo;
use crate::flickr::Error;

/// Set of Flickr license codes a photo must carry to be downloaded.
///
/// Codes are listed at
/// <https://www.flickr.com/services/api/flickr.photos.licenses.getInfo.html>.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseFilter {
    codes: Vec<u32>,
}

impl LicenseFilter {
    pub fn new<I: IntoIterator<Item = u32>>(codes: I) -> Self {
        let mut codes: Vec<u32> = codes.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();

        Self { codes }
    }

    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Photos without a license code never pass.
    pub fn allows(&self, photo: &Photo) -> bool {
        photo
            .license()
            .is_some_and(|code| self.codes.binary_search(&code).is_ok())
    }
}

impl Default for LicenseFilter {
    fn default() -> Self {
        Self::new([4])
    }
}

impl FromStr for LicenseFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let codes = s
            .split(',')
            .map(|code| code.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidLicense(s.to_string()))?;

        Ok(Self::new(codes))
    }
}

impl fmt::Display for LicenseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self.codes.iter().map(u32::to_string).collect();

        f.write_str(&codes.join(","))
    }
}
