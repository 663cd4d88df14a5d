mod license;
mod page;
mod photo;

pub use license::LicenseFilter;
pub use page::{PhotoPage, SearchPage, SearchResponse};
pub use photo::{Photo, Size};

/// Flickr reports counters either as JSON numbers or as quoted strings,
/// depending on the field and the API version.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(u64),
        Text(String),
    }

    impl Number {
        fn into_u64<E: Error>(self) -> Result<u64, E> {
            match self {
                Self::Int(n) => Ok(n),
                Self::Text(s) => s
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid number '{s}'"))),
            }
        }
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        let n = Number::deserialize(deserializer)?.into_u64::<D::Error>()?;

        T::try_from(n).map_err(|_| D::Error::custom(format!("number {n} out of range")))
    }

    pub fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        match Option::<Number>::deserialize(deserializer)? {
            Some(Number::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(n) => {
                let n = n.into_u64::<D::Error>()?;
                T::try_from(n)
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("number {n} out of range")))
            }
            None => Ok(None),
        }
    }
}
