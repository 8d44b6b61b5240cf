// Document understanding collaborators.
// Text extraction from uploads, CV structuring and JD structuring.
// All model calls go through llm_client.

pub mod cv_parser;
pub mod handlers;
pub mod jd_parser;
pub mod prompts;
pub mod text;

use serde::{Deserialize, Deserializer};

/// Models occasionally emit `null` where a list or string is expected.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
