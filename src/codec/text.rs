//! Raw text codec

use crate::error::Result;

use super::Codec;

/// Identity codec for string values
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Codec for Text {
    type Value = String;

    fn encode(&self, value: &String) -> Result<String> {
        Ok(value.clone())
    }

    fn decode(&self, text: &str) -> Result<String> {
        Ok(text.to_owned())
    }
}
