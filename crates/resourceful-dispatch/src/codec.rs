//! Representation codecs keyed by media type

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use resourceful_negotiation::MediaType;
use serde_json::{Map, Value};

use crate::error::CodecError;

pub const JSON: &str = "application/json";
pub const PLAIN_TEXT: &str = "text/plain";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Converts between bytes and the structured value handlers work with.
pub trait Codec: Send + Sync {
	/// Essence (`type/subtype`) this codec handles
	fn media_type(&self) -> &str;

	fn encode(&self, data: &Value) -> Result<Bytes, CodecError>;

	fn decode(&self, body: &[u8]) -> Result<Value, CodecError>;
}

pub struct JsonCodec;

impl Codec for JsonCodec {
	fn media_type(&self) -> &str {
		JSON
	}

	fn encode(&self, data: &Value) -> Result<Bytes, CodecError> {
		serde_json::to_vec(data)
			.map(Bytes::from)
			.map_err(|e| CodecError::Encode {
				media_type: JSON.to_string(),
				message: e.to_string(),
			})
	}

	fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
		serde_json::from_slice(body).map_err(|e| CodecError::Decode {
			media_type: JSON.to_string(),
			message: e.to_string(),
		})
	}
}

/// Strings pass through; other values are written in their JSON form.
/// Decoding yields a string.
pub struct PlainTextCodec;

impl Codec for PlainTextCodec {
	fn media_type(&self) -> &str {
		PLAIN_TEXT
	}

	fn encode(&self, data: &Value) -> Result<Bytes, CodecError> {
		Ok(match data {
			Value::String(s) => Bytes::from(s.clone()),
			other => Bytes::from(other.to_string()),
		})
	}

	fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
		std::str::from_utf8(body)
			.map(|s| Value::String(s.to_string()))
			.map_err(|e| CodecError::Decode {
				media_type: PLAIN_TEXT.to_string(),
				message: e.to_string(),
			})
	}
}

/// Flat objects of scalars. Decoding yields an object of strings; a key
/// repeated in the body keeps its last value.
pub struct FormCodec;

impl Codec for FormCodec {
	fn media_type(&self) -> &str {
		FORM_URLENCODED
	}

	fn encode(&self, data: &Value) -> Result<Bytes, CodecError> {
		serde_urlencoded::to_string(data)
			.map(Bytes::from)
			.map_err(|e| CodecError::Encode {
				media_type: FORM_URLENCODED.to_string(),
				message: e.to_string(),
			})
	}

	fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
		let pairs: Vec<(String, String)> =
			serde_urlencoded::from_bytes(body).map_err(|e| CodecError::Decode {
				media_type: FORM_URLENCODED.to_string(),
				message: e.to_string(),
			})?;
		let object: Map<String, Value> = pairs
			.into_iter()
			.map(|(k, v)| (k, Value::String(v)))
			.collect();
		Ok(Value::Object(object))
	}
}

/// Registry of codecs. [`CodecRegistry::default`] knows JSON, plain text
/// and form encoding.
///
/// Lookups fall back on structured syntax suffixes, so a
/// `application/vnd.example+json` representation uses the JSON codec.
///
/// # Examples
///
/// ```
/// use resourceful_dispatch::codec::CodecRegistry;
/// use resourceful_negotiation::MediaType;
///
/// let registry = CodecRegistry::default();
/// let vendor = MediaType::parse("application/vnd.example+json; version=2").unwrap();
/// assert_eq!(registry.get(&vendor).unwrap().media_type(), "application/json");
/// assert!(registry.get(&MediaType::parse("image/png").unwrap()).is_none());
/// ```
#[derive(Clone)]
pub struct CodecRegistry {
	codecs: HashMap<String, Arc<dyn Codec>>,
}

impl CodecRegistry {
	/// Registry with no codecs
	pub fn empty() -> Self {
		Self {
			codecs: HashMap::new(),
		}
	}

	/// Register `codec` under its media type, replacing any previous one
	pub fn register(mut self, codec: impl Codec + 'static) -> Self {
		let key = codec.media_type().to_ascii_lowercase();
		self.codecs.insert(key, Arc::new(codec));
		self
	}

	pub fn get(&self, media_type: &MediaType) -> Option<&Arc<dyn Codec>> {
		if let Some(codec) = self.codecs.get(&media_type.essence()) {
			return Some(codec);
		}
		let (_, suffix) = media_type.subtype().rsplit_once('+')?;
		self.codecs.get(&format!("{}/{}", media_type.main_type(), suffix))
	}

	pub fn contains(&self, media_type: &MediaType) -> bool {
		self.get(media_type).is_some()
	}

	pub fn encode(&self, media_type: &MediaType, data: &Value) -> Result<Bytes, CodecError> {
		self.get(media_type)
			.ok_or_else(|| CodecError::Unsupported(media_type.essence()))?
			.encode(data)
	}

	pub fn decode(&self, media_type: &MediaType, body: &[u8]) -> Result<Value, CodecError> {
		self.get(media_type)
			.ok_or_else(|| CodecError::Unsupported(media_type.essence()))?
			.decode(body)
	}
}

impl Default for CodecRegistry {
	fn default() -> Self {
		Self::empty()
			.register(JsonCodec)
			.register(PlainTextCodec)
			.register(FormCodec)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn media(s: &str) -> MediaType {
		MediaType::parse(s).unwrap()
	}

	#[rstest]
	fn test_json_round_trip() {
		let registry = CodecRegistry::default();
		let data = json!({"name": "widget", "count": 3});

		let body = registry.encode(&media(JSON), &data).unwrap();
		let decoded = registry.decode(&media("application/json; charset=utf-8"), &body).unwrap();

		assert_eq!(decoded, data);
	}

	#[rstest]
	fn test_invalid_json_is_decode_error() {
		let result = CodecRegistry::default().decode(&media(JSON), b"{not json");
		assert!(matches!(result, Err(CodecError::Decode { .. })));
	}

	#[rstest]
	#[case(json!("hello"), "hello")]
	#[case(json!(42), "42")]
	#[case(json!({"a": 1}), r#"{"a":1}"#)]
	fn test_plain_text_encode(#[case] data: Value, #[case] expected: &str) {
		let body = PlainTextCodec.encode(&data).unwrap();
		assert_eq!(&body[..], expected.as_bytes());
	}

	#[rstest]
	fn test_plain_text_rejects_invalid_utf8() {
		assert!(PlainTextCodec.decode(&[0xff, 0xfe]).is_err());
	}

	#[rstest]
	fn test_form_decode() {
		let decoded = FormCodec.decode(b"name=sprocket&size=large+ish").unwrap();
		assert_eq!(decoded, json!({"name": "sprocket", "size": "large ish"}));
	}

	#[rstest]
	fn test_form_encode_flat_object() {
		let body = FormCodec.encode(&json!({"q": "a b"})).unwrap();
		assert_eq!(&body[..], b"q=a+b");
	}

	#[rstest]
	fn test_form_encode_rejects_nested() {
		assert!(FormCodec.encode(&json!({"q": {"nested": true}})).is_err());
	}

	#[rstest]
	fn test_unknown_media_type() {
		let result = CodecRegistry::default().encode(&media("image/png"), &json!(null));
		assert!(matches!(result, Err(CodecError::Unsupported(t)) if t == "image/png"));
	}

	#[rstest]
	fn test_register_replaces() {
		struct Shouting;
		impl Codec for Shouting {
			fn media_type(&self) -> &str {
				PLAIN_TEXT
			}
			fn encode(&self, data: &Value) -> Result<Bytes, CodecError> {
				Ok(Bytes::from(data.as_str().unwrap_or_default().to_uppercase()))
			}
			fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
				PlainTextCodec.decode(body)
			}
		}

		let registry = CodecRegistry::default().register(Shouting);
		let body = registry.encode(&media("text/plain"), &json!("hi")).unwrap();

		assert_eq!(&body[..], b"HI");
	}
}
