//! Payload encoding for iWF.
//!
//! State inputs, signal values, query attribute values and state outputs
//! travel to and from the server as opaque strings. A [`PayloadCodec`]
//! turns a JSON value tree into that string and back; the typed helpers in
//! [`PayloadCodecExt`] handle the conversion between application types and
//! the tree.
//!
//! Decoding can be driven by a [`TypeDescriptor`] when the target type is
//! only known at runtime, e.g. when it comes from a registry lookup.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::EncodingError;

/// A decoded value whose concrete type is described by a [`TypeDescriptor`].
pub type DecodedValue = Box<dyn Any + Send + Sync>;

/// Trait for payload codecs
pub trait PayloadCodec: Send + Sync {
    /// Encode a value tree into its transport string
    fn encode_tree(&self, value: &Value) -> Result<String, EncodingError>;
    /// Decode a transport string into a value tree
    fn decode_tree(&self, raw: &str) -> Result<Value, EncodingError>;
}

/// Typed encode/decode on top of any [`PayloadCodec`].
pub trait PayloadCodecExt: PayloadCodec {
    /// Encode an optional value.
    ///
    /// Absent input, and values that serialize to `null`, encode to an absent
    /// payload rather than an error. JSON has no representation for NaN or
    /// infinite floats, so those serialize to `null` and are sent as an
    /// absent payload too.
    ///
    /// Object fields keep their declaration order.
    fn encode<T: Serialize + ?Sized>(
        &self,
        value: Option<&T>,
    ) -> Result<Option<String>, EncodingError> {
        let Some(value) = value else {
            return Ok(None);
        };
        let tree = serde_json::to_value(value)
            .map_err(|e| EncodingError::Serialization(e.to_string()))?;
        if tree.is_null() {
            return Ok(None);
        }
        self.encode_tree(&tree).map(Some)
    }

    /// Decode into a type known at the call site
    fn decode_as<T: DeserializeOwned>(&self, raw: &str) -> Result<T, EncodingError> {
        let tree = self.decode_tree(raw)?;
        serde_json::from_value(tree).map_err(|e| EncodingError::Deserialization(e.to_string()))
    }

    /// Decode into the type named by `target`
    fn decode(&self, raw: &str, target: &TypeDescriptor) -> Result<DecodedValue, EncodingError> {
        let tree = self.decode_tree(raw)?;
        (target.from_tree)(tree).map_err(|e| match e {
            EncodingError::Deserialization(msg) => EncodingError::Deserialization(format!(
                "cannot decode into {}: {}",
                target.type_name, msg
            )),
            other => other,
        })
    }
}

impl<C: PayloadCodec + ?Sized> PayloadCodecExt for C {}

/// Default JSON payload codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadCodec;

impl JsonPayloadCodec {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadCodec for JsonPayloadCodec {
    fn encode_tree(&self, value: &Value) -> Result<String, EncodingError> {
        serde_json::to_string(value).map_err(|e| EncodingError::Serialization(e.to_string()))
    }

    fn decode_tree(&self, raw: &str) -> Result<Value, EncodingError> {
        serde_json::from_str(raw).map_err(|e| EncodingError::Deserialization(e.to_string()))
    }
}

/// Runtime description of a payload type.
///
/// Two descriptors are equal when they describe the same Rust type. The
/// descriptor also knows how to decode a value tree into a boxed instance
/// of its type, which lets callers pick the decode target dynamically.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    from_tree: fn(Value) -> Result<DecodedValue, EncodingError>,
}

impl TypeDescriptor {
    /// Describe the type `T`
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            from_tree: decode_boxed::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether a value of type `T` matches this descriptor
    pub fn accepts<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

fn decode_boxed<T>(tree: Value) -> Result<DecodedValue, EncodingError>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    serde_json::from_value::<T>(tree)
        .map(|value| Box::new(value) as DecodedValue)
        .map_err(|e| EncodingError::Deserialization(e.to_string()))
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor")
            .field(&self.type_name)
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct OrderInput {
        order_id: String,
        amount_cents: i64,
        items: Vec<String>,
    }

    fn sample_order() -> OrderInput {
        OrderInput {
            order_id: "order-1".to_string(),
            amount_cents: 4200,
            items: vec!["book".to_string(), "pen".to_string()],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let codec = JsonPayloadCodec::new();
        let original = sample_order();

        let encoded = codec.encode(Some(&original)).unwrap().unwrap();
        let decoded: OrderInput = codec.decode_as(&encoded).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn test_encode_keeps_field_order() {
        let codec = JsonPayloadCodec::new();
        let original = sample_order();

        let encoded = codec.encode(Some(&original)).unwrap();

        assert_eq!(encoded, Some(serde_json::to_string(&original).unwrap()));
        assert_eq!(
            encoded.as_deref(),
            Some(r#"{"order_id":"order-1","amount_cents":4200,"items":["book","pen"]}"#)
        );
    }

    #[test]
    fn test_non_finite_float_encodes_to_absent_payload() {
        let codec = JsonPayloadCodec::new();

        assert_eq!(codec.encode(Some(&f64::NAN)).unwrap(), None);
        assert_eq!(codec.encode(Some(&f64::INFINITY)).unwrap(), None);
        assert_eq!(codec.encode(Some(&1.5_f64)).unwrap().as_deref(), Some("1.5"));
    }

    #[test]
    fn test_absent_input_encodes_to_absent_payload() {
        let codec = JsonPayloadCodec::new();

        assert_eq!(codec.encode::<OrderInput>(None).unwrap(), None);
        assert_eq!(codec.encode(Some(&())).unwrap(), None);
        assert_eq!(codec.encode(Some(&None::<String>)).unwrap(), None);
    }

    #[test]
    fn test_decode_driven_by_descriptor() {
        let codec = JsonPayloadCodec::new();
        let descriptor = TypeDescriptor::of::<OrderInput>();
        let encoded = codec.encode(Some(&sample_order())).unwrap().unwrap();

        let decoded = codec.decode(&encoded, &descriptor).unwrap();

        assert_eq!(decoded.downcast_ref::<OrderInput>(), Some(&sample_order()));
        assert!(decoded.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_decode_error_names_target_type() {
        let codec = JsonPayloadCodec::new();
        let descriptor = TypeDescriptor::of::<OrderInput>();

        let err = codec.decode("\"just a string\"", &descriptor).unwrap_err();
        match err {
            EncodingError::Deserialization(msg) => assert!(msg.contains("OrderInput")),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(codec.decode_as::<i64>("not json").is_err());
    }

    #[test]
    fn test_descriptor_equality() {
        assert_eq!(TypeDescriptor::of::<String>(), TypeDescriptor::of::<String>());
        assert_eq!(TypeDescriptor::of::<i64>().type_id(), TypeId::of::<i64>());
        assert_ne!(TypeDescriptor::of::<String>(), TypeDescriptor::of::<i64>());
        assert!(TypeDescriptor::of::<String>().accepts::<String>());
        assert!(!TypeDescriptor::of::<String>().accepts::<&str>());
        assert!(!TypeDescriptor::of::<String>().accepts::<str>());
    }
}
