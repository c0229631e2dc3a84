//! Deserialization of a typed request from its facets.
//!
//! Path segments, query values and headers arrive as text, so the
//! `params`, `query` and `headers` facets are read leniently: a string is
//! parsed when the target field asks for a number or a bool, and a lone
//! value is accepted where a sequence is expected. The `body` facet is
//! JSON and is read as-is.

use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, Deserializer, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use serde_json::{Map, Value};

/// Deserialize `T` from the text facets plus an optional JSON body.
pub(crate) fn from_facets<T: DeserializeOwned>(
    text_facets: Map<String, Value>,
    body: Option<Value>,
) -> Result<T, serde_json::Error> {
    let entries = text_facets
        .into_iter()
        .map(|(name, value)| (name, Facet::text(value)))
        .chain(body.map(|body| ("body".to_string(), Facet::json(body))));
    T::deserialize(MapDeserializer::<_, serde_json::Error>::new(entries))
}

struct Facet {
    value: Value,
    text: bool,
}

impl Facet {
    fn text(value: Value) -> Self {
        Self { value, text: true }
    }

    fn json(value: Value) -> Self {
        Self { value, text: false }
    }
}

impl<'de> IntoDeserializer<'de, serde_json::Error> for Facet {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! parse_text {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
            if let (true, Value::String(text)) = (self.text, &self.value) {
                let parsed: $ty = text
                    .parse()
                    .map_err(|_| {
                        <serde_json::Error as de::Error>::invalid_value(Unexpected::Str(text), &visitor)
                    })?;
                return visitor.$visit(parsed);
            }
            self.deserialize_any(visitor)
        }
    )*};
}

impl<'de> Deserializer<'de> for Facet {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if !self.text {
            return self.value.deserialize_any(visitor);
        }
        match self.value {
            Value::Object(map) => visitor.visit_map(MapDeserializer::new(
                map.into_iter().map(|(name, value)| (name, Facet::text(value))),
            )),
            Value::Array(items) => {
                visitor.visit_seq(SeqDeserializer::new(items.into_iter().map(Facet::text)))
            }
            scalar => scalar.deserialize_any(visitor),
        }
    }

    parse_text! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::Array(_) | Value::Null => self.deserialize_any(visitor),
            single if self.text => {
                visitor.visit_seq(SeqDeserializer::new(std::iter::once(Facet::text(single))))
            }
            other => other.deserialize_seq(visitor),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.value.deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit unit_struct tuple
        tuple_struct map struct identifier ignored_any
    }
}
