//! Deserializing assembled property trees into mapped types.

use crate::converters::split_values;
use ::config::{ConfigError as TreeError, Value, ValueKind};
use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{Deserializer, IntoDeserializer, Visitor};

/// A property tree node that reads list values the way sources write them.
///
/// Sources flatten arrays of scalars into one comma-joined value (`a,b\,c`). A
/// string leaf asked for as a sequence is split with [`split_values`]; every
/// other request goes to the `config` crate's own deserializer.
pub(crate) struct MappedValue(Value);

impl MappedValue {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }
}

impl<'de> IntoDeserializer<'de, TreeError> for MappedValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! delegate {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, TreeError> {
                self.0.$method(visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for MappedValue {
    type Error = TreeError;

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, TreeError> {
        match self.0.kind {
            ValueKind::String(joined) => {
                let elements = split_values(&joined)
                    .into_iter()
                    .map(|element| MappedValue(Value::new(None, element)));
                let mut seq = SeqDeserializer::new(elements);
                let visited = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(visited)
            }
            ValueKind::Array(items) => {
                let mut seq = SeqDeserializer::new(items.into_iter().map(MappedValue));
                let visited = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(visited)
            }
            kind => Value::new(None, kind).deserialize_seq(visitor),
        }
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, TreeError> {
        match self.0.kind {
            ValueKind::Table(table) => {
                let mut map =
                    MapDeserializer::new(table.into_iter().map(|(k, v)| (k, MappedValue(v))));
                let visited = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(visited)
            }
            kind => Value::new(None, kind).deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, TreeError> {
        match self.0.kind {
            ValueKind::Table(_) => self.deserialize_map(visitor),
            kind => Value::new(None, kind).deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, TreeError> {
        match self.0.kind {
            ValueKind::Nil => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, TreeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, TreeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, TreeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, TreeError> {
        self.0.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, TreeError> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    delegate!(
        deserialize_any,
        deserialize_bool,
        deserialize_i8,
        deserialize_i16,
        deserialize_i32,
        deserialize_i64,
        deserialize_u8,
        deserialize_u16,
        deserialize_u32,
        deserialize_u64,
        deserialize_f32,
        deserialize_f64,
        deserialize_char,
        deserialize_str,
        deserialize_string,
        deserialize_bytes,
        deserialize_byte_buf,
        deserialize_unit,
        deserialize_identifier,
        deserialize_ignored_any,
    );
}
