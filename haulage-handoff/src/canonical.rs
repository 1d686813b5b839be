//! Canonical JSON serialisation.

use std::io;

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::Formatter;
use serde_json::{Map, Serializer, Value};

use crate::HandoffError;

/// Serialise `payload` with object keys sorted at every depth.
///
/// Separators are `", "` and `": "` and every non-ASCII character is
/// written as a `\uXXXX` escape, matching `json.dumps(payload,
/// sort_keys=True)` so that other pipeline stages can reproduce the signed
/// bytes. Arrays keep their order. The output depends only on the payload's
/// data, never on how its map type orders entries.
///
/// # Errors
///
/// Returns [`HandoffError::Serialize`] when `payload` cannot be represented
/// as JSON, for example a map with non-string keys.
///
/// # Examples
///
/// ```
/// use haulage_handoff::canonical_json;
/// use serde_json::json;
///
/// # fn main() -> Result<(), haulage_handoff::HandoffError> {
/// let text = canonical_json(&json!({"b": 1, "a": {"d": [3, 2], "c": null}}))?;
/// assert_eq!(text, r#"{"a": {"c": null, "d": [3, 2]}, "b": 1}"#);
/// # Ok(())
/// # }
/// ```
pub fn canonical_json<T>(payload: &T) -> Result<String, HandoffError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(payload)?;
    let mut buffer = Vec::new();
    sorted(value).serialize(&mut Serializer::with_formatter(&mut buffer, SortedKeysFormatter))?;
    String::from_utf8(buffer)
        .map_err(|err| HandoffError::Serialize(serde_json::Error::custom(err)))
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut entries: Vec<(String, Value)> = object.into_iter().collect();
            entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
            let mut map = Map::new();
            for (key, entry) in entries {
                map.insert(key, sorted(entry));
            }
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

struct SortedKeysFormatter;

impl Formatter for SortedKeysFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut utf8 = [0_u8; 4];
        let mut utf16 = [0_u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
            } else {
                for unit in ch.encode_utf16(&mut utf16) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
