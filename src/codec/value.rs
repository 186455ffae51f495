use jiff::{Span, civil::Date};
use minicbor::{Decoder, Encoder, data::Type, decode, encode};

use crate::catalog::EnumTable;

const SECONDS_PER_DAY: i64 = 86_400;

/// One CBOR value as it sits on the wire, before any field-level coercion.
///
/// Decoding is permissive on purpose: a field's logical type is applied via
/// the `into_*` conversions below, so integers, decimal strings and raw byte
/// strings all coerce to whatever the key table says the field holds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WireValue {
    Uint(u64),
    Int(i64),
    Float(f32),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<WireValue>),
}

impl WireValue {
    /// Free-form text. Blank strings count as absent.
    pub(crate) fn into_text(self) -> Option<String> {
        match self {
            WireValue::Text(s) => non_blank(s),
            WireValue::Bytes(b) => non_blank(String::from_utf8_lossy(&b).into_owned()),
            WireValue::Uint(v) => Some(v.to_string()),
            WireValue::Int(v) => Some(v.to_string()),
            WireValue::Float(v) => Some(v.to_string()),
            WireValue::Array(_) => None,
        }
    }

    /// Text for UUID and color fields: byte strings become uppercase hex.
    pub(crate) fn into_hex_text(self) -> Option<String> {
        match self {
            WireValue::Bytes(b) if b.is_empty() => None,
            WireValue::Bytes(b) => Some(hex::encode_upper(b)),
            other => other.into_text(),
        }
    }

    pub(crate) fn into_i64(self) -> Option<i64> {
        match self {
            WireValue::Uint(v) => i64::try_from(v).ok(),
            WireValue::Int(v) => Some(v),
            WireValue::Float(v) => Some(v as i64),
            WireValue::Text(s) => s.trim().parse().ok(),
            WireValue::Bytes(b) => String::from_utf8(b).ok()?.trim().parse().ok(),
            WireValue::Array(_) => None,
        }
    }

    pub(crate) fn into_i32(self) -> Option<i32> {
        self.into_i64().and_then(|v| i32::try_from(v).ok())
    }

    pub(crate) fn into_u32(self) -> Option<u32> {
        self.into_i64().and_then(|v| u32::try_from(v).ok())
    }

    pub(crate) fn into_f32(self) -> Option<f32> {
        match self {
            WireValue::Float(v) => Some(v),
            WireValue::Uint(v) => Some(v as f32),
            WireValue::Int(v) => Some(v as f32),
            WireValue::Text(s) => s.trim().parse().ok(),
            WireValue::Bytes(b) => String::from_utf8(b).ok()?.trim().parse().ok(),
            WireValue::Array(_) => None,
        }
    }

    pub(crate) fn into_date(self) -> Option<Date> {
        self.into_i64().and_then(epoch_seconds_to_date)
    }

    /// Enum-valued scalar: resolve a wire code through the catalog, falling
    /// back to the numeric string when the catalog has no entry for it.
    pub(crate) fn into_code(self, table: &EnumTable) -> Option<String> {
        match self {
            WireValue::Uint(code) => Some(resolve_code(code, table)),
            WireValue::Int(code) if code >= 0 => Some(resolve_code(code as u64, table)),
            WireValue::Int(code) => Some(code.to_string()),
            other => other.into_text(),
        }
    }

    /// Enum-valued list; an empty wire list counts as absent.
    pub(crate) fn into_code_list(self, table: &EnumTable) -> Option<Vec<String>> {
        let WireValue::Array(items) = self else {
            return None;
        };

        let names: Vec<String> = items
            .into_iter()
            .filter_map(|item| item.into_code(table))
            .collect();

        if names.is_empty() { None } else { Some(names) }
    }
}

fn resolve_code(code: u64, table: &EnumTable) -> String {
    match table.name(code) {
        Some(name) => name.to_string(),
        // forward compatibility: a catalog written after this tag may know
        // the code, so it is kept visible instead of failing the decode
        None => code.to_string(),
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Ordered field list for one region map, built in key order so that two
/// encodes of the same region are byte-identical.
#[derive(Debug, Default)]
pub(crate) struct WireFields(Vec<(u8, WireValue)>);

impl WireFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_pairs(self) -> Vec<(u8, WireValue)> {
        self.0
    }

    fn push(&mut self, key: u8, value: WireValue) {
        self.0.push((key, value));
    }

    pub(crate) fn push_text(&mut self, key: u8, value: Option<&str>) {
        if let Some(text) = value.filter(|s| !s.trim().is_empty()) {
            self.push(key, WireValue::Text(text.to_string()));
        }
    }

    /// UUIDs and colors: written as raw bytes when the text is valid hex
    /// (dashes and a leading `#` tolerated), as text otherwise.
    pub(crate) fn push_hex(&mut self, key: u8, value: Option<&str>) {
        let Some(text) = value.filter(|s| !s.trim().is_empty()) else {
            return;
        };

        match hex_to_bytes(text) {
            Some(bytes) => self.push(key, WireValue::Bytes(bytes)),
            None => self.push(key, WireValue::Text(text.to_string())),
        }
    }

    /// GTINs are numeric in practice and pack much smaller as an integer.
    pub(crate) fn push_numeric_text(&mut self, key: u8, value: Option<&str>) {
        let Some(text) = value.filter(|s| !s.trim().is_empty()) else {
            return;
        };

        match text.trim().parse::<u64>() {
            Ok(number) => self.push(key, WireValue::Uint(number)),
            Err(_) => self.push(key, WireValue::Text(text.to_string())),
        }
    }

    pub(crate) fn push_uint(&mut self, key: u8, value: Option<u32>) {
        if let Some(v) = value {
            self.push(key, WireValue::Uint(v as u64));
        }
    }

    pub(crate) fn push_int(&mut self, key: u8, value: Option<i32>) {
        if let Some(v) = value {
            self.push(key, WireValue::Int(v as i64));
        }
    }

    pub(crate) fn push_float(&mut self, key: u8, value: Option<f32>) {
        if let Some(v) = value {
            self.push(key, WireValue::Float(v));
        }
    }

    pub(crate) fn push_date(&mut self, key: u8, value: Option<Date>) {
        if let Some(seconds) = value.and_then(date_to_epoch_seconds) {
            self.push(key, WireValue::Int(seconds));
        }
    }

    pub(crate) fn push_enum(&mut self, key: u8, value: Option<&str>, table: &EnumTable) {
        let Some(name) = value.filter(|s| !s.trim().is_empty()) else {
            return;
        };

        match table.code(name) {
            Some(code) => self.push(key, WireValue::Uint(code)),
            // placeholder text the catalog does not know is dropped rather
            // than failing the whole encode
            None => tracing::debug!(key, %name, "dropping unmapped enum name"),
        }
    }

    pub(crate) fn push_enum_list(&mut self, key: u8, value: Option<&[String]>, table: &EnumTable) {
        let Some(names) = value else { return };

        let codes: Vec<WireValue> = names
            .iter()
            .filter_map(|name| match table.code(name) {
                Some(code) => Some(WireValue::Uint(code)),
                None => {
                    tracing::debug!(key, %name, "dropping unmapped enum name");
                    None
                }
            })
            .collect();

        if !codes.is_empty() {
            self.push(key, WireValue::Array(codes));
        }
    }
}

pub(crate) fn encode_value<W: encode::Write>(
    e: &mut Encoder<W>,
    value: &WireValue,
) -> Result<(), encode::Error<W::Error>> {
    match value {
        WireValue::Uint(v) => {
            e.u64(*v)?;
        }
        WireValue::Int(v) => {
            e.i64(*v)?;
        }
        WireValue::Float(v) => {
            e.f32(*v)?;
        }
        WireValue::Text(s) => {
            e.str(s)?;
        }
        WireValue::Bytes(b) => {
            e.bytes(b)?;
        }
        WireValue::Array(items) => {
            e.array(items.len() as u64)?;
            for item in items {
                encode_value(e, item)?;
            }
        }
    }
    Ok(())
}

/// Read one CBOR item permissively. `None` means the item carried no usable
/// value (null, undefined, or a shape no field can hold); the item is
/// consumed either way. Structurally broken CBOR is an error.
pub(crate) fn read_value(d: &mut Decoder<'_>) -> Result<Option<WireValue>, decode::Error> {
    let value = match d.datatype()? {
        Type::U8 | Type::U16 | Type::U32 | Type::U64 => WireValue::Uint(d.u64()?),
        Type::I8 | Type::I16 | Type::I32 | Type::I64 => WireValue::Int(d.i64()?),
        Type::Int => match i64::try_from(d.int()?) {
            Ok(v) => WireValue::Int(v),
            Err(_) => return Ok(None),
        },
        Type::F16 => WireValue::Float(d.f16()?),
        Type::F32 => WireValue::Float(d.f32()?),
        Type::F64 => WireValue::Float(d.f64()? as f32),
        Type::Bool => WireValue::Uint(d.bool()? as u64),
        Type::String => WireValue::Text(d.str()?.to_string()),
        Type::Bytes => WireValue::Bytes(d.bytes()?.to_vec()),
        Type::Array => {
            let Some(len) = d.array()? else {
                return Err(decode::Error::message("indefinite-length array"));
            };

            let mut items = Vec::with_capacity(len as usize);
            for _ in 0..len {
                if let Some(item) = read_value(d)? {
                    items.push(item);
                }
            }
            WireValue::Array(items)
        }
        Type::Tag => {
            d.tag()?;
            return read_value(d);
        }
        Type::Null | Type::Undefined => {
            d.skip()?;
            return Ok(None);
        }
        _ => {
            d.skip()?;
            return Ok(None);
        }
    };

    Ok(Some(value))
}

pub(crate) fn date_to_epoch_seconds(date: Date) -> Option<i64> {
    let days = date.since(unix_epoch()).ok()?.get_days();
    Some(i64::from(days) * SECONDS_PER_DAY)
}

pub(crate) fn epoch_seconds_to_date(seconds: i64) -> Option<Date> {
    let days = i32::try_from(seconds.div_euclid(SECONDS_PER_DAY)).ok()?;
    let span = Span::new().try_days(days).ok()?;
    unix_epoch().checked_add(span).ok()
}

fn unix_epoch() -> Date {
    jiff::civil::date(1970, 1, 1)
}

fn hex_to_bytes(text: &str) -> Option<Vec<u8>> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('#')
        .chars()
        .filter(|c| *c != '-')
        .collect();

    hex::decode(cleaned).ok().filter(|bytes| !bytes.is_empty())
}
