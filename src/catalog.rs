use std::collections::HashMap;

/// Bidirectional name ↔ wire-code table for one enum family.
///
/// Names are what the rest of the application sees; the small integer codes
/// only ever exist on the wire.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    by_name: HashMap<String, u64>,
    by_code: HashMap<u64, String>,
}

impl EnumTable {
    pub fn new<N, I>(entries: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u64)>,
    {
        let mut table = Self::default();
        for (name, code) in entries {
            table.insert(name, code);
        }
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, code: u64) {
        let name = name.into();
        self.by_code.insert(code, name.clone());
        self.by_name.insert(name, code);
    }

    /// Wire code for a name, if the catalog knows it.
    pub fn code(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    /// Human readable name for a wire code, if the catalog knows it.
    pub fn name(&self, code: u64) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// The four read-only lookup tables the codec is constructed with.
///
/// Loaded once at startup by the caller; the codec never mutates them, so a
/// single instance can back any number of concurrent encodes and decodes.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub material_class: EnumTable,
    pub material_type: EnumTable,
    pub tags: EnumTable,
    pub certifications: EnumTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_bidirectional() {
        let table = EnumTable::new([("PLA", 1), ("PETG", 2), ("ABS", 3)]);

        assert_eq!(table.code("PETG"), Some(2));
        assert_eq!(table.name(2), Some("PETG"));
        assert_eq!(table.code("PC"), None);
        assert_eq!(table.name(99), None);
        assert_eq!(table.len(), 3);
    }
}
