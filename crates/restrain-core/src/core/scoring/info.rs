use serde::Serialize;

/// A typed value of a [`RestraintInfo`] field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    Int(i64),
    Float(f64),
    String(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strings(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct InfoEntry {
    key: String,
    value: InfoValue,
}

/// A static description of a restraint for output writers.
///
/// Fields keep their insertion order. Keys are the contract with downstream tools:
/// every restraint of one kind uses the same keys so values can be aggregated across
/// instances. A record is assembled once with the `with_*` builders and is read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RestraintInfo {
    entries: Vec<InfoEntry>,
}

impl RestraintInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with(key, InfoValue::Int(value))
    }

    pub fn with_float(self, key: &str, value: f64) -> Self {
        self.with(key, InfoValue::Float(value))
    }

    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with(key, InfoValue::String(value.to_string()))
    }

    pub fn with_ints(self, key: &str, values: Vec<i64>) -> Self {
        self.with(key, InfoValue::Ints(values))
    }

    pub fn with_floats(self, key: &str, values: Vec<f64>) -> Self {
        self.with(key, InfoValue::Floats(values))
    }

    pub fn with_strings(self, key: &str, values: Vec<String>) -> Self {
        self.with(key, InfoValue::Strings(values))
    }

    fn with(mut self, key: &str, value: InfoValue) -> Self {
        self.entries.push(InfoEntry {
            key: key.to_string(),
            value,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the first field with the given key.
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// All fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// The string fields, in insertion order.
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.typed(|value| match value {
            InfoValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The floating-point fields, in insertion order.
    pub fn floats(&self) -> impl Iterator<Item = (&str, f64)> {
        self.typed(|value| match value {
            InfoValue::Float(f) => Some(*f),
            _ => None,
        })
    }

    /// The integer fields, in insertion order.
    pub fn ints(&self) -> impl Iterator<Item = (&str, i64)> {
        self.typed(|value| match value {
            InfoValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn number_of_string(&self) -> usize {
        self.strings().count()
    }

    pub fn string_key(&self, index: usize) -> Option<&str> {
        self.strings().nth(index).map(|(key, _)| key)
    }

    pub fn string_value(&self, index: usize) -> Option<&str> {
        self.strings().nth(index).map(|(_, value)| value)
    }

    pub fn number_of_float(&self) -> usize {
        self.floats().count()
    }

    pub fn float_key(&self, index: usize) -> Option<&str> {
        self.floats().nth(index).map(|(key, _)| key)
    }

    pub fn float_value(&self, index: usize) -> Option<f64> {
        self.floats().nth(index).map(|(_, value)| value)
    }

    pub fn number_of_int(&self) -> usize {
        self.ints().count()
    }

    pub fn int_key(&self, index: usize) -> Option<&str> {
        self.ints().nth(index).map(|(key, _)| key)
    }

    pub fn int_value(&self, index: usize) -> Option<i64> {
        self.ints().nth(index).map(|(_, value)| value)
    }

    fn typed<'a, T: 'a>(
        &'a self,
        pick: fn(&'a InfoValue) -> Option<T>,
    ) -> impl Iterator<Item = (&'a str, T)> + 'a {
        self.entries
            .iter()
            .filter_map(move |entry| pick(&entry.value).map(|value| (entry.key.as_str(), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> RestraintInfo {
        RestraintInfo::new()
            .with_string("type", "restrain.Example")
            .with_float("force constant", 2.5)
            .with_int("count", 3)
            .with_string("axis", "z")
            .with_floats("weights", vec![1.0, 0.5])
    }

    #[test]
    fn new_info_is_empty() {
        let info = RestraintInfo::new();
        assert!(info.is_empty());
        assert_eq!(info.number_of_string(), 0);
        assert_eq!(info.string_key(0), None);
    }

    #[test]
    fn typed_accessors_index_within_their_own_type() {
        let info = sample_info();
        assert_eq!(info.len(), 5);

        assert_eq!(info.number_of_string(), 2);
        assert_eq!(info.string_key(0), Some("type"));
        assert_eq!(info.string_value(0), Some("restrain.Example"));
        assert_eq!(info.string_key(1), Some("axis"));
        assert_eq!(info.string_value(1), Some("z"));

        assert_eq!(info.number_of_float(), 1);
        assert_eq!(info.float_key(0), Some("force constant"));
        assert_eq!(info.float_value(0), Some(2.5));

        assert_eq!(info.number_of_int(), 1);
        assert_eq!(info.int_key(0), Some("count"));
        assert_eq!(info.int_value(0), Some(3));
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let keys: Vec<_> = sample_info().iter().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys, ["type", "force constant", "count", "axis", "weights"]);
    }

    #[test]
    fn get_finds_sequence_values() {
        let info = sample_info();
        assert_eq!(info.get("weights"), Some(&InfoValue::Floats(vec![1.0, 0.5])));
        assert_eq!(info.get("missing"), None);
    }

    #[test]
    fn serializes_as_ordered_key_value_list() {
        let info = RestraintInfo::new()
            .with_string("type", "restrain.Example")
            .with_float("force constant", 2.5);
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(
            json,
            r#"[{"key":"type","value":"restrain.Example"},{"key":"force constant","value":2.5}]"#
        );
    }
}
