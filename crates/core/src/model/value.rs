use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use wheel_pick_protocol::SharedStr;

/// One selectable entry of a wheel.
///
/// Equality is structural: `Int(5)` and `Text("5")` are different values,
/// so a wheel of zero-padded strings must be queried with strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PickerValue {
    Int(i64),
    Text(SharedStr),
}

impl PickerValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PickerValue::Int(n) => Some(*n),
            PickerValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PickerValue::Int(_) => None,
            PickerValue::Text(s) => Some(s.as_str()),
        }
    }

    /// The text drawn for this value.
    pub fn label(&self) -> SharedStr {
        match self {
            PickerValue::Int(n) => SharedStr::from(n.to_string()),
            PickerValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for PickerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerValue::Int(n) => n.fmt(f),
            PickerValue::Text(s) => s.fmt(f),
        }
    }
}

impl From<i64> for PickerValue {
    fn from(n: i64) -> Self {
        PickerValue::Int(n)
    }
}

impl From<i32> for PickerValue {
    fn from(n: i32) -> Self {
        PickerValue::Int(i64::from(n))
    }
}

impl From<u32> for PickerValue {
    fn from(n: u32) -> Self {
        PickerValue::Int(i64::from(n))
    }
}

impl From<&str> for PickerValue {
    fn from(s: &str) -> Self {
        PickerValue::Text(SharedStr::from(s))
    }
}

impl From<String> for PickerValue {
    fn from(s: String) -> Self {
        PickerValue::Text(SharedStr::from(s))
    }
}

impl From<SharedStr> for PickerValue {
    fn from(s: SharedStr) -> Self {
        PickerValue::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("a wheel needs at least one value")]
    Empty,
}

/// The ordered, immutable values of one wheel.
///
/// Never empty. Cloning shares the backing slice, so hosts can hand the
/// same list to a picker and to their own lookup closures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<PickerValue>")]
pub struct ValueList(Arc<[PickerValue]>);

impl ValueList {
    pub fn new<I, V>(values: I) -> Result<Self, ValueError>
    where
        I: IntoIterator<Item = V>,
        V: Into<PickerValue>,
    {
        let values: Arc<[PickerValue]> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ValueError::Empty);
        }
        Ok(Self(values))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&PickerValue> {
        self.0.get(index)
    }

    /// Index of the first entry equal to `value`.
    pub fn position(&self, value: &PickerValue) -> Option<usize> {
        self.0.iter().position(|v| v == value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PickerValue> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PickerValue] {
        &self.0
    }
}

impl TryFrom<Vec<PickerValue>> for ValueList {
    type Error = ValueError;

    fn try_from(values: Vec<PickerValue>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl Serialize for ValueList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a PickerValue;
    type IntoIter = std::slice::Iter<'a, PickerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
