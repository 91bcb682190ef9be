//! Scenario-partitioned chart series from the `bar_chart_data` section.
//!
//! Configuration authors write each entry as a flat mapping:
//!
//! ```yaml
//! bar_chart_data:
//!   baseline:
//!     - { scale: "S", qubits: 10, qubitsErr: 3, runtime: 4.5 }
//! ```
//!
//! `scale` labels the entry, every other numeric key is a metric value, and a
//! key ending in [`ERROR_SUFFIX`] carries the error of the metric it prefixes.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use serde_yaml::Value;

/// Suffix marking a metric's error term in a flat entry (`qubitsErr`).
pub const ERROR_SUFFIX: &str = "Err";

const SCALE_KEY: &str = "scale";

/// A scalar exactly as written. Plain YAML scalars such as `1e6` or `1.50`
/// keep their source text instead of round-tripping through a number.
struct RawScalar(String);

impl<'de> Deserialize<'de> for RawScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawScalarVisitor;

        impl<'de> Visitor<'de> for RawScalarVisitor {
            type Value = RawScalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a scalar label")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawScalar, E> {
                Ok(RawScalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawScalar, E> {
                Ok(RawScalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawScalar, E> {
                Ok(RawScalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawScalar, E> {
                Ok(RawScalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawScalar, E> {
                Ok(RawScalar(v.to_string()))
            }
        }

        deserializer.deserialize_str(RawScalarVisitor)
    }
}

/// One measured entry of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesEntry {
    /// Free-form scale label; entries without one never match a selection.
    pub scale: Option<String>,
    pub values: IndexMap<String, f64>,
    pub errors: IndexMap<String, f64>,
}

impl SeriesEntry {
    pub fn new(scale: impl Into<String>) -> Self {
        Self {
            scale: Some(scale.into()),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.values.insert(metric.into(), value);
        self
    }

    pub fn with_error(mut self, metric: impl Into<String>, error: f64) -> Self {
        self.errors.insert(metric.into(), error);
        self
    }

    /// File a numeric field as a value or, with the error suffix, as the
    /// error of the metric it prefixes.
    fn record(&mut self, key: &str, number: f64) {
        match key.strip_suffix(ERROR_SUFFIX) {
            Some(metric) if !metric.is_empty() => {
                self.errors.insert(metric.to_string(), number);
            }
            _ => {
                self.values.insert(key.to_string(), number);
            }
        }
    }

    pub fn matches_scale(&self, scale: &str) -> bool {
        self.scale.as_deref() == Some(scale)
    }

    /// The metric's value, zero when the entry does not record it.
    pub fn value(&self, metric: &str) -> f64 {
        self.values.get(metric).copied().unwrap_or(0.0)
    }

    /// The metric's error, zero when the entry does not record it.
    pub fn error(&self, metric: &str) -> f64 {
        self.errors.get(metric).copied().unwrap_or(0.0)
    }
}

/// A list item; only mappings decode to an entry.
struct MaybeEntry(Option<SeriesEntry>);

impl<'de> Deserialize<'de> for MaybeEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = MaybeEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a series entry")
    }

    /// Non-numeric values are ignored and a null error counts as no error.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MaybeEntry, A::Error> {
        let mut entry = SeriesEntry::default();
        while let Some(key) = map.next_key::<Value>()? {
            let Some(key) = key.as_str() else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            if key == SCALE_KEY {
                entry.scale = map.next_value::<Option<RawScalar>>()?.map(|label| label.0);
                continue;
            }
            if let Some(number) = map.next_value::<Value>()?.as_f64() {
                entry.record(key, number);
            }
        }
        Ok(MaybeEntry(Some(entry)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<MaybeEntry, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(MaybeEntry(None))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<MaybeEntry, E> {
        Ok(MaybeEntry(None))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<MaybeEntry, E> {
        Ok(MaybeEntry(None))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<MaybeEntry, E> {
        Ok(MaybeEntry(None))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<MaybeEntry, E> {
        Ok(MaybeEntry(None))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<MaybeEntry, E> {
        Ok(MaybeEntry(None))
    }

    fn visit_unit<E: de::Error>(self) -> Result<MaybeEntry, E> {
        Ok(MaybeEntry(None))
    }
}

/// A scenario's value: a list of entries, or null for none. Anything else
/// decodes to `None` and the scenario is skipped.
struct ScenarioEntries(Option<Vec<SeriesEntry>>);

impl<'de> Deserialize<'de> for ScenarioEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScenarioVisitor)
    }
}

struct ScenarioVisitor;

impl<'de> Visitor<'de> for ScenarioVisitor {
    type Value = ScenarioEntries;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of series entries")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ScenarioEntries, A::Error> {
        let mut entries = Vec::new();
        while let Some(MaybeEntry(item)) = seq.next_element()? {
            entries.extend(item);
        }
        Ok(ScenarioEntries(Some(entries)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(Some(Vec::new())))
    }

    fn visit_none<E: de::Error>(self) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(Some(Vec::new())))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ScenarioEntries, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(ScenarioEntries(None))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(None))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(None))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(None))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(None))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<ScenarioEntries, E> {
        Ok(ScenarioEntries(None))
    }
}

/// Scenario id → entries, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChartSeries {
    scenarios: IndexMap<String, Vec<SeriesEntry>>,
}

/// Decodes the `bar_chart_data` mapping straight from the source text.
///
/// A scenario whose value is not a list is skipped, as is any list item
/// that is not a mapping; the rest of the section survives.
impl<'de> Deserialize<'de> for ChartSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeriesVisitor;

        impl<'de> Visitor<'de> for SeriesVisitor {
            type Value = ChartSeries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of scenario ids to entry lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ChartSeries, A::Error> {
                let mut series = ChartSeries::default();
                while let Some(RawScalar(scenario)) = map.next_key()? {
                    match map.next_value::<ScenarioEntries>()?.0 {
                        Some(entries) => {
                            series.scenarios.insert(scenario, entries);
                        }
                        None => {
                            log::warn!("[QRD] config: scenario '{}' is not a list of entries, skipping", scenario);
                        }
                    }
                }
                Ok(series)
            }
        }

        deserializer.deserialize_map(SeriesVisitor)
    }
}

impl ChartSeries {
    /// Parse a standalone `bar_chart_data` mapping. Empty text or null is an
    /// empty series.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str::<Option<Self>>(text)?.unwrap_or_default())
    }

    pub fn insert(&mut self, scenario: impl Into<String>, entries: Vec<SeriesEntry>) {
        self.scenarios.insert(scenario.into(), entries);
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Scenario ids in declaration order.
    pub fn scenarios(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SeriesEntry])> {
        self.scenarios
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn entries(&self, scenario: &str) -> &[SeriesEntry] {
        self.scenarios
            .get(scenario)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first declared scenario, whose entries define the selectable scales.
    pub fn reference_scenario(&self) -> Option<(&str, &[SeriesEntry])> {
        self.scenarios
            .first()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }
}
