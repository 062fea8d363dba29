use crate::error::{ListError, ListResult};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Value};
use std::{cmp::Reverse, collections::HashSet};

const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFilter {
    All,
    EnabledOnly,
}

/// One serialized list record. `enabled` is omitted for export output,
/// where every emitted entry is implicitly enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Ordered, uniquely named set of entries for one open list.
///
/// Names are the only identity: uniqueness is case-sensitive while sort
/// order is case-insensitive. With `auto_sort_on_insert` the collection is
/// re-sorted ascending after every add and rename; otherwise entries stay
/// in insertion order until [`EntryCollection::sort`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCollection {
    entries: Vec<Entry>,
    auto_sort_on_insert: bool,
}

impl EntryCollection {
    pub fn new(auto_sort_on_insert: bool) -> Self {
        Self {
            entries: Vec::new(),
            auto_sort_on_insert,
        }
    }

    pub fn auto_sort_on_insert(&self) -> bool {
        self.auto_sort_on_insert
    }

    pub fn set_auto_sort_on_insert(&mut self, value: bool) {
        self.auto_sort_on_insert = value;
        if value {
            self.sort(true);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.position(name).map(|index| &self.entries[index])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn enabled_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.enabled).count()
    }

    pub fn all_enabled(&self) -> bool {
        self.entries.iter().all(|entry| entry.enabled)
    }

    /// Indices of entries whose name contains `query`, ignoring case.
    pub fn matching(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn add(&mut self, name: &str, enabled: bool) -> ListResult<()> {
        let name = validate_name(name)?;
        self.push_unique(name, enabled)?;
        if self.auto_sort_on_insert {
            self.sort(true);
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> ListResult<()> {
        let index = self.require(name)?;
        self.entries.remove(index);
        Ok(())
    }

    /// Removes every listed name that is present; absent names are skipped.
    /// Returns how many entries were actually removed.
    pub fn remove_all<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let doomed: HashSet<&str> = names.into_iter().collect();
        let before = self.entries.len();
        self.entries
            .retain(|entry| !doomed.contains(entry.name.as_str()));
        before - self.entries.len()
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) -> ListResult<()> {
        let new_name = validate_name(new_name)?;
        let index = self.require(old_name)?;
        if new_name == old_name {
            return Ok(());
        }
        if self.contains(&new_name) {
            return Err(ListError::DuplicateName { name: new_name });
        }
        self.entries[index].name = new_name;
        if self.auto_sort_on_insert {
            self.sort(true);
        }
        Ok(())
    }

    pub fn toggle(&mut self, name: &str) -> ListResult<bool> {
        let index = self.require(name)?;
        let entry = &mut self.entries[index];
        entry.enabled = !entry.enabled;
        Ok(entry.enabled)
    }

    pub fn set_all_enabled(&mut self, value: bool) {
        for entry in &mut self.entries {
            entry.enabled = value;
        }
    }

    /// Stable sort by lowercase name; equal keys keep their prior order in
    /// both directions.
    pub fn sort(&mut self, ascending: bool) {
        if ascending {
            self.entries
                .sort_by_cached_key(|entry| entry.name.to_lowercase());
        } else {
            self.entries
                .sort_by_cached_key(|entry| Reverse(entry.name.to_lowercase()));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bulk import: blank lines and names already present are skipped
    /// without error, unlike [`EntryCollection::add`].
    pub fn import_names<I, S>(&mut self, lines: I) -> ImportSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = ImportSummary::default();
        for line in lines {
            let Ok(name) = validate_name(line.as_ref()) else {
                summary.skipped += 1;
                continue;
            };
            match self.push_unique(name, true) {
                Ok(()) => summary.added += 1,
                Err(_) => summary.skipped += 1,
            }
        }
        if self.auto_sort_on_insert && summary.added > 0 {
            self.sort(true);
        }
        summary
    }

    /// Replaces the whole collection with `records`.
    ///
    /// Each record is either a bare string or an object with a string
    /// `name` and an optional boolean `enabled`. The collection is cleared
    /// first; any failing record aborts the load and leaves it empty.
    /// Stored names are kept exactly as written, so `"A"` and `"A "` are
    /// two entries; only blank names are rejected.
    pub fn load_from(&mut self, records: &[Value]) -> ListResult<usize> {
        self.clear();
        let result = records.iter().enumerate().try_for_each(|(index, record)| {
            let (name, enabled) = parse_record(index, record)?;
            if name.trim().is_empty() {
                return Err(ListError::InvalidName);
            }
            self.push_unique(name.to_string(), enabled)
        });
        if let Err(err) = result {
            self.clear();
            return Err(err);
        }
        if self.auto_sort_on_insert {
            self.sort(true);
        }
        Ok(self.entries.len())
    }

    pub fn records(&self, filter: ExportFilter) -> Vec<EntryRecord<'_>> {
        match filter {
            ExportFilter::All => self
                .entries
                .iter()
                .map(|entry| EntryRecord {
                    name: &entry.name,
                    enabled: Some(entry.enabled),
                })
                .collect(),
            ExportFilter::EnabledOnly => self
                .entries
                .iter()
                .filter(|entry| entry.enabled)
                .map(|entry| EntryRecord {
                    name: &entry.name,
                    enabled: None,
                })
                .collect(),
        }
    }

    pub fn to_json(&self, filter: ExportFilter) -> ListResult<String> {
        to_pretty_json(&self.records(filter))
    }

    /// Text shared by the clipboard copy and the export file.
    pub fn serialize_for_export(&self) -> ListResult<String> {
        self.to_json(ExportFilter::EnabledOnly)
    }

    fn require(&self, name: &str) -> ListResult<usize> {
        self.position(name).ok_or_else(|| ListError::NotFound {
            name: name.to_string(),
        })
    }

    fn push_unique(&mut self, name: String, enabled: bool) -> ListResult<()> {
        if self.contains(&name) {
            return Err(ListError::DuplicateName { name });
        }
        self.entries.push(Entry { name, enabled });
        Ok(())
    }
}

fn validate_name(name: &str) -> ListResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ListError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn parse_record(index: usize, record: &Value) -> ListResult<(&str, bool)> {
    match record {
        Value::String(name) => Ok((name.as_str(), true)),
        Value::Object(map) => {
            let name = match map.get("name") {
                Some(Value::String(name)) => name.as_str(),
                Some(_) => {
                    return Err(ListError::parse(format!(
                        "record {index}: \"name\" must be a string"
                    )))
                }
                None => {
                    return Err(ListError::parse(format!(
                        "record {index}: missing \"name\""
                    )))
                }
            };
            let enabled = match map.get("enabled") {
                None | Some(Value::Null) => true,
                Some(Value::Bool(value)) => *value,
                Some(_) => {
                    return Err(ListError::parse(format!(
                        "record {index}: \"enabled\" must be true or false"
                    )))
                }
            };
            Ok((name, enabled))
        }
        other => Err(ListError::parse(format!(
            "record {index}: expected a string or an object, found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> ListResult<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn collection_with(auto_sort: bool, names: &[&str]) -> EntryCollection {
        let mut collection = EntryCollection::new(auto_sort);
        for name in names {
            collection.add(name, true).unwrap();
        }
        collection
    }

    fn flags(collection: &EntryCollection) -> Vec<(String, bool)> {
        collection
            .iter()
            .map(|entry| (entry.name.clone(), entry.enabled))
            .collect()
    }

    #[test]
    fn remove_leaves_other_entry_under_both_policies() {
        for auto_sort in [false, true] {
            let mut collection = collection_with(auto_sort, &["zeta", "Alpha"]);
            collection.remove("zeta").unwrap();
            assert_eq!(collection.names(), vec!["Alpha"]);
        }
    }

    #[test]
    fn duplicate_add_is_rejected_without_growing() {
        let mut collection = collection_with(false, &["Square"]);
        let err = collection.add("Square", false).unwrap_err();
        assert!(matches!(err, ListError::DuplicateName { ref name } if name == "Square"));
        assert_eq!(collection.len(), 1);
        assert!(collection.get("Square").unwrap().enabled);
    }

    #[test]
    fn get_finds_entries_by_exact_name() {
        let mut collection = collection_with(false, &["Boots", "Cape"]);
        collection.toggle("Cape").unwrap();
        assert_eq!(
            collection.get("Cape"),
            Some(&Entry {
                name: "Cape".to_string(),
                enabled: false,
            })
        );
        assert_eq!(collection.get("cape"), None);
        assert_eq!(collection.position("Cape"), Some(1));
    }

    #[test]
    fn add_is_case_sensitive_for_uniqueness() {
        let mut collection = collection_with(false, &["apple"]);
        collection.add("Apple", true).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn add_rejects_blank_and_trims_names() {
        let mut collection = EntryCollection::new(false);
        assert!(matches!(collection.add("   ", true), Err(ListError::InvalidName)));
        collection.add("  Padded  ", false).unwrap();
        assert_eq!(flags(&collection), vec![("Padded".to_string(), false)]);
        assert!(matches!(
            collection.add("Padded ", true),
            Err(ListError::DuplicateName { .. })
        ));
    }

    #[test]
    fn insertion_order_is_kept_without_auto_sort() {
        let collection = collection_with(false, &["Cherry", "apple", "Banana"]);
        assert_eq!(collection.names(), vec!["Cherry", "apple", "Banana"]);
    }

    #[test]
    fn auto_sort_keeps_ascending_order_on_add() {
        let collection = collection_with(true, &["Cherry", "apple", "Banana"]);
        assert_eq!(collection.names(), vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn sort_is_case_insensitive_in_both_directions() {
        let mut collection = collection_with(false, &["Banana", "apple", "Cherry"]);
        collection.sort(true);
        assert_eq!(collection.names(), vec!["apple", "Banana", "Cherry"]);
        collection.sort(false);
        assert_eq!(collection.names(), vec!["Cherry", "Banana", "apple"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut collection = collection_with(false, &["b", "A", "B", "a"]);
        collection.sort(true);
        assert_eq!(collection.names(), vec!["A", "a", "b", "B"]);
        collection.sort(false);
        assert_eq!(collection.names(), vec!["b", "B", "A", "a"]);
    }

    #[test]
    fn remove_missing_name_is_not_found() {
        let mut collection = collection_with(false, &["one"]);
        assert!(matches!(
            collection.remove("two"),
            Err(ListError::NotFound { ref name }) if name == "two"
        ));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut collection = collection_with(false, &["c", "a", "d", "b"]);
        collection.remove("a").unwrap();
        assert_eq!(collection.names(), vec!["c", "d", "b"]);
    }

    #[test]
    fn remove_all_skips_unknown_names() {
        let mut collection = collection_with(false, &["one", "two", "three"]);
        let removed = collection.remove_all(["three", "missing", "one"]);
        assert_eq!(removed, 2);
        assert_eq!(collection.names(), vec!["two"]);
    }

    #[test]
    fn rename_rejects_blank_and_duplicate_names() {
        let mut collection = collection_with(false, &["A", "B"]);
        collection.toggle("A").unwrap();

        assert!(matches!(collection.rename("A", ""), Err(ListError::InvalidName)));
        assert!(matches!(
            collection.rename("A", "B"),
            Err(ListError::DuplicateName { ref name }) if name == "B"
        ));
        assert!(matches!(
            collection.rename("Z", "Y"),
            Err(ListError::NotFound { .. })
        ));
        assert_eq!(
            flags(&collection),
            vec![("A".to_string(), false), ("B".to_string(), true)]
        );
    }

    #[test]
    fn rename_to_same_name_is_a_no_op() {
        let mut collection = collection_with(false, &["A"]);
        collection.rename("A", " A ").unwrap();
        assert_eq!(collection.names(), vec!["A"]);
    }

    #[test]
    fn rename_keeps_flag_and_position_without_auto_sort() {
        let mut collection = collection_with(false, &["first", "second", "third"]);
        collection.toggle("second").unwrap();
        collection.rename("second", "Aardvark").unwrap();
        assert_eq!(
            flags(&collection),
            vec![
                ("first".to_string(), true),
                ("Aardvark".to_string(), false),
                ("third".to_string(), true),
            ]
        );
    }

    #[test]
    fn rename_resorts_with_auto_sort() {
        let mut collection = collection_with(true, &["b", "c", "d"]);
        collection.rename("d", "A").unwrap();
        assert_eq!(collection.names(), vec!["A", "b", "c"]);
    }

    #[test]
    fn toggle_flips_and_reports_state() {
        let mut collection = collection_with(false, &["x"]);
        assert_eq!(collection.toggle("x").unwrap(), false);
        assert_eq!(collection.toggle("x").unwrap(), true);
        assert!(matches!(collection.toggle("y"), Err(ListError::NotFound { .. })));
    }

    #[test]
    fn set_all_enabled_updates_every_entry() {
        let mut collection = collection_with(false, &["a", "b"]);
        collection.set_all_enabled(false);
        assert_eq!(collection.enabled_count(), 0);
        collection.set_all_enabled(true);
        assert!(collection.all_enabled());
    }

    #[test]
    fn import_skips_blank_and_duplicate_lines() {
        let mut collection = EntryCollection::new(false);
        let summary = collection.import_names(["A", "", "A", "B"]);
        assert_eq!(summary, ImportSummary { added: 2, skipped: 2 });
        assert_eq!(
            flags(&collection),
            vec![("A".to_string(), true), ("B".to_string(), true)]
        );
    }

    #[test]
    fn import_trims_lines_and_keeps_existing_flags() {
        let mut collection = collection_with(false, &["Kept"]);
        collection.toggle("Kept").unwrap();
        let summary = collection.import_names(["  New  \r", "Kept", "   "]);
        assert_eq!(summary.added, 1);
        assert_eq!(
            flags(&collection),
            vec![("Kept".to_string(), false), ("New".to_string(), true)]
        );
    }

    #[test]
    fn import_sorts_once_with_auto_sort() {
        let mut collection = collection_with(true, &["m"]);
        collection.import_names(["z", "B", "a"]);
        assert_eq!(collection.names(), vec!["a", "B", "m", "z"]);
    }

    #[test]
    fn load_keeps_record_names_untrimmed() {
        let mut collection = EntryCollection::new(false);
        let count = collection.load_from(&[json!("A"), json!("A ")]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(collection.names(), vec!["A", "A "]);
        assert!(matches!(
            collection.load_from(&[json!("   ")]),
            Err(ListError::InvalidName)
        ));
        assert!(collection.is_empty());
    }

    #[test]
    fn load_accepts_objects_and_bare_strings() {
        let mut collection = collection_with(false, &["old"]);
        let records = vec![
            json!({"name": "Entry One", "enabled": true}),
            json!({"name": "Entry Two", "enabled": false}),
            json!("Entry Three"),
            json!({"name": "Entry Four"}),
        ];
        assert_eq!(collection.load_from(&records).unwrap(), 4);
        assert_eq!(
            flags(&collection),
            vec![
                ("Entry One".to_string(), true),
                ("Entry Two".to_string(), false),
                ("Entry Three".to_string(), true),
                ("Entry Four".to_string(), true),
            ]
        );
    }

    #[test]
    fn malformed_record_fails_load_and_leaves_collection_empty() {
        let mut collection = collection_with(false, &["previous"]);
        let records = vec![json!("fine"), json!({"enabled": false})];
        let err = collection.load_from(&records).unwrap_err();
        assert!(matches!(err, ListError::Parse { ref message } if message.contains("record 1")));
        // The previous contents are gone too; there is no rollback.
        assert!(collection.is_empty());
    }

    #[test]
    fn load_rejects_wrong_record_types() {
        let mut collection = EntryCollection::new(false);
        for record in [json!(3), json!({"name": 7}), json!({"name": "x", "enabled": "yes"})] {
            let err = collection.load_from(&[record]).unwrap_err();
            assert!(matches!(err, ListError::Parse { .. }));
            assert!(collection.is_empty());
        }
    }

    #[test]
    fn load_with_duplicate_records_fails() {
        let mut collection = EntryCollection::new(false);
        let err = collection
            .load_from(&[json!("same"), json!({"name": "same", "enabled": false})])
            .unwrap_err();
        assert!(matches!(err, ListError::DuplicateName { .. }));
        assert!(collection.is_empty());
    }

    #[test]
    fn full_records_round_trip_through_load() {
        let mut original = collection_with(false, &["delta", "Alpha", "charlie"]);
        original.toggle("Alpha").unwrap();
        let text = original.to_json(ExportFilter::All).unwrap();
        let records: Vec<Value> = serde_json::from_str(&text).unwrap();

        let mut restored = EntryCollection::new(false);
        restored.load_from(&records).unwrap();
        assert_eq!(flags(&restored), flags(&original));
    }

    #[test]
    fn export_emits_enabled_names_only() {
        let mut collection = collection_with(false, &["First", "Second", "Third"]);
        collection.toggle("Second").unwrap();
        let text = collection.serialize_for_export().unwrap();
        let expected = "[\n    {\n        \"name\": \"First\"\n    },\n    {\n        \"name\": \"Third\"\n    }\n]";
        assert_eq!(text, expected);
        assert_eq!(text, collection.to_json(ExportFilter::EnabledOnly).unwrap());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!([{"name": "First"}, {"name": "Third"}]));
    }

    #[test]
    fn full_json_keeps_name_before_enabled() {
        let mut collection = collection_with(false, &["One"]);
        collection.toggle("One").unwrap();
        assert_eq!(
            collection.to_json(ExportFilter::All).unwrap(),
            "[\n    {\n        \"name\": \"One\",\n        \"enabled\": false\n    }\n]"
        );
    }

    #[test]
    fn empty_collection_exports_empty_array() {
        let collection = EntryCollection::new(true);
        assert_eq!(collection.serialize_for_export().unwrap(), "[]");
    }

    #[test]
    fn matching_filters_case_insensitively() {
        let collection = collection_with(false, &["Red Shell", "blue shell", "Star"]);
        assert_eq!(collection.matching("SHELL"), vec![0, 1]);
        assert_eq!(collection.matching(""), vec![0, 1, 2]);
        assert!(collection.matching("mushroom").is_empty());
    }
}
