// ── Property mapping engine ──
//
// Declarative schemas bind logical property names to raw vendor keys,
// with optional get/set transforms. The engine reads and writes through
// a `PropertyHost`, so the same schema machinery serves sensors (backed
// by the tag's store) and monitoring configs (backed by their own store).

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{SensorType, TempUnit};
use crate::xforms::{GetFn, SetFn, identity, identity_set};

// ── Host ────────────────────────────────────────────────────────────

/// The store and context a schema operates on.
pub trait PropertyHost {
    /// Kind of the sensor this host belongs to (for error reporting).
    fn sensor_type(&self) -> SensorType;

    fn raw(&self, key: &str) -> Option<Value>;

    fn write_raw(&self, key: &str, value: Value);

    /// Record a modification. Hosts without dirty tracking ignore it.
    fn note_modified(&self, _key: &str) {}

    /// Unit that temperature transforms convert to. `None` means Celsius
    /// pass-through.
    fn temp_unit(&self) -> Result<Option<TempUnit>, CoreError>;

    fn high_precision_temp(&self) -> bool {
        false
    }

    fn delegate_get(&self, target: &str) -> Result<Value, CoreError> {
        Err(CoreError::schema(format!(
            "{} host cannot delegate to '{target}'",
            self.sensor_type()
        )))
    }

    fn delegate_set(&self, target: &str, _value: Value) -> Result<(), CoreError> {
        Err(CoreError::schema(format!(
            "{} host cannot delegate to '{target}'",
            self.sensor_type()
        )))
    }
}

// ── Schema entries ──────────────────────────────────────────────────

#[derive(Clone)]
pub enum PropertyKind {
    /// Plain value with optional transforms. No getter means write-only,
    /// no setter means read-only.
    Value {
        get: Option<GetFn>,
        set: Option<SetFn>,
    },
    /// Nested view over leaf properties of the same store.
    Group(Vec<PropertySpec>),
    /// Pass-through to a property of the owning sensor.
    Delegate { target: &'static str },
}

#[derive(Clone)]
pub struct PropertySpec {
    pub name: &'static str,
    pub source: Option<&'static str>,
    pub kind: PropertyKind,
}

impl fmt::Debug for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            PropertyKind::Value { get, set } => match (get.is_some(), set.is_some()) {
                (true, true) => "read-write",
                (true, false) => "read-only",
                (false, true) => "write-only",
                (false, false) => "inert",
            },
            PropertyKind::Group(_) => "group",
            PropertyKind::Delegate { .. } => "delegate",
        };
        f.debug_struct("PropertySpec")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("kind", &kind)
            .finish()
    }
}

impl PropertySpec {
    /// Identity read/write binding to a raw key.
    pub fn plain(name: &'static str, source: &'static str) -> Self {
        Self::read_write(name, source, identity(), identity_set())
    }

    pub fn read_only(name: &'static str, source: &'static str, get: GetFn) -> Self {
        Self {
            name,
            source: Some(source),
            kind: PropertyKind::Value {
                get: Some(get),
                set: None,
            },
        }
    }

    pub fn read_write(name: &'static str, source: &'static str, get: GetFn, set: SetFn) -> Self {
        Self {
            name,
            source: Some(source),
            kind: PropertyKind::Value {
                get: Some(get),
                set: Some(set),
            },
        }
    }

    pub fn write_only(name: &'static str, source: &'static str, set: SetFn) -> Self {
        Self {
            name,
            source: Some(source),
            kind: PropertyKind::Value {
                get: None,
                set: Some(set),
            },
        }
    }

    /// Synthesized from the transform alone, no raw key.
    pub fn derived(name: &'static str, get: GetFn) -> Self {
        Self {
            name,
            source: None,
            kind: PropertyKind::Value {
                get: Some(get),
                set: None,
            },
        }
    }

    pub fn group(name: &'static str, leaves: Vec<PropertySpec>) -> Self {
        Self {
            name,
            source: None,
            kind: PropertyKind::Group(leaves),
        }
    }

    pub fn delegate(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            source: None,
            kind: PropertyKind::Delegate { target },
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, PropertyKind::Group(_))
    }

    pub fn leaves(&self) -> &[PropertySpec] {
        match &self.kind {
            PropertyKind::Group(leaves) => leaves,
            _ => &[],
        }
    }
}

// ── Schemas ─────────────────────────────────────────────────────────

/// Ordered property list of one sensor or config kind.
#[derive(Debug, Clone, Default)]
pub struct PropertySchema {
    entries: Vec<PropertySpec>,
}

impl PropertySchema {
    pub fn new(entries: Vec<PropertySpec>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PropertySpec] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&PropertySpec> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Copy of this schema with `extra` merged in: same-named entries are
    /// replaced in place, new ones appended in order.
    pub fn overlay(&self, extra: Vec<PropertySpec>) -> Self {
        let mut entries = self.entries.clone();
        for spec in extra {
            match entries.iter_mut().find(|e| e.name == spec.name) {
                Some(existing) => *existing = spec,
                None => entries.push(spec),
            }
        }
        Self { entries }
    }

    /// Top-level names followed by each group's dotted leaf names.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for entry in &self.entries {
            names.push(entry.name.to_owned());
            for leaf in entry.leaves() {
                names.push(format!("{}.{}", entry.name, leaf.name));
            }
        }
        names
    }

    /// Whether `name` is a top-level property or a dotted group leaf.
    pub fn has(&self, name: &str) -> bool {
        match name.split_once('.') {
            Some((group, leaf)) => self
                .find(group)
                .is_some_and(|g| g.leaves().iter().any(|l| l.name == leaf)),
            None => self.find(name).is_some(),
        }
    }

    /// Every raw key bound by this schema, leaves included.
    pub fn raw_keys(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .flat_map(|e| std::iter::once(e).chain(e.leaves()))
            .filter_map(|e| e.source)
            .collect()
    }

    fn resolve(&self, name: &str, kind: SensorType) -> Result<Resolved<'_>, CoreError> {
        let unknown = || CoreError::UnknownProperty {
            name: name.to_owned(),
            sensor_type: kind,
        };
        match name.split_once('.') {
            Some((group, leaf)) => {
                let group_spec = self.find(group).ok_or_else(unknown)?;
                let leaf_spec = group_spec
                    .leaves()
                    .iter()
                    .find(|l| l.name == leaf)
                    .ok_or_else(unknown)?;
                Ok(Resolved::Leaf(group_spec, leaf_spec))
            }
            None => self.find(name).map(Resolved::Top).ok_or_else(unknown),
        }
    }
}

enum Resolved<'a> {
    Top(&'a PropertySpec),
    Leaf(&'a PropertySpec, &'a PropertySpec),
}

/// A schema table entry: a concrete schema or an alias to another kind.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    Schema(PropertySchema),
    Alias(SensorType),
}

/// Schemas keyed by sensor kind, with one level of aliasing.
#[derive(Debug, Default)]
pub struct SchemaTable {
    entries: HashMap<SensorType, SchemaEntry>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: SensorType, schema: PropertySchema) -> &mut Self {
        self.entries.insert(kind, SchemaEntry::Schema(schema));
        self
    }

    pub fn alias(&mut self, kind: SensorType, target: SensorType) -> &mut Self {
        self.entries.insert(kind, SchemaEntry::Alias(target));
        self
    }

    /// Resolve `kind` to the kind that owns its schema, and the schema.
    pub fn resolve(&self, kind: SensorType) -> Result<(SensorType, &PropertySchema), CoreError> {
        match self.entries.get(&kind) {
            Some(SchemaEntry::Schema(schema)) => Ok((kind, schema)),
            Some(SchemaEntry::Alias(target)) if *target == kind => Err(CoreError::schema(
                format!("{kind} schema is aliased to itself"),
            )),
            Some(SchemaEntry::Alias(target)) => match self.entries.get(target) {
                Some(SchemaEntry::Schema(schema)) => Ok((*target, schema)),
                Some(SchemaEntry::Alias(_)) => Err(CoreError::schema(format!(
                    "{kind} schema aliases {target}, which is itself an alias"
                ))),
                None => Err(CoreError::schema(format!(
                    "{kind} schema aliases {target}, which has no schema"
                ))),
            },
            None => Err(CoreError::schema(format!("no schema for {kind}"))),
        }
    }
}

// ── Access ──────────────────────────────────────────────────────────

fn eval_get(host: &dyn PropertyHost, spec: &PropertySpec, name: &str) -> Result<Value, CoreError> {
    match &spec.kind {
        PropertyKind::Value { get: Some(get), .. } => {
            let raw = spec.source.and_then(|key| host.raw(key));
            get(host, raw.as_ref())
        }
        PropertyKind::Value { get: None, .. } => Err(CoreError::WriteOnly {
            name: name.to_owned(),
        }),
        PropertyKind::Group(leaves) => {
            let mut view = Map::new();
            for leaf in leaves {
                if let PropertyKind::Value { get: Some(_), .. } = leaf.kind {
                    let full = format!("{name}.{}", leaf.name);
                    view.insert(leaf.name.to_owned(), eval_get(host, leaf, &full)?);
                }
            }
            Ok(Value::Object(view))
        }
        PropertyKind::Delegate { target } => host.delegate_get(target),
    }
}

fn eval_set(
    host: &dyn PropertyHost,
    spec: &PropertySpec,
    name: &str,
    value: Value,
) -> Result<(), CoreError> {
    let PropertyKind::Value { set: Some(set), .. } = &spec.kind else {
        return Err(CoreError::ReadOnly {
            name: name.to_owned(),
        });
    };
    let raw = set(host, value)?;
    if let Some(key) = spec.source {
        host.write_raw(key, raw);
        host.note_modified(key);
    }
    host.note_modified(name);
    Ok(())
}

/// Read a property (top-level or dotted group leaf).
pub fn get(host: &dyn PropertyHost, schema: &PropertySchema, name: &str) -> Result<Value, CoreError> {
    match schema.resolve(name, host.sensor_type())? {
        Resolved::Top(spec) => eval_get(host, spec, name),
        Resolved::Leaf(_, leaf) => eval_get(host, leaf, name),
    }
}

/// Write a property. The store is untouched when the transform fails.
pub fn set(
    host: &dyn PropertyHost,
    schema: &PropertySchema,
    name: &str,
    value: Value,
) -> Result<(), CoreError> {
    match schema.resolve(name, host.sensor_type())? {
        Resolved::Top(spec) => match &spec.kind {
            PropertyKind::Delegate { target } => {
                host.delegate_set(target, value)?;
                host.note_modified(name);
                Ok(())
            }
            _ => eval_set(host, spec, name, value),
        },
        Resolved::Leaf(group, leaf) => {
            eval_set(host, leaf, name, value)?;
            host.note_modified(group.name);
            Ok(())
        }
    }
}

// ── Group view ──────────────────────────────────────────────────────

/// Live view of a property group. Every access reads through to the
/// host's store, so two views of the same group always agree.
pub struct PropertyGroup<'a> {
    host: &'a dyn PropertyHost,
    schema: &'a PropertySchema,
    spec: &'a PropertySpec,
}

impl<'a> PropertyGroup<'a> {
    pub fn new(
        host: &'a dyn PropertyHost,
        schema: &'a PropertySchema,
        name: &str,
    ) -> Result<Self, CoreError> {
        match schema.find(name) {
            Some(spec) if spec.is_group() => Ok(Self { host, schema, spec }),
            _ => Err(CoreError::UnknownProperty {
                name: name.to_owned(),
                sensor_type: host.sensor_type(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn get(&self, leaf: &str) -> Result<Value, CoreError> {
        get(self.host, self.schema, &format!("{}.{leaf}", self.spec.name))
    }

    pub fn set(&self, leaf: &str, value: Value) -> Result<(), CoreError> {
        set(self.host, self.schema, &format!("{}.{leaf}", self.spec.name), value)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.spec.leaves().iter().map(|l| l.name).collect()
    }

    pub fn to_value(&self) -> Result<Value, CoreError> {
        eval_get(self.host, self.spec, self.spec.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::xforms::{self, EnumTable, Label};

    static LEVELS: EnumTable = EnumTable {
        name: "level",
        entries: &[(0, Label::Text("Low")), (1, Label::Text("High"))],
    };

    #[derive(Default)]
    struct MapHost {
        data: RefCell<Map<String, Value>>,
        dirty: RefCell<BTreeSet<String>>,
        unit: Option<TempUnit>,
    }

    impl PropertyHost for MapHost {
        fn sensor_type(&self) -> SensorType {
            SensorType::Temp
        }
        fn raw(&self, key: &str) -> Option<Value> {
            self.data.borrow().get(key).cloned()
        }
        fn write_raw(&self, key: &str, value: Value) {
            self.data.borrow_mut().insert(key.to_owned(), value);
        }
        fn note_modified(&self, key: &str) {
            self.dirty.borrow_mut().insert(key.to_owned());
        }
        fn temp_unit(&self) -> Result<Option<TempUnit>, CoreError> {
            Ok(self.unit)
        }
    }

    fn schema() -> PropertySchema {
        PropertySchema::new(vec![
            PropertySpec::read_write(
                "level",
                "lvl",
                xforms::enum_get(&LEVELS),
                xforms::enum_set(&LEVELS),
            ),
            PropertySpec::read_only("reading", "temperature", xforms::temp_reading()),
            PropertySpec::write_only("secret", "pin", xforms::identity_set()),
            PropertySpec::derived("levels", xforms::enum_values(&LEVELS)),
            PropertySpec::group(
                "limits",
                vec![
                    PropertySpec::read_write(
                        "low",
                        "th_low",
                        xforms::to_native_temp(false),
                        xforms::from_native_temp(false),
                    ),
                    PropertySpec::plain("enabled", "th_on"),
                ],
            ),
        ])
    }

    #[test]
    fn get_applies_transform() {
        let host = MapHost::default();
        host.write_raw("lvl", json!(1));
        assert_eq!(get(&host, &schema(), "level").unwrap(), json!("High"));
        assert_eq!(
            get(&host, &schema(), "levels").unwrap(),
            json!(["Low", "High"])
        );
    }

    #[test]
    fn set_marks_name_and_source() {
        let host = MapHost::default();
        set(&host, &schema(), "level", json!("Low")).unwrap();
        assert_eq!(host.raw("lvl"), Some(json!(0)));
        let dirty: Vec<_> = host.dirty.borrow().iter().cloned().collect();
        assert_eq!(dirty, vec!["level".to_owned(), "lvl".to_owned()]);
    }

    #[test]
    fn failed_transform_leaves_store_untouched() {
        let host = MapHost::default();
        host.write_raw("lvl", json!(1));
        let err = set(&host, &schema(), "level", json!("Medium")).unwrap_err();
        assert!(matches!(err, CoreError::Range { .. }));
        assert_eq!(host.raw("lvl"), Some(json!(1)));
        assert!(host.dirty.borrow().is_empty());
    }

    #[test]
    fn access_errors() {
        let host = MapHost::default();
        let s = schema();
        assert!(matches!(
            set(&host, &s, "reading", json!(1)),
            Err(CoreError::ReadOnly { .. })
        ));
        assert!(matches!(
            get(&host, &s, "secret"),
            Err(CoreError::WriteOnly { .. })
        ));
        assert!(matches!(
            get(&host, &s, "nope"),
            Err(CoreError::UnknownProperty { .. })
        ));
        assert!(matches!(
            get(&host, &s, "limits.nope"),
            Err(CoreError::UnknownProperty { .. })
        ));
        assert!(matches!(
            set(&host, &s, "limits", json!({})),
            Err(CoreError::ReadOnly { .. })
        ));
    }

    #[test]
    fn leaf_set_marks_leaf_group_and_key() {
        let host = MapHost {
            unit: Some(TempUnit::DegF),
            ..MapHost::default()
        };
        set(&host, &schema(), "limits.low", json!(68.0)).unwrap();

        let stored = host.raw("th_low").unwrap().as_f64().unwrap();
        assert!((stored - 20.0).abs() < 1e-9);
        let dirty: Vec<_> = host.dirty.borrow().iter().cloned().collect();
        assert_eq!(dirty, vec!["limits", "limits.low", "th_low"]);
    }

    #[test]
    fn group_view_reads_through() {
        let host = MapHost::default();
        let s = schema();
        let first = PropertyGroup::new(&host, &s, "limits").unwrap();
        let second = PropertyGroup::new(&host, &s, "limits").unwrap();

        first.set("enabled", json!(true)).unwrap();
        assert_eq!(second.get("enabled").unwrap(), json!(true));
        assert_eq!(
            second.to_value().unwrap(),
            json!({ "low": null, "enabled": true })
        );
        assert_eq!(first.names(), vec!["low", "enabled"]);
        assert!(PropertyGroup::new(&host, &s, "level").is_err());
    }

    #[test]
    fn names_include_dotted_leaves() {
        let s = schema();
        assert_eq!(
            s.names(),
            vec!["level", "reading", "secret", "levels", "limits", "limits.low", "limits.enabled"]
        );
        assert!(s.has("limits.low"));
        assert!(!s.has("limits.high"));
        assert_eq!(s.raw_keys(), vec!["lvl", "temperature", "pin", "th_low", "th_on"]);
    }

    #[test]
    fn overlay_replaces_and_appends() {
        let s = schema().overlay(vec![
            PropertySpec::plain("level", "level_raw"),
            PropertySpec::plain("extra", "x"),
        ]);
        assert_eq!(s.find("level").unwrap().source, Some("level_raw"));
        assert_eq!(s.entries().first().unwrap().name, "level");
        assert_eq!(s.entries().last().unwrap().name, "extra");
    }

    #[test]
    fn table_resolves_one_alias_level() {
        let mut table = SchemaTable::new();
        table
            .insert(SensorType::Humidity, schema())
            .alias(SensorType::Moisture, SensorType::Humidity)
            .alias(SensorType::Event, SensorType::Event)
            .alias(SensorType::Water, SensorType::Moisture);

        let (kind, _) = table.resolve(SensorType::Moisture).unwrap();
        assert_eq!(kind, SensorType::Humidity);
        assert!(matches!(
            table.resolve(SensorType::Event),
            Err(CoreError::Schema { .. })
        ));
        assert!(matches!(
            table.resolve(SensorType::Water),
            Err(CoreError::Schema { .. })
        ));
        assert!(table.resolve(SensorType::Signal).is_err());
    }
}
