//! # Schema Store
//!
//! Owns the live tree and the listener registry.
//!
//! Every public mutation, and `subscribe`, holds the operation gate from
//! commit until the last listener returns, so listeners observe changes in
//! commit order. The gate is re-entrant: a listener runs on the caller's
//! thread with the tree lock released and may call back into the store.
//!
//! Each commit bumps the store revision. A listener is never handed a
//! revision older than one it has already received; when a listener
//! mutates the store, the outer round skips listeners the nested round
//! already brought up to date.
//!
//! Walking policies:
//! - `add_property` autovivifies missing objects and silently ignores
//!   targets that cannot hold children
//! - `edit_property` and `delete_property` require every step to exist

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parking_lot::ReentrantMutex;
use uuid::Uuid;

use super::navigate;
use super::subscription::{ListenerRegistry, Subscription};
use crate::observability::{log_event_with_fields, Event, MetricsSnapshot, StoreMetrics};
use crate::schema::{
    PropertyKind, PropertyMap, PropertyUpdate, RootSchema, SchemaError, SchemaPath,
    SchemaProperty, SchemaResult,
};

/// Where an edit target lives
enum Slot<'a> {
    /// Entry of a properties mapping (root or object), renamed by re-keying
    Keyed(&'a mut PropertyMap),
    /// Items descriptor of an array, renamed in place
    Item(&'a mut SchemaProperty),
}

/// Outcome of an add, for logging
enum AddOutcome {
    Inserted,
    Ignored,
}

/// Editable schema tree with change notification.
///
/// `SchemaStore` is `Send + Sync`; share it behind an `Arc` to mutate it from
/// several threads. A listener must not wait on another thread that mutates
/// the same store, since that thread blocks on the operation gate.
pub struct SchemaStore {
    id: Uuid,
    gate: ReentrantMutex<()>,
    tree: Mutex<RootSchema>,
    revision: AtomicU64,
    listeners: Arc<Mutex<ListenerRegistry>>,
    metrics: StoreMetrics,
}

impl SchemaStore {
    /// Creates a store holding an empty root
    pub fn new() -> Self {
        let store = Self {
            id: Uuid::new_v4(),
            gate: ReentrantMutex::new(()),
            tree: Mutex::new(RootSchema::new()),
            revision: AtomicU64::new(0),
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
            metrics: StoreMetrics::new(),
        };

        let id = store.id.to_string();
        log_event_with_fields(Event::StoreCreated, &[("store", id.as_str())]);
        store
    }

    /// Creates a store holding `schema`.
    ///
    /// Fails with `InvalidProperty` if the tree breaks a structural invariant.
    pub fn from_schema(schema: RootSchema) -> SchemaResult<Self> {
        schema
            .validate_structure()
            .map_err(|reason| SchemaError::invalid_property(&SchemaPath::root(), reason))?;

        let store = Self::new();
        *store.lock_tree() = schema;
        Ok(store)
    }

    /// Returns the instance id used in log lines
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns an independent copy of the current tree
    pub fn get_schema(&self) -> RootSchema {
        self.lock_tree().clone()
    }

    /// Returns a copy of the node at `path`, if every step resolves
    pub fn get_property(&self, path: &SchemaPath) -> Option<SchemaProperty> {
        let tree = self.lock_tree();
        navigate::resolve(&tree.properties, path.steps()).cloned()
    }

    /// Registers `listener` and immediately calls it once with the current
    /// tree.
    ///
    /// The listener stays registered until [`Subscription::unsubscribe`] is
    /// called; dropping the handle does not remove it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(RootSchema) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        let _gate = self.gate.lock();

        let (id, revision, snapshot) = {
            let tree = self.lock_tree();
            let id = self.lock_listeners().register(listener.clone());
            (id, self.revision.load(Ordering::SeqCst), tree.clone())
        };

        let listener_id = id.to_string();
        log_event_with_fields(Event::ListenerSubscribed, &[("listener", listener_id.as_str())]);

        if self.lock_listeners().claim(id, revision) {
            listener(snapshot);
            self.metrics.add_notifications(1);
        }

        Subscription::new(id, &self.listeners)
    }

    /// Inserts `property` into the container at `path`.
    ///
    /// Missing intermediate nodes are created as empty objects. When the walk
    /// is blocked by an existing scalar, or the container cannot hold
    /// children, the add is silently ignored. Listeners are notified in every
    /// case except a rejected payload.
    pub fn add_property(&self, path: &SchemaPath, property: SchemaProperty) -> SchemaResult<()> {
        if let Err(reason) = property.validate_structure() {
            return Err(self.rejected(SchemaError::invalid_property(path, reason)));
        }

        let name = property.name.clone();
        let _gate = self.gate.lock();
        let (outcome, revision, snapshot) = {
            let mut tree = self.lock_tree();
            let outcome = apply_add(&mut tree.properties, path, property);
            (outcome, self.next_revision(), tree.clone())
        };

        self.metrics.increment_adds();
        let path_label = path.to_string();
        let event = match outcome {
            AddOutcome::Inserted => Event::PropertyAdded,
            AddOutcome::Ignored => Event::PropertyAddIgnored,
        };
        log_event_with_fields(event, &[("name", name.as_str()), ("path", path_label.as_str())]);

        self.notify(revision, &snapshot);
        Ok(())
    }

    /// Shallow-merges `updates` into the node at `path`.
    ///
    /// A changed name re-keys the node in its parent mapping at the same
    /// position; an items descriptor is renamed in place.
    pub fn edit_property(&self, path: &SchemaPath, updates: PropertyUpdate) -> SchemaResult<()> {
        if path.is_root() {
            return Err(self.rejected(SchemaError::cannot_edit_root()));
        }
        if let Err(reason) = updates.validate_structure() {
            return Err(self.rejected(SchemaError::invalid_property(path, reason)));
        }

        let _gate = self.gate.lock();
        let result = {
            let mut tree = self.lock_tree();
            apply_edit(&mut tree.properties, path, &updates)
                .map(|renamed| (renamed, self.next_revision(), tree.clone()))
        };
        let (renamed, revision, snapshot) = result.map_err(|err| self.rejected(err))?;

        self.metrics.increment_edits();
        let path_label = path.to_string();
        log_event_with_fields(Event::PropertyEdited, &[("path", path_label.as_str())]);

        if let Some((from, to)) = renamed {
            self.metrics.increment_renames();
            log_event_with_fields(
                Event::PropertyRenamed,
                &[("from", from.as_str()), ("path", path_label.as_str()), ("to", to.as_str())],
            );
        }

        self.notify(revision, &snapshot);
        Ok(())
    }

    /// Removes the node at `path`.
    ///
    /// The root path is a no-op without notification. A missing final key is
    /// not an error; a missing intermediate step is `NotFound`.
    pub fn delete_property(&self, path: &SchemaPath) -> SchemaResult<()> {
        if path.is_root() {
            return Ok(());
        }

        let _gate = self.gate.lock();
        let result = {
            let mut tree = self.lock_tree();
            apply_delete(&mut tree.properties, path)
                .map(|removed| (removed, self.next_revision(), tree.clone()))
        };
        let (removed, revision, snapshot) = result.map_err(|err| self.rejected(err))?;

        self.metrics.increment_deletes();
        let path_label = path.to_string();
        log_event_with_fields(
            Event::PropertyDeleted,
            &[("path", path_label.as_str()), ("removed", if removed { "true" } else { "false" })],
        );

        self.notify(revision, &snapshot);
        Ok(())
    }

    /// Replaces the whole tree and notifies every listener
    pub fn seed(&self, schema: RootSchema) -> SchemaResult<()> {
        if let Err(reason) = schema.validate_structure() {
            return Err(self.rejected(SchemaError::invalid_property(&SchemaPath::root(), reason)));
        }

        let count = schema.len().to_string();
        let _gate = self.gate.lock();
        let (revision, snapshot) = {
            let mut tree = self.lock_tree();
            *tree = schema;
            (self.next_revision(), tree.clone())
        };

        self.metrics.increment_seeds();
        let id = self.id.to_string();
        log_event_with_fields(
            Event::SchemaSeeded,
            &[("properties", count.as_str()), ("store", id.as_str())],
        );

        self.notify(revision, &snapshot);
        Ok(())
    }

    /// Returns the number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Returns a copy of the operation counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn lock_tree(&self) -> MutexGuard<'_, RootSchema> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, ListenerRegistry> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bumps the revision. Called with the tree lock held.
    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Calls every registered listener in registration order.
    ///
    /// Must be called with the gate held and the tree lock released.
    fn notify(&self, revision: u64, snapshot: &RootSchema) {
        let listeners = self.lock_listeners().snapshot();
        for (id, listener) in listeners {
            if !self.lock_listeners().claim(id, revision) {
                continue;
            }
            listener(snapshot.clone());
            self.metrics.add_notifications(1);
        }
    }

    fn rejected(&self, err: SchemaError) -> SchemaError {
        self.metrics.increment_rejections();
        let path = err.path().map(ToString::to_string).unwrap_or_default();
        log_event_with_fields(
            Event::MutationRejected,
            &[("code", err.code().code()), ("path", path.as_str())],
        );
        err
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaStore")
            .field("id", &self.id)
            .field("properties", &self.lock_tree().len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn apply_add(root: &mut PropertyMap, path: &SchemaPath, property: SchemaProperty) -> AddOutcome {
    let target = if path.is_root() {
        Some(root)
    } else {
        navigate::vivify(root, path.steps()).and_then(|container| match &mut container.kind {
            PropertyKind::Object { properties } => Some(properties),
            PropertyKind::Array { items: Some(item) } => match &mut item.kind {
                PropertyKind::Object { properties } => Some(properties),
                _ => None,
            },
            _ => None,
        })
    };

    match target {
        // `insert` on an existing key replaces the value and keeps its position
        Some(properties) => {
            properties.insert(property.name.clone(), property);
            AddOutcome::Inserted
        }
        None => AddOutcome::Ignored,
    }
}

/// Returns `(old, new)` names when the edit renamed the node.
fn apply_edit(
    root: &mut PropertyMap,
    path: &SchemaPath,
    updates: &PropertyUpdate,
) -> SchemaResult<Option<(String, String)>> {
    let (last, parent_steps) = path.split_last().ok_or_else(SchemaError::cannot_edit_root)?;

    let slot = if parent_steps.is_empty() {
        Slot::Keyed(root)
    } else {
        let parent = navigate::resolve_mut(root, parent_steps, path)?;
        match (&mut parent.kind, last) {
            (PropertyKind::Object { properties }, _) => Slot::Keyed(properties),
            (PropertyKind::Array { items }, step) if step.is_items() => Slot::Item(
                items
                    .as_deref_mut()
                    .ok_or_else(|| SchemaError::not_found(path, last.as_key()))?,
            ),
            _ => return Err(SchemaError::not_found(path, last.as_key())),
        }
    };

    match slot {
        Slot::Keyed(properties) => {
            let key = last.as_key();
            let (index, merged) = {
                let (index, _, current) = properties
                    .get_full(key)
                    .ok_or_else(|| SchemaError::not_found(path, key))?;
                (index, current.merged(updates))
            };

            if merged.name == key {
                properties.insert(merged.name.clone(), merged);
                return Ok(None);
            }

            if properties.contains_key(&merged.name) {
                return Err(SchemaError::duplicate_name(path, &merged.name));
            }

            let renamed = (key.to_string(), merged.name.clone());
            properties.shift_remove(key);
            properties.shift_insert(index, merged.name.clone(), merged);
            Ok(Some(renamed))
        }
        Slot::Item(node) => {
            let merged = node.merged(updates);
            let renamed = (merged.name != node.name).then(|| (node.name.clone(), merged.name.clone()));
            *node = merged;
            Ok(renamed)
        }
    }
}

/// Returns whether a node was actually removed.
fn apply_delete(root: &mut PropertyMap, path: &SchemaPath) -> SchemaResult<bool> {
    let Some((last, parent_steps)) = path.split_last() else {
        return Ok(false);
    };

    if parent_steps.is_empty() {
        return Ok(root.shift_remove(last.as_key()).is_some());
    }

    let parent = navigate::resolve_mut(root, parent_steps, path)?;
    let removed = match (&mut parent.kind, last) {
        (PropertyKind::Array { items }, step) if step.is_items() => items.take().is_some(),
        (PropertyKind::Object { properties }, step) => {
            properties.shift_remove(step.as_key()).is_some()
        }
        _ => false,
    };
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaErrorCode, SchemaType};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn path(segments: &[&str]) -> SchemaPath {
        SchemaPath::from_segments(segments)
    }

    fn person() -> RootSchema {
        RootSchema::new()
            .with_property(SchemaProperty::string("name").with_description("Full name"))
            .with_property(SchemaProperty::integer("age"))
            .with_property(
                SchemaProperty::object("address")
                    .with_property(SchemaProperty::string("city"))
                    .with_property(SchemaProperty::string("zip")),
            )
            .with_property(
                SchemaProperty::array("tags").with_items(SchemaProperty::string("tag")),
            )
    }

    fn store() -> SchemaStore {
        SchemaStore::from_schema(person()).unwrap()
    }

    fn keys(map: &PropertyMap) -> Vec<String> {
        map.keys().cloned().collect()
    }

    fn recording(store: &SchemaStore) -> (Arc<Mutex<Vec<RootSchema>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |schema| sink.lock().unwrap().push(schema));
        (seen, subscription)
    }

    #[test]
    fn test_get_schema_is_independent_copy() {
        let store = store();
        let mut first = store.get_schema();
        first.properties.clear();
        assert_eq!(store.get_schema(), person());
    }

    #[test]
    fn test_from_schema_rejects_mismatched_key() {
        let mut schema = person();
        schema
            .properties
            .insert("alias".into(), SchemaProperty::string("other"));
        let err = SchemaStore::from_schema(schema).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidProperty);
    }

    #[test]
    fn test_subscribe_catches_up() {
        let store = store();
        let (seen, _subscription) = recording(&store);
        assert_eq!(*seen.lock().unwrap(), vec![person()]);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_add_at_root_overwrites_in_place() {
        let store = store();
        store
            .add_property(&SchemaPath::root(), SchemaProperty::boolean("age"))
            .unwrap();

        let schema = store.get_schema();
        assert_eq!(keys(&schema.properties), vec!["name", "age", "address", "tags"]);
        assert_eq!(schema.get("age").unwrap().schema_type(), SchemaType::Boolean);
    }

    #[test]
    fn test_add_autovivifies() {
        let store = SchemaStore::new();
        store
            .add_property(&path(&["a", "b"]), SchemaProperty::string("c"))
            .unwrap();

        let c = store.get_property(&path(&["a", "b", "c"])).unwrap();
        assert_eq!(c.schema_type(), SchemaType::String);
        assert_eq!(store.get_property(&path(&["a"])).unwrap().name, "a");
    }

    #[test]
    fn test_add_into_object_items() {
        let store = SchemaStore::new();
        store
            .add_property(
                &SchemaPath::root(),
                SchemaProperty::array("rows").with_items(SchemaProperty::object("row")),
            )
            .unwrap();
        store
            .add_property(&path(&["rows", "items"]), SchemaProperty::integer("id"))
            .unwrap();

        let row = store.get_property(&path(&["rows", "items"])).unwrap();
        assert!(row.properties().unwrap().contains_key("id"));
    }

    #[test]
    fn test_add_items_step_vivifies_descriptor() {
        let store = SchemaStore::new();
        store
            .add_property(&SchemaPath::root(), SchemaProperty::array("list"))
            .unwrap();
        store
            .add_property(&path(&["list", "items"]), SchemaProperty::string("label"))
            .unwrap();

        let item = store.get_property(&path(&["list", "items"])).unwrap();
        assert_eq!(item.name, "items");
        assert!(item.properties().unwrap().contains_key("label"));
    }

    #[test]
    fn test_add_ignored_on_scalar_still_notifies() {
        let store = store();
        let (seen, _subscription) = recording(&store);

        store
            .add_property(&path(&["age", "x"]), SchemaProperty::string("y"))
            .unwrap();
        store
            .add_property(&path(&["tags", "items"]), SchemaProperty::string("y"))
            .unwrap();

        assert_eq!(store.get_schema(), person());
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_add_rejects_invalid_payload() {
        let store = store();
        let (seen, _subscription) = recording(&store);

        let err = store
            .add_property(&SchemaPath::root(), SchemaProperty::string(""))
            .unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::InvalidProperty);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.metrics().rejections, 1);
    }

    #[test]
    fn test_edit_root_rejected() {
        let store = store();
        let (seen, _subscription) = recording(&store);

        let err = store
            .edit_property(&SchemaPath::root(), PropertyUpdate::new().name("x"))
            .unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::InvalidOperation);
        assert_eq!(store.get_schema(), person());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_merges_fields() {
        let store = store();
        store
            .edit_property(&path(&["name"]), PropertyUpdate::new().enum_values(["a", "b"]))
            .unwrap();

        let name = store.get_property(&path(&["name"])).unwrap();
        assert_eq!(name.description.as_deref(), Some("Full name"));
        assert_eq!(name.type_label(), "string (a, b)");
    }

    #[test]
    fn test_edit_rename_keeps_position() {
        let store = store();
        store
            .edit_property(&path(&["age"]), PropertyUpdate::new().name("years"))
            .unwrap();

        let schema = store.get_schema();
        assert_eq!(keys(&schema.properties), vec!["name", "years", "address", "tags"]);
        assert_eq!(schema.get("years").unwrap().name, "years");
        assert!(schema.get("age").is_none());
        assert_eq!(store.metrics().renames, 1);
    }

    #[test]
    fn test_edit_nested_rename() {
        let store = store();
        store
            .edit_property(&path(&["address", "city"]), PropertyUpdate::new().name("town"))
            .unwrap();

        let address = store.get_property(&path(&["address"])).unwrap();
        assert_eq!(keys(address.properties().unwrap()), vec!["town", "zip"]);
    }

    #[test]
    fn test_edit_duplicate_name_rejected() {
        let store = store();
        let err = store
            .edit_property(&path(&["age"]), PropertyUpdate::new().name("name"))
            .unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::DuplicateName);
        assert_eq!(store.get_schema(), person());
    }

    #[test]
    fn test_edit_items_renames_in_place() {
        let store = store();
        store
            .edit_property(&path(&["tags", "items"]), PropertyUpdate::new().name("label"))
            .unwrap();

        let tags = store.get_property(&path(&["tags"])).unwrap();
        assert_eq!(tags.items().unwrap().name, "label");
        assert!(store.get_property(&path(&["tags", "items"])).is_some());
    }

    #[test]
    fn test_edit_missing_step_not_found() {
        let store = store();
        let (seen, _subscription) = recording(&store);

        let err = store
            .edit_property(&path(&["address", "street"]), PropertyUpdate::new().name("s"))
            .unwrap_err();

        assert_eq!(err.code(), SchemaErrorCode::NotFound);
        assert!(err.message().contains("'street'"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_type_change_drops_children() {
        let store = store();
        store
            .edit_property(
                &path(&["address"]),
                PropertyUpdate::new().schema_type(SchemaType::String),
            )
            .unwrap();

        let address = store.get_property(&path(&["address"])).unwrap();
        assert_eq!(address.schema_type(), SchemaType::String);
        assert!(address.properties().is_none());
    }

    #[test]
    fn test_delete_root_is_silent() {
        let store = store();
        let (seen, _subscription) = recording(&store);
        store.delete_property(&SchemaPath::root()).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.get_schema(), person());
    }

    #[test]
    fn test_delete_absent_top_level_is_ok() {
        let store = store();
        let (seen, _subscription) = recording(&store);
        store.delete_property(&path(&["missing"])).unwrap();
        assert_eq!(store.get_schema(), person());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_nested_and_items() {
        let store = store();
        store.delete_property(&path(&["address", "zip"])).unwrap();
        store.delete_property(&path(&["tags", "items"])).unwrap();

        let address = store.get_property(&path(&["address"])).unwrap();
        assert_eq!(keys(address.properties().unwrap()), vec!["city"]);
        assert!(store.get_property(&path(&["tags"])).unwrap().items().is_none());
    }

    #[test]
    fn test_delete_missing_intermediate_not_found() {
        let store = store();
        let err = store.delete_property(&path(&["missing", "x"])).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::NotFound);
    }

    #[test]
    fn test_seed_replaces_and_notifies() {
        let store = SchemaStore::new();
        let (seen, _subscription) = recording(&store);

        store.seed(person()).unwrap();

        assert_eq!(store.get_schema(), person());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], person());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.delete_property(&path(&["age"])).unwrap();
        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        store.delete_property(&path(&["name"])).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_reenter_store() {
        let store = Arc::new(store());
        let observed = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::downgrade(&store);
        let sink = Arc::clone(&observed);
        let _subscription = store.subscribe(move |_| {
            if let Some(store) = inner.upgrade() {
                sink.lock().unwrap().push(store.get_schema().len());
            }
        });

        store.delete_property(&path(&["age"])).unwrap();
        assert_eq!(*observed.lock().unwrap(), vec![4, 3]);
    }

    #[test]
    fn test_store_ids_are_unique() {
        assert_ne!(SchemaStore::new().id(), SchemaStore::new().id());
    }

    #[test]
    fn test_reentrant_mutation_is_not_followed_by_stale_tree() {
        let store = Arc::new(SchemaStore::new());

        let inner = Arc::downgrade(&store);
        let _completer = store.subscribe(move |schema| {
            if schema.get("a").is_some() && schema.get("b").is_none() {
                if let Some(store) = inner.upgrade() {
                    store
                        .add_property(&SchemaPath::root(), SchemaProperty::string("b"))
                        .unwrap();
                }
            }
        });
        let (seen, _subscription) = recording(&store);

        store
            .add_property(&SchemaPath::root(), SchemaProperty::string("a"))
            .unwrap();

        let seen: Vec<_> = seen.lock().unwrap().iter().map(|s| keys(&s.properties)).collect();
        assert_eq!(seen, vec![Vec::<String>::new(), vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(keys(&store.get_schema().properties), vec!["a", "b"]);
    }

    #[test]
    fn test_notification_counted_after_listener_returns() {
        let store = store();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.subscribe(|_| panic!("listener failed"));
        }));

        assert!(outcome.is_err());
        assert_eq!(store.metrics().notifications, 0);
        assert_eq!(store.get_schema(), person());
    }

    #[test]
    fn test_metrics_count_operations() {
        let store = store();
        let _subscription = store.subscribe(|_| {});

        store
            .add_property(&SchemaPath::root(), SchemaProperty::boolean("active"))
            .unwrap();
        store
            .edit_property(&path(&["active"]), PropertyUpdate::new().description("On"))
            .unwrap();
        store.delete_property(&path(&["active"])).unwrap();
        let _ = store.edit_property(&SchemaPath::root(), PropertyUpdate::new());

        let metrics = store.metrics();
        assert_eq!(metrics.adds, 1);
        assert_eq!(metrics.edits, 1);
        assert_eq!(metrics.deletes, 1);
        assert_eq!(metrics.rejections, 1);
        assert_eq!(metrics.notifications, 4);
    }
}
