use crate::error::{Result, TerminusError};
use crate::model::{data_id, DefaultFactory, Model, ModelData, ModelFactory, ModelOptions, Scope};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered set of records keyed by id.
///
/// Records are only ever created through the collection's factory, which is
/// told the collection's [`Scope`] and the record id.
pub struct Collection<M: Model> {
    scope: Scope,
    factory: Arc<dyn ModelFactory<M>>,
    models: Vec<M>,
    index: HashMap<String, usize>,
}

impl<M: Model> Collection<M> {
    pub fn new(scope: Scope) -> Self {
        Self::with_factory(scope, Arc::new(DefaultFactory))
    }

    pub fn with_factory(scope: Scope, factory: Arc<dyn ModelFactory<M>>) -> Self {
        Self {
            scope,
            factory,
            models: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Build a record from `data` and store it under its id.
    ///
    /// Data without an id is rejected and nothing is stored. Adding an id that
    /// is already present replaces that record in place.
    pub fn add(&mut self, data: ModelData) -> Result<&M> {
        let id = data_id(&data).ok_or_else(|| TerminusError::MissingId {
            kind: M::KIND.to_string(),
        })?;
        let options = ModelOptions {
            scope: self.scope.clone(),
            id: id.clone(),
        };
        let model = self.factory.build(data, options)?;

        let pos = match self.index.get(&id).copied() {
            Some(pos) => {
                self.models[pos] = model;
                pos
            }
            None => {
                self.models.push(model);
                let pos = self.models.len() - 1;
                self.index.insert(id, pos);
                pos
            }
        };
        Ok(&self.models[pos])
    }

    /// Add every record in an API listing. Accepts either a JSON array of
    /// objects or an object keyed by id.
    pub fn add_all(&mut self, listing: Value) -> Result<()> {
        let items: Vec<Value> = match listing {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(TerminusError::InvalidResponse(format!(
                    "expected a list of {} records, got {other}",
                    M::KIND
                )))
            }
        };
        for item in items {
            match item {
                Value::Object(data) => {
                    self.add(data)?;
                }
                other => {
                    return Err(TerminusError::InvalidResponse(format!(
                        "expected a {} record, got {other}",
                        M::KIND
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&M> {
        self.index
            .get(id)
            .map(|&pos| &self.models[pos])
            .ok_or_else(|| TerminusError::not_found(M::KIND, id))
    }

    pub fn has(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every record, in the order it was first added.
    pub fn all(&self) -> &[M] {
        &self.models
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.id())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// New collection with the records matching `keep`, order preserved.
    /// The source collection is left untouched.
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(&M) -> bool,
    {
        let mut out = Self::with_factory(self.scope.clone(), Arc::clone(&self.factory));
        for model in self.models.iter().filter(|m| keep(m)) {
            out.index.insert(model.id().to_string(), out.models.len());
            out.models.push(model.clone());
        }
        out
    }

    /// Records whose label contains `needle` (case-sensitive).
    pub fn filter_by_name(&self, needle: &str) -> Self {
        self.filter(|m| m.label().is_some_and(|label| label.contains(needle)))
    }
}

impl<M: Model> fmt::Debug for Collection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &M::KIND)
            .field("scope", &self.scope)
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Thing {
        id: String,
        attributes: ModelData,
        scope: Scope,
    }

    impl Model for Thing {
        const KIND: &'static str = "thing";

        fn from_data(data: ModelData, options: ModelOptions) -> Self {
            Thing {
                id: options.id,
                attributes: data,
                scope: options.scope,
            }
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn attributes(&self) -> &ModelData {
            &self.attributes
        }

        fn scope(&self) -> &Scope {
            &self.scope
        }
    }

    fn data(v: Value) -> ModelData {
        v.as_object().unwrap().clone()
    }

    fn things(labels: &[(&str, &str)]) -> Collection<Thing> {
        let mut c = Collection::new(Scope::User("u1".into()));
        for (id, label) in labels {
            c.add(data(json!({"id": id, "label": label}))).unwrap();
        }
        c
    }

    #[test]
    fn all_preserves_insertion_order() {
        let c = things(&[("z", "Zed"), ("a", "Ay"), ("m", "Em")]);
        let ids: Vec<&str> = c.all().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
        for id in ["z", "a", "m"] {
            assert_eq!(c.get(id).unwrap().id(), id);
        }
    }

    #[test]
    fn all_is_repeatable() {
        let c = things(&[("a", "A"), ("b", "B")]);
        assert_eq!(c.all(), c.all());
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let c = things(&[("a", "A")]);
        let err = c.get("nope").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "could not locate thing identified by 'nope'");
    }

    #[test]
    fn add_without_id_fails_and_stores_nothing() {
        let mut c: Collection<Thing> = Collection::new(Scope::Unscoped);
        let err = c.add(data(json!({"label": "orphan"}))).unwrap_err();
        assert!(matches!(err, TerminusError::MissingId { .. }));
        assert!(c.is_empty());
    }

    #[test]
    fn add_duplicate_id_replaces_in_place() {
        let mut c = things(&[("a", "First"), ("b", "Second")]);
        c.add(data(json!({"id": "a", "label": "Replaced"}))).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.all()[0].label().as_deref(), Some("Replaced"));
        assert_eq!(c.all()[1].id(), "b");
    }

    #[test]
    fn records_carry_the_collection_scope() {
        let c = things(&[("a", "A")]);
        assert_eq!(c.get("a").unwrap().scope(), &Scope::User("u1".into()));
    }

    #[test]
    fn filter_by_name_is_ordered_subsequence() {
        let c = things(&[
            ("1", "alpha"),
            ("2", "beta"),
            ("3", "alphabet"),
            ("4", "gamma"),
            ("5", "Alpha"),
        ]);
        let filtered = c.filter_by_name("alpha");
        let ids: Vec<&str> = filtered.ids().collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(c.len(), 5);
        assert!(filtered.get("3").is_ok());
        assert!(filtered.get("2").is_err());
    }

    #[test]
    fn filter_by_empty_name_keeps_labelled_records() {
        let mut c = things(&[("a", "A")]);
        c.add(data(json!({"id": "b"}))).unwrap();
        let labelled = c.filter_by_name("");
        let ids: Vec<&str> = labelled.ids().collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn add_all_accepts_arrays_and_keyed_objects() {
        let mut c: Collection<Thing> = Collection::new(Scope::Unscoped);
        c.add_all(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        c.add_all(json!({"c": {"id": "c"}})).unwrap();
        c.add_all(Value::Null).unwrap();
        let ids: Vec<&str> = c.ids().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn add_all_rejects_scalars() {
        let mut c: Collection<Thing> = Collection::new(Scope::Unscoped);
        assert!(c.add_all(json!("nope")).is_err());
        assert!(c.add_all(json!([1, 2])).is_err());
    }

    struct RecordingFactory {
        calls: Mutex<Vec<(ModelData, ModelOptions)>>,
    }

    impl ModelFactory<Thing> for RecordingFactory {
        fn build(&self, data: ModelData, options: ModelOptions) -> Result<Thing> {
            self.calls
                .lock()
                .unwrap()
                .push((data.clone(), options.clone()));
            Ok(Thing::from_data(data, options))
        }
    }

    #[test]
    fn every_record_goes_through_the_factory() {
        let factory = Arc::new(RecordingFactory {
            calls: Mutex::new(Vec::new()),
        });
        let scope = Scope::Organization("org".into());
        let mut c: Collection<Thing> = Collection::with_factory(scope.clone(), factory.clone());
        c.add(data(json!({"id": "a", "label": "A"}))).unwrap();
        c.add(data(json!({"id": "b", "label": "B"}))).unwrap();

        let calls = factory.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1].1,
            ModelOptions {
                scope,
                id: "b".into()
            }
        );
        assert_eq!(calls[0].0, data(json!({"id": "a", "label": "A"})));
    }
}
