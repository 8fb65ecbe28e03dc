//! Method dispatch: the [`Referent`] trait and the explicit per-type
//! [`MethodTable`].
//!
//! A referent is any value the worker can host. Dispatch is table
//! driven: each registered type carries a name → function map built
//! once at registration, so the set of callable methods is fixed and a
//! lookup miss is a single well-defined error path rather than a
//! reflective probe.

use std::sync::Arc;

use indexmap::IndexMap;

use benard_core::{Args, InvokeFault, ObjectId, RemoteError, Value};

/// A method body: borrows the hosted value, consumes the call args.
pub type MethodFn<T> = fn(&mut T, Args) -> Result<Value, InvokeFault>;

/// A value the worker can host and invoke methods on.
///
/// The worker supplies the `object` id so that lookup failures can
/// name the referent they missed on.
pub trait Referent: Send {
    /// The typecode this referent was registered under.
    fn typecode(&self) -> &str;

    /// Invoke `method` with `args`.
    fn dispatch(
        &mut self,
        object: ObjectId,
        method: &str,
        args: Args,
    ) -> Result<Value, RemoteError>;
}

impl std::fmt::Debug for dyn Referent + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Referent")
            .field("typecode", &self.typecode())
            .finish()
    }
}

/// Immutable name → method map for a hosted type `T`.
///
/// Built with the [`with`](MethodTable::with) builder at registration
/// time and shared via `Arc` between the registry and every hosted
/// instance. Registering the same name twice keeps the later binding.
pub struct MethodTable<T> {
    methods: IndexMap<&'static str, MethodFn<T>>,
}

impl<T> MethodTable<T> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            methods: IndexMap::new(),
        }
    }

    /// Add a method binding, builder style.
    pub fn with(mut self, name: &'static str, method: MethodFn<T>) -> Self {
        self.methods.insert(name, method);
        self
    }

    /// Look a method up by name.
    pub fn get(&self, name: &str) -> Option<MethodFn<T>> {
        self.methods.get(name).copied()
    }

    /// Registered method names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A hosted value paired with its type's method table.
pub struct TableReferent<T> {
    typecode: String,
    inner: T,
    table: Arc<MethodTable<T>>,
}

impl<T> TableReferent<T> {
    /// Wrap `inner` for hosting under `typecode`.
    pub fn new(typecode: String, inner: T, table: Arc<MethodTable<T>>) -> Self {
        Self {
            typecode,
            inner,
            table,
        }
    }

    /// Unwrap the hosted value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Send> Referent for TableReferent<T> {
    fn typecode(&self) -> &str {
        &self.typecode
    }

    fn dispatch(
        &mut self,
        object: ObjectId,
        method: &str,
        args: Args,
    ) -> Result<Value, RemoteError> {
        match self.table.get(method) {
            Some(body) => body(&mut self.inner, args).map_err(RemoteError::Invocation),
            None => Err(RemoteError::NoSuchMethod {
                object,
                method: method.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tally {
        total: i64,
    }

    fn add(tally: &mut Tally, args: Args) -> Result<Value, InvokeFault> {
        tally.total += args.get(0)?.as_int()?;
        Ok(Value::Int(tally.total))
    }

    fn total(tally: &mut Tally, _args: Args) -> Result<Value, InvokeFault> {
        Ok(Value::Int(tally.total))
    }

    fn table() -> MethodTable<Tally> {
        MethodTable::new().with("add", add).with("total", total)
    }

    #[test]
    fn table_preserves_registration_order() {
        let table = table();
        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["add", "total"]);
    }

    #[test]
    fn dispatch_routes_to_the_named_method() {
        let mut referent =
            TableReferent::new("Tally".to_string(), Tally { total: 3 }, Arc::new(table()));
        let value = referent
            .dispatch(ObjectId(7), "add", Args::new().arg(4i64))
            .unwrap();
        assert_eq!(value, Value::Int(7));
    }

    #[test]
    fn dispatch_miss_names_object_and_method() {
        let mut referent =
            TableReferent::new("Tally".to_string(), Tally { total: 0 }, Arc::new(table()));
        let err = referent
            .dispatch(ObjectId(9), "reset", Args::new())
            .unwrap_err();
        match err {
            RemoteError::NoSuchMethod { object, method } => {
                assert_eq!(object, ObjectId(9));
                assert_eq!(method, "reset");
            }
            other => panic!("expected NoSuchMethod, got {other}"),
        }
    }

    #[test]
    fn body_fault_maps_to_invocation() {
        let mut referent =
            TableReferent::new("Tally".to_string(), Tally { total: 0 }, Arc::new(table()));
        // "add" with no argument fails inside the body.
        let err = referent
            .dispatch(ObjectId(1), "add", Args::new())
            .unwrap_err();
        assert!(matches!(err, RemoteError::Invocation(_)));
    }

    #[test]
    fn duplicate_registration_keeps_the_later_binding() {
        let table = MethodTable::new().with("add", add).with("add", total);
        assert_eq!(table.len(), 1);
        let mut tally = Tally { total: 5 };
        let body = table.get("add").unwrap();
        assert_eq!(body(&mut tally, Args::new()).unwrap(), Value::Int(5));
    }
}
