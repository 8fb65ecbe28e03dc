//! The explicit typecode registry.
//!
//! A [`TypeRegistry`] maps typecode strings to a constructor plus a
//! [`MethodTable`]. It is built up front on the manager side, shared
//! into the worker as an `Arc` at start, and never mutated afterwards.
//! The same registry also answers `TypeId` lookups so an already-built
//! value can be adopted into its registered table for transfer.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use benard_core::{Args, InvokeFault, RemoteError};

use crate::dispatch::{MethodTable, Referent, TableReferent};

/// A constructor: call args in, hosted value (or fault) out.
pub type CtorFn<T> = fn(Args) -> Result<T, InvokeFault>;

type ConstructFn = Box<dyn Fn(Args) -> Result<Box<dyn Referent>, InvokeFault> + Send + Sync>;

struct AdoptEntry {
    typecode: String,
    /// Holds a `MethodTable<T>` behind `Any`; recovered by downcast
    /// in [`TypeRegistry::adopt`].
    table: Arc<dyn Any + Send + Sync>,
}

/// Maps typecodes to constructors and method tables.
///
/// Registering the same typecode twice replaces the earlier entry.
#[derive(Default)]
pub struct TypeRegistry {
    types: IndexMap<String, ConstructFn>,
    adoptable: HashMap<TypeId, AdoptEntry>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `typecode` with its constructor and method table.
    pub fn register<T: Send + 'static>(
        &mut self,
        typecode: &str,
        ctor: CtorFn<T>,
        table: MethodTable<T>,
    ) {
        let table = Arc::new(table);
        let code = typecode.to_string();
        let ctor_table = Arc::clone(&table);
        let construct: ConstructFn = Box::new(move |args| {
            let inner = ctor(args)?;
            Ok(Box::new(TableReferent::new(
                code.clone(),
                inner,
                Arc::clone(&ctor_table),
            )) as Box<dyn Referent>)
        });
        self.types.insert(typecode.to_string(), construct);
        self.adoptable.insert(
            TypeId::of::<T>(),
            AdoptEntry {
                typecode: typecode.to_string(),
                table,
            },
        );
    }

    /// Construct a hosted instance of `typecode`.
    ///
    /// An unknown typecode is [`RemoteError::NoSuchType`]; a
    /// constructor fault comes back as [`RemoteError::Invocation`].
    pub fn construct(&self, typecode: &str, args: Args) -> Result<Box<dyn Referent>, RemoteError> {
        match self.types.get(typecode) {
            Some(construct) => construct(args).map_err(RemoteError::Invocation),
            None => Err(RemoteError::NoSuchType {
                typecode: typecode.to_string(),
            }),
        }
    }

    /// Wrap an already-built value in the table registered for its type.
    ///
    /// The registered typecode is chosen by the value's runtime type; a
    /// type that was never registered is [`RemoteError::NoSuchType`].
    pub fn adopt<T: Send + 'static>(&self, value: T) -> Result<Box<dyn Referent>, RemoteError> {
        let entry = self
            .adoptable
            .get(&TypeId::of::<T>())
            .and_then(|entry| {
                Arc::clone(&entry.table)
                    .downcast::<MethodTable<T>>()
                    .ok()
                    .map(|table| (entry.typecode.clone(), table))
            })
            .ok_or_else(|| RemoteError::NoSuchType {
                typecode: std::any::type_name::<T>().to_string(),
            })?;
        let (typecode, table) = entry;
        Ok(Box::new(TableReferent::new(typecode, value, table)))
    }

    /// Whether `typecode` is registered.
    pub fn contains(&self, typecode: &str) -> bool {
        self.types.contains_key(typecode)
    }

    /// Registered typecodes, in registration order.
    pub fn typecodes(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered typecodes.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
