//! Registry of composite types and the field-editing surface.
//!
//! Lookups by name are linear scans over a small bounded list.

use indexmap::IndexMap;
use relayout_core::{Error, Indirection, Limits, POINTER_SIZE, Result, TypeId, TypeRef};

use crate::field::{Field, FieldSpec};
use crate::ty::Type;

/// All composite types of one model.
#[derive(Debug)]
pub struct TypeTable {
    pub(crate) types: IndexMap<TypeId, Type>,
    next_id: u32,
    limits: Limits,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl TypeTable {
    pub fn new(limits: Limits) -> Self {
        Self {
            types: IndexMap::new(),
            next_id: 0,
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all types in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.iter().map(|(&id, ty)| (id, ty))
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(&id)
    }

    /// Look up a type, reporting an unknown id as `TypeNotFound`.
    pub fn expect(&self, id: TypeId) -> Result<&Type> {
        self.types
            .get(&id)
            .ok_or_else(|| Error::TypeNotFound(TypeRef::Composite(id).to_string()))
    }

    fn expect_mut(&mut self, id: TypeId) -> Result<&mut Type> {
        self.types
            .get_mut(&id)
            .ok_or_else(|| Error::TypeNotFound(TypeRef::Composite(id).to_string()))
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .find(|(_, ty)| ty.name == name)
            .map(|(&id, _)| id)
    }

    /// Display name of a type reference.
    pub fn name_of(&self, ty: TypeRef) -> String {
        match ty {
            TypeRef::Primitive(p) => p.name().to_string(),
            TypeRef::Composite(id) => match self.types.get(&id) {
                Some(t) => t.name.clone(),
                None => ty.to_string(),
            },
        }
    }

    /// Check that a type reference names a registered type.
    pub fn check_ref(&self, ty: TypeRef) -> Result<()> {
        match ty {
            TypeRef::Primitive(_) => Ok(()),
            TypeRef::Composite(id) => self.expect(id).map(|_| ()),
        }
    }

    /// Fixed types have a size that never changes: primitives and sealed composites.
    pub fn is_fixed(&self, ty: TypeRef) -> bool {
        match ty {
            TypeRef::Primitive(_) => true,
            TypeRef::Composite(id) => self.types.get(&id).is_some_and(|t| t.sealed),
        }
    }

    /// Current committed size of one element.
    pub fn size_of(&self, ty: TypeRef) -> usize {
        match ty {
            TypeRef::Primitive(p) => p.size(),
            TypeRef::Composite(id) => self.types.get(&id).map_or(0, |t| t.size),
        }
    }

    pub fn align_of(&self, ty: TypeRef) -> usize {
        match ty {
            TypeRef::Primitive(p) => p.align(),
            TypeRef::Composite(id) => self.types.get(&id).map_or(1, |t| t.align),
        }
    }

    /// Size of one element of a pool or field with the given indirection.
    pub fn element_size(&self, ty: TypeRef, indirection: Indirection) -> usize {
        match indirection {
            Indirection::Pointer => POINTER_SIZE,
            Indirection::Value => self.size_of(ty),
        }
    }

    fn check_name(&self, name: &str) -> Result<()> {
        let max = self.limits.get_max_name_len();
        if name.len() > max {
            return Err(Error::NameTooLong {
                len: name.len(),
                max,
            });
        }
        Ok(())
    }

    /// Register a new empty composite type.
    pub fn create(&mut self, name: &str) -> Result<TypeId> {
        self.check_name(name)?;
        if self.id_of(name).is_some() {
            return Err(Error::DuplicateType(name.to_string()));
        }
        let limit = self.limits.get_max_types();
        if self.types.len() >= limit {
            return Err(Error::CapacityExceeded {
                what: "types",
                limit,
            });
        }

        let id = TypeId(self.next_id);
        self.next_id += 1;
        self.types.insert(id, Type::new(name.to_string()));
        Ok(id)
    }

    /// Unregister a type. Fails while any other type's fields reference it.
    pub fn remove(&mut self, id: TypeId) -> Result<Type> {
        let name = self.expect(id)?.name.clone();
        if let Some((_, user)) = self
            .types
            .iter()
            .find(|&(&other, ty)| other != id && ty.references(id))
        {
            return Err(Error::TypeInUse {
                type_name: name,
                by: user.name.clone(),
            });
        }
        self.types
            .shift_remove(&id)
            .ok_or(Error::TypeNotFound(name))
    }

    fn editable(&mut self, id: TypeId) -> Result<&mut Type> {
        let ty = self.expect_mut(id)?;
        if ty.sealed {
            return Err(Error::FixedType(ty.name.clone()));
        }
        Ok(ty)
    }

    fn pending_index(ty: &Type, name: &str) -> Result<usize> {
        ty.pending_index(name).ok_or_else(|| Error::FieldNotFound {
            type_name: ty.name.clone(),
            field: name.to_string(),
        })
    }

    /// Add a field to the pending list at `index`, or at the end when `index`
    /// is `None` or past the end.
    pub fn add_field(&mut self, id: TypeId, spec: FieldSpec, index: Option<usize>) -> Result<()> {
        self.check_name(&spec.name)?;
        self.check_ref(spec.ty)?;
        if spec.count == 0 {
            return Err(Error::InvalidArrayLength(spec.count));
        }
        let max_fields = self.limits.get_max_fields();

        let ty = self.editable(id)?;
        if ty.pending_index(&spec.name).is_some() {
            return Err(Error::DuplicateField {
                type_name: ty.name.clone(),
                field: spec.name,
            });
        }
        if ty.pending.len() >= max_fields {
            return Err(Error::CapacityExceeded {
                what: "fields",
                limit: max_fields,
            });
        }

        let index = index.unwrap_or(ty.pending.len()).min(ty.pending.len());
        ty.pending.insert(index, Field::from_spec(spec));
        ty.dirty = true;
        Ok(())
    }

    pub fn remove_field(&mut self, id: TypeId, name: &str) -> Result<()> {
        let ty = self.editable(id)?;
        let index = Self::pending_index(ty, name)?;
        ty.pending.remove(index);
        ty.dirty = true;
        Ok(())
    }

    /// Change the element count of a field. Shrinking truncates at the next compile.
    pub fn resize_field(&mut self, id: TypeId, name: &str, count: usize) -> Result<()> {
        if count == 0 {
            return Err(Error::InvalidArrayLength(count));
        }
        let ty = self.editable(id)?;
        let index = Self::pending_index(ty, name)?;
        ty.pending[index].count = count;
        ty.dirty = true;
        Ok(())
    }

    /// Move a field to `position` in the pending list.
    pub fn move_field(&mut self, id: TypeId, name: &str, position: usize) -> Result<()> {
        let ty = self.editable(id)?;
        let index = Self::pending_index(ty, name)?;
        if position >= ty.pending.len() {
            return Err(Error::FieldIndexOutOfRange {
                index: position,
                len: ty.pending.len(),
            });
        }
        if index == position {
            return Ok(());
        }
        let field = ty.pending.remove(index);
        ty.pending.insert(position, field);
        ty.dirty = true;
        Ok(())
    }

    /// Change the type a field references, keeping its indirection and count.
    pub fn retype_field(&mut self, id: TypeId, name: &str, to: TypeRef) -> Result<()> {
        self.check_ref(to)?;
        let ty = self.editable(id)?;
        let index = Self::pending_index(ty, name)?;
        ty.pending[index].ty = to;
        ty.dirty = true;
        Ok(())
    }

    /// Freeze a compiled type so it is treated as fixed from now on.
    pub fn seal(&mut self, id: TypeId) -> Result<()> {
        let ty = self.expect(id)?;
        let not_sealable = |reason| Error::NotSealable {
            type_name: ty.name.clone(),
            reason,
        };
        if ty.sealed {
            return Ok(());
        }
        if ty.dirty {
            return Err(not_sealable("it has uncompiled edits"));
        }
        let nested_mutable = ty
            .fields
            .iter()
            .any(|f| f.indirection == Indirection::Value && !self.is_fixed(f.ty));
        if nested_mutable {
            return Err(not_sealable("it holds a non-fixed type by value"));
        }

        let ty = self.expect_mut(id)?;
        ty.sealed = true;
        ty.old_size = ty.size;
        ty.diffs.clear();
        Ok(())
    }

    /// Drop every transition plan once a migration has closed.
    pub fn clear_diffs(&mut self) {
        for ty in self.types.values_mut() {
            ty.diffs.clear();
        }
    }
}
