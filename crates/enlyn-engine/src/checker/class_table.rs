//! Class table: the registry of type records
//!
//! Types live in an arena indexed by [`TypeId`]; parents are stored as ids.
//! Member tables are per type and chained through the parent link, so
//! lookups walk up the hierarchy while redefinition is only rejected
//! within a single type's own table.

use super::error::CheckError;
use super::types::{Ty, TypeId};
use crate::builtins::{BuiltinType, MemberKey, StandardLibrary};
use crate::parser::ast::{Access, Identifier, TypeAnnotation};
use crate::parser::Span;
use rustc_hash::FxHashMap;

/// A declared field
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub access: Access,
    pub ty: Ty,
    /// Slot index in instances; assigned by [`ClassTable::layout_fields`]
    pub offset: usize,
    pub span: Span,
}

/// A declared method, operator or constructor
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access: Access,
    pub params: Vec<Ty>,
    pub returns: Ty,
    pub is_override: bool,
    pub span: Span,
}

/// Compile-time class descriptor
#[derive(Debug, Clone)]
pub struct TypeRecord {
    pub id: TypeId,
    pub name: String,
    pub parent: Option<TypeId>,
    pub builtin: bool,
    pub sealed: bool,
    pub span: Span,
    pub fields: FxHashMap<String, FieldInfo>,
    /// Own field names in declaration order
    pub field_order: Vec<String>,
    pub methods: FxHashMap<MemberKey, MethodInfo>,
    /// Total field count including inherited fields, once laid out
    pub field_count: Option<usize>,
}

impl TypeRecord {
    fn new(id: TypeId, name: impl Into<String>, span: Span) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            builtin: false,
            sealed: false,
            span,
            fields: FxHashMap::default(),
            field_order: Vec::new(),
            methods: FxHashMap::default(),
            field_count: None,
        }
    }
}

/// Registry mapping type names to type records.
#[derive(Debug, Clone)]
pub struct ClassTable {
    types: Vec<TypeRecord>,
    by_name: FxHashMap<String, TypeId>,
}

impl ClassTable {
    /// Create a table pre-populated with the standard library and `unit`.
    pub fn new(stdlib: &StandardLibrary) -> Self {
        let mut table = ClassTable {
            types: Vec::new(),
            by_name: FxHashMap::default(),
        };

        for class in stdlib.classes() {
            let id = TypeId(class.id as u32);
            let mut record = TypeRecord::new(id, class.name, Span::default());
            record.parent = class.parent.map(|p| TypeId(p as u32));
            record.builtin = true;
            record.sealed = class.sealed;

            for field in &class.fields {
                record.field_order.push(field.name.to_string());
                record.fields.insert(
                    field.name.to_string(),
                    FieldInfo {
                        access: Access::Public,
                        ty: builtin_ty(field.ty),
                        offset: 0,
                        span: Span::default(),
                    },
                );
            }
            for method in &class.methods {
                if method.key == MemberKey::Initializer {
                    continue;
                }
                record.methods.insert(
                    method.key.clone(),
                    MethodInfo {
                        access: Access::Public,
                        params: method.params.iter().copied().map(builtin_ty).collect(),
                        returns: builtin_ty(method.returns),
                        is_override: false,
                        span: Span::default(),
                    },
                );
            }

            table.by_name.insert(class.name.to_string(), id);
            table.types.push(record);
        }

        let mut unit = TypeRecord::new(TypeId::UNIT, "unit", Span::default());
        unit.builtin = true;
        unit.sealed = true;
        table.by_name.insert(unit.name.clone(), TypeId::UNIT);
        table.types.push(unit);

        table.layout_fields();
        table
    }

    /// Register a new, empty class. The first declaration of a name wins.
    pub fn declare(&mut self, name: &Identifier) -> Result<TypeId, CheckError> {
        if self.by_name.contains_key(&name.name) {
            return Err(CheckError::DuplicateDeclaration {
                name: name.name.clone(),
                span: name.span,
            });
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeRecord::new(id, name.name.clone(), name.span));
        self.by_name.insert(name.name.clone(), id);
        tracing::debug!(class = %name.name, id = id.0, "declared class");
        Ok(id)
    }

    pub fn resolve(&self, name: &str, span: Span) -> Result<TypeId, CheckError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CheckError::UnknownType {
                name: name.to_string(),
                span,
            })
    }

    /// Resolve a written type. `null` resolves to the null type.
    pub fn resolve_annotation(&self, annotation: &TypeAnnotation) -> Result<Ty, CheckError> {
        match annotation {
            TypeAnnotation::Named(id) => Ok(Ty::Class(self.resolve(&id.name, id.span)?)),
            TypeAnnotation::Optional(id, _) => Ok(Ty::Option(self.resolve(&id.name, id.span)?)),
            TypeAnnotation::Null(_) => Ok(Ty::Null),
        }
    }

    pub fn get(&self, id: TypeId) -> &TypeRecord {
        &self.types[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeRecord {
        &mut self.types[id.index()]
    }

    pub fn get_by_name(&self, name: &str) -> Option<&TypeRecord> {
        self.by_name.get(name).map(|id| self.get(*id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeRecord> {
        self.types.iter()
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    /// Human-readable form of a type.
    pub fn display(&self, ty: Ty) -> String {
        match ty {
            Ty::Class(id) => self.name(id).to_string(),
            Ty::Option(id) => format!("{}?", self.name(id)),
            Ty::Null => "null".to_string(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// The type itself followed by its ancestors, nearest first.
    ///
    /// Bounded by the table size so a not-yet-detected cycle cannot hang.
    pub fn ancestors(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(Some(id), move |current| self.get(*current).parent).take(self.types.len())
    }

    /// `sub` is `sup` or inherits from it.
    pub fn is_subclass(&self, sub: TypeId, sup: TypeId) -> bool {
        self.ancestors(sub).any(|ancestor| ancestor == sup)
    }

    /// Whether a value of type `source` may be stored in a slot of type `target`.
    pub fn is_assignable(&self, source: Ty, target: Ty) -> bool {
        match (source, target) {
            (Ty::Null, Ty::Option(_) | Ty::Null) => true,
            (Ty::Class(s), Ty::Class(t) | Ty::Option(t)) | (Ty::Option(s), Ty::Option(t)) => {
                self.is_subclass(s, t)
            }
            _ => false,
        }
    }

    /// Whether code running in `from` may use a member of `owner` with `access`.
    pub fn can_access(&self, from: Option<TypeId>, owner: TypeId, access: Access) -> bool {
        match access {
            Access::Public => true,
            Access::Private => from == Some(owner),
            Access::Protected => from.is_some_and(|from| {
                self.is_subclass(from, owner) || self.is_subclass(owner, from)
            }),
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn add_field(&mut self, id: TypeId, name: &Identifier, access: Access, ty: Ty) -> Result<(), CheckError> {
        let record = self.get_mut(id);
        if record.fields.contains_key(&name.name) {
            return Err(CheckError::DuplicateDeclaration {
                name: name.name.clone(),
                span: name.span,
            });
        }
        record.field_order.push(name.name.clone());
        record.fields.insert(
            name.name.clone(),
            FieldInfo {
                access,
                ty,
                offset: 0,
                span: name.span,
            },
        );
        Ok(())
    }

    pub fn add_method(&mut self, id: TypeId, key: MemberKey, info: MethodInfo) -> Result<(), CheckError> {
        let record = self.get_mut(id);
        if record.methods.contains_key(&key) {
            return Err(CheckError::DuplicateDeclaration {
                name: key.to_string(),
                span: info.span,
            });
        }
        record.methods.insert(key, info);
        Ok(())
    }

    /// Find a field on the type or its ancestors, with its declaring type.
    pub fn lookup_field(&self, id: TypeId, name: &str) -> Option<(TypeId, &FieldInfo)> {
        self.ancestors(id)
            .find_map(|ancestor| self.get(ancestor).fields.get(name).map(|f| (ancestor, f)))
    }

    /// Find a method on the type or its ancestors, with its declaring type.
    pub fn lookup_method(&self, id: TypeId, key: &MemberKey) -> Option<(TypeId, &MethodInfo)> {
        self.ancestors(id)
            .find_map(|ancestor| self.get(ancestor).methods.get(key).map(|m| (ancestor, m)))
    }

    /// Constructors are not inherited: only the type's own table is searched.
    pub fn constructor(&self, id: TypeId) -> Option<&MethodInfo> {
        self.get(id).methods.get(&MemberKey::Constructor)
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Assign field offsets, parents before children.
    ///
    /// Inherited fields keep their offsets; a type's own fields follow
    /// contiguously in declaration order. Already laid-out types are kept.
    pub fn layout_fields(&mut self) {
        for index in 0..self.types.len() {
            self.layout(TypeId(index as u32));
        }
    }

    fn layout(&mut self, id: TypeId) -> usize {
        if let Some(count) = self.get(id).field_count {
            return count;
        }

        // Walk up to the nearest laid-out ancestor (or the root), then assign downwards
        let chain: Vec<TypeId> = self.ancestors(id).collect();
        let mut base = 0;
        for ancestor in chain.into_iter().rev() {
            let record = self.get_mut(ancestor);
            if let Some(count) = record.field_count {
                base = count;
                continue;
            }
            for (position, name) in record.field_order.iter().enumerate() {
                if let Some(field) = record.fields.get_mut(name) {
                    field.offset = base + position;
                }
            }
            base += record.field_order.len();
            record.field_count = Some(base);
        }
        base
    }

    /// Total field count of a laid-out type.
    pub fn field_count(&self, id: TypeId) -> usize {
        self.get(id).field_count.unwrap_or(0)
    }
}

fn builtin_ty(ty: BuiltinType) -> Ty {
    match ty {
        BuiltinType::Class(id) => Ty::Class(TypeId(id as u32)),
        BuiltinType::Optional(id) => Ty::Option(TypeId(id as u32)),
        BuiltinType::Unit => Ty::UNIT,
    }
}
