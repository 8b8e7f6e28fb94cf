use std::fmt;

use crate::lexer::{Keyword, NumberClass};
use crate::types::TypeError;

/// Index into the [`TypeRegistry`]. Ids below [`TypeId::FIRST_COMPOSITE`] are
/// fixed built-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeId(pub usize);

impl TypeId {
    /// Unknown or void; compatible with everything.
    pub const UNKNOWN: TypeId = TypeId(0);
    pub const INTEGER: TypeId = TypeId(1);
    pub const LONGINT: TypeId = TypeId(2);
    pub const REAL: TypeId = TypeId(3);
    pub const LONGREAL: TypeId = TypeId(4);
    pub const BOOLEAN: TypeId = TypeId(5);
    pub const CHAR: TypeId = TypeId(6);
    /// Base array marker, carried by string literals.
    pub const STRING: TypeId = TypeId(7);
    /// Base pointer marker, carried by `NIL`.
    pub const NIL: TypeId = TypeId(8);
    /// Generic `PROCEDURE` type.
    pub const PROC: TypeId = TypeId(9);
    pub const FIRST_COMPOSITE: usize = 10;

    /// Type a reserved word carries in the symbol table.
    #[must_use]
    pub fn of_keyword(keyword: Keyword) -> TypeId {
        match keyword {
            Keyword::Integer => TypeId::INTEGER,
            Keyword::LongInt => TypeId::LONGINT,
            Keyword::Real => TypeId::REAL,
            Keyword::LongReal => TypeId::LONGREAL,
            Keyword::Boolean | Keyword::True | Keyword::False => TypeId::BOOLEAN,
            Keyword::Char => TypeId::CHAR,
            Keyword::Nil => TypeId::NIL,
            _ => TypeId::UNKNOWN,
        }
    }

    #[must_use]
    pub fn of_number(class: NumberClass) -> TypeId {
        match class {
            NumberClass::Integer => TypeId::INTEGER,
            NumberClass::Real => TypeId::REAL,
            NumberClass::Boolean => TypeId::BOOLEAN,
            NumberClass::Nil => TypeId::NIL,
        }
    }

    #[must_use]
    pub fn is_integer(self) -> bool {
        self == TypeId::INTEGER || self == TypeId::LONGINT
    }

    #[must_use]
    pub fn is_real(self) -> bool {
        self == TypeId::REAL || self == TypeId::LONGREAL
    }

    #[must_use]
    pub fn is_builtin(self) -> bool {
        self.0 < TypeId::FIRST_COMPOSITE
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    Scalar,
    Array,
    Pointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub form: TypeForm,
    pub base: TypeId,
    /// Element count; zero for anything that is not a sized array.
    pub length: usize,
}

impl TypeDescriptor {
    const fn scalar() -> Self {
        Self {
            form: TypeForm::Scalar,
            base: TypeId::UNKNOWN,
            length: 0,
        }
    }
}

/// Built-ins plus every composite type allocated while compiling one module.
#[derive(Debug)]
pub struct TypeRegistry {
    descriptors: Vec<TypeDescriptor>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut descriptors = vec![TypeDescriptor::scalar(); TypeId::FIRST_COMPOSITE];
        descriptors[TypeId::STRING.0] = TypeDescriptor {
            form: TypeForm::Array,
            base: TypeId::CHAR,
            length: 0,
        };
        descriptors[TypeId::NIL.0] = TypeDescriptor {
            form: TypeForm::Pointer,
            base: TypeId::UNKNOWN,
            length: 0,
        };
        Self { descriptors }
    }

    /// Allocate a fresh composite type.
    pub fn allocate(&mut self, form: TypeForm, base: TypeId, length: usize) -> TypeId {
        let id = TypeId(self.descriptors.len());
        self.descriptors.push(TypeDescriptor { form, base, length });
        tracing::trace!(%id, ?form, %base, length, "allocated type");
        id
    }

    /// Descriptor for `id`; ids never allocated read as unknown scalars.
    #[must_use]
    pub fn descriptor(&self, id: TypeId) -> TypeDescriptor {
        self.descriptors.get(id.0).copied().unwrap_or(TypeDescriptor::scalar())
    }

    #[must_use]
    pub fn form(&self, id: TypeId) -> TypeForm {
        self.descriptor(id).form
    }

    /// Element type of an array type. Indexing something of unknown type
    /// yields the unknown type.
    /// # Errors
    /// If `id` does not have array form
    pub fn element_type(&self, id: TypeId) -> Result<TypeId, TypeError> {
        if id == TypeId::UNKNOWN {
            return Ok(TypeId::UNKNOWN);
        }
        let descriptor = self.descriptor(id);
        if descriptor.form == TypeForm::Array {
            Ok(descriptor.base)
        } else {
            Err(TypeError::ArrayExpected)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Compatibility at assignment, comparison and argument-binding sites.
    /// Permissive inside the integer and real families, strict otherwise.
    #[must_use]
    pub fn compatible(&self, a: TypeId, b: TypeId) -> bool {
        if a == TypeId::UNKNOWN || b == TypeId::UNKNOWN || a == b {
            return true;
        }
        if (a.is_integer() && b.is_integer()) || (a.is_real() && b.is_real()) {
            return true;
        }
        (b == TypeId::NIL && self.form(a) == TypeForm::Pointer)
            || (a == TypeId::NIL && self.form(b) == TypeForm::Pointer)
    }

    /// [`compatible`](Self::compatible), as a result.
    /// # Errors
    /// `TypeError::Mismatch` naming both ids
    pub fn check(&self, a: TypeId, b: TypeId) -> Result<(), TypeError> {
        if self.compatible(a, b) {
            Ok(())
        } else {
            Err(TypeError::Mismatch(a, b))
        }
    }
}
