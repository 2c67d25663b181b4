//! Record type descriptions
//!
//! A [`RecordType`] is the compile-time description of a record: its declared
//! fields in order, each with a [`TypeDesc`], a raw rule string and an
//! exported flag. The [`record!`](crate::record) macro generates it together
//! with the [`Record`] impl that gives index-based access to field values.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::value::Value;

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// A record whose fields can be read by declaration index.
///
/// Usually implemented by [`record!`](crate::record). Manual implementations
/// must keep `field(i)` consistent with `record_type().fields()[i]`.
pub trait Record: Send + Sync {
    /// The description shared by every instance of the implementing type.
    fn schema() -> &'static RecordType
    where
        Self: Sized;

    /// The description of this instance's type.
    fn record_type(&self) -> &'static RecordType;

    /// Reads the field declared at `index`.
    ///
    /// Out-of-range indices read as [`Value::Nil`].
    fn field(&self, index: usize) -> Value<'_>;
}

// ============================================================================
// TYPE DESCRIPTIONS
// ============================================================================

/// The declared type of a field.
#[derive(Clone)]
pub enum TypeDesc {
    /// `bool`
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    Uint,
    /// `f32` / `f64`.
    Float,
    /// Text.
    Str,
    /// `DateTime<Utc>`.
    Time,
    /// Sequences and maps.
    Seq,
    /// A nested record, described lazily so recursive types terminate.
    Record(fn() -> &'static RecordType),
    /// An optional link to another type.
    Optional(Box<TypeDesc>),
}

/// Comparison domain of a declared type, with optional links removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`
    Bool,
    /// Integers, unsigned integers and floats.
    Number,
    /// Text.
    Text,
    /// Timestamps.
    Time,
    /// Sequences and maps.
    Sequence,
    /// Records.
    Record,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Text => "text",
            Self::Time => "timestamp",
            Self::Sequence => "sequence",
            Self::Record => "record",
        })
    }
}

impl TypeDesc {
    /// Strips every optional link.
    #[must_use]
    pub fn target(&self) -> &TypeDesc {
        let mut ty = self;
        while let Self::Optional(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Number of optional links in front of the target type.
    #[must_use]
    pub fn indirections(&self) -> usize {
        let mut depth = 0;
        let mut ty = self;
        while let Self::Optional(inner) = ty {
            depth += 1;
            ty = inner;
        }
        depth
    }

    /// Returns true if the outermost layer is an optional link.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The record type behind any optional links, if the target is a record.
    #[must_use]
    pub fn record(&self) -> Option<&'static RecordType> {
        match self.target() {
            Self::Record(schema) => Some(schema()),
            _ => None,
        }
    }

    /// The comparison domain of the target type.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        match self.target() {
            Self::Bool => TypeKind::Bool,
            Self::Int | Self::Uint | Self::Float => TypeKind::Number,
            Self::Str => TypeKind::Text,
            Self::Time => TypeKind::Time,
            Self::Seq => TypeKind::Sequence,
            Self::Record(_) | Self::Optional(_) => TypeKind::Record,
        }
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("Bool"),
            Self::Int => f.write_str("Int"),
            Self::Uint => f.write_str("Uint"),
            Self::Float => f.write_str("Float"),
            Self::Str => f.write_str("Str"),
            Self::Time => f.write_str("Time"),
            Self::Seq => f.write_str("Seq"),
            Self::Record(schema) => write!(f, "Record({})", schema().name()),
            Self::Optional(inner) => write!(f, "Optional({inner:?})"),
        }
    }
}

// ============================================================================
// DESCRIBE
// ============================================================================

/// Maps a Rust type onto its [`TypeDesc`].
pub trait Describe {
    /// Describes the type.
    fn describe() -> TypeDesc;
}

macro_rules! describe_as {
    ($desc:ident => $($ty:ty),+) => {
        $(
            impl Describe for $ty {
                #[inline]
                fn describe() -> TypeDesc {
                    TypeDesc::$desc
                }
            }
        )+
    };
}

describe_as!(Int => i8, i16, i32, i64, isize);
describe_as!(Uint => u8, u16, u32, u64, usize);
describe_as!(Float => f32, f64);
describe_as!(Bool => bool);
describe_as!(Str => String, &'static str);
describe_as!(Time => DateTime<Utc>);

impl<T> Describe for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::Seq
    }
}

impl<K, V, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDesc {
        TypeDesc::Seq
    }
}

impl<K, V> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDesc {
        TypeDesc::Seq
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDesc {
        TypeDesc::Optional(Box::new(T::describe()))
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDesc {
        T::describe()
    }
}

impl<T: Describe> Describe for Arc<T> {
    fn describe() -> TypeDesc {
        T::describe()
    }
}

// ============================================================================
// RECORD TYPE
// ============================================================================

/// One declared field of a record.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: &'static str,
    ty: TypeDesc,
    rules: &'static str,
    exported: bool,
}

impl FieldDef {
    /// Creates a field definition.
    #[must_use]
    pub fn new(name: &'static str, ty: TypeDesc, rules: &'static str, exported: bool) -> Self {
        Self {
            name,
            ty,
            rules,
            exported,
        }
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type.
    #[must_use]
    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// The raw rule string (empty when the field has no rules).
    #[must_use]
    pub fn rules(&self) -> &'static str {
        self.rules
    }

    /// Whether paths may reference this field.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.exported
    }
}

/// A record-level rule string anchored at a (possibly nested) field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCheck {
    /// Dotted anchor path.
    pub anchor: &'static str,
    /// Raw rule string.
    pub rules: &'static str,
}

/// Compile-time description of a record type.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDef>,
    checks: Vec<RecordCheck>,
}

impl RecordType {
    /// Starts describing the record type `T`.
    pub fn builder<T: 'static>(name: &'static str) -> RecordTypeBuilder {
        RecordTypeBuilder {
            inner: Self {
                name,
                type_id: TypeId::of::<T>(),
                fields: Vec::new(),
                checks: Vec::new(),
            },
        }
    }

    /// The record name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the described Rust type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Declared fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Record-level checks in declaration order.
    #[must_use]
    pub fn checks(&self) -> &[RecordCheck] {
        &self.checks
    }

    /// Finds a field by exact name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDef)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, def)| def.name == name)
    }
}

/// Builder for [`RecordType`].
#[derive(Debug)]
pub struct RecordTypeBuilder {
    inner: RecordType,
}

impl RecordTypeBuilder {
    /// Declares the next field.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(
        mut self,
        name: &'static str,
        ty: TypeDesc,
        rules: &'static str,
        exported: bool,
    ) -> Self {
        self.inner
            .fields
            .push(FieldDef::new(name, ty, rules, exported));
        self
    }

    /// Adds a record-level check.
    #[must_use = "builder methods must be chained or built"]
    pub fn check(mut self, anchor: &'static str, rules: &'static str) -> Self {
        self.inner.checks.push(RecordCheck { anchor, rules });
        self
    }

    /// Finishes the description.
    #[must_use]
    pub fn build(self) -> RecordType {
        self.inner
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    crate::record! {
        #[derive(Debug, Default)]
        struct Leaf {
            pub name: String => "required",
            hidden: u32,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Branch {
            pub leaf: Option<Box<Leaf>>,
            pub twice: Option<Option<Box<Leaf>>>,
            pub next: Option<Box<Branch>>,
        }
        check "leaf.name" => "required";
    }

    #[test]
    fn test_macro_describes_fields_in_order() {
        let schema = Leaf::schema();
        assert_eq!(schema.name(), "Leaf");
        assert_eq!(schema.type_id(), TypeId::of::<Leaf>());

        let names: Vec<_> = schema.fields().iter().map(FieldDef::name).collect();
        assert_eq!(names, ["name", "hidden"]);
        assert_eq!(schema.fields()[0].rules(), "required");
        assert_eq!(schema.fields()[1].rules(), "");
    }

    #[test]
    fn test_visibility_maps_to_exported() {
        let schema = Leaf::schema();
        assert!(schema.field("name").unwrap().1.is_exported());
        assert!(!schema.field("hidden").unwrap().1.is_exported());
    }

    #[test]
    fn test_optional_links_are_described() {
        let schema = Branch::schema();
        let leaf = schema.field("leaf").unwrap().1.ty();
        assert!(leaf.is_optional());
        assert_eq!(leaf.indirections(), 1);
        assert_eq!(leaf.kind(), TypeKind::Record);
        assert_eq!(leaf.record().unwrap().name(), "Leaf");

        let twice = schema.field("twice").unwrap().1.ty();
        assert_eq!(twice.indirections(), 2);
        assert_eq!(twice.record().unwrap().name(), "Leaf");
    }

    #[test]
    fn test_recursive_type_terminates() {
        let next = Branch::schema().field("next").unwrap().1.ty();
        assert_eq!(next.record().unwrap().name(), "Branch");
        assert_eq!(format!("{next:?}"), "Optional(Record(Branch))");
    }

    #[test]
    fn test_record_checks() {
        assert_eq!(
            Branch::schema().checks(),
            &[RecordCheck {
                anchor: "leaf.name",
                rules: "required"
            }]
        );
    }

    #[test]
    fn test_field_access_by_index() {
        let leaf = Leaf {
            name: "a".into(),
            hidden: 9,
        };
        assert_eq!(leaf.field(0).as_str(), Some("a"));
        assert!(matches!(leaf.field(1), Value::Uint(9)));
        assert!(leaf.field(2).is_nil());
    }

    #[test]
    fn test_field_name_is_case_sensitive() {
        assert!(Leaf::schema().field("Name").is_none());
    }
}
