//! Dotted field paths
//!
//! A [`FieldPath`] is resolved once against a root [`RecordType`] and stores
//! the chain of field indices it walks. Resolution checks that every segment
//! exists and is exported, stepping through optional links into the linked
//! record's type. At run time [`FieldPath::resolve_value`] follows the index
//! chain on an instance, reporting an unset link as [`ResolveError::NilLink`].

use std::fmt;

use crate::schema::{FieldDef, Record, RecordType, TypeDesc};
use crate::value::Value;

// ============================================================================
// ERRORS
// ============================================================================

/// A path that cannot be resolved against its root type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path, or one of its segments, is empty.
    #[error("field path `{0}` has an empty segment")]
    Empty(String),

    /// No field with this exact name exists.
    #[error("`{record}` has no field `{segment}`")]
    NotFound {
        /// Record searched.
        record: &'static str,
        /// Missing segment.
        segment: String,
    },

    /// The field exists but is not exported.
    #[error("field `{segment}` of `{record}` is not exported")]
    Unexported {
        /// Record owning the field.
        record: &'static str,
        /// Unexported segment.
        segment: String,
    },

    /// A non-final segment is not a record and cannot be traversed.
    #[error("`{segment}` is not a record and cannot be traversed")]
    NotARecord {
        /// Offending segment.
        segment: String,
    },
}

/// A resolved path that could not be followed on an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// An optional link along the path is unset.
    #[error("nil encountered at `{segment}` while resolving `{path}`")]
    NilLink {
        /// The full path.
        path: String,
        /// The prefix ending at the unset link.
        segment: String,
    },

    /// The instance is not of the type the path was resolved against.
    #[error("path resolved against `{expected}` applied to a `{actual}`")]
    WrongRoot {
        /// Root type of the path.
        expected: &'static str,
        /// Type of the instance.
        actual: &'static str,
    },

    /// A traversed field did not hold a record.
    #[error("`{segment}` does not hold a record")]
    NotARecord {
        /// Offending prefix.
        segment: String,
    },
}

// ============================================================================
// FIELD PATH
// ============================================================================

/// A field reference resolved against one fixed root record type.
///
/// `segments`, `types` and `indices` always have the same length.
#[derive(Clone)]
pub struct FieldPath {
    raw: String,
    segments: Vec<&'static str>,
    types: Vec<TypeDesc>,
    indices: Vec<usize>,
    root: &'static RecordType,
}

impl FieldPath {
    /// Resolves `dotted` against `root`.
    ///
    /// Names match exactly, including case. Optional links in front of a
    /// nested record are stepped through.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if a segment is empty, missing, unexported,
    /// or not a record where the path continues.
    pub fn resolve(root: &'static RecordType, dotted: &str) -> Result<Self, PathError> {
        if dotted.is_empty() {
            return Err(PathError::Empty(String::new()));
        }

        let mut path = Self {
            raw: dotted.to_owned(),
            segments: Vec::new(),
            types: Vec::new(),
            indices: Vec::new(),
            root,
        };
        let mut current = root;
        let mut parts = dotted.split('.').peekable();

        while let Some(segment) = parts.next() {
            if segment.is_empty() {
                return Err(PathError::Empty(dotted.to_owned()));
            }
            let (index, def) =
                current
                    .field(segment)
                    .ok_or_else(|| PathError::NotFound {
                        record: current.name(),
                        segment: segment.to_owned(),
                    })?;
            if !def.is_exported() {
                return Err(PathError::Unexported {
                    record: current.name(),
                    segment: segment.to_owned(),
                });
            }

            path.push(index, def);

            if parts.peek().is_some() {
                current = def.ty().record().ok_or_else(|| PathError::NotARecord {
                    segment: path.segments.join("."),
                })?;
            }
        }

        Ok(path)
    }

    /// A single-segment path to a declared field, without the export check.
    ///
    /// Used for the field a rule is declared on.
    pub(crate) fn declared(root: &'static RecordType, index: usize, def: &FieldDef) -> Self {
        let mut path = Self {
            raw: def.name().to_owned(),
            segments: Vec::with_capacity(1),
            types: Vec::with_capacity(1),
            indices: Vec::with_capacity(1),
            root,
        };
        path.push(index, def);
        path
    }

    fn push(&mut self, index: usize, def: &FieldDef) {
        self.segments.push(def.name());
        self.types.push(def.ty().clone());
        self.indices.push(index);
    }

    /// Reads the value at the end of the path.
    ///
    /// An unset link at the final segment is returned as [`Value::Nil`];
    /// an unset link before it is a [`ResolveError::NilLink`].
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if an intermediate link is unset or the
    /// instance is not of the root type.
    pub fn resolve_value<'a>(&self, root: &'a dyn Record) -> Result<Value<'a>, ResolveError> {
        let actual = root.record_type();
        if actual.type_id() != self.root.type_id() {
            return Err(ResolveError::WrongRoot {
                expected: self.root.name(),
                actual: actual.name(),
            });
        }

        let mut current = root;
        let last = self.indices.len().saturating_sub(1);
        for (depth, &index) in self.indices.iter().enumerate() {
            let value = current.field(index);
            if depth == last {
                return Ok(value);
            }
            current = match value {
                Value::Record(record) => record,
                Value::Nil => {
                    return Err(ResolveError::NilLink {
                        path: self.raw.clone(),
                        segment: self.prefix(depth),
                    });
                }
                _ => {
                    return Err(ResolveError::NotARecord {
                        segment: self.prefix(depth),
                    });
                }
            };
        }

        Ok(Value::Nil)
    }

    fn prefix(&self, depth: usize) -> String {
        self.segments[..=depth].join(".")
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Field names along the path.
    #[must_use]
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Declared type at each segment.
    #[must_use]
    pub fn types(&self) -> &[TypeDesc] {
        &self.types
    }

    /// Field index at each segment.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a resolved path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The root type the path was resolved against.
    #[must_use]
    pub fn root(&self) -> &'static RecordType {
        self.root
    }

    /// Declared type of the final segment.
    #[must_use]
    pub fn target_type(&self) -> Option<&TypeDesc> {
        self.types.last()
    }

    /// Whether both paths reach the same field from the same root.
    #[must_use]
    pub fn same_field(&self, other: &Self) -> bool {
        self.root.type_id() == other.root.type_id() && self.indices == other.indices
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("raw", &self.raw)
            .field("root", &self.root.name())
            .field("indices", &self.indices)
            .finish()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
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
        struct Inner {
            pub name: String,
            secret: String,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Outer {
            pub label: String,
            pub inner: Option<Box<Inner>>,
            pub deep: Option<Option<Box<Inner>>>,
        }
    }

    #[test]
    fn test_resolve_nested_through_optional() {
        let path = FieldPath::resolve(Outer::schema(), "inner.name").unwrap();
        assert_eq!(path.segments(), ["inner", "name"]);
        assert_eq!(path.indices(), [1, 0]);
        assert_eq!(path.types().len(), 2);
        assert!(path.types()[0].is_optional());
    }

    #[test]
    fn test_resolve_errors() {
        let root = Outer::schema();
        assert!(matches!(
            FieldPath::resolve(root, "Label"),
            Err(PathError::NotFound { .. })
        ));
        assert!(matches!(
            FieldPath::resolve(root, "inner.secret"),
            Err(PathError::Unexported { record: "Inner", .. })
        ));
        assert!(matches!(
            FieldPath::resolve(root, "label.len"),
            Err(PathError::NotARecord { .. })
        ));
        assert!(matches!(FieldPath::resolve(root, ""), Err(PathError::Empty(_))));
        assert!(matches!(FieldPath::resolve(root, "inner..name"), Err(PathError::Empty(_))));
    }

    #[test]
    fn test_resolve_value_and_nil_link() {
        let path = FieldPath::resolve(Outer::schema(), "deep.name").unwrap();

        let set = Outer {
            deep: Some(Some(Box::new(Inner {
                name: "n".into(),
                ..Inner::default()
            }))),
            ..Outer::default()
        };
        assert_eq!(path.resolve_value(&set).unwrap().as_str(), Some("n"));

        let half = Outer {
            deep: Some(None),
            ..Outer::default()
        };
        assert_eq!(
            path.resolve_value(&half).unwrap_err(),
            ResolveError::NilLink {
                path: "deep.name".into(),
                segment: "deep".into(),
            }
        );
    }

    #[test]
    fn test_final_nil_is_a_value() {
        let path = FieldPath::resolve(Outer::schema(), "inner").unwrap();
        assert!(path.resolve_value(&Outer::default()).unwrap().is_nil());
    }

    #[test]
    fn test_wrong_root() {
        let path = FieldPath::resolve(Outer::schema(), "label").unwrap();
        assert!(matches!(
            path.resolve_value(&Inner::default()),
            Err(ResolveError::WrongRoot {
                expected: "Outer",
                actual: "Inner"
            })
        ));
    }
}
