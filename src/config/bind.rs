//! Binding of resolved configuration values onto typed structures.
//!
//! Instead of runtime reflection, each target type registers an explicit
//! field-descriptor table via [`Bind::schema`]: per field, an optional key
//! override, an optional default, a required flag, and a typed setter. The
//! bind walk visits descriptors in registration order, recursing into
//! nested records depth-first, and aborts at the first missing-required or
//! coercion failure. Fields assigned before the abort stay assigned; there
//! is no rollback.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("missing required configuration key: {key}")]
    MissingRequired { key: String },

    #[error("failed to bind field '{field}': {source}")]
    Coerce {
        field: &'static str,
        source: CoerceError,
    },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoerceError {
    #[error("invalid integer '{raw}': {source}")]
    Int {
        raw: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid float '{raw}': {source}")]
    Float {
        raw: String,
        source: std::num::ParseFloatError,
    },

    #[error("invalid boolean '{raw}': expected \"true\" or \"false\"")]
    Bool { raw: String },
}

/// Source of resolved values for a bind walk.
///
/// Implemented by [`Resolver`](crate::Resolver) (cache first, then the
/// environment snapshot) and by plain maps for tests.
pub trait Lookup {
    fn get(&self, key: &str) -> Option<String>;
}

impl Lookup for std::collections::BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::BTreeMap::get(self, key).cloned()
    }
}

/// A type that can be populated from flat configuration keys.
///
/// Implementations register their fields in declaration order. The lookup
/// key for a scalar field defaults to the field name upper-cased and can be
/// overridden per field.
///
/// ## Example
///
/// ```
/// use layerconf::{Bind, Schema};
///
/// #[derive(Default)]
/// struct Database {
///     host: String,
///     port: u16,
/// }
///
/// impl Bind for Database {
///     fn schema(fields: &mut Schema<Self>) {
///         fields.field("host", |c| &mut c.host).key("DB_HOST").default("localhost");
///         fields.field("port", |c| &mut c.port).required();
///     }
/// }
/// ```
pub trait Bind: Sized {
    fn schema(fields: &mut Schema<Self>);
}

type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoerceError>>;
type Descend<T> = Box<dyn Fn(&mut T, &dyn Lookup) -> Result<(), BindError>>;

struct ScalarField<T> {
    key: Option<&'static str>,
    default: Option<String>,
    required: bool,
    assign: Setter<T>,
}

enum FieldKind<T> {
    Scalar(ScalarField<T>),
    Nested(Descend<T>),
}

struct Field<T> {
    name: &'static str,
    kind: FieldKind<T>,
}

/// The field-descriptor table for one target type, filled in by
/// [`Bind::schema`].
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Schema<T> {
    fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Registers a scalar field. The returned handle sets the key override,
    /// default, and required flag; dropping it unchanged leaves a plain
    /// optional field looked up under the upper-cased name.
    pub fn field<V: FromConfigStr + 'static>(
        &mut self,
        name: &'static str,
        access: fn(&mut T) -> &mut V,
    ) -> FieldOptions<'_, T> {
        self.fields.push(Field {
            name,
            kind: FieldKind::Scalar(ScalarField {
                key: None,
                default: None,
                required: false,
                assign: Box::new(move |target, raw| {
                    *access(target) = V::from_config_str(raw)?;
                    Ok(())
                }),
            }),
        });
        FieldOptions {
            field: self.fields.last_mut().expect("field was just pushed"),
        }
    }

    /// Registers a nested record, bound in place before later siblings.
    pub fn nested<N: Bind + 'static>(&mut self, name: &'static str, access: fn(&mut T) -> &mut N) {
        self.fields.push(Field {
            name,
            kind: FieldKind::Nested(Box::new(move |target, lookup| {
                bind(access(target), lookup)
            })),
        });
    }
}

/// Options handle for the most recently registered scalar field.
pub struct FieldOptions<'a, T> {
    field: &'a mut Field<T>,
}

impl<T> FieldOptions<'_, T> {
    /// Overrides the lookup key for this field.
    pub fn key(self, key: &'static str) -> Self {
        if let FieldKind::Scalar(scalar) = &mut self.field.kind {
            scalar.key = Some(key);
        }
        self
    }

    /// Sets the value used when the key resolves to nothing.
    pub fn default(self, value: impl Into<String>) -> Self {
        if let FieldKind::Scalar(scalar) = &mut self.field.kind {
            scalar.default = Some(value.into());
        }
        self
    }

    /// Marks the field as required: a miss with no default aborts the bind.
    pub fn required(self) -> Self {
        if let FieldKind::Scalar(scalar) = &mut self.field.kind {
            scalar.required = true;
        }
        self
    }
}

/// Binds `target`'s registered fields from `lookup`, in registration order.
///
/// Per scalar field: resolve the key (override or upper-cased name), fall
/// back to the default on a miss, fail with [`BindError::MissingRequired`]
/// if required and still unresolved, otherwise leave the field untouched.
/// Resolved values are coerced to the field type; a coercion failure aborts
/// with [`BindError::Coerce`] naming the field.
pub fn bind<T: Bind + 'static>(target: &mut T, lookup: &dyn Lookup) -> Result<(), BindError> {
    let mut schema = Schema::new();
    T::schema(&mut schema);

    for field in &schema.fields {
        match &field.kind {
            FieldKind::Nested(descend) => descend(target, lookup)?,
            FieldKind::Scalar(scalar) => {
                let key = scalar
                    .key
                    .map(str::to_string)
                    .unwrap_or_else(|| field.name.to_uppercase());

                let value = match lookup.get(&key) {
                    Some(value) => value,
                    None => match &scalar.default {
                        Some(default) => default.clone(),
                        None if scalar.required => {
                            return Err(BindError::MissingRequired { key });
                        }
                        None => continue,
                    },
                };

                (scalar.assign)(target, &value).map_err(|source| BindError::Coerce {
                    field: field.name,
                    source,
                })?;
            }
        }
    }

    Ok(())
}

/// Coercion from a resolved textual value to a field's primitive type.
pub trait FromConfigStr: Sized {
    fn from_config_str(raw: &str) -> Result<Self, CoerceError>;
}

impl FromConfigStr for String {
    fn from_config_str(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_string())
    }
}

impl FromConfigStr for bool {
    fn from_config_str(raw: &str) -> Result<Self, CoerceError> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CoerceError::Bool {
                raw: raw.to_string(),
            }),
        }
    }
}

macro_rules! int_from_config_str {
    ($($ty:ty),* $(,)?) => {$(
        impl FromConfigStr for $ty {
            fn from_config_str(raw: &str) -> Result<Self, CoerceError> {
                raw.parse().map_err(|source| CoerceError::Int {
                    raw: raw.to_string(),
                    source,
                })
            }
        }
    )*};
}

int_from_config_str!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_from_config_str {
    ($($ty:ty),* $(,)?) => {$(
        impl FromConfigStr for $ty {
            fn from_config_str(raw: &str) -> Result<Self, CoerceError> {
                raw.parse().map_err(|source| CoerceError::Float {
                    raw: raw.to_string(),
                    source,
                })
            }
        }
    )*};
}

float_from_config_str!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[derive(Debug, Default, PartialEq)]
    struct Database {
        host: String,
        port: u16,
    }

    impl Bind for Database {
        fn schema(fields: &mut Schema<Self>) {
            fields
                .field("host", |c| &mut c.host)
                .key("DB_HOST")
                .default("localhost");
            fields.field("port", |c| &mut c.port).key("DB_PORT").required();
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct App {
        name: String,
        debug: bool,
        ratio: f64,
        database: Database,
    }

    impl Bind for App {
        fn schema(fields: &mut Schema<Self>) {
            fields.field("name", |c| &mut c.name).required();
            fields.field("debug", |c| &mut c.debug);
            fields.field("ratio", |c| &mut c.ratio).default("1.0");
            fields.nested("database", |c| &mut c.database);
        }
    }

    #[test]
    fn test_bind_full_structure() {
        let values = lookup(&[
            ("NAME", "svc"),
            ("DEBUG", "true"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "5432"),
        ]);

        let mut app = App::default();
        bind(&mut app, &values).unwrap();

        assert_eq!(
            app,
            App {
                name: "svc".into(),
                debug: true,
                ratio: 1.0,
                database: Database {
                    host: "db.internal".into(),
                    port: 5432,
                },
            }
        );
    }

    #[test]
    fn test_derived_key_is_uppercased_field_name() {
        let values = lookup(&[("NAME", "svc"), ("DB_PORT", "1")]);
        let mut app = App::default();
        bind(&mut app, &values).unwrap();

        assert_eq!(app.name, "svc");
    }

    #[test]
    fn test_missing_required_names_the_key() {
        let values = lookup(&[("NAME", "svc")]);
        let mut app = App::default();
        let err = bind(&mut app, &values).unwrap_err();

        match err {
            BindError::MissingRequired { key } => assert_eq!(key, "DB_PORT"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_fills_missing_key() {
        let values = lookup(&[("DB_PORT", "5432")]);
        let mut db = Database::default();
        bind(&mut db, &values).unwrap();

        assert_eq!(db.host, "localhost");
    }

    #[test]
    fn test_resolved_value_wins_over_default() {
        let values = lookup(&[("DB_HOST", "db.prod"), ("DB_PORT", "5432")]);
        let mut db = Database::default();
        bind(&mut db, &values).unwrap();

        assert_eq!(db.host, "db.prod");
    }

    #[test]
    fn test_optional_miss_leaves_field_untouched() {
        let mut app = App {
            debug: true,
            ..App::default()
        };
        bind(&mut app, &lookup(&[("NAME", "svc"), ("DB_PORT", "1")])).unwrap();

        assert!(app.debug);
    }

    #[test]
    fn test_coercion_failure_names_the_field() {
        let values = lookup(&[("NAME", "svc"), ("DB_PORT", "not-a-port")]);
        let mut app = App::default();
        let err = bind(&mut app, &values).unwrap_err();

        match err {
            BindError::Coerce { field, .. } => assert_eq!(field, "port"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fields_assigned_before_abort_stay_assigned() {
        let values = lookup(&[("NAME", "svc"), ("DEBUG", "maybe")]);
        let mut app = App::default();
        let err = bind(&mut app, &values).unwrap_err();

        assert!(matches!(err, BindError::Coerce { field: "debug", .. }));
        assert_eq!(app.name, "svc");
    }

    #[test]
    fn test_bool_rejects_non_canonical_spellings() {
        assert!(bool::from_config_str("true").unwrap());
        assert!(!bool::from_config_str("false").unwrap());
        assert!(bool::from_config_str("TRUE").is_err());
        assert!(bool::from_config_str("1").is_err());
    }

    #[test]
    fn test_integer_coercion_is_base_10() {
        assert_eq!(u16::from_config_str("8080").unwrap(), 8080);
        assert!(u16::from_config_str("0x50").is_err());
        assert!(i64::from_config_str("").is_err());
    }
}
