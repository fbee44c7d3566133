//! The recipe header schema.
//!
//! The schema is a declarative table of recognized keys, built once per
//! process and shared read-only by every validation. It describes *what* a
//! header may contain; [`validate`](super::validate) walks a parsed header
//! against it.

use std::sync::LazyLock;

use crate::header::ValueKind;

/// A value-level check applied on top of the kind check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Must be `true` or `false`.
    Boolean,
    /// Must compile as a regular expression.
    Regex,
    /// `%`-substitutions limited to `%(name)s` with known names.
    VersionFormat,
    /// `http(s)://` or `git://` URL.
    GitUrl,
    /// `package` or `package:arch-regex`.
    Require,
    /// A relative path without slashes.
    RelativeToplevelPath,
    /// Environment variable name.
    Identifier,
}

/// Expected shape of a value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// A scalar, then the given checks.
    Scalar(Vec<Check>),
    /// A sequence whose items all follow the inner rule.
    Sequence(Box<Rule>),
    /// A free-form mapping: keys pass `keys`, values follow `values`.
    Map { keys: Vec<Check>, values: Box<Rule> },
    /// A mapping with a fixed set of recognized keys.
    Record(Vec<Field>),
    /// At least one alternative must match.
    AnyOf(Vec<Rule>),
}

impl Rule {
    /// Plain scalar without further checks.
    pub fn scalar() -> Self {
        Rule::Scalar(Vec::new())
    }

    /// Sequence of plain scalars.
    pub fn scalars() -> Self {
        Rule::Sequence(Box::new(Rule::scalar()))
    }

    /// Kind the value must have, `None` for alternatives.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Rule::Scalar(_) => Some(ValueKind::Scalar),
            Rule::Sequence(_) => Some(ValueKind::Sequence),
            Rule::Map { .. } | Rule::Record(_) => Some(ValueKind::Mapping),
            Rule::AnyOf(_) => None,
        }
    }

    /// Short description used in mismatch messages.
    pub fn describe(&self) -> String {
        match self {
            Rule::Scalar(_) => "scalar".to_string(),
            Rule::Sequence(item) => format!("sequence of {}", item.describe()),
            Rule::Map { .. } | Rule::Record(_) => "mapping".to_string(),
            Rule::AnyOf(rules) => rules
                .iter()
                .map(Rule::describe)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

/// A recognized key.
#[derive(Debug, Clone)]
pub struct Field {
    /// Key name.
    pub name: &'static str,
    /// Whether the key must be present.
    pub required: bool,
    /// Shape of the value.
    pub rule: Rule,
    /// Keys that must be present whenever this one is.
    pub needs: &'static [&'static str],
}

impl Field {
    fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            required: false,
            rule,
            needs: &[],
        }
    }

    fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            required: true,
            ..Self::optional(name, rule)
        }
    }

    fn needing(mut self, needs: &'static [&'static str]) -> Self {
        self.needs = needs;
        self
    }
}

/// The full set of top-level rules.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
}

static RECIPE_SCHEMA: LazyLock<Schema> = LazyLock::new(Schema::build_recipe);

impl Schema {
    /// The recipe schema, built on first use and shared afterwards.
    pub fn recipe() -> &'static Schema {
        &RECIPE_SCHEMA
    }

    /// Create a schema from explicit fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// All top-level fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a top-level field.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of required top-level keys.
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    fn build_recipe() -> Self {
        let mut fields = vec![
            Field::required("package", Rule::scalar()),
            Field::required("version", Rule::Scalar(vec![Check::VersionFormat])),
            Field::required("tag", Rule::scalar()),
        ];
        fields.extend(
            override_fields()
                .into_iter()
                .filter(|f| f.name != "version" && f.name != "tag"),
        );
        fields.push(Field::optional("disable", Rule::scalars()));
        fields.push(Field::optional(
            "overrides",
            Rule::Map {
                keys: Vec::new(),
                values: Box::new(Rule::Record(override_fields())),
            },
        ));
        Self { fields }
    }
}

/// Keys allowed both at top level and inside an `overrides` entry.
fn override_fields() -> Vec<Field> {
    let requires = || Rule::Sequence(Box::new(Rule::Scalar(vec![Check::Require])));
    let git_url = || Rule::Scalar(vec![Check::GitUrl]);
    let environment = || Rule::Map {
        keys: vec![Check::Identifier],
        values: Box::new(Rule::scalar()),
    };
    let path_environment = || Rule::Map {
        keys: vec![Check::Identifier],
        values: Box::new(Rule::AnyOf(vec![Rule::scalar(), Rule::scalars()])),
    };

    vec![
        Field::optional("version", Rule::Scalar(vec![Check::VersionFormat])),
        Field::optional("tag", Rule::scalar()),
        Field::optional("source", git_url()),
        Field::optional("write_repo", git_url()),
        Field::optional("requires", requires()),
        Field::optional("build_requires", requires()),
        Field::optional("env", environment()),
        Field::optional("valid_defaults", Rule::scalars()),
        Field::optional("prepend_path", path_environment()),
        Field::optional("append_path", path_environment()),
        Field::optional("force_rebuild", Rule::Scalar(vec![Check::Boolean])),
        Field::optional("incremental_recipe", Rule::scalar()),
        Field::optional("prefer_system", Rule::Scalar(vec![Check::Regex])),
        Field::optional("prefer_system_check", Rule::scalar()),
        Field::optional("system_requirement", Rule::Scalar(vec![Check::Regex]))
            .needing(&["system_requirement_check"]),
        Field::optional("system_requirement_check", Rule::scalar())
            .needing(&["system_requirement"]),
        Field::optional("system_requirement_missing", Rule::scalar())
            .needing(&["system_requirement"]),
        Field::optional(
            "relocate_paths",
            Rule::Sequence(Box::new(Rule::Scalar(vec![Check::RelativeToplevelPath]))),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_requires_package_version_tag() {
        let required: Vec<_> = Schema::recipe().required().collect();
        assert_eq!(required, vec!["package", "version", "tag"]);
    }

    #[test]
    fn recipe_schema_is_shared() {
        assert!(std::ptr::eq(Schema::recipe(), Schema::recipe()));
    }

    #[test]
    fn top_level_fields_are_unique() {
        let schema = Schema::recipe();
        for field in schema.fields() {
            let count = schema.fields().iter().filter(|f| f.name == field.name).count();
            assert_eq!(count, 1, "duplicate field {}", field.name);
        }
    }

    #[test]
    fn overrides_take_override_records() {
        let field = Schema::recipe().field("overrides").unwrap();
        match &field.rule {
            Rule::Map { values, .. } => match values.as_ref() {
                Rule::Record(fields) => {
                    assert!(fields.iter().any(|f| f.name == "version" && !f.required));
                    assert!(!fields.iter().any(|f| f.name == "package"));
                }
                other => panic!("unexpected override rule {:?}", other),
            },
            other => panic!("unexpected overrides rule {:?}", other),
        }
    }

    #[test]
    fn rule_descriptions() {
        assert_eq!(Rule::scalars().describe(), "sequence of scalar");
        assert_eq!(
            Rule::AnyOf(vec![Rule::scalar(), Rule::scalars()]).describe(),
            "scalar or sequence of scalar"
        );
        assert_eq!(Rule::scalar().kind(), Some(ValueKind::Scalar));
    }

    #[test]
    fn system_requirement_dependencies() {
        let field = Schema::recipe().field("system_requirement").unwrap();
        assert_eq!(field.needs, &["system_requirement_check"]);
    }
}
