//! In-memory schema graph and its introspection-format JSON (de)serialization.
//!
//! `Schema::types` is an [`IndexMap`] rather than a `HashMap`: the driver's
//! tie-breaks in [`Schema::path_from_root`] and [`Schema::type_without_fields`]
//! depend on insertion order, not name order.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::error::OracleError;
use crate::error::Result;

pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// A reference to a type, carrying list/non-null modifiers.
///
/// Invariant: `non_null_item` implies `is_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub kind: String,
    pub is_list: bool,
    pub non_null_item: bool,
    pub non_null: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            kind: kind.into(),
            is_list: false,
            non_null_item: false,
            non_null: false,
        }
    }

    pub fn with_modifiers(
        name: impl Into<String>,
        kind: impl Into<String>,
        is_list: bool,
        non_null_item: bool,
        non_null: bool,
    ) -> Self {
        debug_assert!(
            is_list || !non_null_item,
            "non_null_item requires is_list"
        );
        TypeRef {
            name: name.into(),
            kind: kind.into(),
            is_list,
            non_null_item,
            non_null,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut j = json!({"kind": self.kind, "name": self.name, "ofType": null});

        if self.non_null_item {
            j = json!({"kind": "NON_NULL", "name": null, "ofType": j});
        }
        if self.is_list {
            j = json!({"kind": "LIST", "name": null, "ofType": j});
        }
        if self.non_null {
            j = json!({"kind": "NON_NULL", "name": null, "ofType": j});
        }

        j
    }

    /// Parses the nested NON_NULL-of-LIST-of-NON_NULL-of-<base> shape emitted
    /// by [`Self::to_json`].
    pub fn from_json(jso: &Value) -> Result<Self> {
        let kind = jso["kind"]
            .as_str()
            .ok_or_else(|| OracleError::MalformedTypeRef("missing 'kind'".to_string()))?;

        if kind != "NON_NULL" && kind != "LIST" {
            let name = jso["name"].as_str().unwrap_or_default().to_string();
            return Ok(TypeRef::new(name, kind));
        }

        let of_type = &jso["ofType"];
        if of_type["ofType"].is_null() {
            let base = of_type;
            let name = base["name"].as_str().unwrap_or_default().to_string();
            let base_kind = base["kind"].as_str().unwrap_or_default().to_string();
            return Ok(match kind {
                "NON_NULL" => TypeRef::with_modifiers(name, base_kind, false, false, true),
                "LIST" => TypeRef::with_modifiers(name, base_kind, true, false, false),
                _ => unreachable!(),
            });
        }

        let inner = &of_type["ofType"];
        if inner["ofType"].is_null() {
            let base = inner;
            let name = base["name"].as_str().unwrap_or_default().to_string();
            let base_kind = base["kind"].as_str().unwrap_or_default().to_string();
            return Ok(match kind {
                "NON_NULL" => TypeRef::with_modifiers(name, base_kind, true, false, true),
                "LIST" => TypeRef::with_modifiers(name, base_kind, true, true, false),
                _ => unreachable!(),
            });
        }

        let innermost = &inner["ofType"];
        if innermost["ofType"].is_null() {
            let base = innermost;
            let name = base["name"].as_str().unwrap_or_default().to_string();
            let base_kind = base["kind"].as_str().unwrap_or_default().to_string();
            return Ok(TypeRef::with_modifiers(name, base_kind, true, true, true));
        }

        Err(OracleError::MalformedTypeRef(
            "nested too deeply (more than NON_NULL-of-LIST-of-NON_NULL)".to_string(),
        ))
    }
}

/// An argument of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValue {
    pub name: String,
    pub type_ref: TypeRef,
}

impl InputValue {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        InputValue { name: name.into(), type_ref }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.type_ref.to_json(),
            "defaultValue": null,
            "description": null,
        })
    }

    pub fn from_json(jso: &Value) -> Result<Self> {
        let name = jso["name"].as_str().unwrap_or_default().to_string();
        let type_ref = TypeRef::from_json(&jso["type"])?;
        Ok(InputValue::new(name, type_ref))
    }
}

/// A field of an OBJECT/INTERFACE/INPUT_OBJECT type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    pub args: Vec<InputValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Field { name: name.into(), type_ref, args: Vec::new() }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.type_ref.to_json(),
            "args": self.args.iter().map(InputValue::to_json).collect::<Vec<_>>(),
            "isDeprecated": false,
            "deprecationReason": null,
            "description": null,
        })
    }

    pub fn from_json(jso: &Value) -> Result<Self> {
        let name = jso["name"].as_str().unwrap_or_default().to_string();
        let type_ref = TypeRef::from_json(&jso["type"])?;
        let mut args = Vec::new();
        if let Some(arr) = jso["args"].as_array() {
            for a in arr {
                args.push(InputValue::from_json(a)?);
            }
        }
        Ok(Field { name, type_ref, args })
    }
}

/// A node in the schema graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub name: String,
    pub kind: String,
    pub fields: Vec<Field>,
}

impl Type {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Type { name: name.into(), kind: kind.into(), fields: Vec::new() }
    }

    /// Emits this type's JSON, injecting a synthetic `dummy: String` field
    /// when the type has no known fields so downstream introspection
    /// consumers don't reject an empty OBJECT/INPUT_OBJECT.
    pub fn to_json(&self) -> Value {
        let fields: Vec<Value> = if self.fields.is_empty() {
            vec![Field::new("dummy", TypeRef::new("String", "SCALAR")).to_json()]
        } else {
            self.fields.iter().map(Field::to_json).collect()
        };

        let (fields_value, input_fields_value) = match self.kind.as_str() {
            "OBJECT" | "INTERFACE" => (Value::Array(fields), Value::Null),
            "INPUT_OBJECT" => (Value::Null, Value::Array(fields)),
            _ => (Value::Null, Value::Null),
        };

        json!({
            "name": self.name,
            "kind": self.kind,
            "description": null,
            "fields": fields_value,
            "inputFields": input_fields_value,
            "interfaces": [],
            "enumValues": null,
            "possibleTypes": null,
        })
    }

    pub fn from_json(jso: &Value) -> Result<Self> {
        let name = jso["name"].as_str().unwrap_or_default().to_string();
        let kind = jso["kind"].as_str().unwrap_or_default().to_string();

        let fields_key = match kind.as_str() {
            "OBJECT" | "INTERFACE" => Some("fields"),
            "INPUT_OBJECT" => Some("inputFields"),
            _ => None,
        };

        let mut fields = Vec::new();
        if let Some(key) = fields_key {
            if let Some(arr) = jso[key].as_array() {
                for f in arr {
                    if f["name"].as_str() == Some("dummy") {
                        continue;
                    }
                    fields.push(Field::from_json(f)?);
                }
            }
        }

        Ok(Type { name, kind, fields })
    }
}

/// The schema graph, mutated only by the driver between probe fan-outs.
#[derive(Debug, Clone)]
pub struct Schema {
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub directives: Vec<Value>,
    pub types: IndexMap<String, Type>,
}

impl Schema {
    /// Seeds an empty schema with String/ID scalars plus one OBJECT per
    /// declared root.
    pub fn new(
        query_type: Option<String>,
        mutation_type: Option<String>,
        subscription_type: Option<String>,
    ) -> Self {
        let mut types = IndexMap::new();
        types.insert("String".to_string(), Type::new("String", "SCALAR"));
        types.insert("ID".to_string(), Type::new("ID", "SCALAR"));

        let mut schema = Schema {
            query_type,
            mutation_type,
            subscription_type,
            directives: Vec::new(),
            types,
        };

        if let Some(name) = schema.query_type.clone() {
            schema.add_type(&name, "OBJECT");
        }
        if let Some(name) = schema.mutation_type.clone() {
            schema.add_type(&name, "OBJECT");
        }
        if let Some(name) = schema.subscription_type.clone() {
            schema.add_type(&name, "OBJECT");
        }

        schema
    }

    /// No-op if the type is already present.
    pub fn add_type(&mut self, name: &str, kind: &str) {
        self.types
            .entry(name.to_string())
            .or_insert_with(|| Type::new(name, kind));
    }

    pub fn roots(&self) -> Vec<String> {
        [&self.query_type, &self.mutation_type, &self.subscription_type]
            .into_iter()
            .filter_map(|r| r.clone())
            .collect()
    }

    /// Reverse-scans the type graph for a field referencing `name`, prepending
    /// field names until a root type is reached. Ties break by insertion
    /// order of `self.types`.
    pub fn path_from_root(&self, name: &str) -> Result<Vec<String>> {
        if !self.types.contains_key(name) {
            return Err(OracleError::TypeNotInSchema(name.to_string()));
        }

        let roots = self.roots();
        let mut path = Vec::new();
        let mut current = name.to_string();

        while !roots.contains(&current) {
            let mut found = false;
            for t in self.types.values() {
                for f in &t.fields {
                    if f.type_ref.name == current {
                        path.insert(0, f.name.clone());
                        current = t.name.clone();
                        found = true;
                        break;
                    }
                }
                if found {
                    break;
                }
            }
            if !found {
                return Err(OracleError::TypeNotInSchema(name.to_string()));
            }
        }

        path.insert(0, current);
        Ok(path)
    }

    /// The lexically-first (insertion order) type with empty fields that
    /// isn't in `ignored` and isn't an INPUT_OBJECT.
    pub fn type_without_fields(&self, ignored: &HashSet<String>) -> Option<String> {
        self.types
            .values()
            .find(|t| t.fields.is_empty() && !ignored.contains(&t.name) && t.kind != "INPUT_OBJECT")
            .map(|t| t.name.clone())
    }

    /// Wraps a root-to-leaf path into a document template with `FUZZ` at the
    /// innermost selection.
    pub fn convert_path_to_document(&self, mut path: Vec<String>) -> Result<String> {
        let mut doc = "FUZZ".to_string();

        while path.len() > 1 {
            let segment = path.pop().expect("len > 1 checked above");
            doc = format!("{segment} {{ {doc} }}");
        }

        let root = path.first().cloned().unwrap_or_default();
        if Some(&root) == self.query_type.as_ref() {
            Ok(format!("query {{ {doc} }}"))
        } else if Some(&root) == self.mutation_type.as_ref() {
            Ok(format!("mutation {{ {doc} }}"))
        } else if Some(&root) == self.subscription_type.as_ref() {
            Ok(format!("subscription {{ {doc} }}"))
        } else {
            Err(OracleError::UnknownOperationType(root))
        }
    }

    pub fn to_json_string(&self) -> String {
        let mut types: Vec<&Type> = self.types.values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));

        let schema = json!({
            "data": {
                "__schema": {
                    "queryType": self.query_type.as_ref().map(|n| json!({"name": n})),
                    "mutationType": self.mutation_type.as_ref().map(|n| json!({"name": n})),
                    "subscriptionType": self.subscription_type.as_ref().map(|n| json!({"name": n})),
                    "directives": self.directives,
                    "types": types.iter().map(|t| t.to_json()).collect::<Vec<_>>(),
                }
            }
        });

        to_string_pretty_4(&schema)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let jso: Value = serde_json::from_str(raw)?;
        Self::from_json(&jso["data"]["__schema"])
    }

    pub fn from_json(schema_jso: &Value) -> Result<Self> {
        let query_type = schema_jso["queryType"]["name"].as_str().map(String::from);
        let mutation_type = schema_jso["mutationType"]["name"].as_str().map(String::from);
        let subscription_type =
            schema_jso["subscriptionType"]["name"].as_str().map(String::from);
        let directives = schema_jso["directives"].as_array().cloned().unwrap_or_default();

        let mut types = IndexMap::new();
        if let Some(arr) = schema_jso["types"].as_array() {
            for t in arr {
                let typ = Type::from_json(t)?;
                types.insert(typ.name.clone(), typ);
            }
        }

        Ok(Schema { query_type, mutation_type, subscription_type, directives, types })
    }
}

/// `serde_json::to_string_pretty` indents with 2 spaces; the output format
/// requires 4, so serialize through a `PrettyFormatter` configured for it.
fn to_string_pretty_4(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .expect("Value serialization is infallible");
    String::from_utf8(buf).expect("serde_json only emits valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typeref_non_null_item_implies_list() {
        let t = TypeRef::with_modifiers("String", "SCALAR", true, true, false);
        assert!(t.is_list);
    }

    #[test]
    fn typeref_round_trips() {
        let t = TypeRef::with_modifiers("TestObject", "OBJECT", true, true, true);
        let json = t.to_json();
        let back = TypeRef::from_json(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn typeref_to_json_matches_introspection_shape() {
        let t = TypeRef::with_modifiers("String", "SCALAR", true, false, true);
        let want = json!({
            "kind": "NON_NULL",
            "name": null,
            "ofType": {
                "kind": "LIST",
                "name": null,
                "ofType": {"kind": "SCALAR", "name": "String", "ofType": null}
            }
        });
        assert_eq!(t.to_json(), want);
    }

    #[test]
    fn object_emits_fields_not_input_fields() {
        let mut t = Type::new("Query", "OBJECT");
        t.fields.push(Field::new("homes", TypeRef::new("Home", "OBJECT")));
        let json = t.to_json();
        assert!(json["fields"].is_array());
        assert!(json["inputFields"].is_null());
    }

    #[test]
    fn input_object_emits_input_fields_not_fields() {
        let mut t = Type::new("HomeInput", "INPUT_OBJECT");
        t.fields.push(Field::new("name", TypeRef::new("String", "SCALAR")));
        let json = t.to_json();
        assert!(json["inputFields"].is_array());
        assert!(json["fields"].is_null());
    }

    #[test]
    fn empty_type_gets_dummy_field_on_serialize() {
        let t = Type::new("Query", "OBJECT");
        let json = t.to_json();
        let fields = json["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["name"], "dummy");
    }

    #[test]
    fn dummy_field_dropped_on_deserialize() {
        let mut t = Type::new("Query", "OBJECT");
        let json = t.to_json();
        t.fields.clear();
        let back = Type::from_json(&json).unwrap();
        assert!(back.fields.is_empty());
    }

    #[test]
    fn get_path_from_root_prepends_root_and_ties_break_by_insertion_order() {
        let mut schema = Schema::new(Some("Query".to_string()), None, None);
        schema.add_type("Home", "OBJECT");
        schema.add_type("PaymentSubscriptionsForHome", "OBJECT");

        schema
            .types
            .get_mut("Query")
            .unwrap()
            .fields
            .push(Field::new("homes", TypeRef::new("Home", "OBJECT")));
        schema.types.get_mut("Home").unwrap().fields.push(Field::new(
            "paymentSubscriptions",
            TypeRef::new("PaymentSubscriptionsForHome", "OBJECT"),
        ));

        let path = schema.path_from_root("PaymentSubscriptionsForHome").unwrap();
        assert_eq!(path, vec!["Query", "homes", "paymentSubscriptions"]);
    }

    #[test]
    fn convert_path_to_document_wraps_root_keyword() {
        let schema = Schema::new(Some("Query".to_string()), None, None);
        let doc = schema
            .convert_path_to_document(vec![
                "Query".to_string(),
                "homes".to_string(),
                "paymentSubscriptions".to_string(),
            ])
            .unwrap();
        assert_eq!(doc, "query { homes { paymentSubscriptions { FUZZ } } }");
    }

    #[test]
    fn convert_path_to_document_handles_subscription_root_alone() {
        let schema = Schema::new(None, None, Some("Subscription".to_string()));
        let doc = schema.convert_path_to_document(vec!["Subscription".to_string()]).unwrap();
        assert_eq!(doc, "subscription { FUZZ }");
    }

    #[test]
    fn convert_path_to_document_rejects_unknown_root() {
        let schema = Schema::new(Some("Query".to_string()), None, None);
        let err = schema.convert_path_to_document(vec!["UnknownType".to_string()]).unwrap_err();
        assert!(matches!(err, OracleError::UnknownOperationType(_)));
    }

    #[test]
    fn schema_round_trip_is_stable() {
        let mut schema = Schema::new(Some("Query".to_string()), None, None);
        schema.types.get_mut("Query").unwrap().fields.push(Field::new(
            "homes",
            TypeRef::with_modifiers("Home", "OBJECT", true, true, false),
        ));
        schema.add_type("Home", "OBJECT");

        let first = schema.to_json_string();
        let reparsed = Schema::from_json_str(&first).unwrap();
        let second = reparsed.to_json_string();
        assert_eq!(first, second);
    }
}
