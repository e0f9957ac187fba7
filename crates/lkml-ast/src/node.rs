//! Node builders and the values they receive.

use lkml_tree::Value;

/// One property delivered to a [`NodeBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// A scalar, code or list value.
    Value(Value),
    /// A finished child node.
    Node(T),
}

impl<T> Field<T> {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Field::Value(value) => Some(value),
            Field::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<T> {
        match self {
            Field::Node(node) => Some(node),
            Field::Value(_) => None,
        }
    }

    /// The text of a string, identifier or code value.
    pub fn into_text(self) -> Option<String> {
        match self {
            Field::Value(Value::String(s) | Value::Identifier(s) | Value::Code(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Value(value) => value.as_f64(),
            Field::Node(_) => None,
        }
    }

    /// A boolean, also accepting the identifiers `true` and `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Field::Value(Value::Boolean(b)) => Some(*b),
            Field::Value(Value::Identifier(s)) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// The string and identifier elements of a list.
    pub fn into_texts(self) -> Vec<String> {
        match self {
            Field::Value(Value::List(list)) => list
                .items
                .into_iter()
                .filter_map(|item| match item.value {
                    Value::String(s) | Value::Identifier(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The `reference: "string"` elements of a list.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            Field::Value(Value::List(list)) => list
                .items
                .into_iter()
                .filter_map(|item| match item.value {
                    Value::Pair(reference, value) => Some((reference, value)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Accumulates the properties of one object and produces a domain node.
pub trait NodeBuilder<T> {
    /// Receive property `name`.
    fn accept(&mut self, name: &str, field: Field<T>);

    /// Finish the node.
    fn build(self: Box<Self>) -> T;
}

#[cfg(test)]
mod tests {
    use lkml_tree::List;

    use super::*;

    #[test]
    fn test_field_accessors() {
        let text: Field<()> = Field::Value(Value::Code("SELECT 1".into()));
        assert_eq!(text.into_text().as_deref(), Some("SELECT 1"));

        let flag: Field<()> = Field::Value(Value::Identifier("true".into()));
        assert_eq!(flag.as_bool(), Some(true));

        let list: List = [
            Value::Identifier("a".into()),
            Value::Number(1.0),
            Value::String("b".into()),
            Value::Pair("k".into(), "v".into()),
        ]
        .into_iter()
        .collect();
        let field: Field<()> = Field::Value(Value::List(list));
        assert_eq!(field.clone().into_texts(), ["a", "b"]);
        assert_eq!(field.into_pairs(), [("k".to_owned(), "v".to_owned())]);

        let node = Field::Node(7);
        assert_eq!(node.as_f64(), None);
        assert_eq!(node.into_node(), Some(7));
    }
}
