use std::fmt;

/// Primitive type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    /// Only legal as a function return type
    Void,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "Int",
            Type::Float => "Float",
            Type::String => "String",
            Type::Bool => "Bool",
            Type::Void => "Void",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Whether a variable, parameter or value may have this type
    pub fn is_value_type(self) -> bool {
        !matches!(self, Type::Void)
    }

    /// Result of combining two numeric operands, with Int widening to Float.
    ///
    /// `None` when either side is not numeric.
    pub fn numeric_join(self, other: Type) -> Option<Type> {
        match (self, other) {
            (Type::Int, Type::Int) => Some(Type::Int),
            (Type::Float, Type::Float)
            | (Type::Int, Type::Float)
            | (Type::Float, Type::Int) => Some(Type::Float),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_keyword() {
        let rendered: Vec<String> = [Type::Int, Type::Float, Type::String, Type::Bool, Type::Void]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["Int", "Float", "String", "Bool", "Void"]);
    }

    #[test]
    fn test_numeric_join() {
        assert_eq!(Type::Int.numeric_join(Type::Int), Some(Type::Int));
        assert_eq!(Type::Float.numeric_join(Type::Float), Some(Type::Float));
        assert_eq!(Type::Int.numeric_join(Type::Float), Some(Type::Float));
        assert_eq!(Type::Float.numeric_join(Type::Int), Some(Type::Float));
        assert_eq!(Type::Int.numeric_join(Type::Bool), None);
        assert_eq!(Type::String.numeric_join(Type::String), None);
    }

    #[test]
    fn test_value_types() {
        assert!(!Type::Void.is_value_type());
        assert!(Type::String.is_value_type());
        assert!(Type::Float.is_numeric());
        assert!(!Type::Bool.is_numeric());
    }
}
