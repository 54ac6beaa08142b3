use serde::Deserialize;
use serde::Serialize;

/// A reference to a type, by name.
///
/// Named types are identified by their metadata name: namespace-qualified,
/// nested types joined with `+`, generic arity suffixed with a backtick
/// (``System.Collections.Generic.Dictionary`2``). References are resolved
/// against a [`Compilation`](crate::Compilation) on demand, so a reference
/// to a type from an absent library is still a valid value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeRef>,
    },
    TypeParameter {
        name: String,
    },
    Array {
        element: Box<TypeRef>,
    },
}

impl TypeRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    #[must_use]
    pub fn type_parameter(name: impl Into<String>) -> Self {
        TypeRef::TypeParameter { name: name.into() }
    }

    #[must_use]
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::named("System.String")
    }

    #[must_use]
    pub fn bool() -> Self {
        Self::named("System.Boolean")
    }

    #[must_use]
    pub fn int() -> Self {
        Self::named("System.Int32")
    }

    #[must_use]
    pub fn object() -> Self {
        Self::named("System.Object")
    }

    #[must_use]
    pub fn void() -> Self {
        Self::named("System.Void")
    }

    /// Metadata name of a named type, without type arguments.
    #[must_use]
    pub fn metadata_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            TypeRef::TypeParameter { .. } | TypeRef::Array { .. } => None,
        }
    }

    #[must_use]
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            TypeRef::TypeParameter { .. } | TypeRef::Array { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_named(&self, metadata_name: &str) -> bool {
        self.metadata_name() == Some(metadata_name)
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.is_named("System.Void")
    }

    /// Whether a type parameter appears anywhere in this reference.
    #[must_use]
    pub fn contains_type_parameter(&self) -> bool {
        match self {
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::contains_type_parameter),
            TypeRef::TypeParameter { .. } => true,
            TypeRef::Array { element } => element.contains_type_parameter(),
        }
    }

    /// C#-style display string: keywords for special types, `T?` for
    /// nullable value types, `A.B<C, D>` for constructed generics.
    #[must_use]
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Namespace-qualified display with no keywords or `?` shorthand:
    /// `System.Nullable<System.Int32>`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.render(false)
    }

    fn render(&self, keywords: bool) -> String {
        match self {
            TypeRef::Named { name, args } => {
                if keywords {
                    if let Some(keyword) = special_type_keyword(name) {
                        return keyword.to_string();
                    }
                    if name == "System.Nullable`1" && args.len() == 1 {
                        return format!("{}?", args[0].render(keywords));
                    }
                }
                let mut display = display_metadata_name(name);
                if !args.is_empty() {
                    display.push('<');
                    let args = args
                        .iter()
                        .map(|arg| arg.render(keywords))
                        .collect::<Vec<_>>();
                    display.push_str(&args.join(", "));
                    display.push('>');
                }
                display
            }
            TypeRef::TypeParameter { name } => name.clone(),
            TypeRef::Array { element } => format!("{}[]", element.render(keywords)),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Convert a metadata name to its source form: arity suffixes dropped and
/// nested type separators written as dots.
#[must_use]
pub fn display_metadata_name(metadata_name: &str) -> String {
    let mut display = String::with_capacity(metadata_name.len());
    let mut chars = metadata_name.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => {
                while chars.peek().is_some_and(char::is_ascii_digit) {
                    chars.next();
                }
            }
            '+' => display.push('.'),
            _ => display.push(c),
        }
    }
    display
}

/// The C# keyword for a special type, if it has one.
#[must_use]
pub fn special_type_keyword(metadata_name: &str) -> Option<&'static str> {
    let keyword = match metadata_name {
        "System.Boolean" => "bool",
        "System.Byte" => "byte",
        "System.SByte" => "sbyte",
        "System.Char" => "char",
        "System.Decimal" => "decimal",
        "System.Double" => "double",
        "System.Single" => "float",
        "System.Int16" => "short",
        "System.UInt16" => "ushort",
        "System.Int32" => "int",
        "System.UInt32" => "uint",
        "System.Int64" => "long",
        "System.UInt64" => "ulong",
        "System.Object" => "object",
        "System.String" => "string",
        "System.Void" => "void",
        _ => return None,
    };
    Some(keyword)
}
