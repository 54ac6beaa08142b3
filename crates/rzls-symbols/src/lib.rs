//! A capability-typed model of a compiled unit: assemblies, namespaces and
//! the named types they declare, with their attributes and members.
//!
//! Symbols are plain data loaded from a snapshot (see [`CompilationDef`])
//! or assembled with the fluent builders. A [`Compilation`] is immutable
//! once built; callers wanting a different view build a new one.

mod builder;
mod compilation;
mod error;
mod symbols;
mod types;

pub use builder::AssemblyBuilder;
pub use builder::CompilationBuilder;
pub use builder::MethodBuilder;
pub use builder::PropertyBuilder;
pub use builder::TypeBuilder;
pub use compilation::AssemblyDef;
pub use compilation::AssemblyId;
pub use compilation::AssemblySymbol;
pub use compilation::Compilation;
pub use compilation::CompilationDef;
pub use compilation::NamespaceSymbol;
pub use compilation::TypeId;
pub use error::SymbolLoadError;
pub use symbols::Accessibility;
pub use symbols::AttributeData;
pub use symbols::MethodSymbol;
pub use symbols::NamedArgument;
pub use symbols::NamedTypeSymbol;
pub use symbols::ParameterSymbol;
pub use symbols::PropertySymbol;
pub use symbols::Symbol;
pub use symbols::SymbolKind;
pub use symbols::TypeKind;
pub use symbols::TypeParameterSymbol;
pub use symbols::TypedConstant;
pub use types::display_metadata_name;
pub use types::special_type_keyword;
pub use types::TypeRef;
