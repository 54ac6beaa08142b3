use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde::Serialize;

use crate::symbols::MethodSymbol;
use crate::symbols::NamedTypeSymbol;
use crate::symbols::PropertySymbol;
use crate::SymbolLoadError;
use crate::TypeRef;

/// Index of a type in its [`Compilation`]'s arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyId(u32);

impl AssemblyId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Serialized form of one assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyDef {
    pub name: String,
    #[serde(default)]
    pub types: Vec<NamedTypeSymbol>,
}

/// Serialized form of a compilation: the assembly being compiled plus the
/// assemblies it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationDef {
    pub assembly: AssemblyDef,
    #[serde(default)]
    pub references: Vec<AssemblyDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSymbol {
    name: String,
    namespaces: Vec<NamespaceSymbol>,
    types: Vec<TypeId>,
}

impl NamespaceSymbol {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn namespaces(&self) -> &[NamespaceSymbol] {
        &self.namespaces
    }

    /// Top-level types declared directly in this namespace.
    #[must_use]
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    fn insert(&mut self, path: &str, id: TypeId) {
        if path.is_empty() {
            self.types.push(id);
            return;
        }
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        let index = match self.namespaces.iter().position(|ns| ns.name == head) {
            Some(index) => index,
            None => {
                self.namespaces.push(NamespaceSymbol {
                    name: head.to_string(),
                    ..NamespaceSymbol::default()
                });
                self.namespaces.len() - 1
            }
        };
        self.namespaces[index].insert(rest, id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySymbol {
    id: AssemblyId,
    name: String,
    global_namespace: NamespaceSymbol,
}

impl AssemblySymbol {
    #[must_use]
    pub fn id(&self) -> AssemblyId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn global_namespace(&self) -> &NamespaceSymbol {
        &self.global_namespace
    }
}

/// An immutable snapshot of a compiled unit and its references.
///
/// Types live in one arena addressed by [`TypeId`]. Lookups by metadata
/// name prefer the primary assembly, then references in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    assemblies: Vec<AssemblySymbol>,
    types: Vec<NamedTypeSymbol>,
    type_assemblies: Vec<AssemblyId>,
    by_metadata_name: FxHashMap<String, TypeId>,
}

impl Compilation {
    pub fn new(primary: AssemblyDef, references: Vec<AssemblyDef>) -> Result<Self, SymbolLoadError> {
        let mut compilation = Compilation {
            assemblies: Vec::with_capacity(references.len() + 1),
            types: Vec::new(),
            type_assemblies: Vec::new(),
            by_metadata_name: FxHashMap::default(),
        };

        for def in std::iter::once(primary).chain(references) {
            compilation.add_assembly(def)?;
        }

        tracing::debug!(
            assemblies = compilation.assemblies.len(),
            types = compilation.types.len(),
            "Loaded compilation"
        );
        Ok(compilation)
    }

    pub fn from_def(def: CompilationDef) -> Result<Self, SymbolLoadError> {
        Self::new(def.assembly, def.references)
    }

    pub fn from_json(json: &str) -> Result<Self, SymbolLoadError> {
        let def: CompilationDef = serde_json::from_str(json)?;
        Self::from_def(def)
    }

    fn add_assembly(&mut self, def: AssemblyDef) -> Result<(), SymbolLoadError> {
        if self.assemblies.iter().any(|assembly| assembly.name == def.name) {
            return Err(SymbolLoadError::DuplicateAssembly { name: def.name });
        }

        let assembly_id = AssemblyId(u32::try_from(self.assemblies.len()).unwrap_or(u32::MAX));
        let mut local: FxHashMap<String, TypeId> = FxHashMap::default();
        let first = self.types.len();

        for mut symbol in def.types {
            let segment = symbol.metadata_segment();
            symbol.metadata_name = match (&symbol.containing_type, symbol.namespace.as_str()) {
                (Some(containing), _) => format!("{containing}+{segment}"),
                (None, "") => segment,
                (None, namespace) => format!("{namespace}.{segment}"),
            };

            let id = TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
            if local.insert(symbol.metadata_name.clone(), id).is_some() {
                return Err(SymbolLoadError::DuplicateType {
                    assembly: def.name,
                    metadata_name: symbol.metadata_name,
                });
            }
            self.by_metadata_name
                .entry(symbol.metadata_name.clone())
                .or_insert(id);
            self.types.push(symbol);
            self.type_assemblies.push(assembly_id);
        }

        let mut global_namespace = NamespaceSymbol::default();
        for index in first..self.types.len() {
            let id = TypeId(u32::try_from(index).unwrap_or(u32::MAX));
            let Some(containing) = self.types[index].containing_type.clone() else {
                global_namespace.insert(&self.types[index].namespace, id);
                continue;
            };
            let Some(parent) = local.get(&containing) else {
                return Err(SymbolLoadError::UnknownContainingType {
                    assembly: def.name,
                    name: self.types[index].name.clone(),
                    containing,
                });
            };
            self.types[parent.index()].nested_types.push(id);
        }

        self.assemblies.push(AssemblySymbol {
            id: assembly_id,
            name: def.name,
            global_namespace,
        });
        Ok(())
    }

    #[must_use]
    pub fn assemblies(&self) -> &[AssemblySymbol] {
        &self.assemblies
    }

    /// The assembly being compiled.
    #[must_use]
    pub fn primary_assembly(&self) -> &AssemblySymbol {
        &self.assemblies[0]
    }

    #[must_use]
    pub fn assembly(&self, id: AssemblyId) -> &AssemblySymbol {
        &self.assemblies[id.index()]
    }

    #[must_use]
    pub fn assembly_by_name(&self, name: &str) -> Option<&AssemblySymbol> {
        self.assemblies.iter().find(|assembly| assembly.name == name)
    }

    #[must_use]
    pub fn assembly_of(&self, id: TypeId) -> &AssemblySymbol {
        self.assembly(self.type_assemblies[id.index()])
    }

    #[must_use]
    pub fn type_symbol(&self, id: TypeId) -> &NamedTypeSymbol {
        &self.types[id.index()]
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &NamedTypeSymbol)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, symbol)| (TypeId(u32::try_from(index).unwrap_or(u32::MAX)), symbol))
    }

    /// Look up a well-known type. Absent types are `None`, never an error:
    /// a compilation may not reference the library that defines them.
    #[must_use]
    pub fn get_type_by_metadata_name(&self, metadata_name: &str) -> Option<TypeId> {
        self.by_metadata_name.get(metadata_name).copied()
    }

    #[must_use]
    pub fn resolve(&self, ty: &TypeRef) -> Option<TypeId> {
        ty.metadata_name()
            .and_then(|name| self.get_type_by_metadata_name(name))
    }

    #[must_use]
    pub fn base_type(&self, id: TypeId) -> Option<TypeId> {
        self.type_symbol(id)
            .base_type()
            .and_then(|base| self.resolve(base))
    }

    /// The type itself followed by its resolvable base types, most derived
    /// first.
    pub fn type_and_base_types(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        let limit = self.types.len();
        std::iter::successors(Some(id), move |current| self.base_type(*current)).take(limit)
    }

    /// Every interface the type implements, directly, through a base type,
    /// or through interface inheritance. Deduplicated, in discovery order.
    #[must_use]
    pub fn all_interfaces(&self, id: TypeId) -> Vec<TypeRef> {
        let mut seen: FxHashSet<TypeRef> = FxHashSet::default();
        let mut result = Vec::new();
        let mut pending: Vec<TypeRef> = Vec::new();

        for current in self.type_and_base_types(id) {
            pending.extend(self.type_symbol(current).interfaces().iter().rev().cloned());
            while let Some(interface) = pending.pop() {
                if !seen.insert(interface.clone()) {
                    continue;
                }
                if let Some(resolved) = self.resolve(&interface) {
                    pending.extend(
                        self.type_symbol(resolved)
                            .interfaces()
                            .iter()
                            .rev()
                            .cloned(),
                    );
                }
                result.push(interface);
            }
        }
        result
    }

    #[must_use]
    pub fn implements(&self, id: TypeId, interface: &str) -> bool {
        self.all_interfaces(id)
            .iter()
            .any(|candidate| candidate.is_named(interface))
    }

    /// Whether `base` is a strict ancestor of the type.
    #[must_use]
    pub fn inherits_from(&self, id: TypeId, base: &str) -> bool {
        self.type_and_base_types(id)
            .skip(1)
            .any(|ancestor| self.type_symbol(ancestor).metadata_name() == base)
    }

    #[must_use]
    pub fn is_delegate(&self, ty: &TypeRef) -> bool {
        match self.resolve(ty) {
            Some(id) => self.type_symbol(id).is_delegate(),
            None => ty.metadata_name().is_some_and(|name| {
                name == "System.Action"
                    || name.starts_with("System.Action`")
                    || name.starts_with("System.Func`")
            }),
        }
    }

    #[must_use]
    pub fn is_enum(&self, ty: &TypeRef) -> bool {
        self.resolve(ty)
            .is_some_and(|id| self.type_symbol(id).is_enum())
    }

    #[must_use]
    pub fn delegate_invoke(&self, ty: &TypeRef) -> Option<&MethodSymbol> {
        let id = self.resolve(ty)?;
        let symbol = self.type_symbol(id);
        if !symbol.is_delegate() {
            return None;
        }
        symbol.find_method("Invoke")
    }

    /// First property with this name on the type or its base types.
    #[must_use]
    pub fn find_property(&self, id: TypeId, name: &str) -> Option<&PropertySymbol> {
        self.type_and_base_types(id)
            .find_map(|current| self.type_symbol(current).find_property(name))
    }

    /// First method with this name on the type or its base types.
    #[must_use]
    pub fn find_method(&self, id: TypeId, name: &str) -> Option<&MethodSymbol> {
        self.type_and_base_types(id)
            .find_map(|current| self.type_symbol(current).find_method(name))
    }
}
