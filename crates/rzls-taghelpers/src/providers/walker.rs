use rzls_symbols::Compilation;
use rzls_symbols::NamedTypeSymbol;
use rzls_symbols::NamespaceSymbol;
use rzls_symbols::TypeId;

/// Visit every named type reachable from `namespace`, nested types
/// included, in declaration order.
pub(crate) fn visit_types<'a>(
    compilation: &'a Compilation,
    namespace: &'a NamespaceSymbol,
    visit: &mut impl FnMut(TypeId, &'a NamedTypeSymbol),
) {
    for &id in namespace.types() {
        visit_type(compilation, id, visit);
    }
    for child in namespace.namespaces() {
        visit_types(compilation, child, visit);
    }
}

fn visit_type<'a>(
    compilation: &'a Compilation,
    id: TypeId,
    visit: &mut impl FnMut(TypeId, &'a NamedTypeSymbol),
) {
    let symbol = compilation.type_symbol(id);
    visit(id, symbol);
    for &nested in symbol.nested_types() {
        visit_type(compilation, nested, visit);
    }
}
