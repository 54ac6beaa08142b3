//! Incremental discovery on top of Salsa.
//!
//! A [`Workspace`] holds the current compilation snapshot and discovery
//! settings. Descriptor sets are memoised per [`TargetAssembly`].
//!
//! Every query reads the whole compilation, so replacing it reruns
//! discovery for each assembly that is asked for again. A rescan that
//! yields an equal descriptor set is backdated, and queries built on top of
//! it are not re-executed.

use std::sync::Arc;

use rzls_conf::DiscoverySettings;
use rzls_symbols::Compilation;

use crate::DiscoveryError;
use crate::TagHelperDescriptor;
use crate::TagHelperDiscovery;

pub type TagHelperResult = Result<Arc<Vec<TagHelperDescriptor>>, DiscoveryError>;

#[salsa::db]
pub trait Db: salsa::Database {}

#[salsa::input]
#[derive(Debug)]
pub struct Workspace {
    #[returns(ref)]
    pub compilation: Arc<Compilation>,
    #[returns(ref)]
    pub settings: DiscoverySettings,
}

/// One assembly whose descriptors are cached on their own.
#[salsa::input]
#[derive(Debug)]
pub struct TargetAssembly {
    pub workspace: Workspace,
    #[returns(ref)]
    pub name: String,
}

/// Descriptors hosted in a single assembly.
///
/// An assembly missing from the compilation is an error, not an empty set.
#[salsa::tracked]
pub fn assembly_tag_helpers(db: &dyn Db, target: TargetAssembly) -> TagHelperResult {
    let workspace = target.workspace(db);
    let name = target.name(db);
    discover(
        workspace.compilation(db),
        workspace.settings(db),
        Some(name.as_str()),
    )
}

/// Descriptors from every scanned assembly in the workspace.
#[salsa::tracked]
pub fn workspace_tag_helpers(db: &dyn Db, workspace: Workspace) -> TagHelperResult {
    discover(workspace.compilation(db), workspace.settings(db), None)
}

fn discover(
    compilation: &Compilation,
    settings: &DiscoverySettings,
    target: Option<&str>,
) -> TagHelperResult {
    TagHelperDiscovery::default()
        .discover(compilation, settings, target)
        .map(Arc::new)
        .inspect_err(|error| tracing::error!(?target, %error, "Tag helper discovery failed"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use rzls_symbols::CompilationBuilder;
    use rzls_symbols::TypeBuilder;
    use rzls_symbols::TypeRef;
    use salsa::Setter;

    use super::*;
    use crate::known;

    #[salsa::db]
    #[derive(Clone)]
    struct TestDatabase {
        storage: salsa::Storage<Self>,
        executions: Arc<Mutex<usize>>,
    }

    impl TestDatabase {
        fn new() -> Self {
            let executions = Arc::new(Mutex::new(0));
            Self {
                storage: salsa::Storage::new(Some(Box::new({
                    let executions = executions.clone();
                    move |event| {
                        if let salsa::EventKind::WillExecute { .. } = event.kind {
                            *executions.lock().unwrap() += 1;
                        }
                    }
                }))),
                executions,
            }
        }

        fn take_executions(&self) -> usize {
            std::mem::take(&mut *self.executions.lock().unwrap())
        }
    }

    #[salsa::db]
    impl salsa::Database for TestDatabase {}

    #[salsa::db]
    impl Db for TestDatabase {}

    fn compilation(documented: &str) -> Arc<Compilation> {
        Arc::new(
            CompilationBuilder::new("App")
                .with_type(TypeBuilder::interface(known::ICOMPONENT))
                .with_type(
                    TypeBuilder::class("App.Counter")
                        .implements(TypeRef::named(known::ICOMPONENT))
                        .documentation(documented),
                )
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn results_are_memoised_until_inputs_change() {
        let mut db = TestDatabase::new();
        let workspace = Workspace::new(&db, compilation("Counts."), DiscoverySettings::default());

        let first = workspace_tag_helpers(&db, workspace).unwrap();
        assert!(first.iter().any(|d| d.name() == "App.Counter"));
        assert!(db.take_executions() > 0);

        let again = workspace_tag_helpers(&db, workspace).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(db.take_executions(), 0);

        workspace
            .set_settings(&mut db)
            .to(DiscoverySettings {
                include_documentation: false,
                ..DiscoverySettings::default()
            });
        let undocumented = workspace_tag_helpers(&db, workspace).unwrap();
        assert!(db.take_executions() > 0);
        assert!(undocumented.iter().all(|d| d.documentation().is_none()));
    }

    #[test]
    fn target_assembly_scopes_results() {
        let db = TestDatabase::new();
        let workspace = Workspace::new(&db, compilation("Counts."), DiscoverySettings::default());

        let app = TargetAssembly::new(&db, workspace, "App".to_string());
        assert!(!assembly_tag_helpers(&db, app).unwrap().is_empty());

        let missing = TargetAssembly::new(&db, workspace, "Missing".to_string());
        assert_eq!(
            assembly_tag_helpers(&db, missing),
            Err(DiscoveryError::UnknownAssembly {
                name: "Missing".to_string()
            })
        );
    }

    static NAME_LISTINGS: AtomicUsize = AtomicUsize::new(0);

    #[salsa::tracked]
    fn component_names(db: &dyn Db, workspace: Workspace) -> Vec<String> {
        NAME_LISTINGS.fetch_add(1, Ordering::SeqCst);
        workspace_tag_helpers(db, workspace)
            .map(|descriptors| descriptors.iter().map(|d| d.name().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn equal_rescans_are_backdated() {
        let mut db = TestDatabase::new();
        let workspace = Workspace::new(&db, compilation("Counts."), DiscoverySettings::default());

        let names = component_names(&db, workspace);
        assert!(names.iter().any(|name| name == "App.Counter"));
        assert_eq!(NAME_LISTINGS.load(Ordering::SeqCst), 1);
        db.take_executions();

        workspace.set_compilation(&mut db).to(compilation("Counts."));
        assert_eq!(component_names(&db, workspace), names);
        assert_eq!(db.take_executions(), 1);
        assert_eq!(NAME_LISTINGS.load(Ordering::SeqCst), 1);

        workspace
            .set_compilation(&mut db)
            .to(compilation("Counts up."));
        component_names(&db, workspace);
        assert_eq!(NAME_LISTINGS.load(Ordering::SeqCst), 2);
    }
}
