//! Integration tests for emission and compilation

mod common;

use common::*;
use proxygen_engine::diagnostics::COMPILER_OUTPUT;
use proxygen_engine::{
    compile, emit, CheckBackend, Diagnostic, HostProfile, InterfaceModel, MethodInfo,
    PropertyInfo, ProxyGenError, ProxySpec, RegistrySet, TypeCatalog, TypeRef,
};

#[test]
fn test_conflicting_members_fail_compilation() {
    // GetTitle() from the property clashes with the declared GetTitle()
    let page = InterfaceModel::new(t("Ns.IPage"))
        .with_property(PropertyInfo::read_only("Title", t("System.String")))
        .with_method(MethodInfo::new("GetTitle", vec![], t("System.String")));
    let catalog = TypeCatalog::new(vec![page.clone()]);
    let registries = RegistrySet::empty();
    let profile = HostProfile::default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let unit = ProxySpec::new(&page, &catalog, &registries, &profile)
        .with_getters()
        .with_methods()
        .synthesize(&mut diagnostics);
    let result = compile(&unit, &[], &CheckBackend, &mut diagnostics);

    let err = result.unwrap_err();
    assert!(matches!(err, ProxyGenError::Compilation { .. }));
    assert!(!err.diagnostics().is_empty());
    assert!(err.diagnostics()[0].contains("CS0111"));
    assert_eq!(diagnostics.len(), err.diagnostics().len());
    assert!(diagnostics.iter().all(|d| d.code == Some(COMPILER_OUTPUT)));
}

#[test]
fn test_host_proxies_pass_checks() {
    let catalog = host_catalog();
    let profile = HostProfile::default();
    let registries = host_registries(&catalog, &profile);
    let references = vec!["SuperMemoAssistant.Interop.dll".to_string()];

    for name in [ELEMENT, ELEMENT_REGISTRY, ELEMENT_WDW, COLLECTION] {
        let model = catalog.find(name).unwrap();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let unit = ProxySpec::new(model, &catalog, &registries, &profile)
            .with_all()
            .synthesize(&mut diagnostics);

        let artifact = compile(&unit, &references, &CheckBackend, &mut diagnostics)
            .unwrap_or_else(|e| panic!("{}: {:?}", name, e.diagnostics()));
        assert_eq!(artifact.assembly_name, unit.class_name);
        assert_eq!(artifact.source, emit(&unit));
        assert!(artifact.image.is_none());
    }
}

#[test]
fn test_emitted_collection_proxy() {
    let catalog = host_catalog();
    let profile = HostProfile::default();
    let registries = host_registries(&catalog, &profile);
    let collection = catalog.find(COLLECTION).unwrap();

    let source = ProxySpec::new(collection, &catalog, &registries, &profile)
        .with_all()
        .generate_source(&mut Vec::<Diagnostic>::new());

    let expected = "\
namespace ISMCollectionNamespace
{
    public class ISMCollectionSvc
    {
        private SuperMemoAssistant.Interop.SuperMemo.Core.ISMCollection var1;
        private SuperMemoAssistant.Interop.SuperMemo.Registry.Models.IElementRegistry var3;

        public ISMCollectionSvc(SuperMemoAssistant.Interop.SuperMemo.Core.ISMCollection var0, SuperMemoAssistant.Interop.SuperMemo.Registry.Models.IElementRegistry var2)
        {
            this.var1 = var0;
            this.var3 = var2;
            this.var1.Saved += new SuperMemoAssistant.Sys.Remoting.ActionProxy(this.RaiseSaved);
            this.var1.Renamed += new SuperMemoAssistant.Sys.Remoting.ActionProxy<SuperMemoAssistant.Interop.SuperMemo.Core.SMCollectionRenamedArgs>(this.RaiseRenamed);
        }

        public event System.EventHandler Saved;
        public event System.EventHandler<SuperMemoAssistant.Interop.SuperMemo.Core.SMCollectionRenamedArgs> Renamed;

        public string GetPath()
        {
            return this.var1.Path;
        }

        public void Open(int var4, string var6)
        {
            SuperMemoAssistant.Interop.SuperMemo.Registry.Members.IElement var5 = this.var3[var4];
            this.var1.Open(var5, var6);
        }

        public void RaiseSaved()
        {
            this.Saved?.Invoke(null, null);
        }

        public void RaiseRenamed(SuperMemoAssistant.Interop.SuperMemo.Core.SMCollectionRenamedArgs var7)
        {
            this.Renamed?.Invoke(null, var7);
        }
    }
}
";
    assert!(source.ends_with(expected), "unexpected source:\n{}", source);
}

#[test]
fn test_emission_is_repeatable() {
    let catalog = host_catalog();
    let profile = HostProfile::default();
    let registries = host_registries(&catalog, &profile);
    let element = catalog.find(ELEMENT).unwrap();
    let spec = ProxySpec::new(element, &catalog, &registries, &profile).with_all();

    let unit = spec.synthesize(&mut Vec::<Diagnostic>::new());
    let first = emit(&unit);
    let second = emit(&unit);
    assert_eq!(first, second);
    assert_eq!(first.matches("public IElementSvc(").count(), 1);

    // A second session starts its own allocator
    let again = spec.synthesize(&mut Vec::<Diagnostic>::new());
    assert_eq!(emit(&again), first);
}

#[test]
fn test_catalog_round_trip() {
    let catalog = host_catalog();
    let json = catalog.to_json().unwrap();
    let reloaded = TypeCatalog::from_json(&json).unwrap();

    assert_eq!(reloaded.host, catalog.host);
    assert_eq!(reloaded.iter().count(), catalog.iter().count());
    let element = reloaded.get(&t(ELEMENT)).unwrap();
    assert_eq!(element.properties.len(), 4);
    assert!(element.properties[1].can_write);
    assert_eq!(
        reloaded
            .find("IElementRegistry")
            .unwrap()
            .interfaces[0]
            .args(),
        &[TypeRef::new(ELEMENT)]
    );
}

#[test]
fn test_discovered_registries() {
    let catalog = host_catalog();
    let registries = host_registries(&catalog, &HostProfile::default());

    let names: Vec<&str> = registries.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Element", "Template"]);
    assert_eq!(
        registries.by_member(&t(ELEMENT)).unwrap().registry_type,
        t(ELEMENT_REGISTRY)
    );
}

#[test]
fn test_malformed_catalog() {
    let err = TypeCatalog::from_json(r#"{ "types": [ { "type": "Ns.IBroken<" } ] }"#).unwrap_err();
    assert!(matches!(err, ProxyGenError::Catalog(_)));
}
