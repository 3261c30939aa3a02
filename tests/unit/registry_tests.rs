use syncvio::backend::memory::MemBackend;
use syncvio::registry::Registry;
use syncvio::Error;

#[test]
fn builtins_are_always_resolvable() {
    let registry = Registry::with_builtins();
    assert!(registry.resolve("local").is_ok());
    assert!(registry.resolve("memory").is_ok());
    assert_eq!(registry.protocols(), vec!["local", "memory"]);
}

#[test]
fn unknown_protocol_is_a_distinct_failure() {
    let registry = Registry::with_builtins();
    let err = registry
        .resolve("wrong")
        .err()
        .expect("unknown protocol must not resolve");
    let actual = err
        .downcast_ref::<Error>()
        .expect("should downcast to syncvio::Error");
    assert!(matches!(actual, Error::UnknownProtocol(name) if name == "wrong"));
}

#[test]
fn empty_registry_resolves_nothing() {
    let registry = Registry::empty();
    assert!(registry.protocols().is_empty());
    assert!(registry.resolve("local").is_err());
}

#[test]
fn registered_factory_builds_backends() -> syncvio::Result<()> {
    let mut registry = Registry::empty();
    registry.register("owncloud", || Box::new(MemBackend::new()));

    let factory = registry.resolve("owncloud")?;
    let backend = factory();
    assert!(backend.capabilities().has_mandatory());
    Ok(())
}

#[test]
fn reregistering_replaces_previous_factory() -> syncvio::Result<()> {
    let mut registry = Registry::with_builtins();
    registry.register("memory", || {
        let mut backend = MemBackend::new();
        backend.insert_file("/marker", 1);
        Box::new(backend)
    });

    let factory = registry.resolve("memory")?;
    let mut backend = factory();
    backend.init(&Default::default(), Default::default())?;
    let stat = backend.stat("/marker")?;
    assert_eq!(stat.name, "marker");
    Ok(())
}
