use std::sync::Arc;

use catnav_catalog::catalogservice::AddrConnector;
use catnav_catalog::Credential;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::{path, resolver, CountingConnector, Failure, CATALOG_URI};
use crate::{
    CaseSensitivity, CollectionsConfig, Drive, Error, NodeInfo, NodeKind, PathResolver, Resolved,
    ResolverConfig, Separator,
};

fn names(infos: &[NodeInfo]) -> Vec<&str> {
    infos.iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn connects_lazily_once() {
    let connector = CountingConnector::new(Failure::None);
    let resolver = resolver(ResolverConfig::default(), connector.clone());

    let session = resolver
        .session(&path("proj\\widgets"), None, None)
        .expect("must locate");
    assert_eq!((0, 0, 0), connector.calls.get());
    assert!(!session.root().is_connected());

    let resolved = session.resolve().await.expect("must resolve");
    assert_eq!((1, 1, 0), connector.calls.get());
    assert_eq!("widgets", resolved.name().await.unwrap());

    // further accesses reuse the connection and the listing.
    assert_eq!("DefaultCollection", session.root().name().await.unwrap());
    session.root().children().await.unwrap();
    session.resolve().await.expect("must resolve");
    assert_eq!((1, 1, 0), connector.calls.get());
}

#[tokio::test]
async fn root_name_connects_without_listing() {
    let connector = CountingConnector::new(Failure::None);
    let resolver = resolver(ResolverConfig::default(), connector.clone());

    let session = resolver.session(&path(""), None, None).expect("must locate");
    let resolved = session.resolve().await.expect("must resolve");
    assert!(matches!(resolved, Resolved::Server(_)));
    assert_eq!((0, 0, 0), connector.calls.get());

    let info = resolved.info().await.expect("must describe");
    assert_eq!(
        NodeInfo {
            name: "DefaultCollection".into(),
            kind: NodeKind::Server,
            value: json!({"url": CATALOG_URI}),
        },
        info
    );
    assert_eq!((1, 0, 0), connector.calls.get());
}

#[tokio::test]
async fn resolves_leaf_below_containers() {
    let connector = CountingConnector::new(Failure::None);
    let resolver = resolver(ResolverConfig::default(), connector);

    let widgets = resolver
        .list(&path("proj\\widgets"), None, None)
        .await
        .expect("must list");
    assert_eq!(
        vec!["/proj/widgets/build", "/proj/widgets/release"],
        names(&widgets)
    );

    let build = resolver
        .get(&path("proj\\widgets\\/proj/widgets/build"), None, None)
        .await
        .expect("must resolve");
    assert_eq!(
        NodeInfo {
            name: "/proj/widgets/build".into(),
            kind: NodeKind::Entry,
            value: json!({"definition": "ci"}),
        },
        build
    );
}

#[tokio::test]
async fn lists_root() {
    let resolver = resolver(
        ResolverConfig::default(),
        CountingConnector::new(Failure::None),
    );

    // "/motd" has no parent segments, so it's attached to the root.
    let root = resolver.list(&path(""), None, None).await.expect("must list");
    assert_eq!(vec!["/motd", "config", "proj"], names(&root));
    assert_eq!(
        vec![NodeKind::Entry, NodeKind::Folder, NodeKind::Folder],
        root.iter().map(|i| i.kind).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn leaf_lists_as_itself() {
    let resolver = resolver(
        ResolverConfig::default(),
        CountingConnector::new(Failure::None),
    );

    let listed = resolver
        .list(&path("config\\/config/retention"), None, None)
        .await
        .expect("must list");
    assert_eq!(
        vec![NodeInfo {
            name: "/config/retention".into(),
            kind: NodeKind::Entry,
            value: json!(30),
        }],
        listed
    );
}

#[rstest]
#[case::unknown_top_level("nope", "nope", "")]
#[case::unknown_nested("proj\\nope\\build", "nope", "proj")]
#[case::below_leaf("config\\/config/retention\\more", "more", "config\\/config/retention")]
#[case::case_differs("Proj", "Proj", "")]
#[tokio::test]
async fn path_not_found(
    #[case] rest: &str,
    #[case] exp_segment: &str,
    #[case] exp_resolved: &str,
) {
    let resolver = resolver(
        ResolverConfig::default(),
        CountingConnector::new(Failure::None),
    );

    match resolver.get(&path(rest), None, None).await {
        Err(Error::PathNotFound { segment, resolved }) => {
            assert_eq!(exp_segment, segment);
            assert_eq!(exp_resolved, resolved);
        }
        other => panic!("expected PathNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn redundant_separators_are_skipped() {
    let resolver = resolver(
        ResolverConfig::default(),
        CountingConnector::new(Failure::None),
    );

    let info = resolver
        .get(&path("\\proj\\\\gadgets\\"), None, None)
        .await
        .expect("must resolve");
    assert_eq!("gadgets", info.name);
    assert_eq!(NodeKind::Folder, info.kind);
}

#[tokio::test]
async fn case_insensitive() {
    let resolver = resolver(
        ResolverConfig {
            case_sensitivity: CaseSensitivity::Insensitive,
            ..Default::default()
        },
        CountingConnector::new(Failure::None),
    );

    let info = resolver
        .get(&path("PROJ\\Widgets"), None, None)
        .await
        .expect("must resolve");
    assert_eq!("widgets", info.name);
}

#[tokio::test]
async fn slash_separator() {
    let resolver = resolver(
        ResolverConfig {
            separator: Separator::Slash,
            ..Default::default()
        },
        CountingConnector::new(Failure::None),
    );

    let path = format!("Root[{}]/config/owners", crate::encode(CATALOG_URI));
    let owners = resolver.list(&path, None, None).await.expect("must list");
    assert_eq!(vec!["/config/owners/primary"], names(&owners));
}

#[rstest]
#[case::get("proj")]
#[case::root("")]
#[tokio::test]
async fn connection_failure(#[case] rest: &str) {
    let connector = CountingConnector::new(Failure::Connect);
    let resolver = resolver(ResolverConfig::default(), connector.clone());

    let err = resolver
        .get(&path(rest), None, None)
        .await
        .expect_err("must fail");
    assert!(
        matches!(
            err,
            Error::Connection {
                source: catnav_catalog::Error::Connection(_),
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
    assert_eq!((1, 0, 0), connector.calls.get());
}

#[tokio::test]
async fn listing_failure() {
    let connector = CountingConnector::new(Failure::List);
    let resolver = resolver(ResolverConfig::default(), connector.clone());

    // the root's name doesn't need a listing.
    resolver
        .get(&path(""), None, None)
        .await
        .expect("must describe root");

    let err = resolver
        .list(&path(""), None, None)
        .await
        .expect_err("must fail");
    assert!(matches!(err, Error::RemoteQuery { .. }), "unexpected error: {:?}", err);
    assert_eq!((2, 1, 0), connector.calls.get());
}

#[tokio::test]
async fn collections_disabled_by_default() {
    let connector = CountingConnector::new(Failure::None);
    let resolver = resolver(ResolverConfig::default(), connector.clone());

    resolver.list(&path(""), None, None).await.expect("must list");
    let err = resolver
        .get(&path("Collections"), None, None)
        .await
        .expect_err("must fail");
    assert!(matches!(err, Error::PathNotFound { .. }));
    assert_eq!(0, connector.calls.get().2);
}

#[tokio::test]
async fn collections_enabled() {
    let connector = CountingConnector::new(Failure::None);
    let resolver = resolver(
        ResolverConfig {
            collections: Some(CollectionsConfig {
                container_name: "Collections".into(),
                kind: "ProjectCollection".into(),
            }),
            ..Default::default()
        },
        connector.clone(),
    );

    let root = resolver.list(&path(""), None, None).await.expect("must list");
    assert_eq!(vec!["/motd", "config", "proj", "Collections"], names(&root));

    let collections = resolver
        .list(&path("Collections"), None, None)
        .await
        .expect("must list");
    assert_eq!(vec!["DefaultCollection", "Archive"], names(&collections));
    assert_eq!(NodeKind::Collection, collections[1].kind);
    assert_eq!(
        json!({"kind": "ProjectCollection", "value": {"state": "offline"}}),
        collections[1].value
    );

    // one connection, listing and typed query per call.
    assert_eq!((2, 2, 2), connector.calls.get());
}

#[rstest]
#[case::call_credential(Some(Credential::new("alice", "a")), Some("alice"))]
#[case::drive_fallback(Some(Credential::new("", "")), Some("bob"))]
#[case::no_call_credential(None, Some("bob"))]
#[tokio::test]
async fn drive_credential_fallback(
    #[case] call_credential: Option<Credential>,
    #[case] exp_username: Option<&str>,
) {
    let connector = CountingConnector::new(Failure::None);
    let resolver = resolver(ResolverConfig::default(), connector.clone());
    let drive = Drive::mount("tfs", CATALOG_URI, Some(Credential::new("bob", "b")))
        .expect("must mount");

    resolver
        .get(
            &drive.join(Separator::Backslash, "proj"),
            call_credential.as_ref(),
            Some(&drive),
        )
        .await
        .expect("must resolve");

    assert_eq!(
        exp_username,
        connector.last_username.lock().unwrap().as_deref()
    );
}

#[tokio::test]
async fn memory_catalog_through_drive() {
    let resolver = PathResolver::new(ResolverConfig::default(), Arc::new(AddrConnector));
    let drive = Drive::mount("mem", "memory://?name=Scratch", None).expect("must mount");

    let info = resolver
        .get(&drive.join(Separator::Backslash, ""), None, Some(&drive))
        .await
        .expect("must connect");
    assert_eq!("Scratch", info.name);

    let children = resolver
        .list(&drive.join(Separator::Backslash, ""), None, Some(&drive))
        .await
        .expect("must list");
    assert!(children.is_empty());
}
